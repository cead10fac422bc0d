//! Outbound adapters implementing the domain's driven ports.
//!
//! - [`persistence`]: PostgreSQL repository via Diesel.
//! - [`memory`]: process-local repository for development and tests.

pub mod memory;
pub mod persistence;
