//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after a migration changes.

diesel::table! {
    /// Registered users.
    ///
    /// Email uniqueness is enforced by the registry service, not by an index.
    users (id) {
        id -> Uuid,
        /// Trimmed full name (max 100 characters).
        name -> Varchar,
        /// Trimmed email address (max 254 characters).
        email -> Varchar,
        birth_date -> Date,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
