//! Domain primitives, validation rules, and the registry service.
//!
//! Purpose: define strongly typed user records and the rules that turn an
//! untyped submission into one. Nothing here knows about HTTP or SQL;
//! adapters talk to the domain through [`ports`].
//!
//! Public surface:
//! - [`User`], [`UserId`], [`FullName`], [`EmailAddress`]: the user aggregate
//!   and its value types.
//! - [`BirthDate`] and [`BirthDateInput`]: birth-date normalisation from a
//!   date string or an age in whole years.
//! - [`validate_user`]: aggregate validation reporting every failing field.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`UserRegistryService`]: implementation of the driving ports.

pub mod birth_date;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::birth_date::{BirthDate, BirthDateError, BirthDateInput, MAX_AGE, MIN_AGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, FullName, User, UserId, UserValidationError};
pub use self::user_service::UserRegistryService;
pub use self::validation::{
    FieldError, FieldErrorCode, FieldErrors, UserDraft, ValidatedUser, validate_user,
};

/// Convenient result alias for fallible domain operations.
pub type DomainResult<T> = Result<T, Error>;
