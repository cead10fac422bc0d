//! User record validation.
//!
//! [`validate_user`] turns an untyped [`UserDraft`] into a [`ValidatedUser`]
//! or an ordered list of [`FieldError`]s. Every rule runs; the first failure
//! does not hide later ones. Unknown input fields never reach this module:
//! inbound adapters drop them while building the draft.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Value, json};

use super::{
    BirthDate, BirthDateError, BirthDateInput, EmailAddress, Error, FullName, UserValidationError,
};

/// Field name reported for full-name failures.
pub const NAME_FIELD: &str = "name";
/// Field name reported for email failures.
pub const EMAIL_FIELD: &str = "email";
/// Field name reported for birth-date failures.
pub const BIRTH_DATE_FIELD: &str = "birth_date";

/// Candidate user record of unvalidated shape.
///
/// `None` means the field was absent or `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub birth_date: Option<Value>,
}

/// A user record whose fields passed validation and were coerced to their
/// canonical types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub name: FullName,
    pub email: EmailAddress,
    pub birth_date: BirthDate,
}

/// Machine-readable reason attached to a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    Missing,
    InvalidType,
    TooShort,
    TooLong,
    SingleWord,
    InvalidEmail,
    InvalidFormat,
    OutOfRange,
    FutureDate,
}

/// Validation failure attributable to a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    fn missing(field: &'static str) -> Self {
        Self::new(field, FieldErrorCode::Missing, format!("{field} is required"))
    }

    fn invalid_type(field: &'static str, expected: &str) -> Self {
        Self::new(
            field,
            FieldErrorCode::InvalidType,
            format!("{field} must be {expected}"),
        )
    }

    fn from_user_error(field: &'static str, error: &UserValidationError) -> Self {
        let code = match error {
            UserValidationError::EmptyName | UserValidationError::EmptyEmail => {
                FieldErrorCode::Missing
            }
            UserValidationError::NameTooShort { .. } => FieldErrorCode::TooShort,
            UserValidationError::NameTooLong { .. } | UserValidationError::EmailTooLong { .. } => {
                FieldErrorCode::TooLong
            }
            UserValidationError::SingleWordName => FieldErrorCode::SingleWord,
            UserValidationError::InvalidEmail => FieldErrorCode::InvalidEmail,
            UserValidationError::EmptyId | UserValidationError::InvalidId => {
                FieldErrorCode::InvalidFormat
            }
        };
        Self::new(field, code, error.to_string())
    }

    fn from_birth_date_error(error: BirthDateError) -> Self {
        let code = match error {
            BirthDateError::InvalidFormat => FieldErrorCode::InvalidFormat,
            BirthDateError::OutOfRange { .. } => FieldErrorCode::OutOfRange,
            BirthDateError::FutureDate => FieldErrorCode::FutureDate,
        };
        Self::new(BIRTH_DATE_FIELD, code, error.to_string())
    }
}

/// Ordered collection of field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Individual failures in rule order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether no rule failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All messages joined into one human-readable sentence.
    pub fn joined_message(&self) -> String {
        self.0
            .iter()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        self.0.extend(errors);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined_message())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        Error::invalid_request(value.joined_message()).with_details(json!({
            "errors": value.0,
        }))
    }
}

/// Validate a candidate record against the registration rules.
///
/// `today` bounds the birth date and anchors age-derived dates.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use serde_json::json;
/// use user_registry::domain::{UserDraft, validate_user};
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
/// let draft = UserDraft {
///     name: Some(json!("Jonas Jonaitis")),
///     email: Some(json!("jonas@example.com")),
///     birth_date: Some(json!(30)),
/// };
/// let user = validate_user(draft, today).expect("valid draft");
/// assert_eq!(user.birth_date.to_string(), "1995-01-01");
/// ```
pub fn validate_user(draft: UserDraft, today: NaiveDate) -> Result<ValidatedUser, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = validate_name(draft.name.as_ref()).map_err(|failures| errors.extend(failures));
    let email = validate_email(draft.email.as_ref()).map_err(|failure| errors.push(failure));
    let birth_date =
        validate_birth_date(draft.birth_date.as_ref(), today).map_err(|failure| errors.push(failure));

    match (name, email, birth_date) {
        (Ok(name), Ok(email), Ok(birth_date)) => Ok(ValidatedUser {
            name,
            email,
            birth_date,
        }),
        _ => Err(errors),
    }
}

fn required_string<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<&'a str, FieldError> {
    match value {
        None => Err(FieldError::missing(field)),
        Some(Value::String(raw)) if raw.trim().is_empty() => Err(FieldError::missing(field)),
        Some(Value::String(raw)) => Ok(raw.as_str()),
        Some(_) => Err(FieldError::invalid_type(field, "a string")),
    }
}

fn validate_name(value: Option<&Value>) -> Result<FullName, Vec<FieldError>> {
    let raw = required_string(value, NAME_FIELD).map_err(|error| vec![error])?;
    FullName::parse(raw).map_err(|failures| {
        failures
            .iter()
            .map(|failure| FieldError::from_user_error(NAME_FIELD, failure))
            .collect()
    })
}

fn validate_email(value: Option<&Value>) -> Result<EmailAddress, FieldError> {
    let raw = required_string(value, EMAIL_FIELD)?;
    EmailAddress::new(raw).map_err(|failure| FieldError::from_user_error(EMAIL_FIELD, &failure))
}

fn validate_birth_date(value: Option<&Value>, today: NaiveDate) -> Result<BirthDate, FieldError> {
    let value = match value {
        None => return Err(FieldError::missing(BIRTH_DATE_FIELD)),
        Some(Value::String(raw)) if raw.trim().is_empty() => {
            return Err(FieldError::missing(BIRTH_DATE_FIELD));
        }
        Some(value) => value,
    };
    BirthDateInput::from_json(value)
        .and_then(|input| BirthDate::resolve(&input, today))
        .map_err(FieldError::from_birth_date_error)
}
