//! Registered user model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use super::BirthDate;

/// Validation errors returned by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    SingleWordName,
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::SingleWordName => write!(f, "name must contain at least two words"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a full name, in characters.
pub const NAME_MIN: usize = 4;
/// Maximum allowed length for a full name, in characters.
pub const NAME_MAX: usize = 100;

/// A person's full name: at least two whitespace-separated words.
///
/// Surrounding whitespace is trimmed before length checks and storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`].
    ///
    /// Every rule is checked so callers can surface all failures at once.
    pub fn parse(raw: &str) -> Result<Self, Vec<UserValidationError>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(vec![UserValidationError::EmptyName]);
        }

        let mut errors = Vec::new();
        let length = trimmed.chars().count();
        if length < NAME_MIN {
            errors.push(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        if length > NAME_MAX {
            errors.push(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        if trimmed.split_whitespace().count() < 2 {
            errors.push(UserValidationError::SingleWordName);
        }

        if errors.is_empty() {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(errors)
        }
    }

    /// Validate and construct a [`FullName`], reporting the first failure.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::parse(raw.as_ref()).map_err(|mut errors| errors.swap_remove(0))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part; dot-separated hostname labels with any TLD.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
            r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Examples
    /// ```
    /// use user_registry::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("jonas@example.com").is_ok());
    /// assert!(EmailAddress::new("jonas@localhost").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Registered user.
///
/// ## Invariants
/// - `id` is assigned at creation and never changes.
/// - `name`, `email`, and `birth_date` satisfy their value-type rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: FullName,
    email: EmailAddress,
    birth_date: BirthDate,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, name: FullName, email: EmailAddress, birth_date: BirthDate) -> Self {
        Self {
            id,
            name,
            email,
            birth_date,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Full name.
    pub fn name(&self) -> &FullName {
        &self.name
    }

    /// Contact email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Canonical birth date.
    pub fn birth_date(&self) -> BirthDate {
        self.birth_date
    }
}

#[cfg(test)]
mod tests;
