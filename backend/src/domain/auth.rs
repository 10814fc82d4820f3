//! Authentication primitives: login credentials, registrations and hashes.
//!
//! Inbound adapters build these from raw strings before calling a service, so
//! the services only ever see normalised, shape-checked input. Passwords are
//! held in [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, PersonName, UserValidationError, Username};

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use proflink::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "hunter22").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for a signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// At least one of name, username, email or password was blank.
    MissingFields,
    /// A field was present but malformed.
    Invalid(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    /// Name of the offending request field, if a single one is to blame.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingFields => None,
            Self::Invalid(err) => Some(err.field()),
            Self::PasswordTooShort { .. } => Some("password"),
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "All fields are required"),
            Self::Invalid(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Shape-checked signup request.
///
/// The password length rule is checked separately through
/// [`Registration::ensure_password_strength`] so that duplicate-account
/// errors take precedence over a weak password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: PersonName,
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw signup fields.
    ///
    /// # Examples
    /// ```
    /// use proflink::domain::{Registration, RegistrationValidationError};
    ///
    /// let missing = Registration::try_from_parts("Alice", "", "a@example.com", "secret1");
    /// assert_eq!(missing, Err(RegistrationValidationError::MissingFields));
    /// ```
    pub fn try_from_parts(
        name: &str,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let blank = [name, username, email]
            .iter()
            .any(|value| value.trim().is_empty());
        if blank || password.is_empty() {
            return Err(RegistrationValidationError::MissingFields);
        }
        Ok(Self {
            name: PersonName::new(name)?,
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Reject passwords shorter than [`PASSWORD_MIN`] characters.
    pub fn ensure_password_strength(&self) -> Result<(), RegistrationValidationError> {
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(())
    }

    /// Display name to register.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Requested handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address for the account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; hashed before it is stored.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Opaque salted password hash as produced by a password hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash suitable for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  alice  ", "secret")]
    #[case("bob", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("", "alice", "alice@example.com", "secret1")]
    #[case("Alice", "  ", "alice@example.com", "secret1")]
    #[case("Alice", "alice", "", "secret1")]
    #[case("Alice", "alice", "alice@example.com", "")]
    fn registration_requires_every_field(
        #[case] name: &str,
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let result = Registration::try_from_parts(name, username, email, password);
        assert_eq!(result, Err(RegistrationValidationError::MissingFields));
    }

    #[rstest]
    fn registration_reports_malformed_email() {
        let err = Registration::try_from_parts("Alice", "alice", "not-an-email", "secret1")
            .expect_err("email is malformed");
        assert_eq!(err.field(), Some("email"));
    }

    #[rstest]
    #[case("abc12", false)]
    #[case("abc123", true)]
    fn password_strength_boundary(#[case] password: &str, #[case] accepted: bool) {
        let registration =
            Registration::try_from_parts("Alice", "alice", "alice@example.com", password)
                .expect("shape is valid");
        assert_eq!(registration.ensure_password_strength().is_ok(), accepted);
    }

    #[rstest]
    fn registration_normalises_fields() {
        let registration =
            Registration::try_from_parts(" Alice ", " alice ", "Alice@Example.com", "secret1")
                .expect("valid registration");
        assert_eq!(registration.name().as_ref(), "Alice");
        assert_eq!(registration.username().as_ref(), "alice");
        assert_eq!(registration.email().as_ref(), "alice@example.com");
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$10$abcdefghijklmnopqrstuv");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
