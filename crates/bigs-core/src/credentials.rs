//! Sign-in and sign-up inputs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::InvalidInputError;

/// Special characters a password may (and must) draw from.
const PASSWORD_SYMBOLS: &str = "!%*#?&";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$")
        .expect("email pattern is valid")
});

// No lookahead in `regex`; the one-of-each rules are checked separately.
static PASSWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!%*#?&]{8,}$").expect("password pattern is valid"));

/// Sign-in credentials.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use bigs_core::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter2!");
/// assert_eq!(creds.username(), "alice@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Arguments
    ///
    /// * `username` - The account's username (an email address)
    /// * `password` - The account password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account registration input.
#[derive(Clone)]
pub struct SignUp {
    pub username: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUp {
    /// Check the form before sending it.
    ///
    /// The username must look like an email address. The password needs at
    /// least 8 characters from letters, digits and `!%*#?&`, with one of each
    /// kind, and must match its confirmation.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if !is_email(&self.username) {
            return Err(invalid("username must be an email address"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be blank"));
        }
        if !is_strong_password(&self.password) {
            return Err(invalid(
                "password needs 8+ characters with a letter, a digit and one of !%*#?&",
            ));
        }
        if self.password != self.confirm_password {
            return Err(invalid("passwords do not match"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> InvalidInputError {
    InvalidInputError::Other {
        message: message.to_string(),
    }
}

fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

fn is_strong_password(value: &str) -> bool {
    PASSWORD_CHARSET.is_match(value)
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

impl fmt::Debug for SignUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUp")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
