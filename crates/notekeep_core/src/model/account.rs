//! Account credentials and session identity.
//!
//! # Invariants
//! - A `Credentials` value has passed the form rules for its flow.
//! - Usernames are stored trimmed; passwords are never trimmed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const USERNAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Rejection reasons for login/registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    MissingFields,
    UsernameTooLong { chars: usize, max: usize },
    PasswordTooShort { chars: usize, min: usize },
    PasswordMismatch,
    InvalidEmail(String),
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "username and password are required"),
            Self::UsernameTooLong { chars, max } => {
                write!(f, "username has {chars} characters; at most {max} allowed")
            }
            Self::PasswordTooShort { chars, min } => {
                write!(f, "password has {chars} characters; at least {min} required")
            }
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::InvalidEmail(value) => write!(f, "not an email address: `{value}`"),
        }
    }
}

impl Error for AccountValidationError {}

/// Username/password pair accepted by the auth providers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Login form rules: both fields present after trimming the username.
    pub fn for_login(username: &str, password: &str) -> Result<Self, AccountValidationError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountValidationError::MissingFields);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Registration form rules.
    ///
    /// Checked in order: presence, username length, password length,
    /// confirmation match.
    pub fn for_registration(
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, AccountValidationError> {
        let credentials = Self::for_login(username, password)?;

        let username_chars = credentials.username.chars().count();
        if username_chars > USERNAME_MAX_CHARS {
            return Err(AccountValidationError::UsernameTooLong {
                chars: username_chars,
                max: USERNAME_MAX_CHARS,
            });
        }

        let password_chars = password.chars().count();
        if password_chars < PASSWORD_MIN_CHARS {
            return Err(AccountValidationError::PasswordTooShort {
                chars: password_chars,
                min: PASSWORD_MIN_CHARS,
            });
        }

        if password != confirm_password {
            return Err(AccountValidationError::PasswordMismatch);
        }

        Ok(credentials)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Requires the username to look like an email address.
    pub fn require_email(&self) -> Result<&str, AccountValidationError> {
        if EMAIL_RE.is_match(&self.username) {
            Ok(&self.username)
        } else {
            Err(AccountValidationError::InvalidEmail(self.username.clone()))
        }
    }
}

/// Identity of the currently active user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend-assigned id; equals `username` for local accounts.
    pub user_id: String,
    /// Username or email shown to the user.
    pub username: String,
}

impl Session {
    pub fn local(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            user_id: username.clone(),
            username,
        }
    }

    /// Key under which this user's notes are stored.
    pub fn storage_owner(&self) -> &str {
        &self.username
    }
}
