use thiserror::Error;

use crate::RequestFailure;

/// Bearer credential for the current user. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn establish(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn clear(&mut self) {
        self.token = None;
    }
}

/// A login call that did not yield a token.
///
/// `email_flag` / `password_flag` mirror the `email` and `senha` keys of the
/// server's error payload: `None` when the key is absent, otherwise whether
/// its value was truthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRejection {
    pub failure: RequestFailure,
    pub email_flag: Option<bool>,
    pub password_flag: Option<bool>,
}

impl LoginRejection {
    pub fn without_flags(failure: RequestFailure) -> Self {
        Self {
            failure,
            email_flag: None,
            password_flag: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("The user with email {email} is not registered!")]
    UnknownEmail { email: String },
    #[error("Your password is wrong!")]
    WrongPassword,
    #[error("Could not authenticate the email {email}!")]
    InvalidCredentials { email: String },
}

impl AuthError {
    /// Maps a rejected login onto the message the user sees.
    ///
    /// The server only distinguishes the two cases when its payload carries at
    /// least one of the flag keys; anything else is a generic failure.
    pub fn classify(email: &str, rejection: &LoginRejection) -> Self {
        let email = email.to_string();
        match (rejection.email_flag, rejection.password_flag) {
            (None, None) => AuthError::InvalidCredentials { email },
            (Some(false) | None, _) => AuthError::UnknownEmail { email },
            (Some(true), Some(false) | None) => AuthError::WrongPassword,
            (Some(true), Some(true)) => AuthError::InvalidCredentials { email },
        }
    }
}
