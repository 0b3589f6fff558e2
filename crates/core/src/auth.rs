use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AppError;

/// Identity of the caller behind a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    email: String,
    display_name: String,
}

impl UserIdentity {
    /// Creates a user identity from verified token and account data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            display_name: display_name.into(),
        }
    }

    /// Returns the stable subject, the user id rendered as a string.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }
}

/// Reasons a bearer token is refused by the token verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// Signature does not match the configured key or algorithm.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The `exp` claim is in the past.
    #[error("token has expired")]
    Expired,

    /// Token could not be decoded or carries unusable claims.
    #[error("token is malformed")]
    Malformed,
}

impl From<TokenRejection> for AppError {
    fn from(value: TokenRejection) -> Self {
        Self::Unauthorized(value.to_string())
    }
}
