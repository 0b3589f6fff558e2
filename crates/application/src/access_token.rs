use chrono::{DateTime, Utc};
use rolegate_core::{AppResult, TokenRejection};
use rolegate_domain::UserId;

/// Claims carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Subject the token was issued to.
    pub user_id: UserId,
    /// Email at the time of issue.
    pub email: String,
    /// Issue instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    /// Encoded bearer credential.
    pub token: String,
    /// Expiry instant embedded in the token.
    pub expires_at: DateTime<Utc>,
}

/// Port for signing and verifying bearer credentials.
pub trait AccessTokenService: Send + Sync {
    /// Signs a token for the user.
    fn issue(&self, user_id: UserId, email: &str) -> AppResult<IssuedAccessToken>;

    /// Verifies signature and time claims and extracts the subject.
    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenRejection>;
}
