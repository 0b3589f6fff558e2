//! HS256 access tokens backed by `jsonwebtoken`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use rolegate_application::{AccessTokenClaims, AccessTokenService, IssuedAccessToken};
use rolegate_core::{AppError, AppResult, TokenRejection};
use rolegate_domain::UserId;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signing settings for access tokens.
#[derive(Clone)]
pub struct JwtSettings {
    /// Shared HMAC secret.
    pub secret: String,
    /// Value written to and required in the `iss` claim.
    pub issuer: String,
    /// Lifetime of issued tokens.
    pub ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens with zero clock leeway.
#[derive(Clone)]
pub struct JwtAccessTokenService {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokenService {
    /// Creates a token service. Fails when the secret is too short or the TTL is not positive.
    pub fn new(settings: JwtSettings) -> AppResult<Self> {
        if settings.secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "jwt secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if settings.ttl <= Duration::zero() {
            return Err(AppError::Validation("jwt ttl must be positive".to_owned()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer,
            ttl: settings.ttl,
            validation,
        })
    }
}

impl AccessTokenService for JwtAccessTokenService {
    fn issue(&self, user_id: UserId, email: &str) -> AppResult<IssuedAccessToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::Internal("access token expiry is out of range".to_owned())
        })?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign access token: {error}")))?;

        Ok(IssuedAccessToken {
            token,
            expires_at: timestamp(claims.exp).unwrap_or(expires_at),
        })
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, TokenRejection> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| rejection_for(error.kind()))?;
        let claims = data.claims;

        let issued_at = timestamp(claims.iat).ok_or(TokenRejection::Malformed)?;
        let expires_at = timestamp(claims.exp).ok_or(TokenRejection::Malformed)?;
        if issued_at > Utc::now() {
            return Err(TokenRejection::Expired);
        }

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenRejection::Malformed)?;

        Ok(AccessTokenClaims {
            user_id,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }
}

// Issuer and algorithm mismatches mean the token was not minted by us.
// Tokens outside their validity window, early or late, count as expired.
fn rejection_for(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer | ErrorKind::InvalidAlgorithm => {
            TokenRejection::InvalidSignature
        }
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => TokenRejection::Expired,
        _ => TokenRejection::Malformed,
    }
}

fn timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service_with(secret: &str, issuer: &str) -> JwtAccessTokenService {
        JwtAccessTokenService::new(JwtSettings {
            secret: secret.to_owned(),
            issuer: issuer.to_owned(),
            ttl: Duration::minutes(60),
        })
        .unwrap_or_else(|error| panic!("settings should be valid: {error}"))
    }

    fn sign_raw(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap_or_else(|error| panic!("raw token should sign: {error}"))
    }

    fn claims_for(user_id: UserId, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Claims {
        Claims {
            sub: user_id.to_string(),
            email: "ada@example.com".to_owned(),
            iss: "rolegate".to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    #[test]
    fn issued_token_verifies_to_the_same_subject() {
        let service = service_with(SECRET, "rolegate");
        let user_id = UserId::new();

        let issued = service
            .issue(user_id, "ada@example.com")
            .unwrap_or_else(|error| panic!("token should issue: {error}"));
        let claims = service
            .verify(issued.token.as_str())
            .unwrap_or_else(|error| panic!("token should verify: {error}"));

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.expires_at, issued.expires_at);
        assert!(claims.expires_at > Utc::now());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = service_with("ffffffffffffffffffffffffffffffff", "rolegate");
        let verifier = service_with(SECRET, "rolegate");
        let issued = issuer
            .issue(UserId::new(), "ada@example.com")
            .unwrap_or_else(|error| panic!("token should issue: {error}"));

        assert_eq!(
            verifier.verify(issued.token.as_str()),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let service = service_with(SECRET, "rolegate");
        let genuine = service
            .issue(UserId::new(), "ada@example.com")
            .unwrap_or_else(|error| panic!("token should issue: {error}"));
        let forged_payload = sign_raw(
            &claims_for(UserId::new(), Utc::now(), Utc::now() + Duration::hours(1)),
            SECRET,
        );

        let genuine_parts: Vec<&str> = genuine.token.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        let spliced = format!("{}.{}.{}", genuine_parts[0], forged_parts[1], genuine_parts[2]);

        assert_eq!(
            service.verify(spliced.as_str()),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected_without_leeway() {
        let service = service_with(SECRET, "rolegate");
        let now = Utc::now();
        let token = sign_raw(
            &claims_for(UserId::new(), now - Duration::hours(2), now - Duration::seconds(1)),
            SECRET,
        );

        assert_eq!(service.verify(token.as_str()), Err(TokenRejection::Expired));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let foreign = service_with(SECRET, "someone-else");
        let service = service_with(SECRET, "rolegate");
        let issued = foreign
            .issue(UserId::new(), "ada@example.com")
            .unwrap_or_else(|error| panic!("token should issue: {error}"));

        assert_eq!(
            service.verify(issued.token.as_str()),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn garbage_and_bad_subjects_are_malformed() {
        let service = service_with(SECRET, "rolegate");
        let mut claims = claims_for(UserId::new(), Utc::now(), Utc::now() + Duration::hours(1));
        claims.sub = "not-a-uuid".to_owned();
        let bad_subject = sign_raw(&claims, SECRET);

        assert_eq!(service.verify("not.a.jwt"), Err(TokenRejection::Malformed));
        assert_eq!(service.verify(""), Err(TokenRejection::Malformed));
        assert_eq!(
            service.verify(bad_subject.as_str()),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn expiry_beyond_the_calendar_is_an_internal_error() {
        let service = JwtAccessTokenService::new(JwtSettings {
            secret: SECRET.to_owned(),
            issuer: "rolegate".to_owned(),
            ttl: Duration::minutes(1_000_000_000_000),
        })
        .unwrap_or_else(|error| panic!("settings should be valid: {error}"));

        let result = service.issue(UserId::new(), "ada@example.com");

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn short_secret_is_refused() {
        let result = JwtAccessTokenService::new(JwtSettings {
            secret: "short".to_owned(),
            issuer: "rolegate".to_owned(),
            ttl: Duration::minutes(5),
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
