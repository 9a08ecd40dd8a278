use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coursegate_core::{SubjectId, Tenant};

use crate::{Identity, Role};

/// Token claims model (transport-agnostic).
///
/// The four identity fields plus the validity window. Timestamps travel as the
/// standard `iat`/`exp` seconds so any JWT tooling can read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier.
    pub sub: SubjectId,

    pub username: String,

    pub role: Role,

    /// Tenant context for the token.
    pub tenant: Tenant,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    pub fn for_identity(identity: &Identity, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: identity.subject_id,
            username: identity.username.clone(),
            role: identity.role,
            tenant: identity.tenant,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub, self.username.clone(), self.role, self.tenant)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Note: this validates the *claims* only. Signature verification happens in
/// [`crate::TokenService`] before the claims are trusted.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(now: DateTime<Utc>) -> TokenClaims {
        let identity = Identity::new(
            SubjectId::new(12_345_678).unwrap(),
            "s1",
            Role::Student,
            Tenant::Uvu,
        );
        TokenClaims::for_identity(&identity, now, Duration::hours(24))
    }

    #[test]
    fn valid_inside_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims(now), now + Duration::hours(23)), Ok(()));
    }

    #[test]
    fn expired_at_boundary() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(now), now + Duration::hours(24)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn issued_in_future_is_not_yet_valid() {
        let now = Utc::now();
        assert_eq!(
            validate_claims(&claims(now), now - Duration::minutes(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc::now();
        let mut c = claims(now);
        c.expires_at = c.issued_at;
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn timestamps_serialize_as_standard_seconds() {
        let now = Utc::now();
        let value = serde_json::to_value(claims(now)).unwrap();
        assert_eq!(value["iat"], now.timestamp());
        assert_eq!(value["sub"], 12_345_678);
        assert_eq!(value["role"], "student");
    }
}
