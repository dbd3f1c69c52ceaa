use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credential::SessionCredential;
use crate::principal::{Identity, UserId};
use crate::roles::RoleId;

/// Session token claims (transport-agnostic).
///
/// The minimal set expected once the external login flow's token has been
/// decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    /// Role as issued; may be a role this deployment does not declare.
    pub role: RoleId,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed or unverifiable token: {0}")]
    Malformed(String),
}

/// Deterministically validate the claim time window.
///
/// Signature verification happens in the [`IdentitySource`] before this.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), IdentityError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(IdentityError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(IdentityError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(IdentityError::Expired);
    }
    Ok(())
}

/// Resolves a session credential to an identity.
///
/// Implementations are the external authority on credential validity.
pub trait IdentitySource: Send + Sync {
    fn identify(&self, credential: &SessionCredential, now: DateTime<Utc>) -> Result<Identity, IdentityError>;
}

/// HS256-signed JWT session tokens.
pub struct Hs256IdentitySource {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256IdentitySource {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time window is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256IdentitySource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256IdentitySource").finish_non_exhaustive()
    }
}

impl IdentitySource for Hs256IdentitySource {
    fn identify(&self, credential: &SessionCredential, now: DateTime<Utc>) -> Result<Identity, IdentityError> {
        let data = jsonwebtoken::decode::<SessionClaims>(credential.expose(), &self.key, &self.validation)
            // Only the error kind is kept; the token never reaches the message.
            .map_err(|e| IdentityError::Malformed(format!("{:?}", e.kind())))?;

        validate_claims(&data.claims, now)?;

        Ok(Identity {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};

    use crate::roles::Role;

    fn claims(now: DateTime<Utc>, role: &str) -> SessionClaims {
        SessionClaims {
            sub: UserId::new(),
            role: RoleId::parse(role),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(10)).timestamp(),
        }
    }

    fn mint(secret: &str, claims: &SessionClaims) -> SessionCredential {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        SessionCredential::from_raw(Some(&token)).unwrap()
    }

    #[test]
    fn time_window_is_enforced() {
        let now = Utc::now();
        let c = claims(now, "viewer");
        assert_eq!(validate_claims(&c, now), Ok(()));
        assert_eq!(validate_claims(&c, now - Duration::minutes(1)), Err(IdentityError::NotYetValid));
        assert_eq!(validate_claims(&c, now + Duration::minutes(10)), Err(IdentityError::Expired));

        let inverted = SessionClaims { exp: c.iat, ..c };
        assert_eq!(validate_claims(&inverted, now), Err(IdentityError::InvalidTimeWindow));
    }

    #[test]
    fn decodes_identity_from_signed_token() {
        let now = Utc::now();
        let c = claims(now, "Editor");
        let source = Hs256IdentitySource::new("secret");

        let identity = source.identify(&mint("secret", &c), now).unwrap();
        assert_eq!(identity.user_id, c.sub);
        assert_eq!(identity.role, RoleId::Declared(Role::Editor));
    }

    #[test]
    fn unknown_role_still_identifies() {
        let now = Utc::now();
        let source = Hs256IdentitySource::new("secret");
        let identity = source.identify(&mint("secret", &claims(now, "auditor")), now).unwrap();
        assert_eq!(identity.role, RoleId::Unrecognized("auditor".to_string()));
    }

    #[test]
    fn rejects_wrong_key_and_garbage() {
        let now = Utc::now();
        let source = Hs256IdentitySource::new("secret");

        let forged = mint("other-secret", &claims(now, "admin"));
        assert!(matches!(source.identify(&forged, now), Err(IdentityError::Malformed(_))));

        let garbage = SessionCredential::from_raw(Some("not-a-jwt")).unwrap();
        let err = source.identify(&garbage, now).unwrap_err();
        assert!(!err.to_string().contains("not-a-jwt"));
    }
}
