//! Session token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: everything the authorization gate needs travels
//! in the claims, and nothing is recorded server-side. Expiry is judged
//! against the injected [`Clock`] rather than the system time so that tests
//! can step past a token's lifetime.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hekim_core::access::{AuthContext, Role};
use hekim_core::clock::{Clock, SystemClock};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user ID (UUID string).
    pub sub: String,
    /// Hospital the user belongs to (UUID string).
    pub hospital_id: String,
    pub role: Role,
    /// Human-readable name of the user, for display only.
    pub username: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl SessionClaims {
    pub fn to_context(&self) -> Result<AuthContext, AuthError> {
        let parse = |field: &str, raw: &str| {
            Uuid::parse_str(raw).map_err(|e| AuthError::MalformedToken(format!("{field}: {e}")))
        };
        Ok(AuthContext {
            user_id: parse("sub", &self.sub)?,
            hospital_id: parse("hospital_id", &self.hospital_id)?,
            role: self.role,
            username: self.username.clone(),
        })
    }
}

/// A freshly signed token together with its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds, as reported to clients.
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    lifetime_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: config.jwt_issuer.clone(),
            lifetime_secs: config.token_lifetime_secs,
            clock,
        }
    }

    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        hospital_id: Uuid,
        role: Role,
        username: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, hospital_id, role, username, self.clock.now())
    }

    /// Issue a token as if it were signed at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        hospital_id: Uuid,
        role: Role,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let iat = issued_at.timestamp();
        let exp = iat + self.lifetime_secs as i64;
        let claims = SessionClaims {
            sub: user_id.to_string(),
            hospital_id: hospital_id.to_string(),
            role,
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(exp, 0).unwrap_or(issued_at),
            expires_in: self.lifetime_secs,
        })
    }

    /// Check expiry, signature and issuer, returning the claims.
    ///
    /// Expiry is judged first, from the unverified payload: a token past
    /// its lifetime is reported as expired whatever its signature.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        if self.clock.now().timestamp() > self.unverified_expiry(token)? {
            return Err(AuthError::TokenExpired);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
        // Expiry was compared against our clock above, with zero leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken(e.to_string()),
            })
    }

    fn unverified_expiry(&self, token: &str) -> Result<i64, AuthError> {
        #[derive(Deserialize)]
        struct Expiry {
            exp: i64,
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Expiry>(token, &self.decoding, &validation)
            .map(|data| data.claims.exp)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hekim_core::clock::ManualClock;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            jwt_issuer: "hekim-test".into(),
            ..AuthConfig::default()
        }
    }

    fn service() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        (TokenService::with_clock(&config("test-secret"), clock.clone()), clock)
    }

    #[test]
    fn jwt_roundtrip() {
        let (tokens, _) = service();
        let user_id = Uuid::new_v4();
        let hospital_id = Uuid::new_v4();

        let issued = tokens
            .issue(user_id, hospital_id, Role::Admin, "Ayşe Yılmaz")
            .unwrap();
        let claims = tokens.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.hospital_id, hospital_id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(issued.expires_in, 86_400);

        let ctx = claims.to_context().unwrap();
        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.username, "Ayşe Yılmaz");
    }

    #[test]
    fn expiry_has_no_leeway() {
        let (tokens, clock) = service();
        let issued = tokens
            .issue(Uuid::new_v4(), Uuid::new_v4(), Role::Worker, "w")
            .unwrap();

        clock.advance(Duration::seconds(86_400));
        assert!(tokens.verify(&issued.token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            tokens.verify(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn issue_at_backdates_the_token() {
        let (tokens, clock) = service();
        let issued = tokens
            .issue_at(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Role::Admin,
                "a",
                clock.now() - Duration::hours(25),
            )
            .unwrap();
        assert!(matches!(
            tokens.verify(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let (tokens, clock) = service();
        let other = TokenService::with_clock(&config("another-secret"), clock);
        let issued = other
            .issue(Uuid::new_v4(), Uuid::new_v4(), Role::Admin, "a")
            .unwrap();
        assert!(matches!(
            tokens.verify(&issued.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn expiry_wins_over_a_bad_signature() {
        let (tokens, clock) = service();
        let other = TokenService::with_clock(&config("another-secret"), clock.clone());
        let issued = other
            .issue(Uuid::new_v4(), Uuid::new_v4(), Role::Admin, "a")
            .unwrap();
        clock.advance(Duration::days(2));
        assert!(matches!(
            tokens.verify(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let (tokens, _) = service();
        assert!(matches!(
            tokens.verify("not.a.jwt"),
            Err(AuthError::MalformedToken(_))
        ));
    }
}
