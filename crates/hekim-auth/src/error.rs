//! Authentication error types.

use hekim_core::error::HekimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential supplied")]
    MissingCredential,

    #[error("credential is not a bearer token")]
    MalformedCredential,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for HekimError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => HekimError::Crypto(msg),
            other => HekimError::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}
