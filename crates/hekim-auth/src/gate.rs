//! Request authentication: bearer header in, [`AuthContext`] out.
//!
//! The permission, role and tenant checks that follow authentication live
//! in [`hekim_core::access`] and are re-exported here.

use hekim_core::access::AuthContext;
use hekim_core::error::{HekimError, HekimResult};
use tracing::debug;

use crate::error::AuthError;
use crate::token::TokenService;

pub use hekim_core::access::{ensure_same_tenant, require_permission, require_role};

const BEARER: &str = "Bearer ";

#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
}

impl AuthGate {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve the `Authorization` header value into the caller's context.
    ///
    /// Every failure becomes the same `AuthenticationFailed`; the specific
    /// cause is only logged.
    pub fn authenticate(&self, header: Option<&str>) -> HekimResult<AuthContext> {
        self.resolve(header).map_err(|err| {
            debug!(error = %err, "Rejected request credential");
            HekimError::from(err)
        })
    }

    fn resolve(&self, header: Option<&str>) -> Result<AuthContext, AuthError> {
        let header = header.ok_or(AuthError::MissingCredential)?;
        let token = header
            .strip_prefix(BEARER)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MalformedCredential)?;
        self.tokens.verify(token)?.to_context()
    }
}
