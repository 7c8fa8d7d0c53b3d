//! Request authentication.
//!
//! [`require_session`] runs in front of every protected route: it verifies
//! the `Authorization: Bearer` credential and stores the resulting
//! [`AuthContext`] in the request extensions. Handlers pick it up with the
//! [`Caller`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hekim_core::access::AuthContext;
use hekim_core::error::HekimError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.gate().authenticate(header) {
        Ok(ctx) => {
            debug!(user_id = %ctx.user_id, hospital_id = %ctx.hospital_id, "Authenticated request");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// The authenticated caller of a protected route.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| {
                ApiError(HekimError::AuthenticationFailed {
                    reason: "route is not behind the session middleware".into(),
                })
            })
    }
}
