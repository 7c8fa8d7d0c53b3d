//! Operator endpoints for the reference cache.

use axum::Json;
use axum::extract::State;
use hekim_cache::CacheStats;
use hekim_core::access::{PermissionLevel, require_permission};
use serde::Serialize;
use tracing::info;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Invalidated {
    pub deleted: u64,
}

/// `GET /cache/stats`
pub async fn stats(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> ApiResult<Json<CacheStats>> {
    require_permission(&ctx, PermissionLevel::Read)?;
    Ok(Json(state.catalog().stats().await?))
}

/// `POST /cache/invalidate`
///
/// Drops every reference-data entry. Password reset codes are untouched.
pub async fn invalidate(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> ApiResult<Json<Invalidated>> {
    require_permission(&ctx, PermissionLevel::Admin)?;
    let deleted = state.catalog().invalidate().await?;
    info!(user_id = %ctx.user_id, deleted, "Reference cache invalidated");
    Ok(Json(Invalidated { deleted }))
}
