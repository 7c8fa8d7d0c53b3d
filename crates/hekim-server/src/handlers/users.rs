//! Sub-user accounts of the caller's hospital.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use hekim_core::models::user::{CreateSubUser, UpdateUser, User};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    payload: Result<Json<CreateSubUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(body) = payload?;
    let user = state.accounts().create_sub_user(&ctx, body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.accounts().list_sub_users(&ctx).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(body) = payload?;
    Ok(Json(state.accounts().update_sub_user(&ctx, id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.accounts().delete_sub_user(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
