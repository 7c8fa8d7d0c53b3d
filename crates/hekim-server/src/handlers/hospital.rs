//! Hospital registration and lookup.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use hekim_core::models::hospital::{Hospital, RegisterHospital};
use hekim_service::Registration;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /hospital/register`
///
/// Responds `201 Created` with the hospital, its admin and a session token
/// for that admin.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterHospital>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Registration>)> {
    let Json(body) = payload?;
    let registration = state.hospitals().register(body).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// `GET /hospital/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Hospital>> {
    Ok(Json(state.hospitals().get(id).await?))
}
