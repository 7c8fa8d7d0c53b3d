//! Polyclinics of the caller's hospital.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use hekim_core::models::polyclinic::{
    CreatePolyclinic, HospitalPolyclinic, PolyclinicSummary, UpdatePolyclinic,
};
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn add(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    payload: Result<Json<CreatePolyclinic>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HospitalPolyclinic>)> {
    let Json(body) = payload?;
    let polyclinic = state.polyclinics().add(&ctx, body).await?;
    Ok((StatusCode::CREATED, Json(polyclinic)))
}

/// Active polyclinics with staff counts per job group.
pub async fn list(
    State(state): State<AppState>,
    Caller(ctx): Caller,
) -> ApiResult<Json<Vec<PolyclinicSummary>>> {
    Ok(Json(state.polyclinics().summaries(&ctx).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdatePolyclinic>, JsonRejection>,
) -> ApiResult<Json<HospitalPolyclinic>> {
    let Json(body) = payload?;
    Ok(Json(state.polyclinics().update(&ctx, id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.polyclinics().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
