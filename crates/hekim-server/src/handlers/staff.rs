//! Staff management for the caller's hospital.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use hekim_core::models::staff::{CreateStaff, Staff, StaffFilter, UpdateStaff};
use hekim_core::repository::Pagination;
use hekim_service::StaffPage;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /hospital/staff/list`: paging plus any filter fields.
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    #[serde(default = "first_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(flatten)]
    pub filter: StaffFilter,
}

fn first_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    Pagination::DEFAULT_PAGE_SIZE
}

pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    payload: Result<Json<CreateStaff>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Staff>)> {
    let Json(body) = payload?;
    let staff = state.staff().create(&ctx, body).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

pub async fn get(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Staff>> {
    Ok(Json(state.staff().get(&ctx, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateStaff>, JsonRejection>,
) -> ApiResult<Json<Staff>> {
    let Json(body) = payload?;
    Ok(Json(state.staff().update(&ctx, id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.staff().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> ApiResult<Json<StaffPage>> {
    let Json(body) = payload?;
    let pagination = Pagination::new(body.page, body.page_size);
    Ok(Json(state.staff().list(&ctx, &body.filter, pagination).await?))
}
