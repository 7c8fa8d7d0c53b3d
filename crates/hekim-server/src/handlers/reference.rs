//! Public catalog reads, all served through the reference cache.

use axum::Json;
use axum::extract::{Path, State};
use hekim_core::models::reference::{District, JobGroup, JobTitle, PolyclinicType, Province};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn provinces(State(state): State<AppState>) -> ApiResult<Json<Vec<Province>>> {
    Ok(Json(state.catalog().provinces().await?))
}

pub async fn districts(
    State(state): State<AppState>,
    Path(province_id): Path<Uuid>,
) -> ApiResult<Json<Vec<District>>> {
    Ok(Json(state.catalog().districts(province_id).await?))
}

pub async fn job_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<JobGroup>>> {
    Ok(Json(state.catalog().job_groups().await?))
}

pub async fn job_titles(
    State(state): State<AppState>,
    Path(job_group_id): Path<Uuid>,
) -> ApiResult<Json<Vec<JobTitle>>> {
    Ok(Json(state.catalog().job_titles(job_group_id).await?))
}

pub async fn polyclinic_types(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PolyclinicType>>> {
    Ok(Json(state.catalog().polyclinic_types().await?))
}
