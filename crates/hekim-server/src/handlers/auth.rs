//! Login and password reset.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use hekim_auth::{LoginInput, LoginOutput, ResetConfirmation, ResetIssued};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address or phone number.
    #[serde(alias = "phone", alias = "identifier")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub phone: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginOutput>> {
    let Json(body) = payload?;
    let output = state
        .accounts()
        .login(LoginInput {
            identifier: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(output))
}

/// `POST /reset-password/request`
///
/// The code goes out through the notification channel; the response only
/// says how long it stays valid.
pub async fn request_reset(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> ApiResult<Json<ResetIssued>> {
    let Json(body) = payload?;
    debug!("Password reset requested");
    Ok(Json(state.resets().request(&body.phone).await?))
}

/// `POST /reset-password/confirm`
pub async fn confirm_reset(
    State(state): State<AppState>,
    payload: Result<Json<ResetConfirmRequest>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(body) = payload?;
    state
        .resets()
        .confirm(ResetConfirmation {
            phone: body.phone,
            code: body.code,
            new_password: body.new_password,
            confirm_password: body.confirm_password,
        })
        .await?;
    Ok(Json(Message {
        message: "password updated",
    }))
}
