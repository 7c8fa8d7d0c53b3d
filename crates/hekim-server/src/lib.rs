//! Hekim Server: the HTTP surface of the hospital administration backend.
//!
//! Public routes cover login, password reset, hospital registration and the
//! reference catalogs. Everything under `/hospital/*` beyond registration
//! and lookup, plus `/cache/*`, requires a session token.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/reset-password/request", post(handlers::auth::request_reset))
        .route("/reset-password/confirm", post(handlers::auth::confirm_reset))
        .route("/hospital/register", post(handlers::hospital::register))
        .route("/hospital/{id}", get(handlers::hospital::get))
        .route("/provinces", get(handlers::reference::provinces))
        .route("/provinces/{id}/districts", get(handlers::reference::districts))
        .route("/job-groups", get(handlers::reference::job_groups))
        .route("/job-groups/{id}/titles", get(handlers::reference::job_titles))
        .route("/polyclinic-types", get(handlers::reference::polyclinic_types));

    let protected = Router::new()
        .route("/hospital/staff", post(handlers::staff::create))
        .route("/hospital/staff/list", post(handlers::staff::list))
        .route(
            "/hospital/staff/{id}",
            get(handlers::staff::get)
                .put(handlers::staff::update)
                .delete(handlers::staff::delete),
        )
        .route(
            "/hospital/polyclinics",
            post(handlers::polyclinic::add).get(handlers::polyclinic::list),
        )
        .route(
            "/hospital/polyclinics/{id}",
            put(handlers::polyclinic::update).delete(handlers::polyclinic::delete),
        )
        .route(
            "/hospital/users",
            post(handlers::users::create).get(handlers::users::list),
        )
        .route(
            "/hospital/users/{id}",
            put(handlers::users::update).delete(handlers::users::delete),
        )
        .route("/cache/stats", get(handlers::cache::stats))
        .route("/cache/invalidate", post(handlers::cache::invalidate))
        .route_layer(from_fn_with_state(state.clone(), auth::require_session));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
