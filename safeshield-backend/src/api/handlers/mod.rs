// safeshield-backend/src/api/handlers/mod.rs

pub mod incident_handler;
pub mod response_handler;

use super::AppState;
use crate::logging::{inject_request_context, logging_middleware};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

/// アプリケーション全体のルーターを組み立てる
pub fn create_app_router(app_state: AppState) -> Router {
    Router::new()
        .merge(incident_handler::incident_router(app_state.clone()))
        .merge(response_handler::response_router(app_state))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(CorsLayer::permissive())
}
