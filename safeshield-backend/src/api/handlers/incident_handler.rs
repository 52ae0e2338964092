// safeshield-backend/src/api/handlers/incident_handler.rs

use crate::api::dto::incident_dto::{
    CreateIncidentDto, IncidentDto, IncidentFilterDto, UpdateIncidentDto,
};
use crate::api::AppState;
use crate::domain::actor::Actor;
use crate::error::AppResult;
use crate::middleware::auth::require_response_manager;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;
use validator::Validate;

/// インシデント報告ハンドラー
pub async fn report_incident_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateIncidentDto>,
) -> AppResult<impl IntoResponse> {
    require_response_manager(&actor)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "incident_handler::report_incident"))?;

    let incident = app_state
        .incident_service
        .report_incident(payload, &actor)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(incident)))
}

/// インシデント一覧取得ハンドラー
pub async fn list_incidents_handler(
    State(app_state): State<AppState>,
    _actor: Actor,
    Query(filter): Query<IncidentFilterDto>,
) -> AppResult<ApiResponse<Vec<IncidentDto>>> {
    let incidents = app_state
        .incident_service
        .list_incidents(filter.status.as_deref())
        .await?;
    Ok(ApiResponse::success(incidents))
}

/// インシデント取得ハンドラー
pub async fn get_incident_handler(
    State(app_state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<IncidentDto>> {
    let incident = app_state.incident_service.get_incident(id).await?;
    Ok(ApiResponse::success(incident))
}

/// インシデント更新ハンドラー
pub async fn update_incident_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncidentDto>,
) -> AppResult<ApiResponse<IncidentDto>> {
    require_response_manager(&actor)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "incident_handler::update_incident"))?;

    let incident = app_state
        .incident_service
        .update_incident(id, payload, &actor)
        .await?;
    Ok(ApiResponse::success(incident))
}

/// インシデント関連のルーター
pub fn incident_router(app_state: AppState) -> Router {
    Router::new()
        .route("/incidents", post(report_incident_handler))
        .route("/incidents", get(list_incidents_handler))
        .route("/incidents/{id}", get(get_incident_handler))
        .route("/incidents/{id}", patch(update_incident_handler))
        .with_state(app_state)
}
