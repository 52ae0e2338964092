// safeshield-backend/src/api/handlers/response_handler.rs

use crate::api::dto::response_dto::{
    AddActionDto, DownloadUrlDto, TrackerDto, UpdateNotesDto, UpdateStepStatusDto,
};
use crate::api::AppState;
use crate::domain::actor::Actor;
use crate::domain::response_evidence_model::MAX_EVIDENCE_FILE_SIZE;
use crate::domain::step_kind::StepKind;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::require_response_manager;
use crate::service::response_tracker_service::EvidenceUpload;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::extract::DefaultBodyLimit;
use axum::{
    extract::{Json, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;
use validator::Validate;

/// 対応トラッカー取得ハンドラー
pub async fn get_tracker_handler(
    State(app_state): State<AppState>,
    _actor: Actor,
    Path(incident_id): Path<Uuid>,
) -> AppResult<ApiResponse<TrackerDto>> {
    let tracker = app_state.response_service.load_tracker(incident_id).await?;
    Ok(ApiResponse::success(TrackerDto::from(&tracker)))
}

/// ステップのステータス変更ハンドラー
pub async fn update_step_status_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path((incident_id, step)): Path<(Uuid, StepKind)>,
    Json(payload): Json<UpdateStepStatusDto>,
) -> AppResult<ApiResponse<TrackerDto>> {
    require_response_manager(&actor)?;

    let tracker = app_state
        .response_service
        .update_step_status(incident_id, step, payload.status, &actor)
        .await?;
    Ok(ApiResponse::success(TrackerDto::from(&tracker)))
}

/// チェックリスト項目追加ハンドラー
pub async fn add_action_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path((incident_id, step)): Path<(Uuid, StepKind)>,
    Json(payload): Json<AddActionDto>,
) -> AppResult<ApiResponse<TrackerDto>> {
    require_response_manager(&actor)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "response_handler::add_action"))?;

    let tracker = app_state
        .response_service
        .add_action(incident_id, step, &payload.description, &actor)
        .await?;
    Ok(ApiResponse::success(TrackerDto::from(&tracker)))
}

/// チェックリスト項目の完了状態反転ハンドラー
pub async fn toggle_action_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path((incident_id, step, action_id)): Path<(Uuid, StepKind, Uuid)>,
) -> AppResult<ApiResponse<TrackerDto>> {
    require_response_manager(&actor)?;

    let tracker = app_state
        .response_service
        .toggle_action(incident_id, step, action_id, &actor)
        .await?;
    Ok(ApiResponse::success(TrackerDto::from(&tracker)))
}

/// ステップのメモ更新ハンドラー
pub async fn update_notes_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path((incident_id, step)): Path<(Uuid, StepKind)>,
    Json(payload): Json<UpdateNotesDto>,
) -> AppResult<ApiResponse<TrackerDto>> {
    require_response_manager(&actor)?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "response_handler::update_notes"))?;

    let tracker = app_state
        .response_service
        .update_notes(incident_id, step, payload.notes, &actor)
        .await?;
    Ok(ApiResponse::success(TrackerDto::from(&tracker)))
}

/// 証跡ファイルアップロードハンドラー
pub async fn upload_evidence_handler(
    State(app_state): State<AppState>,
    actor: Actor,
    Path((incident_id, step)): Path<(Uuid, StepKind)>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    require_response_manager(&actor)?;

    // multipartデータを処理
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            // ファイル名を取得
            let filename = field
                .file_name()
                .ok_or_else(|| AppError::BadRequest("File name is required".to_string()))?
                .to_string();

            // Content-Typeを取得（なければ拡張子から推測）
            let content_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .or_else(|| {
                    filename
                        .rsplit('.')
                        .next()
                        .and_then(|ext| mime_guess::from_ext(ext).first())
                        .map(|mime| mime.to_string())
                })
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

            let tracker = app_state
                .response_service
                .attach_evidence(
                    incident_id,
                    step,
                    EvidenceUpload {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    },
                    &actor,
                )
                .await?;

            return Ok((
                StatusCode::CREATED,
                ApiResponse::success(TrackerDto::from(&tracker)),
            ));
        }
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

/// 証跡ファイルの署名付きダウンロードURL取得ハンドラー
pub async fn evidence_download_url_handler(
    State(app_state): State<AppState>,
    _actor: Actor,
    Path((incident_id, evidence_id)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<DownloadUrlDto>> {
    let url = app_state
        .response_service
        .evidence_download_url(incident_id, evidence_id)
        .await?;
    Ok(ApiResponse::success(DownloadUrlDto { url }))
}

/// 対応レポートのダウンロードハンドラー
///
/// レポートをファイルとしてダウンロードさせる。フィールド名と入れ子は
/// 安定しており、ダウンストリームのツールがパースできる。
pub async fn download_report_handler(
    State(app_state): State<AppState>,
    _actor: Actor,
    Path(incident_id): Path<Uuid>,
) -> AppResult<Response> {
    let report = app_state
        .response_service
        .generate_report(incident_id)
        .await?;

    let body = serde_json::to_string_pretty(&report).map_err(|e| {
        AppError::InternalServerError(format!("Failed to serialize report: {}", e))
    })?;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename()),
            ),
        ],
        body,
    )
        .into_response();

    Ok(response)
}

/// 対応トラッカー関連のルーター
pub fn response_router(app_state: AppState) -> Router {
    Router::new()
        .route("/incidents/{id}/response", get(get_tracker_handler))
        .route(
            "/incidents/{id}/response/steps/{step}/status",
            patch(update_step_status_handler),
        )
        .route(
            "/incidents/{id}/response/steps/{step}/actions",
            post(add_action_handler),
        )
        .route(
            "/incidents/{id}/response/steps/{step}/actions/{action_id}/toggle",
            post(toggle_action_handler),
        )
        .route(
            "/incidents/{id}/response/steps/{step}/notes",
            patch(update_notes_handler),
        )
        .route(
            "/incidents/{id}/response/steps/{step}/evidence",
            post(upload_evidence_handler)
                .layer(DefaultBodyLimit::max(MAX_EVIDENCE_FILE_SIZE as usize + 1024 * 1024)),
        )
        .route(
            "/incidents/{id}/response/evidence/{evidence_id}/download-url",
            get(evidence_download_url_handler),
        )
        .route(
            "/incidents/{id}/response/report",
            get(download_report_handler),
        )
        .with_state(app_state)
}
