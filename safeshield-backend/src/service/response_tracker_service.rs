// safeshield-backend/src/service/response_tracker_service.rs

use crate::db::DbPool;
use crate::domain::actor::Actor;
use crate::domain::response_evidence_model::{
    is_allowed_evidence_mime_type, MAX_EVIDENCE_FILE_SIZE,
};
use crate::domain::response_report::ResponseReport;
use crate::domain::response_step::{ResponseEvidence, ResponseLog, ResponseStep};
use crate::domain::response_tracker::ResponseTracker;
use crate::domain::step_kind::StepKind;
use crate::domain::step_status::StepStatus;
use crate::error::{AppError, AppResult};
use crate::repository::incident_repository::IncidentRepository;
use crate::repository::response_repository::ResponseRepository;
use crate::service::storage_service::StorageService;
use crate::utils::error_helper::{internal_server_error, not_found_error};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// ダウンロードURLの有効期限（秒）
const DOWNLOAD_URL_EXPIRY_SECS: u64 = 15 * 60;

/// 多部構成アップロードから受け取った証跡ファイル
pub struct EvidenceUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 対応トラッカーのオーケストレーションサービス
///
/// ステートレス。リクエストごとに永続化状態をロードし、ドメイン操作を
/// 適用して書き戻す。書き込みはwrite-through方式で、永続化に失敗した
/// 操作の結果は返却されない（部分的に適用された状態を見せない）。
pub struct ResponseTrackerService {
    incident_repo: Arc<IncidentRepository>,
    response_repo: Arc<ResponseRepository>,
    storage_service: Arc<dyn StorageService>,
}

impl ResponseTrackerService {
    pub fn new(db_pool: DbPool, storage_service: Arc<dyn StorageService>) -> Self {
        Self {
            incident_repo: Arc::new(IncidentRepository::new(db_pool.clone())),
            response_repo: Arc::new(ResponseRepository::new(db_pool)),
            storage_service,
        }
    }

    /// インシデントの対応トラッカーをロードする
    ///
    /// 永続化済みのステップ状態を5つの正規テンプレートにマージする。
    /// ストレージに行がないステップはpendingのまま（未着手は正常で、
    /// エラーではない）。インシデント自体が存在しなければ404。
    pub async fn load_tracker(&self, incident_id: Uuid) -> AppResult<ResponseTracker> {
        self.ensure_incident_exists(incident_id).await?;

        let loaded = self.response_repo.load_steps(incident_id).await?;
        Ok(ResponseTracker::from_loaded_steps(incident_id, loaded))
    }

    /// ステップのステータスを変更する
    pub async fn update_step_status(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        new_status: StepStatus,
        actor: &Actor,
    ) -> AppResult<ResponseTracker> {
        let mut tracker = self.load_tracker(incident_id).await?;

        let step = tracker.step_mut(kind);
        step.set_status(new_status, actor);
        let log = last_log(step)?;
        self.response_repo
            .save_step_status(incident_id, step, &log)
            .await?;

        info!(
            incident_id = %incident_id,
            step = %kind,
            status = %new_status,
            user = %actor.name,
            "Response step status changed"
        );
        Ok(tracker)
    }

    /// ステップにチェックリスト項目を追加する
    ///
    /// 空白のみの説明は何もせず現在の状態を返す。
    pub async fn add_action(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        description: &str,
        actor: &Actor,
    ) -> AppResult<ResponseTracker> {
        let mut tracker = self.load_tracker(incident_id).await?;

        let step = tracker.step_mut(kind);
        let Some(action) = step.add_action(description, actor).cloned() else {
            return Ok(tracker);
        };
        let log = last_log(step)?;
        self.response_repo
            .append_action(incident_id, kind, &action, &log)
            .await?;

        Ok(tracker)
    }

    /// チェックリスト項目の完了状態を反転する
    ///
    /// 未知のaction_idは何もせず現在の状態を返す。
    pub async fn toggle_action(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        action_id: Uuid,
        actor: &Actor,
    ) -> AppResult<ResponseTracker> {
        let mut tracker = self.load_tracker(incident_id).await?;

        let step = tracker.step_mut(kind);
        if step.toggle_action(action_id, actor).is_none() {
            return Ok(tracker);
        }
        let action = step
            .actions
            .iter()
            .find(|a| a.id == action_id)
            .cloned()
            .ok_or_else(|| {
                internal_server_error(
                    "toggled action disappeared",
                    "response_tracker_service::toggle_action",
                    "Failed to toggle action",
                )
            })?;
        let log = last_log(step)?;
        self.response_repo
            .save_action_toggle(incident_id, kind, &action, actor.id, &log)
            .await?;

        Ok(tracker)
    }

    /// ステップのメモを置き換える
    pub async fn update_notes(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        notes: String,
        actor: &Actor,
    ) -> AppResult<ResponseTracker> {
        let mut tracker = self.load_tracker(incident_id).await?;

        let step = tracker.step_mut(kind);
        step.update_notes(notes, actor);
        let log = last_log(step)?;
        self.response_repo
            .save_notes(incident_id, step, &log)
            .await?;

        Ok(tracker)
    }

    /// 証跡ファイルをアップロードしてステップに取り付ける
    ///
    /// ストレージへのアップロードが成功した場合にのみレコードとログを
    /// 永続化する。アップロードが失敗したらエラーを返し、ステップの
    /// 証跡リストは変化しない。
    pub async fn attach_evidence(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        upload: EvidenceUpload,
        actor: &Actor,
    ) -> AppResult<ResponseTracker> {
        let mut tracker = self.load_tracker(incident_id).await?;

        let file_size = upload.data.len() as i64;
        if file_size > MAX_EVIDENCE_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "Evidence file '{}' exceeds the maximum size of {} bytes",
                upload.filename, MAX_EVIDENCE_FILE_SIZE
            )));
        }
        if !is_allowed_evidence_mime_type(&upload.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed as evidence",
                upload.content_type
            )));
        }

        // アップロード成功までステップの状態には触れない
        let evidence_id = Uuid::new_v4();
        let storage_key = evidence_storage_key(incident_id, kind, evidence_id);
        self.storage_service
            .upload(&storage_key, upload.data, &upload.content_type)
            .await?;

        let evidence = ResponseEvidence {
            id: evidence_id,
            filename: upload.filename.clone(),
            file_url: storage_key,
            file_type: upload.content_type,
            file_size,
            uploaded_at: Utc::now(),
            uploaded_by: actor.name.clone(),
        };

        let step = tracker.step_mut(kind);
        step.attach_evidence(evidence.clone(), actor);
        let log = last_log(step)?;
        self.response_repo
            .append_evidence(incident_id, kind, &evidence, actor.id, &log)
            .await?;

        info!(
            incident_id = %incident_id,
            step = %kind,
            filename = %upload.filename,
            size = file_size,
            user = %actor.name,
            "Evidence uploaded"
        );
        Ok(tracker)
    }

    /// 証跡ファイルの署名付きダウンロードURLを生成する
    pub async fn evidence_download_url(
        &self,
        incident_id: Uuid,
        evidence_id: Uuid,
    ) -> AppResult<String> {
        let tracker = self.load_tracker(incident_id).await?;

        let evidence = tracker
            .steps()
            .iter()
            .flat_map(|s| s.evidence.iter())
            .find(|e| e.id == evidence_id)
            .ok_or_else(|| {
                not_found_error(
                    &format!("Evidence {} not found", evidence_id),
                    "response_tracker_service::evidence_download_url",
                )
            })?;

        self.storage_service
            .generate_download_url(&evidence.file_url, DOWNLOAD_URL_EXPIRY_SECS)
            .await
    }

    /// 対応レポートを生成する（読み取り専用、永続化には書き込まない）
    pub async fn generate_report(&self, incident_id: Uuid) -> AppResult<ResponseReport> {
        let tracker = self.load_tracker(incident_id).await?;
        Ok(ResponseReport::generate(&tracker))
    }

    async fn ensure_incident_exists(&self, incident_id: Uuid) -> AppResult<()> {
        self.incident_repo
            .find_by_id(incident_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    &format!("Incident with id {} not found", incident_id),
                    "response_tracker_service::ensure_incident_exists",
                )
            })?;
        Ok(())
    }
}

/// 証跡ファイルのストレージキーを生成
fn evidence_storage_key(incident_id: Uuid, kind: StepKind, evidence_id: Uuid) -> String {
    format!("evidence/{}/{}/{}", incident_id, kind.as_str(), evidence_id)
}

/// 直近のドメイン操作が追記したログエントリを取り出す
fn last_log(step: &ResponseStep) -> AppResult<ResponseLog> {
    step.logs.last().cloned().ok_or_else(|| {
        internal_server_error(
            "mutation produced no log entry",
            "response_tracker_service::last_log",
            "Internal bookkeeping error",
        )
    })
}
