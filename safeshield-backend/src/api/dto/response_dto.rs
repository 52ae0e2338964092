// safeshield-backend/src/api/dto/response_dto.rs
use crate::domain::response_step::{ResponseAction, ResponseEvidence, ResponseLog, ResponseStep};
use crate::domain::response_tracker::ResponseTracker;
use crate::domain::step_kind::StepKind;
use crate::domain::step_status::StepStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug)]
pub struct UpdateStepStatusDto {
    pub status: StepStatus,
}

/// 空白のみの説明はエラーではなく無視される（no-op）ため、
/// ここでは最大長のみ検証する。
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct AddActionDto {
    #[validate(length(
        max = 500,
        message = "Action description must not exceed 500 characters"
    ))]
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct UpdateNotesDto {
    #[validate(length(max = 10000, message = "Notes must not exceed 10000 characters"))]
    pub notes: String,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug)]
pub struct TrackerDto {
    pub incident_id: Uuid,
    pub progress: u8,
    pub overall_status: StepStatus,
    pub steps: Vec<StepDto>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StepDto {
    pub id: StepKind,
    pub name: String,
    pub description: String,
    pub guidance: String,
    pub status: StepStatus,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub actions: Vec<ActionDto>,
    pub evidence: Vec<EvidenceDto>,
    pub logs: Vec<LogDto>,
    // 表示用ヒント（ドメインには持たせず、APIレイヤーで種別から引く）
    pub icon: String,
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ActionDto {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EvidenceDto {
    pub id: Uuid,
    pub filename: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LogDto {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub user: String,
    pub details: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DownloadUrlDto {
    pub url: String,
}

// --- 変換 ---

impl From<&ResponseTracker> for TrackerDto {
    fn from(tracker: &ResponseTracker) -> Self {
        Self {
            incident_id: tracker.incident_id,
            progress: tracker.calculate_progress(),
            overall_status: tracker.overall_status(),
            steps: tracker.steps().iter().map(StepDto::from).collect(),
        }
    }
}

impl From<&ResponseStep> for StepDto {
    fn from(step: &ResponseStep) -> Self {
        let (icon, color) = step_presentation(step.kind);
        Self {
            id: step.kind,
            name: step.name().to_string(),
            description: step.description().to_string(),
            guidance: step.kind.guidance().to_string(),
            status: step.status,
            notes: step.notes.clone(),
            completed_at: step.completed_at,
            assigned_to: step.assigned_to,
            actions: step.actions.iter().map(ActionDto::from).collect(),
            evidence: step.evidence.iter().map(EvidenceDto::from).collect(),
            logs: step.logs.iter().map(LogDto::from).collect(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

impl From<&ResponseAction> for ActionDto {
    fn from(action: &ResponseAction) -> Self {
        Self {
            id: action.id,
            description: action.description.clone(),
            completed: action.completed,
            completed_at: action.completed_at,
            completed_by: action.completed_by.clone(),
        }
    }
}

impl From<&ResponseEvidence> for EvidenceDto {
    fn from(evidence: &ResponseEvidence) -> Self {
        Self {
            id: evidence.id,
            filename: evidence.filename.clone(),
            file_url: evidence.file_url.clone(),
            file_type: evidence.file_type.clone(),
            file_size: evidence.file_size,
            uploaded_at: evidence.uploaded_at,
            uploaded_by: evidence.uploaded_by.clone(),
        }
    }
}

impl From<&ResponseLog> for LogDto {
    fn from(log: &ResponseLog) -> Self {
        Self {
            id: log.id,
            timestamp: log.timestamp,
            action: log.action.clone(),
            user: log.user.clone(),
            details: log.details.clone(),
        }
    }
}

/// ステップ種別ごとの表示用ヒント
fn step_presentation(kind: StepKind) -> (&'static str, &'static str) {
    match kind {
        StepKind::Detect => ("search", "#2563eb"),
        StepKind::Contain => ("shield", "#d97706"),
        StepKind::Eradicate => ("trash", "#dc2626"),
        StepKind::Recover => ("refresh", "#16a34a"),
        StepKind::Communicate => ("megaphone", "#7c3aed"),
    }
}
