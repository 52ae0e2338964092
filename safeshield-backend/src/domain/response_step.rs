// safeshield-backend/src/domain/response_step.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::Actor;
use super::step_kind::StepKind;
use super::step_status::StepStatus;

/// ステップ内のチェックリスト項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAction {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
}

impl ResponseAction {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            completed: false,
            completed_at: None,
            completed_by: None,
        }
    }
}

/// ステップに添付された証跡ファイルへの参照
///
/// 実体は外部のオブジェクトストレージにあり、ここでは参照のみを保持する。
/// 作成後は不変で、このサブシステムに削除経路はない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEvidence {
    pub id: Uuid,
    pub filename: String,
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

/// 監査用のアクティビティログエントリ（追記のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub user: String,
    pub details: String,
}

impl ResponseLog {
    pub fn new(
        action: impl Into<String>,
        user: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.into(),
            user: user.into(),
            details: details.into(),
        }
    }
}

// ログのactionラベル
pub const LOG_STATUS_CHANGED: &str = "Status Changed";
pub const LOG_ACTION_ADDED: &str = "Action Added";
pub const LOG_ACTION_TOGGLED: &str = "Action Toggled";
pub const LOG_NOTES_UPDATED: &str = "Notes Updated";
pub const LOG_EVIDENCE_UPLOADED: &str = "Evidence Uploaded";

/// インシデント対応ライフサイクルの1フェーズ
///
/// 自分のアクション・証跡・ログ・メモ・ステータスを排他的に所有する。
/// 変更系の操作は成功するたびにログエントリをちょうど1件追記する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStep {
    pub kind: StepKind,
    pub status: StepStatus,
    pub notes: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub actions: Vec<ResponseAction>,
    pub evidence: Vec<ResponseEvidence>,
    pub logs: Vec<ResponseLog>,
}

impl ResponseStep {
    /// 初期状態（pending、コレクションはすべて空）のステップを作成
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            status: StepStatus::Pending,
            notes: String::new(),
            completed_at: None,
            assigned_to: None,
            actions: Vec::new(),
            evidence: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// ステータスを変更する
    ///
    /// 遷移は呼び出し側主導で、巻き戻しを含む任意の遷移を許可する。
    /// completedへの遷移でcompleted_atを設定し、それ以外ではクリアする
    /// （completed_atはstatus == completedのときに限り設定される）。
    pub fn set_status(&mut self, new_status: StepStatus, actor: &Actor) {
        let previous = self.status;
        self.status = new_status;
        self.completed_at = if new_status.is_completed() {
            Some(Utc::now())
        } else {
            None
        };

        let details = if new_status.is_reopened_from(previous) {
            format!(
                "Step reopened: status changed from {} to {}",
                previous.as_str(),
                new_status.as_str()
            )
        } else {
            format!("Step status changed to {}", new_status.as_str())
        };
        self.append_log(LOG_STATUS_CHANGED, actor, details);
    }

    /// チェックリスト項目を追加する
    ///
    /// 空白のみの説明は何もしない（ValidationNoop）。
    /// 追加された項目への参照を返す。
    pub fn add_action(&mut self, description: &str, actor: &Actor) -> Option<&ResponseAction> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }

        let action = ResponseAction::new(description);
        self.actions.push(action);
        self.append_log(LOG_ACTION_ADDED, actor, description);
        self.actions.last()
    }

    /// チェックリスト項目の完了状態を反転する
    ///
    /// 完了への遷移でcompleted_at/completed_byを設定し、未完了への
    /// 遷移で両方をクリアする。未知のidは何もしない（ValidationNoop）。
    /// 新しい完了状態を返す。
    pub fn toggle_action(&mut self, action_id: Uuid, actor: &Actor) -> Option<bool> {
        let action = self.actions.iter_mut().find(|a| a.id == action_id)?;

        action.completed = !action.completed;
        if action.completed {
            action.completed_at = Some(Utc::now());
            action.completed_by = Some(actor.name.clone());
        } else {
            action.completed_at = None;
            action.completed_by = None;
        }

        let now_completed = action.completed;
        let details = if now_completed {
            format!("Action marked complete: {}", action.description)
        } else {
            format!("Action marked incomplete: {}", action.description)
        };
        self.append_log(LOG_ACTION_TOGGLED, actor, details);
        Some(now_completed)
    }

    /// メモを置き換える。内容のバリデーションは行わない。
    pub fn update_notes(&mut self, text: impl Into<String>, actor: &Actor) {
        self.notes = text.into();
        self.append_log(LOG_NOTES_UPDATED, actor, "Step notes updated");
    }

    /// アップロード済みの証跡レコードを取り付ける
    ///
    /// ストレージへのアップロード自体はサービス層が先に済ませる。
    /// アップロードが失敗した場合このメソッドは呼ばれず、
    /// ステップの状態は一切変化しない。
    pub fn attach_evidence(&mut self, evidence: ResponseEvidence, actor: &Actor) {
        let filename = evidence.filename.clone();
        self.evidence.push(evidence);
        self.append_log(LOG_EVIDENCE_UPLOADED, actor, filename);
    }

    /// ログエントリを追記する
    pub fn append_log(&mut self, action: &str, actor: &Actor, details: impl Into<String>) {
        self.logs.push(ResponseLog::new(action, &actor.name, details));
    }

    /// 完了済みアクション数
    pub fn completed_action_count(&self) -> usize {
        self.actions.iter().filter(|a| a.completed).count()
    }

    /// ステップ名（テンプレート固定）
    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    /// ステップ説明（テンプレート固定）
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}
