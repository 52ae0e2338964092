// safeshield-backend/src/repository/response_repository.rs
use crate::domain::response_action_model::{
    self, ActiveModel as ActionActiveModel, Entity as ActionEntity,
};
use crate::domain::response_evidence_model::{
    self, ActiveModel as EvidenceActiveModel, Entity as EvidenceEntity,
};
use crate::domain::response_log_model::{self, ActiveModel as LogActiveModel, Entity as LogEntity};
use crate::domain::response_step::{ResponseAction, ResponseEvidence, ResponseLog, ResponseStep};
use crate::domain::response_step_model::{
    self, ActiveModel as StepActiveModel, Entity as StepEntity,
};
use crate::domain::step_kind::StepKind;
use crate::domain::step_status::StepStatus;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use sea_orm::{ConnectionTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait};
use uuid::Uuid;

/// 対応トラッカーの永続化コラボレータ
///
/// 4つのresponse_*テーブルをまとめて扱う。変更系の操作は
/// 「状態の書き込み + ログエントリの追記」を1トランザクションで行い、
/// 部分的な書き込みを残さない。
pub struct ResponseRepository {
    db: DbConn,
}

impl ResponseRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 読み取り ---

    /// インシデントの永続化済みステップ状態をドメインのステップに組み立てる
    ///
    /// 行が存在しないステップは返却に含まれない（呼び出し側でテンプレートに
    /// マージする）。同じ背後データからは常に同じ結果を返す。
    pub async fn load_steps(&self, incident_id: Uuid) -> Result<Vec<ResponseStep>, DbErr> {
        let step_rows = StepEntity::find()
            .filter(response_step_model::Column::IncidentId.eq(incident_id))
            .all(&self.db)
            .await?;

        let action_rows = ActionEntity::find()
            .filter(response_action_model::Column::IncidentId.eq(incident_id))
            .order_by(response_action_model::Column::Position, Order::Asc)
            .all(&self.db)
            .await?;

        let evidence_rows = EvidenceEntity::find()
            .filter(response_evidence_model::Column::IncidentId.eq(incident_id))
            .order_by(response_evidence_model::Column::UploadedAt, Order::Asc)
            .all(&self.db)
            .await?;

        let log_rows = LogEntity::find()
            .filter(response_log_model::Column::IncidentId.eq(incident_id))
            .order_by(response_log_model::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await?;

        let mut steps = Vec::new();
        for row in step_rows {
            let Some(kind) = StepKind::from_str(&row.step_id) else {
                // 既知の5種以外の行は無視する
                tracing::warn!(step_id = %row.step_id, "Ignoring unknown response step row");
                continue;
            };

            let mut step = ResponseStep::new(kind);
            step.status = StepStatus::from_str(&row.status).unwrap_or_default();
            step.notes = row.notes;
            step.completed_at = row.completed_at;
            step.assigned_to = row.assigned_to;
            steps.push(step);
        }

        // ステップ行より先にアクションやログだけが永続化されていることも
        // あるため、行がないステップはテンプレートを補って取り付ける
        for row in action_rows {
            let Some(kind) = StepKind::from_str(&row.step_id) else {
                continue;
            };
            step_entry(&mut steps, kind).actions.push(action_from_row(row));
        }

        for row in evidence_rows {
            let Some(kind) = StepKind::from_str(&row.step_id) else {
                continue;
            };
            step_entry(&mut steps, kind)
                .evidence
                .push(evidence_from_row(row));
        }

        for row in log_rows {
            let Some(kind) = StepKind::from_str(&row.step_id) else {
                continue;
            };
            step_entry(&mut steps, kind).logs.push(log_from_row(row));
        }

        Ok(steps)
    }

    pub async fn find_action(
        &self,
        incident_id: Uuid,
        action_id: Uuid,
    ) -> Result<Option<response_action_model::Model>, DbErr> {
        ActionEntity::find_by_id(action_id)
            .filter(response_action_model::Column::IncidentId.eq(incident_id))
            .one(&self.db)
            .await
    }

    // --- 書き込み（状態 + ログを1トランザクションで） ---

    /// ステップのステータス変更を永続化する
    ///
    /// ステップ行がなければ作成する（初回の変更までは行を持たない）。
    pub async fn save_step_status(
        &self,
        incident_id: Uuid,
        step: &ResponseStep,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        self.upsert_step(&txn, incident_id, step).await?;
        insert_log(&txn, incident_id, step.kind, log).await?;
        txn.commit().await?;
        Ok(())
    }

    /// 新規チェックリスト項目を永続化する
    pub async fn append_action(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        action: &ResponseAction,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let position = ActionEntity::find()
            .filter(response_action_model::Column::IncidentId.eq(incident_id))
            .filter(response_action_model::Column::StepId.eq(kind.as_str()))
            .count(&txn)
            .await? as i32;

        let row = ActionActiveModel {
            id: Set(action.id),
            incident_id: Set(incident_id),
            step_id: Set(kind.as_str().to_string()),
            description: Set(action.description.clone()),
            completed: Set(action.completed),
            completed_at: Set(action.completed_at),
            completed_by_id: Set(None),
            completed_by_name: Set(action.completed_by.clone()),
            position: Set(position),
            ..ActionActiveModel::new()
        };
        row.insert(&txn).await?;

        insert_log(&txn, incident_id, kind, log).await?;
        txn.commit().await?;
        Ok(())
    }

    /// チェックリスト項目の完了状態の反転を永続化する
    pub async fn save_action_toggle(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        action: &ResponseAction,
        actor_id: Uuid,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        let row = match self.find_action(incident_id, action.id).await? {
            Some(row) => row,
            None => return Ok(()), // 行がなければ何もしない
        };

        let txn = self.db.begin().await?;

        let mut active: ActionActiveModel = row.into();
        active.completed = Set(action.completed);
        active.completed_at = Set(action.completed_at);
        active.completed_by_id = Set(action.completed.then_some(actor_id));
        active.completed_by_name = Set(action.completed_by.clone());
        active.update(&txn).await?;

        insert_log(&txn, incident_id, kind, log).await?;
        txn.commit().await?;
        Ok(())
    }

    /// ステップのメモ更新を永続化する
    pub async fn save_notes(
        &self,
        incident_id: Uuid,
        step: &ResponseStep,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        self.upsert_step(&txn, incident_id, step).await?;
        insert_log(&txn, incident_id, step.kind, log).await?;
        txn.commit().await?;
        Ok(())
    }

    /// アップロード済み証跡の参照を永続化する
    ///
    /// ストレージへのアップロードが成功した後にのみ呼ばれる。
    pub async fn append_evidence(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        evidence: &ResponseEvidence,
        uploaded_by_id: Uuid,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let row = EvidenceActiveModel {
            id: Set(evidence.id),
            incident_id: Set(incident_id),
            step_id: Set(kind.as_str().to_string()),
            filename: Set(evidence.filename.clone()),
            storage_key: Set(evidence.file_url.clone()),
            file_type: Set(evidence.file_type.clone()),
            file_size: Set(evidence.file_size),
            uploaded_by_id: Set(uploaded_by_id),
            uploaded_by_name: Set(evidence.uploaded_by.clone()),
            uploaded_at: Set(evidence.uploaded_at),
        };
        row.insert(&txn).await?;

        insert_log(&txn, incident_id, kind, log).await?;
        txn.commit().await?;
        Ok(())
    }

    /// ログエントリを単独で追記する
    pub async fn append_log(
        &self,
        incident_id: Uuid,
        kind: StepKind,
        log: &ResponseLog,
    ) -> Result<(), DbErr> {
        insert_log(&self.db, incident_id, kind, log).await
    }

    /// ステップ行を更新、なければ挿入する
    async fn upsert_step<C: ConnectionTrait>(
        &self,
        conn: &C,
        incident_id: Uuid,
        step: &ResponseStep,
    ) -> Result<(), DbErr> {
        let existing = StepEntity::find()
            .filter(response_step_model::Column::IncidentId.eq(incident_id))
            .filter(response_step_model::Column::StepId.eq(step.kind.as_str()))
            .one(conn)
            .await?;

        match existing {
            Some(row) => {
                let mut active: StepActiveModel = row.into();
                active.status = Set(step.status.to_string());
                active.notes = Set(step.notes.clone());
                active.completed_at = Set(step.completed_at);
                active.assigned_to = Set(step.assigned_to);
                active.update(conn).await?;
            }
            None => {
                let row = StepActiveModel {
                    incident_id: Set(incident_id),
                    step_id: Set(step.kind.as_str().to_string()),
                    status: Set(step.status.to_string()),
                    notes: Set(step.notes.clone()),
                    completed_at: Set(step.completed_at),
                    assigned_to: Set(step.assigned_to),
                    ..StepActiveModel::new()
                };
                row.insert(conn).await?;
            }
        }
        Ok(())
    }
}

async fn insert_log<C: ConnectionTrait>(
    conn: &C,
    incident_id: Uuid,
    kind: StepKind,
    log: &ResponseLog,
) -> Result<(), DbErr> {
    let row = LogActiveModel {
        id: Set(log.id),
        incident_id: Set(incident_id),
        step_id: Set(kind.as_str().to_string()),
        action: Set(log.action.clone()),
        user_name: Set(log.user.clone()),
        details: Set(log.details.clone()),
        created_at: Set(log.timestamp),
    };
    row.insert(conn).await?;
    Ok(())
}

fn step_entry(steps: &mut Vec<ResponseStep>, kind: StepKind) -> &mut ResponseStep {
    let idx = match steps.iter().position(|s| s.kind == kind) {
        Some(idx) => idx,
        None => {
            steps.push(ResponseStep::new(kind));
            steps.len() - 1
        }
    };
    &mut steps[idx]
}

fn action_from_row(row: response_action_model::Model) -> ResponseAction {
    ResponseAction {
        id: row.id,
        description: row.description,
        completed: row.completed,
        completed_at: row.completed_at,
        completed_by: row.completed_by_name,
    }
}

fn evidence_from_row(row: response_evidence_model::Model) -> ResponseEvidence {
    ResponseEvidence {
        id: row.id,
        filename: row.filename,
        file_url: row.storage_key,
        file_type: row.file_type,
        file_size: row.file_size,
        uploaded_at: row.uploaded_at,
        uploaded_by: row.uploaded_by_name,
    }
}

fn log_from_row(row: response_log_model::Model) -> ResponseLog {
    ResponseLog {
        id: row.id,
        timestamp: row.created_at,
        action: row.action,
        user: row.user_name,
        details: row.details,
    }
}
