// safeshield-backend/src/domain/response_evidence_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};

/// 証跡ファイル参照の永続化エンティティ
///
/// ファイル本体は外部のオブジェクトストレージにあり、storage_keyが
/// その参照。作成後は不変。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "response_evidence")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub incident_id: Uuid,
    pub step_id: String,
    pub filename: String,
    pub storage_key: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_by_id: Uuid,
    pub uploaded_by_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident_model::Entity",
        from = "Column::IncidentId",
        to = "super::incident_model::Column::Id"
    )]
    Incident,
}

impl Related<super::incident_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            uploaded_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

/// 証跡として受け付けるMIME type
pub const ALLOWED_EVIDENCE_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/csv",
    "application/json",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/octet-stream",
    "image/jpeg",
    "image/png",
];

/// MIMEタイプが証跡として許可されているかチェック
pub fn is_allowed_evidence_mime_type(mime_type: &str) -> bool {
    ALLOWED_EVIDENCE_MIME_TYPES.contains(&mime_type)
}

/// 証跡ファイルサイズの上限（バイト単位）
pub const MAX_EVIDENCE_FILE_SIZE: i64 = 50 * 1024 * 1024; // 50MB

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_mime_types() {
        assert!(is_allowed_evidence_mime_type("text/plain"));
        assert!(is_allowed_evidence_mime_type("application/pdf"));
        assert!(!is_allowed_evidence_mime_type("application/x-msdownload"));
    }
}
