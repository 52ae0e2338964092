// safeshield-backend/src/repository/incident_repository.rs
use crate::api::dto::incident_dto::{CreateIncidentDto, UpdateIncidentDto};
use crate::domain::actor::Actor;
use crate::domain::incident_model::{
    self, ActiveModel as IncidentActiveModel, Entity as IncidentEntity, IncidentSeverity,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

pub struct IncidentRepository {
    db: DbConn,
}

impl IncidentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<incident_model::Model>, DbErr> {
        IncidentEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<incident_model::Model>, DbErr> {
        IncidentEntity::find()
            .order_by(incident_model::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<incident_model::Model>, DbErr> {
        IncidentEntity::find()
            .filter(incident_model::Column::Status.eq(status))
            .order_by(incident_model::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        payload: CreateIncidentDto,
        reporter: &Actor,
    ) -> Result<incident_model::Model, DbErr> {
        let new_incident = IncidentActiveModel {
            title: Set(payload.title),
            description: Set(payload.description),
            severity: Set(payload
                .severity
                .unwrap_or(IncidentSeverity::Medium)
                .to_string()),
            reported_by: Set(reporter.id),
            reported_by_name: Set(reporter.name.clone()),
            assigned_to: Set(payload.assigned_to),
            ..IncidentActiveModel::new()
        };
        new_incident.insert(&self.db).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateIncidentDto,
    ) -> Result<Option<incident_model::Model>, DbErr> {
        let incident = match IncidentEntity::find_by_id(id).one(&self.db).await? {
            Some(i) => i,
            None => return Ok(None),
        };

        let mut active_model: IncidentActiveModel = incident.clone().into();
        let mut changed = false;

        if let Some(title) = payload.title {
            active_model.title = Set(title);
            changed = true;
        }

        if let Some(description) = payload.description {
            active_model.description = Set(description);
            changed = true;
        }

        if let Some(severity) = payload.severity {
            active_model.severity = Set(severity.to_string());
            changed = true;
        }

        if let Some(status) = payload.status {
            active_model.status = Set(status.to_string());
            changed = true;
        }

        if payload.assigned_to.is_some() {
            active_model.assigned_to = Set(payload.assigned_to);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(incident)) // 何も変更がなければ元のインシデントを返す
        }
    }
}
