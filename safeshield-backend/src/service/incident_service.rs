// safeshield-backend/src/service/incident_service.rs

use crate::api::dto::incident_dto::{CreateIncidentDto, IncidentDto, UpdateIncidentDto};
use crate::db::DbPool;
use crate::domain::actor::Actor;
use crate::error::AppResult;
use crate::repository::incident_repository::IncidentRepository;
use crate::utils::error_helper::not_found_error;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct IncidentService {
    repo: Arc<IncidentRepository>,
}

impl IncidentService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(IncidentRepository::new(db_pool)),
        }
    }

    pub async fn report_incident(
        &self,
        payload: CreateIncidentDto,
        reporter: &Actor,
    ) -> AppResult<IncidentDto> {
        let created = self.repo.create(payload, reporter).await?;

        info!(
            incident_id = %created.id,
            severity = %created.severity,
            reported_by = %reporter.name,
            "Incident reported"
        );
        Ok(created.into())
    }

    pub async fn get_incident(&self, id: Uuid) -> AppResult<IncidentDto> {
        let incident = self.repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error(
                &format!("Incident with id {} not found", id),
                "incident_service::get_incident",
            )
        })?;
        Ok(incident.into())
    }

    pub async fn list_incidents(&self, status: Option<&str>) -> AppResult<Vec<IncidentDto>> {
        let incidents = match status {
            Some(status) => self.repo.find_by_status(status).await?,
            None => self.repo.find_all().await?,
        };
        Ok(incidents.into_iter().map(IncidentDto::from).collect())
    }

    pub async fn update_incident(
        &self,
        id: Uuid,
        payload: UpdateIncidentDto,
        actor: &Actor,
    ) -> AppResult<IncidentDto> {
        let updated = self.repo.update(id, payload).await?.ok_or_else(|| {
            not_found_error(
                &format!("Incident with id {} not found", id),
                "incident_service::update_incident",
            )
        })?;

        info!(
            incident_id = %id,
            user = %actor.name,
            "Incident updated"
        );
        Ok(updated.into())
    }
}
