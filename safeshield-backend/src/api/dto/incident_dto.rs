// safeshield-backend/src/api/dto/incident_dto.rs
use crate::domain::incident_model;
use crate::domain::incident_model::{IncidentSeverity, IncidentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateIncidentDto {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Incident title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(
        max = 5000,
        message = "Incident description must not exceed 5000 characters"
    ))]
    pub description: String,

    pub severity: Option<IncidentSeverity>, // 省略時はmedium
    pub assigned_to: Option<Uuid>,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct UpdateIncidentDto {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Incident title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,

    #[validate(length(
        max = 5000,
        message = "Incident description must not exceed 5000 characters"
    ))]
    pub description: Option<String>,

    pub severity: Option<IncidentSeverity>,
    pub status: Option<IncidentStatus>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
pub struct IncidentFilterDto {
    pub status: Option<String>,
}

// --- Response DTO ---

#[derive(Serialize, Deserialize, Debug)]
pub struct IncidentDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub reported_by: Uuid,
    pub reported_by_name: String,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<incident_model::Model> for IncidentDto {
    fn from(model: incident_model::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            severity: model.severity,
            status: model.status,
            reported_by: model.reported_by,
            reported_by_name: model.reported_by_name,
            assigned_to: model.assigned_to,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
