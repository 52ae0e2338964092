// safeshield-backend/src/api/mod.rs

pub mod dto;
pub mod handlers;

use crate::service::incident_service::IncidentService;
use crate::service::response_tracker_service::ResponseTrackerService;
use std::sync::Arc;

/// ハンドラー間で共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub incident_service: Arc<IncidentService>,
    pub response_service: Arc<ResponseTrackerService>,
}
