//! Health check

use axum::{Json, extract::State};
use serde::Serialize;
use shared::PROTOCOL_VERSION;
use shared::message::ServerStatus;

use crate::core::Result;
use crate::hub::HubHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub protocol_version: u16,
    #[serde(flatten)]
    pub counts: ServerStatus,
}

/// `GET /health`, 503 once the hub task is gone
pub async fn health(State(hub): State<HubHandle>) -> Result<Json<HealthResponse>> {
    let counts = hub.status().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        protocol_version: PROTOCOL_VERSION,
        counts,
    }))
}
