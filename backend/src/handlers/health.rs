use axum::Json;
use chrono::Utc;

use crate::models::HealthStatus;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus)
    ),
    tag = "Health"
)]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy".to_string(), timestamp: Utc::now().to_rfc3339() })
}
