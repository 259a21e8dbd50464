//! Health check endpoints

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "resource-viewer",
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, send, test_app};

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app().await;
        for path in ["/health", "/api/v1/health"] {
            let (status, body) = send(&app, get(path)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
        }
    }
}
