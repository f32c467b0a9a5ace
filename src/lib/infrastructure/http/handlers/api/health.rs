//! Health check handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{domain::contact::ContactService, infrastructure::http::state::AppState};

/// The health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "OK" while the process is serving
    #[schema(example = "OK")]
    pub status: String,

    /// A short description of the service
    #[schema(example = "Portfolio API is running")]
    pub message: String,

    /// The current server time
    pub timestamp: DateTime<Utc>,

    /// The uptime of the application in seconds
    #[schema(example = 123)]
    pub uptime: i64,
}

/// Report that the API is up
#[utoipa::path(
    get,
    operation_id = "health",
    tag = "System",
    path = "/api/health",
    responses(
        (status = StatusCode::OK, description = "Health response", body = HealthResponse),
        (status = StatusCode::TOO_MANY_REQUESTS, description = "Too many requests"),
    )
)]
pub async fn handler<C: ContactService>(
    State(state): State<AppState<C>>,
) -> Json<HealthResponse> {
    let now = Utc::now();

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Portfolio API is running".to_string(),
        timestamp: now,
        uptime: now.timestamp() - state.start_time.timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use chrono::Utc;
    use testresult::TestResult;

    use crate::infrastructure::http::{
        handlers::api::health::HealthResponse,
        router,
        state::tests::{client_ip, forwarded_for, test_state},
    };

    #[tokio::test]
    async fn test_health_handler() -> TestResult {
        let state = test_state(None);
        let start_time = state.start_time;

        let response = TestServer::new(router(state)?)?
            .get("/api/health")
            .add_header(forwarded_for(), client_ip())
            .await;

        response.assert_status_ok();

        let json = response.json::<HealthResponse>();

        assert_eq!(json.status, "OK");
        assert_eq!(json.message, "Portfolio API is running");
        assert!(json.timestamp >= start_time);
        assert!(
            json.uptime <= Utc::now().timestamp() - start_time.timestamp(),
            "uptime should be measured from the start time"
        );

        Ok(())
    }
}
