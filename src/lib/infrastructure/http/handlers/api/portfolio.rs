//! Portfolio data handler

use axum::{extract::State, Json};

use crate::{
    domain::{contact::ContactService, portfolio::Portfolio},
    infrastructure::http::state::AppState,
};

/// Get the site owner's profile
#[utoipa::path(
    get,
    operation_id = "portfolio",
    tag = "Portfolio",
    path = "/api/portfolio",
    responses(
        (status = StatusCode::OK, description = "Profile of the site owner", body = Portfolio),
        (status = StatusCode::TOO_MANY_REQUESTS, description = "Too many requests"),
    )
)]
pub async fn handler<C: ContactService>(State(state): State<AppState<C>>) -> Json<Portfolio> {
    Json(state.portfolio.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::portfolio::Portfolio,
        infrastructure::http::{
            router,
            state::tests::{client_ip, forwarded_for, test_state},
        },
    };

    #[tokio::test]
    async fn test_portfolio_handler() -> TestResult {
        let response = TestServer::new(router(test_state(None))?)?
            .get("/api/portfolio")
            .add_header(forwarded_for(), client_ip())
            .await;

        response.assert_status_ok();
        response.assert_json(&Portfolio::profile());

        let json = response.json::<serde_json::Value>();
        assert!(json["about"]["graduationYear"].is_string());
        assert!(json["skills"]["softSkills"].is_array());

        Ok(())
    }
}
