use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::contact::ContactService,
    infrastructure::http::{
        open_api::ApiDocs,
        rate_limit::{rate_limited, RateLimitConfig, RateLimiter},
        state::AppState,
    },
};

use super::not_found;

pub mod contact;
pub mod health;
pub mod portfolio;

/// Routes mounted under `/api`, each subject to the API-wide limit
pub fn router<C: ContactService>(limits: &RateLimitConfig) -> Router<AppState<C>> {
    let contact: Router<AppState<C>> = rate_limited(
        Router::new().route("/contact", post(contact::handler::<C>)),
        RateLimiter::contact(limits),
    );

    let router = Router::new()
        .route("/health", get(health::handler::<C>))
        .route("/portfolio", get(portfolio::handler::<C>))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .merge(contact)
        .fallback(not_found);

    rate_limited(router, RateLimiter::api(limits))
}
