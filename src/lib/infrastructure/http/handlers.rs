//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use super::errors::{ApiError, ErrorResponse};

pub mod api;

/// Catch panics and return a 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!("handler panicked: {details}");

    let error = ErrorResponse {
        success: false,
        message: "Something went wrong!".to_string(),
        errors: Vec::new(),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

/// Fallback for unknown API routes
pub async fn not_found() -> ApiError {
    ApiError::new_404("API route not found")
}
