//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::contact::{errors::ContactError, FieldError, ValidationErrors};

const VALIDATION_FAILED: &str = "Validation failed";
const DISPATCH_FAILED: &str = "Failed to send message. Please try again later.";
const INTERNAL_ERROR: &str = "Something went wrong!";
const INVALID_BODY: &str = "Invalid request body";

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    #[schema(example = false)]
    pub success: bool,

    /// The error message
    #[schema(example = "Validation failed")]
    pub message: String,

    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorResponse>,
}

/// A field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FieldErrorResponse {
    /// The name of the field
    #[schema(example = "name")]
    pub field: String,

    /// The rule the field broke
    #[schema(example = "Name must be between 2 and 50 characters")]
    pub message: String,
}

impl From<&FieldError> for FieldErrorResponse {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.to_string(),
            message: err.message.to_string(),
        }
    }
}

/// An error raised in the API
#[derive(Debug)]
pub struct ApiError {
    /// The status code
    pub status: StatusCode,

    /// The error message
    pub message: String,

    /// Per-field validation failures
    pub errors: Vec<FieldErrorResponse>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            errors: Vec::new(),
        }
    }

    /// Create a new not found error
    pub fn new_404(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a generic internal server error
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                message: self.message,
                errors: self.errors,
            }),
        )
            .into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: VALIDATION_FAILED.to_string(),
            errors: err.errors().iter().map(FieldErrorResponse::from).collect(),
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Dispatch(err) => {
                error!("contact notification failed: {err}");

                // The submission was well formed, so this is reported in-band.
                ApiError::new(StatusCode::OK, DISPATCH_FAILED)
            }
            ContactError::Render(err) => {
                error!("contact notification could not be rendered: {err}");

                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), "rejected request body: {}", rejection.body_text());

        ApiError::new(StatusCode::BAD_REQUEST, INVALID_BODY)
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use testresult::TestResult;

    use crate::domain::{
        communication::mailer::MailerError,
        contact::{errors::ContactError, Submission},
    };

    use super::ApiError;

    #[tokio::test]
    async fn test_error_response() -> TestResult {
        let error = ApiError::new(StatusCode::NOT_FOUND, "API route not found");

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(body, r#"{"success":false,"message":"API route not found"}"#);

        Ok(())
    }

    #[tokio::test]
    async fn test_validation_error_response() -> TestResult {
        let Err(errors) = Submission::new("A", "bad", "Hello", "Hello there") else {
            panic!("submission should be rejected");
        };

        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let json = serde_json::from_slice::<serde_json::Value>(&body)?;

        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "Validation failed",
                "errors": [
                    { "field": "name", "message": "Name must be between 2 and 50 characters" },
                    { "field": "email", "message": "Please provide a valid email address" },
                ]
            })
        );

        Ok(())
    }

    #[test]
    fn test_dispatch_failure_is_reported_in_band() {
        let error = ContactError::Dispatch(MailerError::Transport(
            "535 5.7.8 authentication failed".to_string(),
        ));
        let api_error = ApiError::from(error);

        assert_eq!(api_error.status, StatusCode::OK);
        assert_eq!(
            api_error.message,
            "Failed to send message. Please try again later."
        );
    }

    #[test]
    fn test_render_failure_is_hidden() {
        let api_error = ApiError::from(ContactError::Render("missing template".to_string()));

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Something went wrong!");
    }

}
