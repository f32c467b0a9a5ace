//! Contact form handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    domain::contact::{Acknowledgement, ContactService, Submission},
    infrastructure::http::{errors::ApiError, state::AppState},
};

const RECEIVED: &str = "Message received! I'll get back to you soon.";

/// Contact form request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactFormBody {
    /// The sender's name
    #[schema(example = "Ada Lovelace")]
    name: String,

    /// The sender's email address
    #[schema(example = "ada@example.com")]
    email: String,

    /// What the message is about
    #[schema(example = "Collaboration")]
    subject: String,

    /// The message itself
    #[schema(example = "I'd love to work together on an analytical engine.")]
    message: String,
}

impl TryFrom<ContactFormBody> for Submission {
    type Error = ApiError;

    fn try_from(body: ContactFormBody) -> Result<Self, Self::Error> {
        Ok(Submission::new(
            &body.name,
            &body.email,
            &body.subject,
            &body.message,
        )?)
    }
}

/// Contact form response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    /// Whether the message reached the site owner
    #[schema(example = true)]
    pub success: bool,

    /// A message for the sender
    #[schema(example = "Message received! I'll get back to you soon.")]
    pub message: String,
}

/// Submit the contact form
#[utoipa::path(
    post,
    operation_id = "contact",
    tag = "Contact",
    path = "/api/contact",
    request_body = ContactFormBody,
    responses(
        (status = StatusCode::OK, description = "Message received, or delivery failed (`success` is false)", body = ContactResponse),
        (status = StatusCode::BAD_REQUEST, description = "Validation failed", body = ErrorResponse),
        (status = StatusCode::TOO_MANY_REQUESTS, description = "Too many contact form submissions"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Unexpected error", body = ErrorResponse, example = json!({"success": false, "message": "Something went wrong!"})),
    )
)]
pub async fn handler<C: ContactService>(
    State(state): State<AppState<C>>,
    request: Result<Json<ContactFormBody>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(request) = request?;

    let submission: Submission = request.try_into()?;

    let outcome = state.contact.submit(&submission).await?;

    info!(
        notification = ?outcome.notification,
        acknowledged = matches!(outcome.acknowledgement, Acknowledgement::Sent(_)),
        "contact form submission accepted"
    );

    Ok(Json(ContactResponse {
        success: true,
        message: RECEIVED.to_string(),
    }))
}
