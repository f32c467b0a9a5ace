//! Contact form intake: validation, notification rendering and dispatch orchestration.

mod notifications;
mod service;
mod submission;

pub mod errors;

pub use notifications::{
    AcknowledgementTemplate, AdminNotificationTemplate, RenderedEmail, SiteOwner,
};
pub use service::{Acknowledgement, ContactService, ContactServiceImpl, SubmissionOutcome};
pub use submission::{Field, FieldError, Submission, ValidationErrors};
