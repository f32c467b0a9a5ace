//! Contact intake errors

use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// Errors that abort a contact form submission after validation
#[derive(Debug, Error)]
pub enum ContactError {
    /// The admin notification could not be delivered
    #[error("could not deliver the admin notification: {0}")]
    Dispatch(#[from] MailerError),

    /// A notification email could not be rendered
    #[error("could not render notification: {0}")]
    Render(String),
}

impl From<askama::Error> for ContactError {
    fn from(err: askama::Error) -> Self {
        debug!("askama::Error -> ContactError");

        ContactError::Render(err.to_string())
    }
}

impl From<InlineError> for ContactError {
    fn from(err: InlineError) -> Self {
        debug!("InlineError -> ContactError");

        ContactError::Render(err.to_string())
    }
}
