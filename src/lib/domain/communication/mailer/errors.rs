//! Mailer errors

use thiserror::Error;

/// Errors raised while dispatching an email
#[derive(Debug, Error)]
pub enum MailerError {
    /// An address could not be used by the transport
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The transport failed to deliver the email
    #[error("{0}")]
    Transport(String),
}

impl From<lettre::address::AddressError> for MailerError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailerError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::Transport(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailerError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        MailerError::Transport(err.to_string())
    }
}
