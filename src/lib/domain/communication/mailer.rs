//! Email dispatch module

use std::fmt;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::email_addresses::EmailAddress;

mod errors;

pub use errors::MailerError;

/// An email ready to be handed to a transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    /// The recipient of the email
    pub to: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html: String,

    /// The plain text body of the email
    pub plain: String,

    /// Address replies should go to, if different from the sender
    pub reply_to: Option<EmailAddress>,
}

/// The outcome of a dispatch attempt that did not fail
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The transport accepted the email
    Sent {
        /// The identifier the provider assigned, when it reports one
        message_id: Option<String>,
    },

    /// No transport is configured; nothing left the process
    Skipped,
}

/// The kind of transport behind a [`Mailer`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// Direct SMTP submission
    Smtp,

    /// Third-party transactional email API
    ApiRelay,

    /// No transport configured
    DryRun,
}

impl TransportKind {
    /// Whether submitters receive an acknowledgement through this transport.
    ///
    /// Sender details are never relayed to a third-party API for a message the
    /// sender did not opt into, and a dry run has nothing to deliver.
    pub fn sends_acknowledgement(&self) -> bool {
        matches!(self, Self::Smtp)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => write!(f, "smtp"),
            Self::ApiRelay => write!(f, "api relay"),
            Self::DryRun => write!(f, "dry run"),
        }
    }
}

/// Email transport
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// The kind of transport this mailer delivers through.
    fn kind(&self) -> TransportKind;

    /// Send an email
    ///
    /// # Arguments
    /// * `email` - The [`Email`] to deliver.
    ///
    /// # Returns
    /// The [`Delivery`] outcome, or a [`MailerError`] carrying the transport's
    /// own error message. Nothing is retried.
    async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        fn kind(&self) -> TransportKind;
        async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError>;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;

    use super::TransportKind;

    #[test]
    fn test_only_smtp_sends_acknowledgements() {
        assert!(TransportKind::Smtp.sends_acknowledgement());
        assert!(!TransportKind::ApiRelay.sends_acknowledgement());
        assert!(!TransportKind::DryRun.sends_acknowledgement());
    }
}
