//! Dry-run transport used when no email provider is configured

use async_trait::async_trait;
use tracing::info;

use crate::domain::communication::mailer::{Delivery, Email, Mailer, MailerError, TransportKind};

/// Accepts every email without delivering it, logging the envelope instead
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMailer;

#[async_trait]
impl Mailer for DryRunMailer {
    fn kind(&self) -> TransportKind {
        TransportKind::DryRun
    }

    async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            reply_to = ?email.reply_to.as_ref().map(|address| address.as_str()),
            "dry run: email not sent"
        );

        Ok(Delivery::Skipped)
    }
}
