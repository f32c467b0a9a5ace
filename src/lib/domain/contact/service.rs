//! Contact intake service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    communication::mailer::{Delivery, Email, Mailer},
    contact::{
        errors::ContactError,
        notifications::{AcknowledgementTemplate, AdminNotificationTemplate, SiteOwner},
        Submission,
    },
};

/// What happened to the sender acknowledgement
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The acknowledgement was handed to the transport
    Sent(Delivery),

    /// Sending failed; the submission still succeeded
    Failed(String),

    /// The active transport does not send acknowledgements
    NotSent,
}

/// The result of a submission whose admin notification went through
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Delivery of the admin notification
    pub notification: Delivery,

    /// Outcome of the best-effort acknowledgement
    pub acknowledgement: Acknowledgement,
}

/// Contact intake service
#[async_trait]
pub trait ContactService: Clone + Send + Sync + 'static {
    /// Notifies the site owner of a validated submission and, when the transport
    /// allows it, acknowledges receipt to the sender.
    ///
    /// # Arguments
    /// * `submission` - The validated [`Submission`].
    ///
    /// # Returns
    /// - [`Ok`] with a [`SubmissionOutcome`] once the admin notification was accepted.
    /// - [`Err`] with a [`ContactError`] if rendering or the admin notification failed.
    ///   Acknowledgement failures never surface here.
    async fn submit(&self, submission: &Submission) -> Result<SubmissionOutcome, ContactError>;
}

#[cfg(test)]
mock! {
    pub ContactService {}

    impl Clone for ContactService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ContactService for ContactService {
        async fn submit(&self, submission: &Submission) -> Result<SubmissionOutcome, ContactError>;
    }
}

/// Contact intake service implementation
#[derive(Debug)]
pub struct ContactServiceImpl<M: Mailer> {
    mailer: Arc<M>,
    owner: Arc<SiteOwner>,
}

impl<M: Mailer> Clone for ContactServiceImpl<M> {
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
            owner: Arc::clone(&self.owner),
        }
    }
}

impl<M: Mailer> ContactServiceImpl<M> {
    /// Creates a new contact service delivering through `mailer`.
    pub fn new(mailer: Arc<M>, owner: SiteOwner) -> Self {
        Self {
            mailer,
            owner: Arc::new(owner),
        }
    }

    /// Sends the acknowledgement to the submitter.
    ///
    /// Best-effort: every failure, rendering included, is captured in the
    /// returned [`Acknowledgement`] and logged. Nothing propagates to the caller.
    async fn acknowledge(&self, submission: &Submission, received_at: DateTime<Utc>) -> Acknowledgement {
        let template = AcknowledgementTemplate::new(&self.owner, submission, received_at);

        let rendered = match template.render_email() {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(error = %err, "acknowledgement could not be rendered");
                return Acknowledgement::Failed(err.to_string());
            }
        };

        let email = Email {
            to: submission.email().clone(),
            subject: template.subject_line(),
            html: rendered.html,
            plain: rendered.plain,
            reply_to: Some(self.owner.notification_address.clone()),
        };

        match self.mailer.send_email(&email).await {
            Ok(delivery) => {
                info!(to = %email.to, "acknowledgement sent");
                Acknowledgement::Sent(delivery)
            }
            Err(err) => {
                warn!(to = %email.to, error = %err, "acknowledgement failed");
                Acknowledgement::Failed(err.to_string())
            }
        }
    }
}

#[async_trait]
impl<M: Mailer> ContactService for ContactServiceImpl<M> {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionOutcome, ContactError> {
        let received_at = Utc::now();

        let template = AdminNotificationTemplate::new(&self.owner, submission, received_at);
        let rendered = template.render_email()?;

        let notification = Email {
            to: self.owner.notification_address.clone(),
            subject: template.subject_line(),
            html: rendered.html,
            plain: rendered.plain,
            reply_to: Some(submission.email().clone()),
        };

        let delivery = self.mailer.send_email(&notification).await?;

        match &delivery {
            Delivery::Sent { message_id } => {
                info!(message_id = ?message_id, "admin notification sent");
            }
            Delivery::Skipped => {
                info!(
                    name = %submission.name(),
                    email = %submission.email(),
                    subject = %submission.subject(),
                    body = %submission.message(),
                    "no email transport configured, message received but not sent"
                );
            }
        }

        let kind = self.mailer.kind();

        let acknowledgement = if kind.sends_acknowledgement() {
            self.acknowledge(submission, received_at).await
        } else {
            info!(transport = %kind, "acknowledgement not sent for this transport");
            Acknowledgement::NotSent
        };

        Ok(SubmissionOutcome {
            notification: delivery,
            acknowledgement,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        communication::mailer::{tests::MockMailer, MailerError, TransportKind},
        contact::notifications::test_owner,
    };

    use super::*;

    fn submission() -> Submission {
        Submission::new(
            "Jane Doe",
            "jane@example.com",
            "Hello",
            "Interested in collaborating.",
        )
        .expect("valid submission")
    }

    fn sent() -> Delivery {
        Delivery::Sent {
            message_id: Some("id".to_string()),
        }
    }

    #[tokio::test]
    async fn test_smtp_sends_notification_and_acknowledgement() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_kind().return_const(TransportKind::Smtp);

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| {
                email.to.as_str() == "owner@example.com"
                    && email.subject == "Portfolio Contact: Hello"
                    && email.reply_to.as_ref().map(|r| r.as_str()) == Some("jane@example.com")
            })
            .returning(|_| Ok(sent()));

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| {
                email.to.as_str() == "jane@example.com"
                    && email.subject == "Thank you for contacting me - Hello"
                    && email.reply_to.as_ref().map(|r| r.as_str()) == Some("owner@example.com")
            })
            .returning(|_| Ok(sent()));

        let service = ContactServiceImpl::new(Arc::new(mailer), test_owner());

        let outcome = service.submit(&submission()).await?;

        assert_eq!(outcome.notification, sent());
        assert_eq!(outcome.acknowledgement, Acknowledgement::Sent(sent()));

        Ok(())
    }

    #[tokio::test]
    async fn test_acknowledgement_failure_is_absorbed() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_kind().return_const(TransportKind::Smtp);

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| email.to.as_str() == "owner@example.com")
            .returning(|_| Ok(sent()));

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| email.to.as_str() == "jane@example.com")
            .returning(|_| Err(MailerError::Transport("mailbox unavailable".to_string())));

        let service = ContactServiceImpl::new(Arc::new(mailer), test_owner());

        let outcome = service.submit(&submission()).await?;

        assert_eq!(
            outcome.acknowledgement,
            Acknowledgement::Failed("mailbox unavailable".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_api_relay_sends_notification_only() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_kind().return_const(TransportKind::ApiRelay);

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| email.to.as_str() == "owner@example.com")
            .returning(|_| Ok(sent()));

        let service = ContactServiceImpl::new(Arc::new(mailer), test_owner());

        let outcome = service.submit(&submission()).await?;

        assert_eq!(outcome.acknowledgement, Acknowledgement::NotSent);

        Ok(())
    }

    #[tokio::test]
    async fn test_dry_run_skips_delivery() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_kind().return_const(TransportKind::DryRun);

        mailer
            .expect_send_email()
            .times(1)
            .returning(|_| Ok(Delivery::Skipped));

        let service = ContactServiceImpl::new(Arc::new(mailer), test_owner());

        let outcome = service.submit(&submission()).await?;

        assert_eq!(
            outcome,
            SubmissionOutcome {
                notification: Delivery::Skipped,
                acknowledgement: Acknowledgement::NotSent,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_notification_failure_aborts_submission() {
        let mut mailer = MockMailer::new();

        mailer.expect_kind().times(0).return_const(TransportKind::Smtp);

        mailer
            .expect_send_email()
            .times(1)
            .returning(|_| Err(MailerError::Transport("535 authentication failed".to_string())));

        let service = ContactServiceImpl::new(Arc::new(mailer), test_owner());

        let result = service.submit(&submission()).await;

        assert!(matches!(
            result,
            Err(ContactError::Dispatch(MailerError::Transport(message))) if message == "535 authentication failed"
        ));
    }
}
