//! Transactional email API transport (Resend)

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::communication::mailer::{Delivery, Email, Mailer, MailerError, TransportKind};

/// Transactional email API configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ResendConfig {
    /// The API key sent as a bearer token
    pub api_key: String,

    /// The API base URL
    pub api_url: String,

    /// The sender, e.g. `Portfolio Contact <onboarding@resend.dev>`
    pub sender: String,
}

impl fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"********")
            .field("api_url", &self.api_url)
            .field("sender", &self.sender)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Mailer that relays through the transactional email API over HTTPS
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    config: ResendConfig,
}

impl ResendMailer {
    /// Create a new API mailer
    pub fn new(config: ResendConfig) -> Result<Self, MailerError> {
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn kind(&self) -> TransportKind {
        TransportKind::ApiRelay
    }

    async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError> {
        let request = SendEmailRequest {
            from: &self.config.sender,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: &email.plain,
            reply_to: email.reply_to.as_ref().map(|address| address.as_str()),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Transport(format!(
                "email API responded with {status}: {body}"
            )));
        }

        let SendEmailResponse { id } = response.json().await?;

        debug!(to = %email.to, id = %id, "API email sent");

        Ok(Delivery::Sent {
            message_id: Some(id),
        })
    }
}
