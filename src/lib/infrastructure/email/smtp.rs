//! SMTP email transport

use std::fmt;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::mailer::{Delivery, Email, Mailer, MailerError, TransportKind};

/// Port on which SMTP servers expect TLS from the first byte
const IMPLICIT_TLS_PORT: u16 = 465;

/// Message submission port, where servers are expected to offer STARTTLS
const SUBMISSION_PORT: u16 = 587;

/// How the connection to the SMTP server is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    /// TLS from the first byte
    Implicit,

    /// Upgrade with STARTTLS, failing if the server does not offer it
    StartTls,

    /// Upgrade with STARTTLS when the server offers it
    Opportunistic,
}

impl Encryption {
    /// The encryption expected on `port`
    pub fn for_port(port: u16) -> Self {
        match port {
            IMPLICIT_TLS_PORT => Encryption::Implicit,
            SUBMISSION_PORT => Encryption::StartTls,
            _ => Encryption::Opportunistic,
        }
    }
}

/// SMTP configuration
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// The SMTP host
    pub host: String,

    /// The SMTP port
    pub port: u16,

    /// The SMTP username
    pub username: String,

    /// The SMTP password
    pub password: String,

    /// The sender mailbox, e.g. `Portfolio <hello@example.com>`
    pub sender: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("sender", &self.sender)
            .finish()
    }
}

/// SMTP mailer backed by a pooled async transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer. No connection is opened until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self, MailerError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let relay = match Encryption::for_port(config.port) {
            Encryption::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            Encryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            Encryption::Opportunistic => {
                let tls = TlsParameters::new(config.host.clone())?;

                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .tls(Tls::Opportunistic(tls))
            }
        };

        let transport = relay.credentials(creds).port(config.port).build();
        let sender: Mailbox = config.sender.parse()?;

        Ok(Self {
            transport,
            sender,
            config,
        })
    }

    /// Builds the MIME message for `email`
    pub fn message(&self, email: &Email) -> Result<Message, MailerError> {
        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(email.to.as_str().parse()?)
            .subject(email.subject.as_str());

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.as_str().parse()?);
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(
            email.plain.clone(),
            email.html.clone(),
        ))?)
    }
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn kind(&self) -> TransportKind {
        TransportKind::Smtp
    }

    async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError> {
        let message = self.message(email)?;

        let response = self.transport.send(message).await?;

        let message_id = response.first_line().map(str::to_string);

        debug!(to = %email.to, response = ?message_id, "SMTP email sent");

        Ok(Delivery::Sent { message_id })
    }
}
