//! Email transports and their selection

use async_trait::async_trait;
use clap::Parser;
use tracing::info;

use crate::domain::communication::mailer::{Delivery, Email, Mailer, MailerError, TransportKind};

pub mod dry_run;
pub mod resend;
pub mod smtp;

use dry_run::DryRunMailer;
use resend::{ResendConfig, ResendMailer};
use smtp::{SmtpConfig, SmtpMailer};

/// Email configuration, read once at startup
#[derive(Clone, Debug, Default, Parser)]
pub struct EmailConfig {
    /// The SMTP host
    #[clap(long, env = "EMAIL_HOST")]
    pub smtp_host: Option<String>,

    /// The SMTP port; 465 uses implicit TLS, anything else STARTTLS
    #[clap(long, env = "EMAIL_PORT", default_value = "587")]
    pub smtp_port: u16,

    /// The SMTP username
    #[clap(long, env = "EMAIL_USER")]
    pub smtp_user: Option<String>,

    /// The SMTP password
    #[clap(long, env = "EMAIL_PASSWORD")]
    pub smtp_password: Option<String>,

    /// The SMTP sender address, defaults to the SMTP username
    #[clap(long, env = "EMAIL_FROM")]
    pub smtp_from: Option<String>,

    /// The transactional email API key
    #[clap(long, env = "RESEND_API_KEY")]
    pub resend_api_key: Option<String>,

    /// The transactional email API base URL
    #[clap(long, env = "RESEND_API_URL", default_value = "https://api.resend.com")]
    pub resend_api_url: String,

    /// The sender used for the transactional email API
    #[clap(
        long,
        env = "RESEND_FROM",
        default_value = "Portfolio Contact <onboarding@resend.dev>"
    )]
    pub resend_from: String,

    /// Where admin notifications are delivered
    #[clap(long, env = "EMAIL_TO", default_value = "subash.93450@gmail.com")]
    pub notification_email: String,
}

/// The transport chosen from the available configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportConfig {
    /// Direct SMTP submission
    Smtp(SmtpConfig),

    /// Third-party transactional email API
    ApiRelay(ResendConfig),

    /// Nothing configured; submissions are only logged
    DryRun,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl TransportConfig {
    /// Picks the active transport: SMTP when host, user and password are all
    /// set, otherwise the API relay when a key is set, otherwise a dry run.
    pub fn select(config: &EmailConfig) -> Self {
        if let (Some(host), Some(user), Some(password)) = (
            present(&config.smtp_host),
            present(&config.smtp_user),
            present(&config.smtp_password),
        ) {
            return Self::Smtp(SmtpConfig {
                host: host.to_string(),
                port: config.smtp_port,
                username: user.to_string(),
                password: password.to_string(),
                sender: present(&config.smtp_from).unwrap_or(user).to_string(),
            });
        }

        if let Some(api_key) = present(&config.resend_api_key) {
            return Self::ApiRelay(ResendConfig {
                api_key: api_key.to_string(),
                api_url: config.resend_api_url.clone(),
                sender: config.resend_from.clone(),
            });
        }

        Self::DryRun
    }

    /// The kind of transport this configuration selects
    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Smtp(_) => TransportKind::Smtp,
            Self::ApiRelay(_) => TransportKind::ApiRelay,
            Self::DryRun => TransportKind::DryRun,
        }
    }
}

/// The process-wide email transport
#[derive(Debug)]
pub enum Transport {
    /// Direct SMTP submission
    Smtp(SmtpMailer),

    /// Third-party transactional email API
    ApiRelay(ResendMailer),

    /// Nothing configured
    DryRun(DryRunMailer),
}

impl Transport {
    /// Builds the transport selected by `config`.
    pub fn new(config: TransportConfig) -> Result<Self, MailerError> {
        let transport = match config {
            TransportConfig::Smtp(config) => Self::Smtp(SmtpMailer::new(config)?),
            TransportConfig::ApiRelay(config) => Self::ApiRelay(ResendMailer::new(config)?),
            TransportConfig::DryRun => Self::DryRun(DryRunMailer),
        };

        info!(transport = %transport.kind(), "email transport ready");

        Ok(transport)
    }
}

#[async_trait]
impl Mailer for Transport {
    fn kind(&self) -> TransportKind {
        match self {
            Self::Smtp(mailer) => mailer.kind(),
            Self::ApiRelay(mailer) => mailer.kind(),
            Self::DryRun(mailer) => mailer.kind(),
        }
    }

    async fn send_email(&self, email: &Email) -> Result<Delivery, MailerError> {
        match self {
            Self::Smtp(mailer) => mailer.send_email(email).await,
            Self::ApiRelay(mailer) => mailer.send_email(email).await,
            Self::DryRun(mailer) => mailer.send_email(email).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn smtp_config() -> EmailConfig {
        EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 587,
            smtp_user: Some("mailer@example.com".to_string()),
            smtp_password: Some("secret".to_string()),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn test_nothing_configured_selects_dry_run() {
        assert_eq!(
            TransportConfig::select(&EmailConfig::default()),
            TransportConfig::DryRun
        );
    }

    #[test]
    fn test_smtp_selected_when_fully_configured() {
        let selected = TransportConfig::select(&smtp_config());

        assert_eq!(
            selected,
            TransportConfig::Smtp(SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "mailer@example.com".to_string(),
                password: "secret".to_string(),
                sender: "mailer@example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_smtp_takes_priority_over_api_relay() {
        let config = EmailConfig {
            resend_api_key: Some("re_key".to_string()),
            ..smtp_config()
        };

        assert_eq!(TransportConfig::select(&config).kind(), TransportKind::Smtp);
    }

    #[test]
    fn test_partial_smtp_falls_back_to_api_relay() {
        let config = EmailConfig {
            smtp_password: Some("  ".to_string()),
            resend_api_key: Some("re_key".to_string()),
            resend_api_url: "https://api.resend.com".to_string(),
            resend_from: "Portfolio <onboarding@resend.dev>".to_string(),
            ..smtp_config()
        };

        assert_eq!(
            TransportConfig::select(&config),
            TransportConfig::ApiRelay(ResendConfig {
                api_key: "re_key".to_string(),
                api_url: "https://api.resend.com".to_string(),
                sender: "Portfolio <onboarding@resend.dev>".to_string(),
            })
        );
    }

    #[test]
    fn test_explicit_sender_overrides_smtp_user() {
        let config = EmailConfig {
            smtp_from: Some("Portfolio <hello@example.com>".to_string()),
            ..smtp_config()
        };

        let TransportConfig::Smtp(smtp) = TransportConfig::select(&config) else {
            panic!("expected SMTP to be selected");
        };

        assert_eq!(smtp.sender, "Portfolio <hello@example.com>");
    }

    #[tokio::test]
    async fn test_dry_run_transport_reports_skipped() -> TestResult {
        let transport = Transport::new(TransportConfig::DryRun)?;

        let email = Email {
            to: crate::domain::communication::email_addresses::EmailAddress::new("owner@example.com")?,
            subject: "Portfolio Contact: Hello".to_string(),
            html: "<p>Hello</p>".to_string(),
            plain: "Hello".to_string(),
            reply_to: None,
        };

        assert_eq!(transport.kind(), TransportKind::DryRun);
        assert_eq!(transport.send_email(&email).await?, Delivery::Skipped);

        Ok(())
    }
}
