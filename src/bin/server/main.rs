#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Portfolio API server

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_api::{
    domain::{
        communication::email_addresses::EmailAddress, contact::ContactServiceImpl,
        portfolio::Portfolio,
    },
    infrastructure::{
        email::{EmailConfig, Transport, TransportConfig},
        http::{state::AppConfig, state::AppState, HttpServer, HttpServerConfig},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// Static files, CORS and rate limits
    #[clap(flatten)]
    pub app: AppConfig,

    /// Email transport configuration
    #[clap(flatten)]
    pub email: EmailConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let notification_address = EmailAddress::new(&args.email.notification_email)
        .context("EMAIL_TO must be a valid email address")?;

    let transport = Transport::new(TransportConfig::select(&args.email))
        .context("failed to set up the email transport")?;

    let portfolio = Portfolio::profile();
    let owner = portfolio.site_owner(notification_address);

    let state = AppState::new(
        args.app,
        ContactServiceImpl::new(Arc::new(transport), owner),
        portfolio,
    );

    HttpServer::new(state, &args.server)?.run().await
}
