//! Application state module

use std::{fmt, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{
    domain::{contact::ContactService, portfolio::Portfolio},
    infrastructure::http::{rate_limit::RateLimitConfig, security::SecurityConfig},
};

/// Application configuration
#[derive(Clone, Debug, Parser)]
pub struct AppConfig {
    /// Directory holding the built front-end
    #[arg(long, env = "STATIC_DIR", default_value = "dist")]
    pub static_dir: PathBuf,

    /// Directory holding downloadable artifacts
    #[arg(long, env = "APK_DIR", default_value = "Android app")]
    pub apk_dir: PathBuf,

    /// CORS and content-security-policy settings
    #[clap(flatten)]
    pub security: SecurityConfig,

    /// Rate limiting tiers
    #[clap(flatten)]
    pub rate_limits: RateLimitConfig,
}

/// Global application state
#[derive(Clone)]
pub struct AppState<C: ContactService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: Arc<AppConfig>,

    /// Contact intake service
    pub contact: Arc<C>,

    /// The site owner's profile
    pub portfolio: Arc<Portfolio>,
}

/// Implementation of the application state
impl<C: ContactService> AppState<C> {
    /// Create a new application state
    pub fn new(config: AppConfig, contact: C, portfolio: Portfolio) -> Self {
        Self {
            start_time: Utc::now(),
            config: Arc::new(config),
            contact: Arc::new(contact),
            portfolio: Arc::new(portfolio),
        }
    }
}

impl<C: ContactService> fmt::Debug for AppState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("contact", &"ContactService")
            .finish()
    }
}
