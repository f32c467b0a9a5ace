//! CORS policy and security response headers

use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use clap::Parser;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

/// Headers added to every response unless a handler set them already
const STATIC_HEADERS: [(HeaderName, &str); 7] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=15552000; includeSubDomains",
    ),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        "none",
    ),
];

/// Cross-origin and content-security-policy settings
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SecurityConfig {
    /// Origins allowed to call the API from a browser
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "https://subash-s-66.github.io",
            "https://subash-portfolio.zeabur.app",
        ]
    )]
    pub cors_origins: Vec<String>,

    /// Extra origins stylesheets may be loaded from
    #[arg(
        long,
        env = "CSP_STYLE_SOURCES",
        value_delimiter = ',',
        default_values = [
            "https://subash-portfolio.zeabur.app",
            "https://subash-s-66.github.io",
        ]
    )]
    pub csp_style_sources: Vec<String>,

    /// Extra origins scripts may connect to
    #[arg(
        long,
        env = "CSP_CONNECT_SOURCES",
        value_delimiter = ',',
        default_values = ["https://subash-portfolio.zeabur.app"]
    )]
    pub csp_connect_sources: Vec<String>,
}

impl SecurityConfig {
    /// Build the `Content-Security-Policy` header value
    pub fn content_security_policy(&self) -> String {
        let styles = sources(&self.csp_style_sources);
        let connect = sources(&self.csp_connect_sources);

        [
            "default-src 'self'".to_string(),
            format!("style-src 'self' 'unsafe-inline' https://fonts.googleapis.com{styles}"),
            format!("style-src-elem 'self' https://fonts.googleapis.com{styles}"),
            "script-src 'self' 'unsafe-inline' 'unsafe-eval'".to_string(),
            "img-src 'self' data: https:".to_string(),
            format!("connect-src 'self'{connect}"),
            "font-src 'self' https://fonts.gstatic.com".to_string(),
            "object-src 'none'".to_string(),
            "media-src 'self'".to_string(),
            "frame-src 'none'".to_string(),
        ]
        .join("; ")
    }

    fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let origins = self
            .cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("invalid CORS origin: {origin}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-requested-with"),
            ]))
    }
}

/// Join configured origins into a space-prefixed source list
fn sources(origins: &[String]) -> String {
    origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .fold(String::new(), |mut list, origin| {
            list.push(' ');
            list.push_str(origin);
            list
        })
}

/// Wrap `router` in the CORS policy and security headers
pub fn apply<S>(router: Router<S>, config: &SecurityConfig) -> anyhow::Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let csp = HeaderValue::from_str(&config.content_security_policy())
        .context("invalid content security policy")?;

    let router = STATIC_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                name,
                HeaderValue::from_static(value),
            ))
        })
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(config.cors_layer()?);

    Ok(router)
}
