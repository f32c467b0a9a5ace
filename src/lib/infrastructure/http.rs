//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::Context;
use axum::{extract::Request, Router};
use axum_server::Handle;
use clap::Parser;
use handlers::{api, panic_handler};
use state::AppState;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer,
};
use tracing::{debug, info, info_span};

use crate::domain::contact::ContactService;

pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod rate_limit;
pub mod security;
pub mod state;
pub mod static_files;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub fn new<C: ContactService>(
        state: AppState<C>,
        config: &HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state)?;

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.port))?;
        listener
            .set_nonblocking(true)
            .context("failed to configure listener")?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until a shutdown signal arrives.
    #[mutants::skip]
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "server running on {}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(
                self.router
                    .into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .context("server error")?;

        Ok(())
    }
}

/// Create the application's router
pub fn router<C: ContactService>(state: AppState<C>) -> anyhow::Result<Router> {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    let config = state.config.clone();

    let router = Router::new()
        .nest("/api", api::router::<C>(&config.rate_limits))
        .nest("/projects", static_files::router(&config))
        .merge(static_files::router(&config))
        .layer(CatchPanicLayer::custom(panic_handler));

    let router = security::apply(router, &config.security)?
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .with_state(state);

    Ok(router)
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    debug!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
