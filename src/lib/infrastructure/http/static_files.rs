//! Built front-end and download artifacts

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use super::state::AppConfig;

/// Serve the single-page app with an `index.html` fallback and artifacts under `/apk`
pub fn router<S>(config: &AppConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let index = config.static_dir.join("index.html");

    Router::new()
        .nest_service("/apk", ServeDir::new(&config.apk_dir))
        .fallback_service(ServeDir::new(&config.static_dir).fallback(ServeFile::new(index)))
}
