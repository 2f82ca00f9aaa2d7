pub mod bitable;
pub mod config;
pub mod error;
pub mod form;
pub mod routes;
pub mod state;
pub mod submission;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::bitable::{FeishuBitable, RecordStore};
use crate::config::Config;
use crate::state::{AppState, SharedState};

/// Build the application against the Feishu Bitable named in `config`.
pub fn build_app(config: Config) -> Result<Router, String> {
    let store = FeishuBitable::new(
        config.feishu.clone(),
        config.proxy_url.clone(),
        config.timeouts,
    )?;

    match config.proxy_url.as_deref() {
        Some(proxy) => tracing::info!("Outbound Bitable calls go through proxy {proxy}"),
        None => tracing::info!("Outbound Bitable calls go direct"),
    }
    if !config.enforce_limits {
        tracing::warn!("Server-side submission limits are disabled");
    }

    Ok(build_app_with_store(config, Arc::new(store)))
}

pub fn build_app_with_store(config: Config, store: Arc<dyn RecordStore>) -> Router {
    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState { config, store });

    Router::new()
        .merge(routes::api_routes(max_body_size))
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
