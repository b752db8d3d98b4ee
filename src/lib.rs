pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod auth;
pub mod models;
pub mod middleware;
pub mod workflow;
pub mod format;
pub mod export;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::ApiClient;
use crate::config::Config;
use crate::format::Clock;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> Router {
    let api = ApiClient::new(&config.api_base_url, config.api_timeout);
    let clock = Clock::new(config.utc_offset_hours);
    tracing::info!(backend = api.base_url(), "Using Aspirasi backend");

    let state: SharedState = Arc::new(AppState { config, api, clock });

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(views::UPLOAD_LIMIT))
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
        ));

    Router::new()
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(middleware)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
