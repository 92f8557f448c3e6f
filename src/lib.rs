pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod views;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::store::EndpointStore;

pub fn build_app(store: EndpointStore, config: Config) -> Router {
    let max_body_size = config.max_body_size;
    let static_dir = config.static_dir.clone();

    let state: SharedState = Arc::new(AppState { config, store });

    // Mock responses carry their headers verbatim, so only management
    // responses get the extra header.
    let management = routes::management_routes().layer(SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    ));

    Router::new()
        .merge(management)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::dispatch::dispatch)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}
