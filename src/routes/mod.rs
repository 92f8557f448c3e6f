pub mod dispatch;
pub mod endpoints;
pub mod extract;

use axum::routing::{any, post};
use axum::Router;

use crate::state::SharedState;

pub fn management_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/list", any(endpoints::list))
        .route(
            "/api/save",
            post(endpoints::save).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/api/delete",
            post(endpoints::delete).fallback(endpoints::method_not_allowed),
        )
        .route("/api/logs", any(endpoints::logs))
        .route(
            "/api/clear-logs",
            post(endpoints::clear_logs).fallback(endpoints::method_not_allowed),
        )
        .route(
            "/api/reorder",
            post(endpoints::reorder).fallback(endpoints::method_not_allowed),
        )
}
