use axum::extract::{Query, State};
use axum::http::Method;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::models::{Endpoint, EndpointDraft, LogEntry};
use crate::routes::extract::JsonBody;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct IdRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

pub async fn list(State(state): State<SharedState>) -> Json<Vec<Endpoint>> {
    Json(state.store.list().await)
}

pub async fn save(
    State(state): State<SharedState>,
    JsonBody(mut draft): JsonBody<EndpointDraft>,
) -> Json<Value> {
    draft.normalize_url();
    let api = state.store.upsert(draft).await;
    Json(json!({ "success": true, "api": api }))
}

pub async fn delete(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> Json<Value> {
    let success = state.store.delete(&req.id).await;
    Json(json!({ "success": success }))
}

pub async fn logs(
    State(state): State<SharedState>,
    Query(req): Query<IdRequest>,
) -> Json<Vec<LogEntry>> {
    Json(state.store.logs(&req.id).await)
}

pub async fn clear_logs(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<IdRequest>,
) -> Json<Value> {
    state.store.clear_log(&req.id).await;
    Json(json!({ "success": true }))
}

pub async fn reorder(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> Json<Value> {
    let success = state.store.reorder(&req.ids).await;
    Json(json!({ "success": success }))
}

/// Method fallback for management routes, so the 405 carries a JSON body.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(format!("Method {method} not allowed"))
}
