pub mod backing;

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{now_timestamp, Endpoint, EndpointDraft, LogEntry};

pub use backing::BackingFile;

/// Entries kept per endpoint log; older ones are dropped first.
pub const MAX_LOG_ENTRIES: usize = 100;

/// The authoritative, ordered list of mock endpoints.
///
/// Reads share the lock; every mutation holds it exclusively and rewrites the
/// backing file before releasing it. A failed write is logged and the
/// in-memory list stays ahead of disk until the next successful one.
pub struct EndpointStore {
    endpoints: RwLock<Vec<Endpoint>>,
    backing: BackingFile,
}

impl EndpointStore {
    /// Load the list from `backing`, starting empty if it can't be read.
    pub async fn open(backing: BackingFile) -> Self {
        let endpoints = backing.load().await;
        Self {
            endpoints: RwLock::new(endpoints),
            backing,
        }
    }

    pub async fn list(&self) -> Vec<Endpoint> {
        self.endpoints.read().await.clone()
    }

    /// Update the endpoint with the draft's id in place, or create a new one at the front.
    pub async fn upsert(&self, draft: EndpointDraft) -> Endpoint {
        let mut endpoints = self.endpoints.write().await;
        let now = now_timestamp();

        let existing = draft
            .id
            .as_deref()
            .and_then(|id| endpoints.iter().position(|e| e.id == id));

        let stored = match existing {
            Some(pos) => {
                let endpoint = &mut endpoints[pos];
                endpoint.apply(draft);
                endpoint.updated_at = now;
                tracing::info!(
                    "Updated endpoint {} ({} {})",
                    endpoint.name,
                    endpoint.method,
                    endpoint.url
                );
                endpoint.clone()
            }
            None => {
                let endpoint = Endpoint {
                    id: fresh_id(&endpoints),
                    name: draft.name,
                    method: draft.method,
                    url: draft.url,
                    headers: draft.headers,
                    response_body: draft.response_body,
                    logs: Vec::new(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                tracing::info!(
                    "Created endpoint {} ({} {})",
                    endpoint.name,
                    endpoint.method,
                    endpoint.url
                );
                endpoints.insert(0, endpoint.clone());
                endpoint
            }
        };

        self.persist(&endpoints).await;
        stored
    }

    /// Remove the endpoint with `id`. Unknown ids are a successful no-op.
    pub async fn delete(&self, id: &str) -> bool {
        let mut endpoints = self.endpoints.write().await;

        if let Some(pos) = endpoints.iter().position(|e| e.id == id) {
            let removed = endpoints.remove(pos);
            tracing::info!("Deleted endpoint {} ({})", removed.name, removed.url);
        }

        self.persist(&endpoints).await;
        true
    }

    /// Move the listed ids to the front in the given order; unlisted endpoints
    /// follow in their previous relative order. Unknown ids are ignored.
    pub async fn reorder(&self, ids: &[String]) -> bool {
        let mut endpoints = self.endpoints.write().await;

        let mut slots: Vec<Option<Endpoint>> = endpoints.drain(..).map(Some).collect();
        let index: HashMap<String, usize> = slots
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(i, e)| e.as_ref().map(|e| (e.id.clone(), i)))
            .collect();

        let mut reordered = Vec::with_capacity(slots.len());
        for id in ids {
            if let Some(endpoint) = index.get(id).and_then(|&i| slots[i].take()) {
                reordered.push(endpoint);
            }
        }
        reordered.extend(slots.into_iter().flatten());
        *endpoints = reordered;

        tracing::info!("Reordered {} endpoints", endpoints.len());
        self.persist(&endpoints).await;
        true
    }

    /// Record a request against `id`, keeping only the newest [`MAX_LOG_ENTRIES`].
    pub async fn append_log(&self, id: &str, entry: LogEntry) {
        let mut endpoints = self.endpoints.write().await;

        let Some(endpoint) = endpoints.iter_mut().find(|e| e.id == id) else {
            return;
        };

        endpoint.logs.push(entry);
        if endpoint.logs.len() > MAX_LOG_ENTRIES {
            let excess = endpoint.logs.len() - MAX_LOG_ENTRIES;
            endpoint.logs.drain(..excess);
        }

        self.persist(&endpoints).await;
    }

    pub async fn clear_log(&self, id: &str) {
        let mut endpoints = self.endpoints.write().await;

        if let Some(endpoint) = endpoints.iter_mut().find(|e| e.id == id) {
            endpoint.logs.clear();
            tracing::info!("Cleared logs for {}", endpoint.name);
        }

        self.persist(&endpoints).await;
    }

    /// Logs for `id`, or an empty list when no such endpoint exists.
    pub async fn logs(&self, id: &str) -> Vec<LogEntry> {
        self.endpoints
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.logs.clone())
            .unwrap_or_default()
    }

    /// First endpoint in list order whose path equals `path`.
    pub async fn find_by_path(&self, path: &str) -> Option<Endpoint> {
        self.endpoints
            .read()
            .await
            .iter()
            .find(|e| e.url == path)
            .cloned()
    }

    async fn persist(&self, endpoints: &[Endpoint]) {
        if let Err(e) = self.backing.save(endpoints).await {
            tracing::error!("Failed to save {}: {e}", self.backing.path().display());
        }
    }
}

fn fresh_id(endpoints: &[Endpoint]) -> String {
    loop {
        let id = Uuid::now_v7().to_string();
        if !endpoints.iter().any(|e| e.id == id) {
            return id;
        }
    }
}
