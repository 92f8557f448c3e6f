use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{null_as_default, LogEntry};

/// A registered mock: requests to `url` with `method` get `response_body` back.
///
/// The persisted JSON keeps the field names the management UI reads, so
/// `url` is the request path and `headers` are the response headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

/// Payload accepted by `/api/save`. A known `id` updates that endpoint,
/// anything else creates a new one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_body: String,
}

impl EndpointDraft {
    pub fn new(method: &str, url: &str, response_body: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            response_body: response_body.to_string(),
            ..Self::default()
        }
    }

    /// Prefix the path with `/` when the caller left it off.
    pub fn normalize_url(&mut self) {
        if !self.url.starts_with('/') {
            self.url.insert(0, '/');
        }
    }
}

impl Endpoint {
    /// Overwrite the user-editable fields, keeping identity, timestamps and log.
    pub(crate) fn apply(&mut self, draft: EndpointDraft) {
        self.name = draft.name;
        self.method = draft.method;
        self.url = draft.url;
        self.headers = draft.headers;
        self.response_body = draft.response_body;
    }
}
