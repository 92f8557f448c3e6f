use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use mock_api_server::config::Config;
use mock_api_server::store::{BackingFile, EndpointStore};

/// A running test server backed by its own temporary data file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub data_file: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Save an endpoint, return the stored endpoint JSON.
    pub async fn save(&self, endpoint: &Value) -> Value {
        let (body, status) = self.post("/api/save", endpoint).await;
        assert_eq!(status, StatusCode::OK, "save failed: {body}");
        assert_eq!(body["success"], json!(true));
        body["api"].clone()
    }

    /// Create a GET endpoint at `url` answering with `response_body`.
    pub async fn create_endpoint(&self, method: &str, url: &str, response_body: &str) -> Value {
        self.save(&json!({
            "name": format!("{method} {url}"),
            "method": method,
            "url": url,
            "headers": {},
            "responseBody": response_body,
        }))
        .await
    }

    pub async fn list(&self) -> Vec<Value> {
        let resp = self
            .client
            .get(self.url("/api/list"))
            .send()
            .await
            .expect("list request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    pub async fn logs(&self, id: &str) -> Vec<Value> {
        let resp = self
            .client
            .get(self.url(&format!("/api/logs?id={id}")))
            .send()
            .await
            .expect("logs request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    /// POST a JSON body, return (body, status).
    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Contents of the backing file as JSON.
    pub fn persisted(&self) -> Value {
        let content = std::fs::read(&self.data_file).expect("data file missing");
        serde_json::from_slice(&content).expect("data file is not JSON")
    }
}

pub fn test_config(data_file: PathBuf, static_dir: PathBuf) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        data_file,
        static_dir,
        max_body_size: 64 * 1024,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app with an empty data file.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_data(None).await
}

/// Spawn a test app whose data file starts with `seed` verbatim.
pub async fn spawn_app_with_data(seed: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_file = dir.path().join("data").join("mock_apis.json");
    let static_dir = dir.path().join("static");

    if let Some(seed) = seed {
        std::fs::create_dir_all(data_file.parent().unwrap()).unwrap();
        std::fs::write(&data_file, seed).unwrap();
    }

    let store = EndpointStore::open(BackingFile::new(data_file.clone())).await;
    let app = mock_api_server::build_app(store, test_config(data_file.clone(), static_dir));

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        data_file,
        _dir: dir,
    }
}
