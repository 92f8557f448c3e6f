use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::Endpoint;

/// The JSON file that holds the endpoint list between runs.
#[derive(Debug, Clone)]
pub struct BackingFile {
    path: PathBuf,
}

impl BackingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted endpoints. A missing or unparsable file yields an empty list.
    pub async fn load(&self) -> Vec<Endpoint> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Endpoint>>(&content) {
            Ok(endpoints) => {
                tracing::info!(
                    "Loaded {} endpoints from {}",
                    endpoints.len(),
                    self.path.display()
                );
                endpoints
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Rewrite the whole file with `endpoints`, via a temp file and rename.
    pub async fn save(&self, endpoints: &[Endpoint]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(endpoints)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("endpoints.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
