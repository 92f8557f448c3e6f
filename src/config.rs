use std::net::IpAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "mock-api-server";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let base = base_dir();

        let host: IpAddr = env_or("MOCK_API_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid MOCK_API_HOST: {e}"))?;

        let port: u16 = env_or("PORT", "8344")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let data_file = std::env::var("MOCK_API_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base.join("data").join("mock_apis.json"));

        let static_dir = std::env::var("MOCK_API_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base.join("static"));

        let max_body_size: usize = env_or("MOCK_API_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid MOCK_API_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("MOCK_API_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            data_file,
            static_dir,
            max_body_size,
            log_level,
        })
    }
}

/// Directory of the running executable, with symlinks resolved.
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .and_then(|exe| exe.canonicalize())
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
