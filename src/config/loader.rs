use std::path::{Path, PathBuf};

use crate::error::AdminError;

use super::types::ClientConfig;

/// Environment variable holding a base URL that overrides everything else.
pub const BASE_URL_ENV: &str = "MOCKADMIN_BASE_URL";

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "MOCKADMIN_CONFIG";

/// Load a single JSON config file.
pub fn load_config_file(path: &Path) -> Result<ClientConfig, AdminError> {
    let content = std::fs::read_to_string(path).map_err(|e| AdminError::Config {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {}", e),
    })?;

    serde_json::from_str::<ClientConfig>(&content).map_err(|e| AdminError::Config {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {}", e),
    })
}

/// Resolve the client configuration.
///
/// Precedence:
/// 1. `path` argument
/// 2. `MOCKADMIN_BASE_URL` env var
/// 3. file named by `MOCKADMIN_CONFIG`
/// 4. built-in default (`http://localhost:8080`)
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, AdminError> {
    if let Some(path) = path {
        return load_config_file(path);
    }
    resolve(
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(CONFIG_ENV).ok().map(PathBuf::from),
    )
}

fn resolve(
    base_url: Option<String>,
    config_file: Option<PathBuf>,
) -> Result<ClientConfig, AdminError> {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        return Ok(ClientConfig::new(url.trim()));
    }
    match config_file {
        Some(path) => load_config_file(&path),
        None => Ok(ClientConfig::default()),
    }
}

impl ClientConfig {
    /// Configuration from `MOCKADMIN_BASE_URL` / `MOCKADMIN_CONFIG`, else the default.
    pub fn from_env() -> Result<Self, AdminError> {
        load_config(None)
    }

    pub fn load(path: &Path) -> Result<Self, AdminError> {
        load_config_file(path)
    }
}
