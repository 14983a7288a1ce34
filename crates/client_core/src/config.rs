use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "toolroom.toml";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// `{backend_url}/api`, after checking the url is absolute http(s).
    pub fn api_base(&self) -> Result<String, ConfigError> {
        let trimmed = self.backend_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBackendUrl {
            url: self.backend_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBackendUrl {
                url: self.backend_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(format!("{trimmed}/api"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Values that outrank the config file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub backend_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(overrides: &ConfigOverrides) -> Result<Settings, ConfigError> {
    load_settings_with_env(overrides, |name| std::env::var(name).ok())
}

/// Layering: defaults, config file, environment, explicit overrides.
pub fn load_settings_with_env(
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(file_cfg) = read_file_settings(overrides.config_path.as_deref())? {
        if let Some(v) = file_cfg.backend_url {
            settings.backend_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = read_non_empty(&env, "REACT_APP_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = read_non_empty(&env, "BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = read_non_empty(&env, "TOOLROOM_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout(v.clone()))?;
    }

    if let Some(v) = overrides.backend_url.as_deref() {
        if !v.trim().is_empty() {
            settings.backend_url = v.to_string();
        }
    }

    if settings.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout("0".to_string()));
    }
    settings.api_base()?;

    tracing::debug!(
        backend_url = %settings.backend_url,
        timeout_secs = settings.request_timeout_secs,
        "resolved client settings"
    );
    Ok(settings)
}

fn read_non_empty(env: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    env(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// An explicit path must exist; the fallback locations are optional.
fn read_file_settings(explicit: Option<&Path>) -> Result<Option<FileSettings>, ConfigError> {
    if let Some(path) = explicit {
        return parse_file(path).map(Some);
    }

    for candidate in default_config_paths() {
        if candidate.is_file() {
            return parse_file(&candidate).map(Some);
        }
    }
    Ok(None)
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("toolroom").join("config.toml"));
    }
    paths
}

fn parse_file(path: &Path) -> Result<FileSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
