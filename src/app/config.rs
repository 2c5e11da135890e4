use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{API_KEY_ENV, DEFAULT_ENDPOINT, FALLBACK_API_KEY_ENV, HTTP_REQUEST_TIMEOUT_SECS};
use crate::models::SessionConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key; prefer the DEEPCHAT_API_KEY environment variable over storing it here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the completion API
    pub endpoint: String,
    /// Consume replies as a server-sent event stream
    pub stream: bool,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            stream: false,
            request_timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Color theme ("dark" or "light")
    pub theme: String,
    /// Show the greeting when a session starts
    pub show_greeting: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            show_greeting: true,
        }
    }
}

impl Config {
    /// API key from config, then DEEPCHAT_API_KEY, then DEEPSEEK_API_KEY
    pub fn resolve_credential(&self) -> Option<String> {
        self.api
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .or_else(|| std::env::var(FALLBACK_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Settings handed to a conversation session
    pub fn session_config(&self) -> Result<SessionConfig> {
        let credential = self.resolve_credential().with_context(|| {
            format!(
                "No API key configured. Set {} or api.api_key in {}",
                API_KEY_ENV,
                global_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string())
            )
        })?;

        Ok(SessionConfig::new(credential, self.api.endpoint.clone()).with_stream(self.api.stream))
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".deepchat/config.toml");
    load_config_from(&[global_config, local_config])
}

/// Layer defaults, the given TOML files (later wins) and `DEEPCHAT_` variables
pub fn load_config_from(files: &[PathBuf]) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // DEEPCHAT_API__ENDPOINT -> api.endpoint
    figment = figment.merge(Env::prefixed("DEEPCHAT_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Load an explicit config file on top of the defaults
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    load_config_from(&[path.to_path_buf()])
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "deepchat") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("deepchat");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

pub fn global_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => global_config_path()?,
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = global_config_path()?;

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    } else {
        println!("Configuration already exists at: {}", config_file.display());
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "https://api.deepseek.com/v1");
        assert!(!config.api.stream);
        assert!(config.api.api_key.is_none());
        assert_eq!(config.ui.theme, "dark");
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        std::fs::write(
            &global,
            "[api]\nendpoint = \"https://global.test/v1\"\nstream = true\n",
        )
        .unwrap();
        std::fs::write(&local, "[api]\nendpoint = \"http://localhost:8000\"\n").unwrap();

        let config = load_config_from(&[global, local]).unwrap();

        assert_eq!(config.api.endpoint, "http://localhost:8000");
        assert!(config.api.stream);
        assert_eq!(config.api.request_timeout_secs, HTTP_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&[dir.path().join("absent.toml")]).unwrap();
        assert_eq!(config.ui.theme, "dark");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_file(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_session_config_uses_configured_key() {
        let mut config = Config::default();
        config.api.api_key = Some("sk-from-file".to_string());
        config.api.stream = true;

        let session = config.session_config().unwrap();
        assert_eq!(session.credential, "sk-from-file");
        assert_eq!(session.endpoint, DEFAULT_ENDPOINT);
        assert!(session.stream);
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.ui.theme = "light".to_string();

        save_config(&config, Some(path.clone())).unwrap();
        let loaded = load_config_from(&[path]).unwrap();
        assert_eq!(loaded.ui.theme, "light");
    }
}
