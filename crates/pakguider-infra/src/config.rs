//! Configuration loader for PakGuider.
//!
//! Layers, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. `pakguider.toml` (explicit `--config` path, the working directory, or
//!    the platform config directory)
//! 3. Environment variables
//!
//! A missing or malformed file logs and falls back to defaults; loading
//! never fails.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use pakguider_types::config::{AppSettings, ChatSettings, SearchSettings, ServerSettings};

/// File name looked up when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "pakguider.toml";

/// Placeholder used when no Mistral key is configured anywhere.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key";

/// Fully resolved configuration: settings plus credentials.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub settings: AppSettings,
    pub credentials: Credentials,
    /// The file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

/// Secrets needed to reach the providers.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub password: Option<SecretString>,
    pub snowflake_token: Option<SecretString>,
    pub mistral_api_key: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            password: None,
            snowflake_token: None,
            mistral_api_key: SecretString::from(PLACEHOLDER_API_KEY),
        }
    }
}

/// On-disk layout of `pakguider.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    search: SearchSettings,
    #[serde(default)]
    chat: ChatSettings,
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    fail_fast: bool,
    #[serde(default)]
    credentials: FileCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct FileCredentials {
    password: Option<String>,
    snowflake_token: Option<String>,
    mistral_api_key: Option<String>,
}

impl From<ConfigFile> for AppConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = Credentials::default();
        Self {
            settings: AppSettings {
                search: file.search,
                chat: file.chat,
                server: file.server,
                fail_fast: file.fail_fast,
            },
            credentials: Credentials {
                password: file.credentials.password.map(SecretString::from),
                snowflake_token: file.credentials.snowflake_token.map(SecretString::from),
                mistral_api_key: file
                    .credentials
                    .mistral_api_key
                    .map(SecretString::from)
                    .unwrap_or(defaults.mistral_api_key),
            },
            source: None,
        }
    }
}

/// Pick the config file to read.
///
/// An explicit path is always returned, even if it does not exist, so the
/// loader can warn about it. Otherwise the working directory is checked,
/// then `{config_dir}/pakguider/pakguider.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("pakguider").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Read and parse one config file.
///
/// - Missing file: debug log, defaults (warn instead when `explicit`).
/// - Unreadable or malformed file: warn, defaults.
pub async fn load_config_file(path: &Path, explicit: bool) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if explicit {
                tracing::warn!("Config file {} not found, using defaults", path.display());
            } else {
                tracing::debug!("No config file at {}, using defaults", path.display());
            }
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut config = AppConfig::from(file);
            config.source = Some(path.to_path_buf());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so tests can supply a fixed map.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let search = &mut config.settings.search;
    if let Some(v) = get("ACCOUNT") {
        search.account = Some(v);
    }
    if let Some(v) = get("USER") {
        search.user = Some(v);
    }
    if let Some(v) = get("ROLE") {
        search.role = v;
    }
    if let Some(v) = get("DATABASE") {
        search.database = v;
    }
    if let Some(v) = get("SCHEMA") {
        search.schema = v;
    }
    if let Some(v) = get("WAREHOUSE") {
        search.warehouse = v;
    }
    if let Some(v) = get("SEARCH_SERVICE") {
        search.service = v;
    }
    if let Some(v) = get("SNOWFLAKE_BASE_URL") {
        search.base_url = Some(v);
    }

    let chat = &mut config.settings.chat;
    if let Some(v) = get("MISTRAL_MODEL") {
        chat.model = v;
    }
    if let Some(v) = get("MISTRAL_BASE_URL") {
        chat.base_url = v;
    }

    if let Some(v) = get("PAKGUIDER_FAIL_FAST") {
        match parse_bool(&v) {
            Some(flag) => config.settings.fail_fast = flag,
            None => tracing::warn!("Ignoring PAKGUIDER_FAIL_FAST='{v}': expected true or false"),
        }
    }

    let creds = &mut config.credentials;
    if let Some(v) = get("PASSWORD") {
        creds.password = Some(SecretString::from(v));
    }
    if let Some(v) = get("SNOWFLAKE_TOKEN") {
        creds.snowflake_token = Some(SecretString::from(v));
    }
    if let Some(v) = get("MISTRAL_API_KEY") {
        creds.mistral_api_key = SecretString::from(v);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load the full configuration: defaults, file, then process environment.
pub async fn load_config(explicit: Option<&Path>) -> AppConfig {
    let mut config = match resolve_config_path(explicit) {
        Some(path) => load_config_file(&path, explicit.is_some()).await,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}
