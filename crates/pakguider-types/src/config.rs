//! Non-secret settings for PakGuider.
//!
//! `AppSettings` mirrors the `pakguider.toml` layout. Every field has a
//! default so an empty or partial file still deserializes. Credentials are
//! not part of these types; they are held separately by the infra loader.

use serde::{Deserialize, Serialize};

use crate::search::{DEFAULT_RESULT_LIMIT, SearchServiceRef};

pub const DEFAULT_ROLE: &str = "ACCOUNTADMIN";
pub const DEFAULT_DATABASE: &str = "MEDICALCHATBOT";
pub const DEFAULT_SCHEMA: &str = "PUBLIC";
pub const DEFAULT_WAREHOUSE: &str = "COMPUTE_WH";
pub const DEFAULT_SEARCH_SERVICE: &str = "CC_SEARCH_SERVICE_CS";

pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub server: ServerSettings,

    /// Abort startup when a provider fails its connectivity probe.
    #[serde(default)]
    pub fail_fast: bool,
}

/// Where and how to query the document-search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default = "default_role")]
    pub role: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_warehouse")]
    pub warehouse: String,

    #[serde(default = "default_service")]
    pub service: String,

    /// Endpoint override. Derived from `account` when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_warehouse() -> String {
    DEFAULT_WAREHOUSE.to_string()
}

fn default_service() -> String {
    DEFAULT_SEARCH_SERVICE.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_RESULT_LIMIT
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            account: None,
            user: None,
            role: default_role(),
            database: default_database(),
            schema: default_schema(),
            warehouse: default_warehouse(),
            service: default_service(),
            base_url: None,
            limit: default_limit(),
        }
    }
}

impl SearchSettings {
    pub fn service_ref(&self) -> SearchServiceRef {
        SearchServiceRef {
            database: self.database.clone(),
            schema: self.schema.clone(),
            service: self.service.clone(),
        }
    }

    /// The configured endpoint, or `https://{account}.snowflakecomputing.com`.
    ///
    /// `None` when neither a base URL nor an account is set.
    pub fn resolved_base_url(&self) -> Option<String> {
        if let Some(url) = &self.base_url {
            return Some(url.trim_end_matches('/').to_string());
        }
        self.account
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| format!("https://{}.snowflakecomputing.com", a.to_lowercase()))
    }
}

/// Chat-completion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_mistral_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_safe_prompt")]
    pub safe_prompt: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_mistral_base_url() -> String {
    DEFAULT_MISTRAL_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_safe_prompt() -> bool {
    true
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_mistral_base_url(),
            max_tokens: default_max_tokens(),
            safe_prompt: default_safe_prompt(),
        }
    }
}

/// Web server bind address and session housekeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Web sessions untouched for this many seconds are dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_session_idle_secs() -> u64 {
    DEFAULT_SESSION_IDLE_SECS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.search.role, "ACCOUNTADMIN");
        assert_eq!(settings.search.database, "MEDICALCHATBOT");
        assert_eq!(settings.search.schema, "PUBLIC");
        assert_eq!(settings.search.warehouse, "COMPUTE_WH");
        assert_eq!(settings.search.service, "CC_SEARCH_SERVICE_CS");
        assert_eq!(settings.search.limit, 20);
        assert_eq!(settings.chat.model, "mistral-large-latest");
        assert_eq!(settings.chat.max_tokens, 1000);
        assert!(settings.chat.safe_prompt);
        assert!(!settings.fail_fast);
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let settings: AppSettings = toml::from_str("").unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let toml_str = r#"
fail_fast = true

[search]
account = "xy12345"
database = "TOURISM"

[chat]
model = "mistral-small-latest"
"#;
        let settings: AppSettings = toml::from_str(toml_str).unwrap();
        assert!(settings.fail_fast);
        assert_eq!(settings.search.account.as_deref(), Some("xy12345"));
        assert_eq!(settings.search.database, "TOURISM");
        assert_eq!(settings.search.schema, "PUBLIC");
        assert_eq!(settings.chat.model, "mistral-small-latest");
        assert_eq!(settings.chat.max_tokens, 1000);
        assert_eq!(settings.server.port, 8501);
        assert_eq!(settings.server.session_idle_secs, 1800);
    }

    #[test]
    fn test_deserialize_session_idle() {
        let settings: AppSettings = toml::from_str("[server]\nsession_idle_secs = 60\n").unwrap();
        assert_eq!(settings.server.session_idle_secs, 60);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_resolved_base_url_from_account() {
        let search = SearchSettings {
            account: Some("XY12345".into()),
            ..Default::default()
        };
        assert_eq!(
            search.resolved_base_url().as_deref(),
            Some("https://xy12345.snowflakecomputing.com")
        );
    }

    #[test]
    fn test_resolved_base_url_override_wins() {
        let search = SearchSettings {
            account: Some("xy12345".into()),
            base_url: Some("http://localhost:9000/".into()),
            ..Default::default()
        };
        assert_eq!(
            search.resolved_base_url().as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn test_resolved_base_url_none_without_account() {
        assert!(SearchSettings::default().resolved_base_url().is_none());
    }

    #[test]
    fn test_service_ref() {
        let svc = SearchSettings::default().service_ref();
        assert_eq!(svc.to_string(), "MEDICALCHATBOT.PUBLIC.CC_SEARCH_SERVICE_CS");
    }
}
