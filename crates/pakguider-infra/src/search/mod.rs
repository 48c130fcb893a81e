//! Document-search provider implementations.
//!
//! Contains the Cortex Search implementation of the [`SearchProvider`]
//! trait defined in `pakguider-core`, plus a factory
//! ([`create_search_provider`]) that builds it from the loaded config.

pub mod cortex;

use pakguider_core::search::box_provider::BoxSearchProvider;
use pakguider_core::search::provider::SearchProvider;
use pakguider_types::search::{SearchError, SearchRequest, SearchResponse};

use crate::config::AppConfig;

use self::cortex::{CortexAuth, CortexSearchProvider};

/// Build the Cortex provider from config.
///
/// Needs an endpoint (explicit base URL or account) and either a
/// pre-issued token or account + user + password.
pub fn create_cortex_provider(config: &AppConfig) -> Result<CortexSearchProvider, SearchError> {
    let search = &config.settings.search;
    let base_url = search.resolved_base_url().ok_or_else(|| {
        SearchError::NotConfigured("set ACCOUNT or SNOWFLAKE_BASE_URL".to_string())
    })?;

    let creds = &config.credentials;
    let auth = match (&creds.snowflake_token, &search.account, &search.user, &creds.password) {
        (Some(token), _, _, _) => CortexAuth::Token(token.clone()),
        (None, Some(account), Some(user), Some(password)) => CortexAuth::Password {
            account: account.clone(),
            user: user.clone(),
            password: password.clone(),
        },
        _ => {
            return Err(SearchError::NotConfigured(
                "set SNOWFLAKE_TOKEN, or ACCOUNT, USER and PASSWORD".to_string(),
            ));
        }
    };

    Ok(
        CortexSearchProvider::new(base_url, search.service_ref(), auth)
            .with_session_context(search.role.clone(), search.warehouse.clone()),
    )
}

/// Build the boxed search provider used by the pipeline.
pub fn create_search_provider(config: &AppConfig) -> Result<BoxSearchProvider, SearchError> {
    create_cortex_provider(config).map(BoxSearchProvider::new)
}

/// Stand-in used when search credentials are missing at startup.
///
/// Every query fails with the original configuration error, so each turn
/// reports it instead of the process refusing to start.
pub struct UnconfiguredSearchProvider {
    reason: String,
}

impl UnconfiguredSearchProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SearchProvider for UnconfiguredSearchProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        Err(SearchError::NotConfigured(self.reason.clone()))
    }
}

/// Like [`create_search_provider`], but never fails: on error, logs a
/// warning and returns an [`UnconfiguredSearchProvider`].
pub fn create_search_provider_or_placeholder(config: &AppConfig) -> BoxSearchProvider {
    match create_search_provider(config) {
        Ok(provider) => provider,
        Err(err) => {
            tracing::warn!("Search provider unavailable: {err}");
            let reason = match err {
                SearchError::NotConfigured(reason) => reason,
                other => other.to_string(),
            };
            BoxSearchProvider::new(UnconfiguredSearchProvider::new(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config_with(
        account: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> AppConfig {
        let mut config = AppConfig::default();
        config.settings.search.account = account.map(String::from);
        config.settings.search.user = user.map(String::from);
        config.credentials.password = password.map(SecretString::from);
        config.credentials.snowflake_token = token.map(SecretString::from);
        config
    }

    #[test]
    fn test_create_with_password() {
        let config = config_with(Some("xy12345"), Some("guide"), Some("pw"), None);
        let provider = create_search_provider(&config).unwrap();
        assert_eq!(provider.name(), "cortex_search");
    }

    #[test]
    fn test_create_with_token_and_base_url() {
        let mut config = config_with(None, None, None, Some("pat"));
        config.settings.search.base_url = Some("http://localhost:9000".into());
        let provider = create_cortex_provider(&config).unwrap();
        assert_eq!(provider.service().service, "CC_SEARCH_SERVICE_CS");
    }

    #[test]
    fn test_create_without_account_fails() {
        let config = config_with(None, Some("guide"), Some("pw"), None);
        assert!(matches!(
            create_search_provider(&config),
            Err(SearchError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_create_without_password_fails() {
        let config = config_with(Some("xy12345"), Some("guide"), None, None);
        assert!(matches!(
            create_search_provider(&config),
            Err(SearchError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_placeholder_reports_reason() {
        let provider = create_search_provider_or_placeholder(&AppConfig::default());
        assert_eq!(provider.name(), "unconfigured");
        let err = provider
            .search(&SearchRequest::passages("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NotConfigured(_)));
        assert!(err.to_string().contains("ACCOUNT"));
    }
}
