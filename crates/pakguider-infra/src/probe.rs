//! Startup connectivity probe.
//!
//! Checks that both upstream providers answer before the first user turn.
//! Used by `pakguider check` and by the fail-fast startup path.

use std::time::{Duration, Instant};

use pakguider_observe::genai_attrs::{PROVIDER_CORTEX_SEARCH, PROVIDER_MISTRAL};

use crate::config::AppConfig;
use crate::llm::create_mistral_provider;
use crate::search::create_cortex_provider;

/// Result of probing one provider.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub provider: &'static str,
    /// What was contacted (service path or model name).
    pub target: String,
    pub latency: Duration,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub async fn probe_search(config: &AppConfig) -> ProbeOutcome {
    let target = config.settings.search.service_ref().to_string();
    let started = Instant::now();

    let error = match create_cortex_provider(config) {
        Ok(provider) => provider.probe().await.err().map(|e| e.to_string()),
        Err(err) => Some(err.to_string()),
    };

    ProbeOutcome {
        provider: PROVIDER_CORTEX_SEARCH,
        target,
        latency: started.elapsed(),
        error,
    }
}

pub async fn probe_llm(config: &AppConfig) -> ProbeOutcome {
    let provider = create_mistral_provider(config);
    let started = Instant::now();
    let error = provider.probe().await.err().map(|e| e.to_string());

    ProbeOutcome {
        provider: PROVIDER_MISTRAL,
        target: provider.model().to_string(),
        latency: started.elapsed(),
        error,
    }
}

/// Probe search and completion concurrently.
pub async fn probe_providers(config: &AppConfig) -> Vec<ProbeOutcome> {
    let (search, llm) = tokio::join!(probe_search(config), probe_llm(config));
    vec![search, llm]
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_probe_search_unconfigured() {
        let outcome = probe_search(&AppConfig::default()).await;
        assert_eq!(outcome.provider, "cortex_search");
        assert!(!outcome.is_ok());
        assert_eq!(outcome.target, "MEDICALCHATBOT.PUBLIC.CC_SEARCH_SERVICE_CS");
    }

    #[tokio::test]
    async fn test_probe_providers_against_mock_servers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(
                "/api/v2/databases/MEDICALCHATBOT/schemas/PUBLIC/cortex-search-services/CC_SEARCH_SERVICE_CS:query",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.settings.search.base_url = Some(server.uri());
        config.credentials.snowflake_token = Some(SecretString::from("pat"));
        config.settings.chat.base_url = format!("{}/v1", server.uri());
        config.credentials.mistral_api_key = SecretString::from("key");

        let outcomes = probe_providers(&config).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(ProbeOutcome::is_ok), "{outcomes:?}");
        assert_eq!(outcomes[1].target, "mistral-large-latest");
    }

    #[tokio::test]
    async fn test_probe_llm_rejected_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.settings.chat.base_url = server.uri();

        let outcome = probe_llm(&config).await;
        assert_eq!(outcome.error.as_deref(), Some("authentication failed"));
    }
}
