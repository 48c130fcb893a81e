//! Chat-completion provider implementations.
//!
//! Contains the Mistral implementation of the [`LlmProvider`] trait defined
//! in `pakguider-core`, and a factory ([`create_provider`]) that builds it
//! from the loaded config.
//!
//! [`LlmProvider`]: pakguider_core::llm::provider::LlmProvider

pub mod mistral;

use secrecy::ExposeSecret;

use pakguider_core::llm::box_provider::BoxLlmProvider;

use crate::config::{AppConfig, PLACEHOLDER_API_KEY};

use self::mistral::MistralProvider;

/// Build the Mistral provider from config.
///
/// Always succeeds. A missing key leaves the placeholder in place, which
/// the endpoint rejects on the first call.
pub fn create_mistral_provider(config: &AppConfig) -> MistralProvider {
    if config.credentials.mistral_api_key.expose_secret() == PLACEHOLDER_API_KEY {
        tracing::warn!("MISTRAL_API_KEY is not set; completions will be rejected");
    }

    let chat = &config.settings.chat;
    MistralProvider::new(config.credentials.mistral_api_key.clone(), chat.model.clone())
        .with_base_url(chat.base_url.clone())
}

pub fn create_provider(config: &AppConfig) -> BoxLlmProvider {
    BoxLlmProvider::new(create_mistral_provider(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_create_provider_uses_configured_model() {
        let mut config = AppConfig::default();
        config.settings.chat.model = "mistral-small-latest".into();
        config.credentials.mistral_api_key = SecretString::from("mistral-key");

        let provider = create_mistral_provider(&config);
        assert_eq!(provider.model(), "mistral-small-latest");
        assert_eq!(create_provider(&config).name(), "mistral");
    }

    #[test]
    fn test_create_provider_with_placeholder_key() {
        let provider = create_provider(&AppConfig::default());
        assert_eq!(provider.name(), "mistral");
    }
}
