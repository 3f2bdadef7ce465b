use irgraph_core::config::{LLMConfig, DEFAULT_ANTHROPIC_URL, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use irgraph_core::llm::{ClaudeClient, LLMError, OpenAIClient, Provider, LLM};

// Claude client tests
mod claude {
    use super::*;

    #[test]
    fn test_client_with_model() {
        let client = ClaudeClient::new("test-key").with_model("claude-3-opus");
        assert_eq!(client.model(), "claude-3-opus");
    }

    #[test]
    fn test_client_builders_chain() {
        let client = ClaudeClient::new("test-key")
            .with_api_url("https://proxy.example.com/v1/messages")
            .with_api_version("2023-06-01")
            .with_max_tokens(512)
            .with_temperature(0.0)
            .with_model("m");
        assert_eq!(client.model(), "m");
    }
}

// OpenAI-compatible client tests
mod openai {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAIClient::new("https://api.example.com/v1", "test-key", "gpt-4");
        assert_eq!(client.model(), "gpt-4");
    }

    #[test]
    fn test_ollama_client() {
        let client = OpenAIClient::ollama("llama3");
        assert_eq!(client.model(), "llama3");
    }

    #[test]
    fn test_openrouter_client() {
        let client = OpenAIClient::openrouter("test-key", "anthropic/claude-3-opus");
        assert_eq!(client.model(), "anthropic/claude-3-opus");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // port 9 (discard) is closed on test machines
        let client = OpenAIClient::new("http://127.0.0.1:9/v1", "", "m");
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, LLMError::Network(_)));
    }
}

// Provider tests
mod provider {
    use super::*;

    fn config(provider: &str) -> LLMConfig {
        LLMConfig {
            provider: provider.to_string(),
            model: Some("codellama".to_string()),
            base_url: Some("http://localhost:8080/v1".to_string()),
            api_key: Some("test".to_string()),
            ..LLMConfig::default()
        }
    }

    #[test]
    fn test_default_provider() {
        let provider = Provider::default();
        assert!(matches!(
            provider,
            Provider::Ollama { ref base_url, ref model }
                if base_url == DEFAULT_OLLAMA_URL && model == DEFAULT_OLLAMA_MODEL
        ));
    }

    #[test]
    fn test_openai_provider_build() {
        let provider = Provider::OpenAI {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: Some("test".to_string()),
            model: "local-model".to_string(),
        };
        let llm = provider.build().unwrap();
        assert_eq!(llm.model(), "local-model");
    }

    #[test]
    fn test_anthropic_requires_key() {
        let provider = Provider::Anthropic {
            base_url: DEFAULT_ANTHROPIC_URL.to_string(),
            api_key: None,
            model: "claude".to_string(),
            api_version: None,
        };
        assert!(matches!(provider.build(), Err(LLMError::MissingApiKey)));
    }

    #[test]
    fn test_openrouter_requires_key() {
        let provider = Provider::OpenRouter {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "any".to_string(),
        };
        assert!(matches!(provider.build(), Err(LLMError::MissingApiKey)));
    }

    #[test]
    fn test_from_config() {
        let provider = Provider::from_config(&config("ollama")).unwrap();
        assert!(matches!(provider, Provider::Ollama { ref model, .. } if model == "codellama"));
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_provider_name_case_insensitive() {
        let provider = Provider::from_config(&config("OpenRouter")).unwrap();
        assert_eq!(provider.name(), "openrouter");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            Provider::from_config(&config("bard")),
            Err(LLMError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_build_from_config() {
        let llm = Provider::build_from_config(&config("anthropic")).unwrap();
        assert_eq!(llm.model(), "codellama");
    }
}
