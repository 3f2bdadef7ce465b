use super::{ClaudeClient, LLMError, OpenAIClient, LLM};
use crate::config::{LLMConfig, DEFAULT_MAX_TOKENS, DEFAULT_OLLAMA_MODEL, DEFAULT_TEMPERATURE};

/// LLM provider selection.
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI-compatible endpoint (default, most universal)
    OpenAI {
        base_url: String,
        api_key: Option<String>,
        model: String,
    },
    /// Anthropic Claude
    Anthropic {
        base_url: String,
        api_key: Option<String>,
        model: String,
        api_version: Option<String>,
    },
    /// Local Ollama instance
    Ollama { base_url: String, model: String },
    /// OpenRouter (OpenAI-compatible, key required)
    OpenRouter {
        base_url: String,
        api_key: Option<String>,
        model: String,
    },
    /// Hugging Face inference router (OpenAI-compatible, token required)
    HuggingFace {
        base_url: String,
        api_key: Option<String>,
        model: String,
    },
}

/// Sampling settings shared by every provider.
#[derive(Debug, Clone, Copy)]
struct Sampling {
    max_tokens: u32,
    temperature: f32,
}

impl Provider {
    /// Creates a provider from LLMConfig.
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        let model = config.model_or_default();
        let base_url = config.base_url_or_default();
        let api_key = config.api_key_or_env();

        let provider = match config.provider.to_lowercase().as_str() {
            "openai" => Provider::OpenAI {
                base_url,
                api_key,
                model,
            },
            "anthropic" | "claude" => Provider::Anthropic {
                base_url,
                api_key,
                model,
                api_version: config.api_version.clone(),
            },
            "ollama" => Provider::Ollama {
                base_url: std::env::var("OLLAMA_HOST")
                    .ok()
                    .filter(|_| config.base_url.is_none())
                    .map(|h| format!("{}/v1", h.trim_end_matches('/')))
                    .unwrap_or(base_url),
                model,
            },
            "openrouter" => Provider::OpenRouter {
                base_url,
                api_key,
                model,
            },
            "huggingface" | "hf" => Provider::HuggingFace {
                base_url,
                api_key,
                model,
            },
            other => return Err(LLMError::UnknownProvider(other.to_string())),
        };

        Ok(provider)
    }

    /// Provider name as used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Anthropic { .. } => "anthropic",
            Provider::Ollama { .. } => "ollama",
            Provider::OpenRouter { .. } => "openrouter",
            Provider::HuggingFace { .. } => "huggingface",
        }
    }

    /// Creates an LLM client with default sampling settings.
    pub fn build(self) -> Result<Box<dyn LLM>, LLMError> {
        self.build_with(Sampling {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Creates an LLM client using the config's sampling settings.
    pub fn build_from_config(config: &LLMConfig) -> Result<Box<dyn LLM>, LLMError> {
        Self::from_config(config)?.build_with(Sampling {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn build_with(self, sampling: Sampling) -> Result<Box<dyn LLM>, LLMError> {
        tracing::debug!(provider = self.name(), "building LLM client");

        match self {
            Provider::OpenAI {
                base_url,
                api_key,
                model,
            } => Ok(Box::new(
                OpenAIClient::new(base_url, api_key.unwrap_or_default(), model)
                    .with_max_tokens(sampling.max_tokens)
                    .with_temperature(sampling.temperature),
            )),

            Provider::Anthropic {
                base_url,
                api_key,
                model,
                api_version,
            } => {
                let key = api_key.ok_or(LLMError::MissingApiKey)?;
                let mut client = ClaudeClient::new(key)
                    .with_api_url(base_url)
                    .with_model(model)
                    .with_max_tokens(sampling.max_tokens)
                    .with_temperature(sampling.temperature);
                if let Some(version) = api_version {
                    client = client.with_api_version(version);
                }
                Ok(Box::new(client))
            }

            Provider::Ollama { base_url, model } => Ok(Box::new(
                OpenAIClient::new(base_url, "", model)
                    .with_max_tokens(sampling.max_tokens)
                    .with_temperature(sampling.temperature),
            )),

            Provider::OpenRouter {
                base_url,
                api_key,
                model,
            }
            | Provider::HuggingFace {
                base_url,
                api_key,
                model,
            } => {
                let key = api_key.ok_or(LLMError::MissingApiKey)?;
                Ok(Box::new(
                    OpenAIClient::new(base_url, key, model)
                        .with_max_tokens(sampling.max_tokens)
                        .with_temperature(sampling.temperature),
                ))
            }
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Ollama {
            base_url: crate::config::DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}
