//! Configuration management for irgraph.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `irgraph.toml` file
//! 3. User config `~/.config/irgraph/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Graph store configuration.
    pub graph: GraphConfig,

    /// Subgraph exploration limits.
    pub exploration: ExplorationConfig,

    /// Run output configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./irgraph.toml` (project local)
    /// 2. `~/.config/irgraph/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("irgraph.toml").exists() {
            return Self::from_file("irgraph.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("irgraph").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(provider) = std::env::var("IRGRAPH_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("IRGRAPH_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Ok(url) = std::env::var("IRGRAPH_LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("IRGRAPH_LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(tokens) = std::env::var("IRGRAPH_LLM_MAX_TOKENS") {
            if let Ok(n) = tokens.parse() {
                self.llm.max_tokens = n;
            }
        }

        // Graph overrides
        if let Ok(backend) = std::env::var("IRGRAPH_GRAPH_BACKEND") {
            self.graph.backend = backend;
        }
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            self.graph.uri = uri;
        }
        if let Ok(user) = std::env::var("NEO4J_USER") {
            self.graph.user = user;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            self.graph.password = Some(password);
        }
        if let Ok(fixture) = std::env::var("IRGRAPH_GRAPH_FIXTURE") {
            self.graph.fixture = Some(PathBuf::from(fixture));
        }

        // Exploration overrides
        if let Ok(rounds) = std::env::var("IRGRAPH_MAX_ROUNDS") {
            if let Ok(n) = rounds.parse() {
                self.exploration.max_rounds = n;
            }
        }
        if let Ok(limit) = std::env::var("IRGRAPH_NEIGHBOR_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.exploration.neighbor_limit = n;
            }
        }
        if let Ok(depth) = std::env::var("IRGRAPH_INITIAL_DEPTH") {
            if let Ok(n) = depth.parse() {
                self.exploration.initial_depth = n;
            }
        }

        // Output overrides
        if let Ok(dir) = std::env::var("IRGRAPH_OUTPUT_DIR") {
            self.output.dir = dir;
        }
    }

    /// Reject limits that would make the exploration loop meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exploration.validate()?;

        match self.graph.backend.as_str() {
            "neo4j" => Ok(()),
            "memory" if self.graph.fixture.is_some() => Ok(()),
            "memory" => Err(ConfigError::Invalid(
                "graph.backend = \"memory\" requires graph.fixture".to_string(),
            )),
            other => Err(ConfigError::Invalid(format!(
                "unknown graph backend: {}",
                other
            ))),
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Provider name: "openai", "anthropic", "ollama", or "openrouter".
    pub provider: String,

    /// Model name (provider-specific).
    pub model: Option<String>,

    /// Base URL for API (for openai-compatible providers).
    pub base_url: Option<String>,

    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// API version (for Anthropic).
    pub api_version: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LLM_PROVIDER.to_string(),
            model: None,    // Use provider default
            base_url: None, // Use provider default
            api_key: None,  // Load from env
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_version: Some(DEFAULT_ANTHROPIC_API_VERSION.to_string()),
        }
    }
}

impl LLMConfig {
    /// Get the model name, falling back to provider defaults.
    pub fn model_or_default(&self) -> String {
        self.model.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_MODEL.to_string(),
            "ollama" => DEFAULT_OLLAMA_MODEL.to_string(),
            "huggingface" | "hf" => DEFAULT_HUGGINGFACE_MODEL.to_string(),
            _ => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Get the base URL, falling back to provider defaults.
    pub fn base_url_or_default(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| match self.provider.as_str() {
            "anthropic" | "claude" => DEFAULT_ANTHROPIC_URL.to_string(),
            "ollama" => DEFAULT_OLLAMA_URL.to_string(),
            "openrouter" => DEFAULT_OPENROUTER_URL.to_string(),
            "huggingface" | "hf" => DEFAULT_HUGGINGFACE_URL.to_string(),
            _ => DEFAULT_OPENAI_URL.to_string(),
        })
    }

    /// Get API key from config or environment.
    pub fn api_key_or_env(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("IRGRAPH_LLM_API_KEY").ok())
            .or_else(|| match self.provider.as_str() {
                "anthropic" | "claude" => std::env::var("ANTHROPIC_API_KEY").ok(),
                "openrouter" => std::env::var("OPENROUTER_API_KEY").ok(),
                "huggingface" | "hf" => std::env::var("HF_TOKEN").ok(),
                _ => std::env::var("OPENAI_API_KEY").ok(),
            })
    }
}

/// Graph store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Backend: "neo4j" or "memory" (JSON fixture).
    pub backend: String,

    /// Bolt URI of the Neo4j server.
    pub uri: String,

    /// Neo4j user.
    pub user: String,

    /// Neo4j password (usually from `NEO4J_PASSWORD`).
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Neo4j database name.
    pub database: String,

    /// Maximum pooled connections held by one run.
    pub max_connections: usize,

    /// Path of a JSON graph fixture for the memory backend.
    pub fixture: Option<PathBuf>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_GRAPH_BACKEND.to_string(),
            uri: DEFAULT_NEO4J_URI.to_string(),
            user: DEFAULT_NEO4J_USER.to_string(),
            password: None,
            database: DEFAULT_NEO4J_DATABASE.to_string(),
            max_connections: DEFAULT_NEO4J_MAX_CONNECTIONS,
            fixture: None,
        }
    }
}

/// Limits of the subgraph exploration loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Hops traversed from the seeds when building the initial subgraph.
    pub initial_depth: u32,

    /// Hops traversed per expansion round.
    pub hops_per_round: u32,

    /// Round cap; the loop ends as exhausted once exceeded.
    pub max_rounds: usize,

    /// Maximum neighbors fetched per node per hop.
    pub neighbor_limit: usize,

    /// Drop requested expansion targets that are not current leaf nodes.
    pub validate_decisions: bool,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            initial_depth: DEFAULT_INITIAL_DEPTH,
            hops_per_round: DEFAULT_HOPS_PER_ROUND,
            max_rounds: DEFAULT_MAX_ROUNDS,
            neighbor_limit: DEFAULT_NEIGHBOR_LIMIT,
            validate_decisions: true,
        }
    }
}

impl ExplorationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.neighbor_limit == 0 {
            return Err(ConfigError::Invalid(
                "exploration.neighbor_limit must be at least 1".to_string(),
            ));
        }
        if self.hops_per_round == 0 {
            return Err(ConfigError::Invalid(
                "exploration.hops_per_round must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory for persisted runs.
    pub dir: String,

    /// Subgraph file name.
    pub subgraph_file: String,

    /// Exploration trace file name.
    pub exploration_file: String,

    /// Planner decision file name.
    pub seed_file: String,

    /// Playbook file name.
    pub playbook_file: String,

    /// Decision log file name.
    pub decisions_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            subgraph_file: DEFAULT_SUBGRAPH_FILE.to_string(),
            exploration_file: DEFAULT_EXPLORATION_FILE.to_string(),
            seed_file: DEFAULT_SEED_FILE.to_string(),
            playbook_file: DEFAULT_PLAYBOOK_FILE.to_string(),
            decisions_file: DEFAULT_DECISIONS_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Directory holding every run of one incident.
    pub fn incident_dir(&self, fingerprint: &str) -> PathBuf {
        PathBuf::from(&self.dir).join(fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
        assert_eq!(config.graph.uri, DEFAULT_NEO4J_URI);
        assert_eq!(config.exploration.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(config.exploration.neighbor_limit, DEFAULT_NEIGHBOR_LIMIT);
        assert!(config.exploration.validate_decisions);
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[graph]"));
        assert!(toml_str.contains("[exploration]"));
        assert!(toml_str.contains("[output]"));
        assert!(!toml_str.contains("password"));
    }

    #[test]
    fn test_zero_neighbor_limit_rejected() {
        let mut config = Config::default();
        config.exploration.neighbor_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_memory_backend_needs_fixture() {
        let mut config = Config::default();
        config.graph.backend = "memory".to_string();
        assert!(config.validate().is_err());

        config.graph.fixture = Some(PathBuf::from("graph.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_or_default() {
        let mut config = LLMConfig::default();

        config.provider = "anthropic".to_string();
        assert_eq!(config.model_or_default(), DEFAULT_ANTHROPIC_MODEL);

        config.provider = "ollama".to_string();
        assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

        config.model = Some("custom-model".to_string());
        assert_eq!(config.model_or_default(), "custom-model");
    }
}
