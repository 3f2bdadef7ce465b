use irgraph_core::config::{
    ConfigError, LLMConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_LLM_PROVIDER, DEFAULT_MAX_ROUNDS,
    DEFAULT_NEIGHBOR_LIMIT, DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_MODEL, DEFAULT_OUTPUT_DIR,
};
use irgraph_core::Config;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.llm.provider, DEFAULT_LLM_PROVIDER);
    assert_eq!(config.exploration.max_rounds, DEFAULT_MAX_ROUNDS);
    assert_eq!(config.exploration.neighbor_limit, DEFAULT_NEIGHBOR_LIMIT);
    assert_eq!(config.exploration.initial_depth, 0);
    assert_eq!(config.exploration.hops_per_round, 1);
    assert_eq!(config.output.dir, DEFAULT_OUTPUT_DIR);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_to_toml() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("[llm]"));
    assert!(toml_str.contains("[graph]"));
    assert!(toml_str.contains("[exploration]"));
    assert!(toml_str.contains("[output]"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[llm]
provider = "ollama"
model = "llama3"

[graph]
backend = "memory"
fixture = "fixtures/uco.json"

[exploration]
max_rounds = 4
neighbor_limit = 5
validate_decisions = false

[output]
dir = ".custom-runs"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.llm.model, Some("llama3".to_string()));
    assert_eq!(config.graph.backend, "memory");
    assert_eq!(config.graph.fixture, Some(PathBuf::from("fixtures/uco.json")));
    assert_eq!(config.exploration.max_rounds, 4);
    assert_eq!(config.exploration.neighbor_limit, 5);
    assert!(!config.exploration.validate_decisions);
    // unspecified keys keep their defaults
    assert_eq!(config.exploration.hops_per_round, 1);
    assert_eq!(config.output.dir, ".custom-runs");
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_backend_rejected() {
    let config: Config = toml::from_str("[graph]\nbackend = \"sqlite\"\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_hops_rejected() {
    let config: Config = toml::from_str("[exploration]\nhops_per_round = 0\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("irgraph.toml");
    std::fs::write(&path, "[exploration\nmax_rounds = ").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::from_file(dir.path().join("absent.toml")),
        Err(ConfigError::ReadError(_))
    ));
}

#[test]
fn test_model_or_default() {
    let mut config = LLMConfig {
        provider: "anthropic".to_string(),
        ..Default::default()
    };
    assert_eq!(config.model_or_default(), DEFAULT_ANTHROPIC_MODEL);

    config.provider = "ollama".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OLLAMA_MODEL);

    config.provider = "openai".to_string();
    assert_eq!(config.model_or_default(), DEFAULT_OPENAI_MODEL);

    config.model = Some("custom-model".to_string());
    assert_eq!(config.model_or_default(), "custom-model");
}

#[test]
fn test_secrets_never_serialized() {
    let mut config = Config::default();
    config.llm.api_key = Some("sk-secret".to_string());
    config.graph.password = Some("hunter2".to_string());

    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(!toml_str.contains("sk-secret"));
    assert!(!toml_str.contains("hunter2"));
}
