//! Default values for irgraph configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Exploration Defaults
// ============================================================================

/// Hops traversed from the seed nodes when building the initial subgraph.
///
/// Zero keeps the initial subgraph to the seeds themselves, so they are the
/// first leaves offered to the decider.
pub const DEFAULT_INITIAL_DEPTH: u32 = 0;

/// Maximum number of decide/expand rounds before the loop stops as exhausted.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Hops traversed per expansion round.
pub const DEFAULT_HOPS_PER_ROUND: u32 = 1;

/// Maximum neighbors fetched per node per hop.
///
/// Bounds query cost on hub nodes of the ontology.
pub const DEFAULT_NEIGHBOR_LIMIT: usize = 40;

/// Prefix of anonymous (blank node) identifiers in the imported ontology.
pub const BLANK_NODE_PREFIX: &str = "bnode://";

// ============================================================================
// Graph Defaults
// ============================================================================

/// Default graph backend.
pub const DEFAULT_GRAPH_BACKEND: &str = "neo4j";

/// Default Neo4j Bolt URI.
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";

/// Default Neo4j user.
pub const DEFAULT_NEO4J_USER: &str = "neo4j";

/// Default Neo4j database.
pub const DEFAULT_NEO4J_DATABASE: &str = "neo4j";

/// Default maximum pooled Bolt connections per run.
pub const DEFAULT_NEO4J_MAX_CONNECTIONS: usize = 4;

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature. Low, the loop wants stable decisions.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

// Anthropic defaults
/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API version.
pub const DEFAULT_ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// OpenRouter defaults
/// Default OpenRouter API URL.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

// Hugging Face defaults
/// Default Hugging Face inference router URL (OpenAI-compatible).
pub const DEFAULT_HUGGINGFACE_URL: &str = "https://router.huggingface.co/v1";
/// Default Hugging Face model.
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

// ============================================================================
// Output Defaults
// ============================================================================

/// Default directory for persisted runs.
pub const DEFAULT_OUTPUT_DIR: &str = ".irgraph/runs";

/// Persisted subgraph file name.
pub const DEFAULT_SUBGRAPH_FILE: &str = "subgraph.json";

/// Persisted exploration trace file name.
pub const DEFAULT_EXPLORATION_FILE: &str = "exploration.json";

/// Persisted planner decision file name.
pub const DEFAULT_SEED_FILE: &str = "seed.json";

/// Persisted playbook file name.
pub const DEFAULT_PLAYBOOK_FILE: &str = "playbook.json";

/// Persisted decision log file name.
pub const DEFAULT_DECISIONS_FILE: &str = "decisions.json";

/// Hex characters of the incident fingerprint used as directory name.
pub const FINGERPRINT_LENGTH: usize = 16;

/// Maximum length of raw model output echoed in error messages.
pub const DEFAULT_ERROR_CONTEXT_LENGTH: usize = 500;
