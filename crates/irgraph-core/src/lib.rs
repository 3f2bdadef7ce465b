pub mod config;
pub mod decision;
pub mod explore;
pub mod extract;
pub mod graph;
pub mod llm;
pub mod prompts;
pub mod run;
pub mod storage;
pub mod subgraph;

pub use config::Config;
pub use decision::{Decision, ExpandDecision, ExpandRequest, Playbook, SeedDecision};
pub use explore::{ExpansionDecider, ExpansionLoop, ExplorationOutcome, ExplorationState};
pub use extract::{extract_as, extract_json, ExtractError};
pub use graph::{GraphStore, MemoryGraph, Neo4jGraph};
pub use run::{IncidentRun, RunOptions, RunReport};
pub use storage::{FileRunStore, RunKey, RunStore};
pub use subgraph::{NodeRecord, Relationship, Subgraph, SubgraphBuilder};
