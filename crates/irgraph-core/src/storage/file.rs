use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::decision::{Decision, Playbook, SeedDecision};
use crate::explore::ExplorationOutcome;
use crate::subgraph::Subgraph;

use super::error::StorageError;
use super::{ExplorationTrace, RunKey, RunStore};

/// File-based run storage.
///
/// ```text
/// <output.dir>/
///   <fingerprint>/              # one directory per incident text
///     <run-id>/
///       seed.json               # planner decision
///       subgraph.json           # final subgraph
///       exploration.json        # round history and final state
///       playbook.json           # synthesized playbook
///       decisions.json          # every model decision, tagged by stage
/// ```
pub struct FileRunStore {
    config: OutputConfig,
}

impl FileRunStore {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Stores runs under `dir` with default file names.
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self::new(OutputConfig {
            dir: dir.as_ref().to_string_lossy().into_owned(),
            ..OutputConfig::default()
        })
    }

    /// Directory of one run.
    pub fn run_dir(&self, key: &RunKey) -> PathBuf {
        self.config.incident_dir(&key.fingerprint).join(&key.run_id)
    }

    fn ensure_run_dir(&self, key: &RunKey) -> Result<PathBuf, StorageError> {
        let dir = self.run_dir(key);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        Ok(dir)
    }

    fn write_json<T: Serialize>(
        &self,
        key: &RunKey,
        file: &str,
        value: &T,
    ) -> Result<PathBuf, StorageError> {
        let path = self.ensure_run_dir(key)?.join(file);
        let json = serde_json::to_string_pretty(value).map_err(|e| StorageError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote run artifact");
        Ok(path)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &RunKey, file: &str) -> Result<T, StorageError> {
        let dir = self.run_dir(key);
        if !dir.is_dir() {
            return Err(StorageError::RunNotFound(key.to_string()));
        }
        let path = dir.join(file);
        let content = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| StorageError::json(&path, e))
    }
}

impl RunStore for FileRunStore {
    fn save_seed(&self, key: &RunKey, seed: &SeedDecision) -> Result<PathBuf, StorageError> {
        self.write_json(key, &self.config.seed_file, seed)
    }

    fn save_exploration(
        &self,
        key: &RunKey,
        outcome: &ExplorationOutcome,
    ) -> Result<PathBuf, StorageError> {
        self.write_json(key, &self.config.subgraph_file, &outcome.subgraph)?;
        self.write_json(
            key,
            &self.config.exploration_file,
            &ExplorationTrace::from(outcome),
        )?;
        Ok(self.run_dir(key))
    }

    fn save_playbook(&self, key: &RunKey, playbook: &Playbook) -> Result<PathBuf, StorageError> {
        self.write_json(key, &self.config.playbook_file, playbook)
    }

    fn save_decisions(&self, key: &RunKey, decisions: &[Decision]) -> Result<PathBuf, StorageError> {
        self.write_json(key, &self.config.decisions_file, &decisions)
    }

    fn load_decisions(&self, key: &RunKey) -> Result<Vec<Decision>, StorageError> {
        self.read_json(key, &self.config.decisions_file)
    }

    fn load_subgraph(&self, key: &RunKey) -> Result<Subgraph, StorageError> {
        self.read_json(key, &self.config.subgraph_file)
    }

    fn load_trace(&self, key: &RunKey) -> Result<ExplorationTrace, StorageError> {
        self.read_json(key, &self.config.exploration_file)
    }

    fn list_runs(&self, fingerprint: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.config.incident_dir(fingerprint);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StorageError::io(&dir, e))? {
            let entry = entry.map_err(|e| StorageError::io(&dir, e))?;
            if entry.path().is_dir() {
                runs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        runs.sort();
        Ok(runs)
    }
}
