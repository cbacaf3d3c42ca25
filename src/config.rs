//! Engine configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Switches controlling how dialogues are executed.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use turnflow::config::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{"agent_oracle": true}"#).unwrap();
/// assert!(config.agent_oracle);
/// assert!(!config.is_oracle_only());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Consult the reference agent turn's dialog acts.
    pub agent_oracle: bool,
    /// With `agent_oracle`, answer with the reference utterance instead of node logic.
    pub oracle_only: bool,
    /// Abort a batch run on the first per-dialogue fault.
    pub stop_on_fault: bool,
    pub clear_messages_each_turn: bool,
    /// Tolerate an engine train time on the feasible side of the reference.
    pub train_time_leeway: bool,
    /// Prefix of engine-issued confirmation codes.
    pub confirmation_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agent_oracle: false,
            oracle_only: false,
            stop_on_fault: false,
            clear_messages_each_turn: true,
            train_time_leeway: true,
            confirmation_prefix: "XYZ".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::JsonParseError(e.to_string()))
    }

    /// Oracle-only mode is only effective together with the oracle.
    pub fn is_oracle_only(&self) -> bool {
        self.agent_oracle && self.oracle_only
    }

    pub fn with_agent_oracle(mut self, enabled: bool) -> Self {
        self.agent_oracle = enabled;
        self
    }

    pub fn with_oracle_only(mut self, enabled: bool) -> Self {
        self.oracle_only = enabled;
        self
    }

    pub fn with_stop_on_fault(mut self, enabled: bool) -> Self {
        self.stop_on_fault = enabled;
        self
    }

    pub fn with_train_time_leeway(mut self, enabled: bool) -> Self {
        self.train_time_leeway = enabled;
        self
    }

    pub fn with_confirmation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.confirmation_prefix = prefix.into();
        self
    }
}
