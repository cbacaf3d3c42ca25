use crate::error::DialogueError;
use ahash::AHashMap;
use std::path::Path;

/// Manual expression overrides, keyed `<dialogue id>_<turn id>`.
///
/// Each line reads `<dialogue id> <turn id> <expression...>`; blank lines and
/// lines starting with `#` are ignored. The dialogue id may carry its `.json`
/// suffix.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    entries: AHashMap<String, String>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DialogueError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| DialogueError::Io {
                path: path.as_ref().display().to_string(),
                message: e.to_string(),
            })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, DialogueError> {
        let mut patch = Self::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut words = line.split_whitespace();
            let (Some(dialogue_id), Some(turn_id)) = (words.next(), words.next()) else {
                return Err(DialogueError::MalformedPatch {
                    line: number + 1,
                    content: line.to_string(),
                });
            };
            let expression = words.collect::<Vec<_>>().join(" ");
            if expression.is_empty() {
                return Err(DialogueError::MalformedPatch {
                    line: number + 1,
                    content: line.to_string(),
                });
            }
            patch.insert(dialogue_id, turn_id, expression);
        }
        Ok(patch)
    }

    pub fn insert(&mut self, dialogue_id: &str, turn_id: &str, expression: impl Into<String>) {
        self.entries
            .insert(key(dialogue_id, turn_id), expression.into());
    }

    /// Override for the user turn with the given dataset turn id.
    pub fn get(&self, dialogue_id: &str, turn_id: usize) -> Option<&str> {
        self.entries
            .get(&key(dialogue_id, &turn_id.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(dialogue_id: &str, turn_id: &str) -> String {
    let id = dialogue_id.strip_suffix(".json").unwrap_or(dialogue_id);
    format!("{}_{}", id, turn_id)
}
