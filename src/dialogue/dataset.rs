//! MultiWOZ 2.2 dialogue records.

use crate::error::DialogueError;
use crate::oracle::{AgentTurn, DialogActs};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub dialogue_id: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub turn_id: String,
    pub speaker: Speaker,
    #[serde(default)]
    pub utterance: String,
    #[serde(default)]
    pub frames: Vec<Frame>,
    /// Dialog acts merged in from `dialog_acts.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_act: Option<TurnActs>,
    /// Program expression of a user turn, for pre-converted dialogues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Speaker {
    User,
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnActs {
    #[serde(default)]
    pub dialog_act: IndexMap<String, Vec<(String, String)>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FrameState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    #[serde(default = "no_intent")]
    pub active_intent: String,
    #[serde(default)]
    pub slot_values: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub requested_slots: Vec<String>,
}

fn no_intent() -> String {
    "NONE".to_string()
}

impl FrameState {
    pub fn is_active(&self) -> bool {
        self.active_intent != "NONE"
    }
}

impl Turn {
    pub fn user(turn_id: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            turn_id: turn_id.into(),
            speaker: Speaker::User,
            utterance: utterance.into(),
            frames: Vec::new(),
            dialog_act: None,
            expression: None,
        }
    }

    pub fn system(turn_id: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            ..Self::user(turn_id, utterance)
        }
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Adds an active frame with the given reference slot values.
    pub fn with_state(mut self, service: &str, intent: &str, slots: &[(&str, &[&str])]) -> Self {
        let slot_values = slots
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect();
        self.frames.push(Frame {
            service: service.to_string(),
            state: Some(FrameState {
                active_intent: intent.to_string(),
                slot_values,
                requested_slots: Vec::new(),
            }),
        });
        self
    }

    pub fn with_act(mut self, label: &str, pairs: &[(&str, &str)]) -> Self {
        self.dialog_act
            .get_or_insert_with(TurnActs::default)
            .dialog_act
            .entry(label.to_string())
            .or_default()
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn acts(&self) -> DialogActs {
        self.dialog_act
            .as_ref()
            .map(|a| a.dialog_act.clone())
            .unwrap_or_default()
    }

    /// The oracle view of a system turn.
    pub fn agent_turn(&self) -> AgentTurn {
        AgentTurn {
            utterance: self.utterance.clone(),
            acts: self.acts(),
        }
    }
}

impl Dialogue {
    pub fn new(dialogue_id: impl Into<String>, services: &[&str]) -> Self {
        Self {
            dialogue_id: dialogue_id.into(),
            services: services.iter().map(|s| s.to_string()).collect(),
            turns: Vec::new(),
        }
    }

    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.turns.push(turn);
        self
    }

    /// Identifier without the `.json` suffix used by MultiWOZ file names.
    pub fn short_id(&self) -> &str {
        self.dialogue_id
            .strip_suffix(".json")
            .unwrap_or(&self.dialogue_id)
    }

    /// Number of user turns; user turns sit at even positions.
    pub fn user_turn_count(&self) -> usize {
        self.turns.len().div_ceil(2)
    }

    pub fn user_turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index * 2)
    }

    pub fn agent_turn(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index * 2 + 1)
    }

    /// Loads a dataset file holding either one dialogue or an array of them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Dialogue>, DialogueError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| DialogueError::Io {
                path: path.as_ref().display().to_string(),
                message: e.to_string(),
            })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Vec<Dialogue>, DialogueError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<Dialogue>),
            One(Box<Dialogue>),
        }
        match serde_json::from_str(json) {
            Ok(OneOrMany::Many(dialogues)) => Ok(dialogues),
            Ok(OneOrMany::One(dialogue)) => Ok(vec![*dialogue]),
            Err(e) => Err(DialogueError::JsonParseError(e.to_string())),
        }
    }
}

/// Merges a MultiWOZ `dialog_acts.json` document into `dialogues`.
///
/// The document maps dialogue id to turn id to `{"dialog_act": {...}}`.
pub fn attach_dialog_acts(dialogues: &mut [Dialogue], json: &str) -> Result<(), DialogueError> {
    let acts: IndexMap<String, IndexMap<String, TurnActs>> =
        serde_json::from_str(json).map_err(|e| DialogueError::JsonParseError(e.to_string()))?;
    for dialogue in dialogues.iter_mut() {
        let Some(turn_acts) = acts.get(&dialogue.dialogue_id) else {
            continue;
        };
        for turn in dialogue.turns.iter_mut() {
            if let Some(act) = turn_acts.get(&turn.turn_id) {
                turn.dialog_act = Some(act.clone());
            }
        }
    }
    Ok(())
}
