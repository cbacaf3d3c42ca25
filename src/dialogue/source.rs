use super::dataset::Dialogue;
use crate::signal::Signal;
use ahash::AHashMap;

/// Supplies the program expression of each user turn.
pub trait ExpressionSource {
    /// Expression for user turn `index` of `dialogue`, or a `ConversionError` signal.
    fn expression(&self, dialogue: &Dialogue, index: usize) -> Result<String, Signal>;
}

/// Reads the expression annotated on each user turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedExpressions;

impl ExpressionSource for AnnotatedExpressions {
    fn expression(&self, dialogue: &Dialogue, index: usize) -> Result<String, Signal> {
        dialogue
            .user_turn(index)
            .and_then(|turn| turn.expression.clone())
            .ok_or_else(|| {
                Signal::conversion(format!(
                    "No expression for turn {} of dialogue {}",
                    index * 2,
                    dialogue.dialogue_id
                ))
            })
    }
}

/// Fixed expressions per dialogue id, e.g. for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    scripts: AHashMap<String, Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script<S: Into<String>>(
        mut self,
        dialogue_id: impl Into<String>,
        expressions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.scripts.insert(
            dialogue_id.into(),
            expressions.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl ExpressionSource for ScriptedSource {
    fn expression(&self, dialogue: &Dialogue, index: usize) -> Result<String, Signal> {
        self.scripts
            .get(&dialogue.dialogue_id)
            .and_then(|script| script.get(index))
            .cloned()
            .ok_or_else(|| {
                Signal::conversion(format!(
                    "Script for dialogue {} has no turn {}",
                    dialogue.dialogue_id,
                    index * 2
                ))
            })
    }
}
