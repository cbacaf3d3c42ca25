use crate::dialogue::{BatchReport, DialogueOutcome, DialogueState};
use indexmap::IndexMap;
use serde::Serialize;

/// Formats dialogue outcomes for the good / bad report files.
pub struct ReportFormatter;

#[derive(Serialize)]
struct ExpressionLine<'o> {
    dialogue_id: &'o str,
    expressions: Vec<&'o str>,
}

impl ReportFormatter {
    /// One report block: every turn with its expression and answers, then the
    /// dialogue's problems when it is not good.
    pub fn format_outcome(outcome: &DialogueOutcome) -> String {
        let mut out = if outcome.is_good() {
            format!("Dialogue {}: OK!\n", outcome.dialogue_id)
        } else {
            format!("Dialogue {}:\n", outcome.dialogue_id)
        };

        out.push_str("\tExpressions:\n");
        for turn in &outcome.turns {
            out.push_str(&format!("\t\t{}. {}\n", turn.turn_id, turn.user_utterance));
            out.push_str(&format!("\t\t{}\n", turn.expression));
            out.push_str(&format!(
                "\t\t   {}\n",
                turn.agent_utterance.as_deref().unwrap_or_default()
            ));
            out.push_str(&format!("\t\t     < {} >\n", turn.answers.join(" | ")));
        }

        if !outcome.conversion_problems.is_empty() {
            out.push_str("\tConversion Problems:\n");
            for problem in &outcome.conversion_problems {
                out.push_str(&format!("\t\t{}\n", problem));
            }
        }
        if !outcome.execution_problems.is_empty() {
            let short_id = outcome
                .dialogue_id
                .strip_suffix(".json")
                .unwrap_or(&outcome.dialogue_id);
            out.push_str("\tExecution Problems:\n");
            for problem in &outcome.execution_problems {
                out.push_str(&format!("\t\t<PROB> {}  {}\n", short_id, problem));
            }
        }
        if let Some(fault) = &outcome.fault {
            out.push_str(&format!("\tError: {}\n", fault));
        }
        if !outcome.is_good() {
            out.push('\n');
        }
        out
    }

    /// `{"dialogue_id": .., "expressions": [..]}` on one line.
    pub fn format_expressions(outcome: &DialogueOutcome) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ExpressionLine {
            dialogue_id: &outcome.dialogue_id,
            expressions: outcome.expressions().collect(),
        })
    }

    pub fn format_summary(report: &BatchReport) -> String {
        format!(
            "Total of good dialogues: {}\nTotal of bad dialogues: {}\nTotal number of user turns: {}",
            report.good.len(),
            report.bad.len(),
            report.user_turns
        )
    }

    /// Per-turn state snapshots of every dialogue, keyed by dialogue id.
    pub fn format_states(report: &BatchReport) -> Result<String, serde_json::Error> {
        let states: IndexMap<&str, Vec<&DialogueState>> = report
            .good
            .iter()
            .chain(&report.bad)
            .map(|o| (o.dialogue_id.as_str(), o.states().collect()))
            .collect();
        serde_json::to_string_pretty(&states)
    }
}
