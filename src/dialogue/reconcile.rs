//! Comparison of the engine's dialogue state with the reference annotation.

use super::dataset::Turn;
use super::state::DialogueState;
use crate::config::EngineConfig;
use crate::matching::{is_later, names_match, normalize_time};
use tracing::{info, warn};

/// Diagnostics for one turn: every reference slot the engine state misses or
/// disagrees with. An empty list means the turn matched.
pub fn compare_dialogue_state(
    reference: &Turn,
    state: &DialogueState,
    config: &EngineConfig,
) -> Vec<String> {
    let turn = &reference.turn_id;
    let mut problems = Vec::new();
    if *turn != state.turn_id {
        problems.push(format!(
            "<TURN ID MISMATCH> Turn id {} from the reference does not match turn id {} from the engine",
            turn, state.turn_id
        ));
    }

    for frame in &reference.frames {
        let Some(frame_state) = frame.state.as_ref().filter(|s| s.is_active()) else {
            continue;
        };
        let service = &frame.service;
        for (slot, values) in &frame_state.slot_values {
            let Some(value) = state.first(slot) else {
                if !slot.contains("request") {
                    problems.push(format!(
                        "{} <SLOT NOT FOUND> Service: {}, Turn: {}, slot \"{}\" not found in DF state",
                        turn, service, turn, slot
                    ));
                }
                continue;
            };
            if values.iter().any(|v| v == "dontcare") {
                continue;
            }

            let (value, values) = if is_time_slot(slot) {
                (
                    normalize_time(value),
                    values.iter().map(|v| normalize_time(v)).collect::<Vec<_>>(),
                )
            } else {
                (value.to_string(), values.clone())
            };
            if value_matches(&value, &values, slot)
                || within_train_leeway(&value, &values, slot, state, config)
            {
                continue;
            }
            problems.push(format!(
                "{} <WRONG SLOT VALUE> Service: {}: value \"{}\" for slot \"{}\" at turn {} not in the list of possible values: {:?}",
                turn, service, value, slot, turn, values
            ));
        }
    }

    let turn_number = turn.parse::<usize>().map(|t| t / 2).unwrap_or_default();
    if problems.is_empty() {
        info!(turn = turn_number, "no state differences");
    } else {
        for problem in &problems {
            warn!(turn = turn_number, "{}", problem);
        }
    }
    problems
}

fn is_time_slot(slot: &str) -> bool {
    slot.ends_with("leaveat") || slot.ends_with("arriveby")
}

/// Empty engine values and request slots always pass; names match leniently.
fn value_matches(value: &str, values: &[String], slot: &str) -> bool {
    value.is_empty()
        || slot.contains("request")
        || values.iter().any(|v| v == value)
        || (slot.contains("-name") && values.iter().any(|v| names_match(value, v)))
}

/// Once a train is pinned down, the engine may report a departure later than
/// the requested one or an arrival earlier than the requested one.
fn within_train_leeway(
    value: &str,
    values: &[String],
    slot: &str,
    state: &DialogueState,
    config: &EngineConfig,
) -> bool {
    if !config.train_time_leeway || state.get("train-trainid").is_none() {
        return false;
    }
    match slot {
        "train-leaveat" => values.iter().any(|v| is_later(value, v) == Some(true)),
        "train-arriveby" => values.iter().any(|v| is_later(v, value) == Some(true)),
        _ => false,
    }
}
