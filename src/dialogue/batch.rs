use super::dataset::Dialogue;
use super::orchestrator::{DialogueOutcome, Orchestrator};
use ahash::AHashSet;
use std::str::FromStr;
use tracing::{info, warn};

/// Selects dialogues by the services they involve.
#[derive(Debug, Clone)]
pub struct ServiceFilter {
    services: AHashSet<String>,
    mode: FilterMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMode {
    /// Services must be a subset of the listed ones.
    Subset,
    /// Subset, and every listed service must be present.
    All,
    /// Exactly the listed services.
    Exact,
}

impl ServiceFilter {
    /// Builds a filter from command-line style arguments.
    ///
    /// A single `a/b` argument requires all of `a` and `b`; a single `a:b`
    /// argument requires exactly `a` and `b`. Otherwise the dialogue's
    /// services must all be listed.
    pub fn new<S: AsRef<str>>(args: &[S]) -> Self {
        if let [single] = args {
            let single = single.as_ref();
            if single.contains('/') {
                return Self::with_mode(single.split('/'), FilterMode::All);
            }
            if single.contains(':') {
                return Self::with_mode(single.split(':'), FilterMode::Exact);
            }
        }
        Self::with_mode(args.iter().map(AsRef::as_ref), FilterMode::Subset)
    }

    fn with_mode<'s>(services: impl Iterator<Item = &'s str>, mode: FilterMode) -> Self {
        Self {
            services: services
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            mode,
        }
    }

    pub fn accepts(&self, dialogue: &Dialogue) -> bool {
        let present = |s: &String| dialogue.services.contains(s);
        let subset = dialogue.services.iter().all(|s| self.services.contains(s));
        match self.mode {
            FilterMode::Subset => subset,
            FilterMode::All => subset && self.services.iter().all(present),
            FilterMode::Exact => {
                self.services.len() == dialogue.services.len() && self.services.iter().all(present)
            }
        }
    }
}

impl FromStr for ServiceFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(&[s]))
    }
}

/// Which dialogues of a dataset a batch run covers.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub services: Option<ServiceFilter>,
    /// Skip dialogues until this id is seen (`.json` suffix ignored).
    pub start_from: Option<String>,
    pub limit: Option<usize>,
}

/// Outcomes of a batch run, split into good and bad dialogues.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub good: Vec<DialogueOutcome>,
    pub bad: Vec<DialogueOutcome>,
    /// Number of user turns run.
    pub user_turns: usize,
    /// Set when the run stopped at a fault.
    pub stopped_at: Option<String>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.good.len() + self.bad.len()
    }
}

/// Runs the selected dialogues one after another.
///
/// A dialogue's fault is recorded in its outcome; with `stop_on_fault` the run
/// ends after that dialogue.
pub fn run_batch(
    orchestrator: &Orchestrator<'_>,
    dialogues: &[Dialogue],
    options: &BatchOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut started = options.start_from.is_none();
    let start = options
        .start_from
        .as_deref()
        .map(|id| id.strip_suffix(".json").unwrap_or(id));

    for dialogue in dialogues {
        if !started {
            if Some(dialogue.short_id()) != start {
                continue;
            }
            started = true;
        }
        if options
            .services
            .as_ref()
            .is_some_and(|filter| !filter.accepts(dialogue))
        {
            continue;
        }
        if options.limit.is_some_and(|limit| report.total() >= limit) {
            break;
        }

        report.user_turns += dialogue.user_turn_count();
        let outcome = orchestrator.run_dialogue(dialogue);
        let fault = outcome.fault.clone();
        if outcome.is_good() {
            report.good.push(outcome);
        } else {
            report.bad.push(outcome);
        }
        if let Some(fault) = fault {
            warn!(dialogue = %dialogue.dialogue_id, %fault, "dialogue failed");
            if orchestrator.config().stop_on_fault {
                report.stopped_at = Some(dialogue.dialogue_id.clone());
                break;
            }
        }
    }

    info!(
        good = report.good.len(),
        bad = report.bad.len(),
        user_turns = report.user_turns,
        "batch finished"
    );
    report
}
