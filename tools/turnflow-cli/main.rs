use clap::Parser;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use turnflow::prelude::*;

/// Runs annotated hotel and restaurant dialogues through the turn engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a dialogue JSON file (one dialogue or an array)
    dialogues_path: String,

    /// Path to the datastore JSON file (`{"hotel": [..], "restaurant": [..]}`)
    #[arg(short, long)]
    datastore: String,

    /// Optional `dialog_acts.json` to merge into the dialogues
    #[arg(short = 'a', long)]
    dialog_acts: Option<String>,

    /// Optional patch file overriding turn expressions
    #[arg(short, long)]
    patch: Option<String>,

    /// Optional engine configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Services to run: `hotel restaurant`, `hotel/restaurant` (all) or `hotel:restaurant` (exact)
    #[arg(short, long, num_args = 1..)]
    services: Vec<String>,

    /// Start from this dialogue id
    #[arg(long)]
    start_from: Option<String>,

    /// Maximum number of dialogues to run
    #[arg(long)]
    limit: Option<usize>,

    /// Consult the reference agent turns
    #[arg(long)]
    agent_oracle: bool,

    /// With --agent-oracle, answer with the reference utterances only
    #[arg(long)]
    oracle_only: bool,

    /// Stop at the first dialogue that fails with a fault
    #[arg(short = 'x', long)]
    stop_on_fault: bool,

    /// Prefix of the report files
    #[arg(short, long, default_value = "")]
    output: String,

    /// Write per-turn state snapshots to this JSON file
    #[arg(long)]
    write_state: Option<String>,

    /// Log filter, e.g. `info` or `turnflow=debug`; `RUST_LOG` takes precedence
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    run(cli);
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let load_start = Instant::now();
    let datastore = InMemoryDatastore::from_file(&cli.datastore).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load datastore '{}': {}",
            cli.datastore, e
        ))
    });
    let mut dialogues = Dialogue::from_file(&cli.dialogues_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load dialogues '{}': {}",
            cli.dialogues_path, e
        ))
    });
    if let Some(acts_path) = &cli.dialog_acts {
        let acts_json = fs::read_to_string(acts_path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read dialog acts '{}': {}", acts_path, e))
        });
        attach_dialog_acts(&mut dialogues, &acts_json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to merge dialog acts: {}", e)));
    }
    let patch = cli.patch.as_ref().map(|path| {
        Patch::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load patch: {}", e)))
    });
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };
    let agent_oracle = config.agent_oracle || cli.agent_oracle;
    let oracle_only = config.oracle_only || cli.oracle_only;
    let stop_on_fault = config.stop_on_fault || cli.stop_on_fault;
    let config = config
        .with_agent_oracle(agent_oracle)
        .with_oracle_only(oracle_only)
        .with_stop_on_fault(stop_on_fault);
    let load_duration = load_start.elapsed();

    // --- 2. Running ---
    println!("\nRunning {} dialogues...", dialogues.len());
    let run_start = Instant::now();
    let source = AnnotatedExpressions;
    let mut orchestrator = Orchestrator::new(&datastore, &source, config);
    if let Some(patch) = patch {
        orchestrator = orchestrator.with_patch(patch);
    }
    let options = BatchOptions {
        services: (!cli.services.is_empty()).then(|| ServiceFilter::new(&cli.services)),
        start_from: cli.start_from.clone(),
        limit: cli.limit,
    };
    let report = run_batch(&orchestrator, &dialogues, &options);
    let run_duration = run_start.elapsed();

    // --- 3. Reports ---
    write_reports(&cli.output, &report);
    if let Some(path) = &cli.write_state {
        let states = ReportFormatter::format_states(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize states: {}", e)));
        write_file(path, &states);
    }

    println!("\n{}", ReportFormatter::format_summary(&report));
    if let Some(id) = &report.stopped_at {
        println!("Stopped after fault in dialogue {}", id);
    }

    println!("\n--- Performance Summary ---");
    println!("Loading:              {:?}", load_duration);
    println!("Dialogues:            {:?}", run_duration);
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();

    if report.stopped_at.is_some() {
        std::process::exit(2);
    }
}

fn write_reports(prefix: &str, report: &BatchReport) {
    let mut good = String::new();
    let mut bad = String::new();
    let mut good_json = String::new();
    let mut bad_json = String::new();
    for outcome in &report.good {
        good.push_str(&ReportFormatter::format_outcome(outcome));
        push_json_line(&mut good_json, outcome);
    }
    for outcome in &report.bad {
        bad.push_str(&ReportFormatter::format_outcome(outcome));
        if !outcome.turns.is_empty() {
            push_json_line(&mut bad_json, outcome);
        }
    }
    good.push_str(&format!("\nTotal of good dialogues: {}\n", report.good.len()));
    bad.push_str(&format!("\nTotal of bad dialogues: {}\n", report.bad.len()));

    write_file(&format!("{}dialogue_good.txt", prefix), &good);
    write_file(&format!("{}dialogue_bad.txt", prefix), &bad);
    write_file(&format!("{}dialogue.jsonl", prefix), &good_json);
    write_file(&format!("{}dialogue_bad.jsonl", prefix), &bad_json);
}

fn push_json_line(out: &mut String, outcome: &DialogueOutcome) {
    let line = ReportFormatter::format_expressions(outcome)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize expressions: {}", e)));
    out.push_str(&line);
    out.push('\n');
}

fn write_file(path: &str, content: &str) {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to create '{}': {}", parent.display(), e))
        });
    }
    fs::write(path, content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
