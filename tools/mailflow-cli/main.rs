use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use mailflow::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Validate, resolve and schedule node-based email flows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a flow without resolving or sending anything
    Validate {
        /// Path to the flow JSON file
        flow_path: String,
        /// Report every violation instead of stopping at the first
        #[arg(long)]
        all: bool,
    },
    /// Print the jobs a flow resolves to
    Resolve {
        /// Path to the flow JSON file
        flow_path: String,
        /// Print jobs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate, persist and schedule a flow
    Save(SaveArgs),
}

#[derive(Args, Debug)]
struct SaveArgs {
    /// Path to the flow JSON file
    flow_path: String,

    /// Bearer token for the scheduling service
    #[arg(long, env = "MAILFLOW_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Directory the flow snapshot is persisted in
    #[arg(long, default_value = ".mailflow")]
    store_dir: String,

    /// Key the flow snapshot is persisted under
    #[arg(long, default_value = DEFAULT_FLOW_KEY)]
    key: String,

    /// Flow id forwarded with every job
    #[arg(long)]
    flow_id: Option<String>,

    /// Print the payloads instead of sending them
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    http: HttpSchedulerConfig,
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Warning: {}", e);
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { flow_path, all } => run_validate(&flow_path, all),
        Command::Resolve { flow_path, json } => run_resolve(&flow_path, json),
        Command::Save(args) => run_save(args),
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing() -> std::result::Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| format!("invalid log filter: {}", e))?;
    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| format!("failed to initialize tracing: {}", e))
}

fn load_flow(path: &str) -> FlowGraph {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read flow file '{}': {}", path, e)));
    FlowGraph::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flow: {}", e)))
}

fn run_validate(path: &str, all: bool) {
    let flow = load_flow(path);
    let validator = FlowValidator::new(&flow);

    let violations = if all {
        validator.violations()
    } else {
        validator.validate().err().into_iter().collect()
    };

    if violations.is_empty() {
        println!(
            "Flow is valid: {} node(s), {} edge(s)",
            flow.nodes().len(),
            flow.edges().len()
        );
        return;
    }

    for violation in &violations {
        println!("  -> {}", violation);
    }
    exit_with_error(&format!("{} validation error(s)", violations.len()));
}

fn run_resolve(path: &str, json: bool) {
    let flow = load_flow(path);
    FlowValidator::new(&flow)
        .validate()
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));

    let start = Instant::now();
    let jobs = GraphResolver::new(&flow)
        .resolve()
        .unwrap_or_else(|e| exit_with_error(&format!("Resolution failed: {}", e)));
    let duration = start.elapsed();

    if json {
        let output = serde_json::to_string_pretty(&jobs)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode jobs: {}", e)));
        println!("{}", output);
        return;
    }

    println!("Resolved {} job(s) in {:?}", jobs.len(), duration);
    for job in &jobs {
        println!(
            "  -> [{}] '{}' to {} after {}ms{}",
            job.source_email_node_id,
            job.subject,
            job.recipient,
            job.delay_ms,
            job.delay_node_id
                .as_deref()
                .map(|id| format!(" (via {})", id))
                .unwrap_or_else(|| " (default delay)".to_string())
        );
    }
}

fn run_save(args: SaveArgs) {
    let json = fs::read_to_string(&args.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flow file '{}': {}",
            args.flow_path, e
        ))
    });

    let credential = save_credential(args.token, args.dry_run);
    let options = SaveOptions {
        key: args.key,
        flow_id: args.flow_id,
    };
    let store = JsonFileStore::new(&args.store_dir);

    let start = Instant::now();
    let result = if args.dry_run {
        let printer = |payload: &SchedulePayload, _: &Credential| -> std::result::Result<(), SubmitError> {
            let line = serde_json::to_string(payload)
                .map_err(|e| SubmitError::Encoding(e.to_string()))?;
            println!("  -> {}", line);
            Ok(())
        };
        FlowSession::new(store, printer)
            .with_credential(credential)
            .with_options(options)
            .save_json(&json)
    } else {
        let scheduler = HttpScheduler::new(args.http).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to create scheduling client: {}", e))
        });
        FlowSession::new(store, scheduler)
            .with_credential(credential)
            .with_options(options)
            .save_json(&json)
    };
    let duration = start.elapsed();

    match result {
        Ok(report) => {
            println!("{}", report.message());
            println!(
                "Scheduled {} job(s) in {:?}: {}",
                report.submitted.len(),
                duration,
                report.submitted.iter().join(", ")
            );
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            if !e.submitted().is_empty() {
                eprintln!(
                    "Already scheduled and not rolled back: {}",
                    e.submitted().iter().join(", ")
                );
            }
            exit_with_error(&e.to_string());
        }
    }
}

/// Placeholder token for dry runs; nothing is sent, so no real token is required.
const DRY_RUN_TOKEN: &str = "dry-run";

/// The credential a save runs with. A dry run falls back to a placeholder.
fn save_credential(token: Option<String>, dry_run: bool) -> Option<Credential> {
    let credential = Credential::from_optional(token);
    if dry_run {
        credential.or_else(|| Some(Credential::new(DRY_RUN_TOKEN)))
    } else {
        credential
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
