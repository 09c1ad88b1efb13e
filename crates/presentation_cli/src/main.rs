//! chaoskit CLI
//!
//! Run chaos experiments, inject one-off faults, and inspect results.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::{ExperimentScheduler, FaultInjectorPort};
use clap::{Parser, Subcommand};
use domain::{ExperimentResult, FaultKind, FaultSpec, WILDCARD_COMPONENT};
use infrastructure::{
    ChaosConfig, FaultInjector, inject_async, init_logging, load_experiment, load_result,
    save_result,
};
use tracing::{info, warn};

/// chaoskit CLI
#[derive(Parser)]
#[command(name = "chaoskit")]
#[command(author, version, about = "Fault injection for resilience testing", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./chaoskit.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a chaos experiment defined in a JSON or YAML file
    ///
    /// Press Ctrl-C to abort the run early; the partial result is still reported.
    Run {
        /// Path to the experiment definition (`.json`, `.yaml` or `.yml`)
        #[arg(short, long, value_name = "PATH")]
        experiment: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json_output: bool,

        /// Also write the result JSON to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Perform a one-off fault injection immediately
    Inject {
        /// Fault type to inject
        #[arg(short, long)]
        fault: FaultKind,

        /// Duration for latency faults (ms)
        #[arg(long, default_value = "500")]
        duration: u64,

        /// Error code for error faults
        #[arg(long, default_value = "500")]
        error_code: i64,

        /// Failure message
        #[arg(long, default_value = "Injected fault")]
        message: String,

        /// Target component label
        #[arg(long, default_value = WILDCARD_COMPONENT)]
        target: String,
    },

    /// Display a result previously written with `run --output`
    Report {
        /// Path to the result file
        #[arg(short, long, value_name = "FILE")]
        result: PathBuf,

        /// Print the raw JSON
        #[arg(long)]
        json_output: bool,
    },

    /// Check that an experiment definition loads and validates
    Validate {
        /// Path to the experiment definition
        #[arg(short, long, value_name = "PATH")]
        experiment: PathBuf,
    },
}

/// Determine log filter override from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Spec for a one-off injection that always fires
fn one_off_spec(
    kind: FaultKind,
    duration_ms: u64,
    error_code: i64,
    message: String,
    target: String,
) -> FaultSpec {
    let mut spec = FaultSpec::new(kind)
        .with_message(message)
        .with_components([target]);
    spec.duration_ms = Some(duration_ms);
    spec.error_code = Some(error_code);
    spec
}

/// Human-readable result summary, one line per entry
fn summary_lines(result: &ExperimentResult) -> Vec<String> {
    let summary = &result.summary;
    let mut lines = vec![
        format!("Status    : {}", result.status),
        format!("Start     : {}", result.start_time.to_rfc3339()),
        format!(
            "End       : {}",
            result
                .end_time
                .map_or_else(|| "n/a".to_string(), |t| t.to_rfc3339())
        ),
        format!("Duration  : {:.2}s", summary.duration_seconds),
        format!("Fired     : {}", summary.total_faults_fired),
    ];
    for (kind, count) in &summary.faults_by_type {
        lines.push(format!("  {kind}: {count}"));
    }
    lines.push(format!("Errors    : {}", summary.total_errors()));
    for (kind, count) in &summary.errors_by_type {
        lines.push(format!("  {kind}: {count}"));
    }
    lines.push(format!(
        "Observations: {} recorded",
        result.observations.len()
    ));
    lines
}

fn print_result(result: &ExperimentResult, json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!();
        for line in summary_lines(result) {
            println!("{line}");
        }
    }
    Ok(())
}

async fn run_experiment(
    config: &ChaosConfig,
    path: &Path,
    json_output: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let experiment = load_experiment(path)?;
    let scheduler = Arc::new(ExperimentScheduler::with_config(
        Arc::new(FaultInjector::new()),
        config.scheduler.to_scheduler_config(),
    ));

    let name = experiment.name.clone();
    let duration_seconds = experiment.duration_seconds;
    let id = scheduler.schedule(experiment)?;

    if !json_output {
        println!("🧪 Running experiment '{name}' (id={id}) for {duration_seconds}s...");
    }

    let mut run = tokio::task::spawn_blocking({
        let scheduler = Arc::clone(&scheduler);
        let id = id.clone();
        move || scheduler.run(&id)
    });

    let result = tokio::select! {
        joined = &mut run => joined??,
        _ = tokio::signal::ctrl_c() => {
            warn!(experiment_id = %id, "Interrupted, aborting experiment");
            scheduler.abort(&id)?;
            run.await??
        },
    };

    if let Some(output) = output {
        save_result(&output, &result)?;
        info!(path = %output.display(), "Result written");
        if !json_output {
            println!("💾 Result written to {}", output.display());
        }
    }

    print_result(&result, json_output)
}

async fn inject_once(spec: FaultSpec) {
    let target = spec.affected_components.join(", ");
    println!("💉 Injecting '{}' fault into component '{target}'...", spec.kind);

    let injector: Arc<dyn FaultInjectorPort> = Arc::new(FaultInjector::new());
    match inject_async(injector, spec).await {
        Ok(()) => println!("✅ Fault injection complete (no failure raised)"),
        Err(e) => println!("💥 Fault raised: {}: {e}", e.type_name()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ChaosConfig::load(cli.config.as_deref())?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_logging(&config.telemetry)?;

    match cli.command {
        Commands::Run {
            experiment,
            json_output,
            output,
        } => {
            run_experiment(&config, &experiment, json_output, output).await?;
        },

        Commands::Inject {
            fault,
            duration,
            error_code,
            message,
            target,
        } => {
            inject_once(one_off_spec(fault, duration, error_code, message, target)).await;
        },

        Commands::Report {
            result,
            json_output,
        } => {
            let loaded = load_result(&result)?;
            print_result(&loaded, json_output)?;
        },

        Commands::Validate { experiment } => match load_experiment(&experiment) {
            Ok(def) => {
                println!(
                    "✅ Valid experiment '{}': {} fault(s), {}s",
                    def.name,
                    def.faults.len(),
                    def.duration_seconds
                );
            },
            Err(e) => {
                println!("❌ {e}");
                std::process::exit(1);
            },
        },
    }

    Ok(())
}
