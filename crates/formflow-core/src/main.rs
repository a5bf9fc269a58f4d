use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use formflow_core::config::FormflowConfig;
use formflow_core::memory::InMemoryPersistence;
use formflow_core::scenario::{replay, Scenario};
use formflow_core::telemetry::init_tracing;
use formflow_core::VERSION;
use formflow_session::{InMemoryMarkerStore, SessionController, SessionMetadata};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Command::new("formflow-sim")
        .version(VERSION)
        .about("Replay form-entry and review flows against in-memory services")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("replay")
                .about("Run a scripted review scenario")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario JSON document"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("entry")
                .about("Show the entry intent and start controls for session metadata")
                .arg(
                    Arg::new("metadata")
                        .long("metadata")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Session metadata JSON document"),
                ),
        );

    let matches = cli.get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => FormflowConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FormflowConfig::default(),
    };
    init_tracing(&config.telemetry);

    match matches.subcommand() {
        Some(("replay", args)) => {
            let path = args
                .get_one::<PathBuf>("scenario")
                .context("--scenario is required")?;
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let scenario = Scenario::from_json(&document)?;
            let report = replay(scenario, config.routes.clone()).await?;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Initial phase: {:?}", report.initial_phase);
                for (n, step) in report.steps.iter().enumerate() {
                    println!(
                        "  {:>2}. {:<40} {:<18} {:?}  [{}/{}] {}",
                        n + 1,
                        format!("{:?}", step.event),
                        format!("{:?}", step.outcome),
                        step.phase,
                        step.progress.segment,
                        step.progress.total,
                        step.title,
                    );
                }
                println!("Routes: {}", report.routes.join(" -> "));
                println!("Submissions: {}", report.submitted.len());
            }
        }
        Some(("entry", args)) => {
            let path = args
                .get_one::<PathBuf>("metadata")
                .context("--metadata is required")?;
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let metadata: SessionMetadata = serde_json::from_str(&document)
                .with_context(|| format!("parsing {}", path.display()))?;

            let mut controller = SessionController::new(
                config.form.clone(),
                InMemoryPersistence::new(),
                InMemoryMarkerStore::new(),
            );
            let intent = controller.activate(metadata);
            let controls = controller.controls()?;

            println!("{}", serde_json::to_string_pretty(&intent)?);
            println!("{}", serde_json::to_string_pretty(&controls)?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
