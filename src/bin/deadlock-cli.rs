//! Deadlock Analyzer CLI
//!
//! Usage:
//!   deadlock-cli detect scenario.json
//!   deadlock-cli detect scenario.json --format json
//!   deadlock-cli validate scenario.json
//!   deadlock-cli template --mode multi --processes 3 --resources 3 --output blank.json
//!   deadlock-cli graph scenario.json

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use deadlock_analyzer::config::{DetectorConfig, LimitsConfig};
use deadlock_analyzer::detection::{report, Mode};
use deadlock_analyzer::{logging, Analyzer, Scenario};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "deadlock-cli")]
#[command(about = "Static deadlock detection over resource allocation snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Largest accepted process count
    #[arg(long, env = "DEADLOCK_MAX_PROCESSES", global = true)]
    max_processes: Option<usize>,

    /// Largest accepted resource count
    #[arg(long, env = "DEADLOCK_MAX_RESOURCES", global = true)]
    max_resources: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run deadlock detection on a scenario file
    Detect {
        /// Scenario JSON file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Check a scenario file without running detection
    Validate {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Write a zero-filled scenario
    Template {
        #[arg(long, value_enum, default_value_t = ModeArg::Single)]
        mode: ModeArg,

        #[arg(short, long, default_value = "3")]
        processes: usize,

        #[arg(short, long, default_value = "3")]
        resources: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the resource-allocation graph of a single-instance scenario
    Graph {
        /// Scenario JSON file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Multi,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => Mode::Single,
            ModeArg::Multi => Mode::Multi,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging_config = DetectorConfig::development().logging;
    logging_config.level = cli.log_level.clone();
    logging::init(&logging_config)?;

    let defaults = LimitsConfig::default();
    let analyzer = Analyzer::new(LimitsConfig {
        max_processes: cli.max_processes.unwrap_or(defaults.max_processes),
        max_resources: cli.max_resources.unwrap_or(defaults.max_resources),
    });

    match cli.command {
        Commands::Detect { file, format } => cmd_detect(&analyzer, &file, format)?,
        Commands::Validate { file } => cmd_validate(&analyzer, &file)?,
        Commands::Template {
            mode,
            processes,
            resources,
            output,
        } => cmd_template(&analyzer, mode.into(), processes, resources, output.as_deref())?,
        Commands::Graph { file } => cmd_graph(&analyzer, &file)?,
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Scenario> {
    Scenario::load(path).with_context(|| format!("reading scenario {}", path.display()))
}

fn cmd_detect(analyzer: &Analyzer, file: &Path, format: Format) -> anyhow::Result<()> {
    let analysis = analyzer.analyze(&load(file)?)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        Format::Text => print!("{}", report::render(&analysis.result)),
    }

    Ok(())
}

fn cmd_validate(analyzer: &Analyzer, file: &Path) -> anyhow::Result<()> {
    let scenario = load(file)?;
    analyzer.validate(&scenario)?;

    println!(
        "Scenario is valid ({} mode, {} processes, {} resources).",
        scenario.mode,
        scenario.processes(),
        scenario.resources()
    );
    Ok(())
}

fn cmd_template(
    analyzer: &Analyzer,
    mode: Mode,
    processes: usize,
    resources: usize,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let scenario = analyzer.template(mode, processes, resources)?;

    match output {
        Some(path) => {
            scenario.save(path)?;
            eprintln!("Wrote {} scenario template to {}", mode, path.display());
        }
        None => println!("{}", scenario.to_json()?),
    }

    Ok(())
}

fn cmd_graph(analyzer: &Analyzer, file: &Path) -> anyhow::Result<()> {
    let analysis = analyzer.analyze(&load(file)?)?;

    let Some(graph) = analysis.result.graph else {
        bail!("resource-allocation graph is only derived in single mode");
    };
    println!("{}", serde_json::to_string_pretty(&graph)?);

    if let Some(cycle) = graph.find_cycle() {
        eprintln!("Cycle: {}", cycle.join(" -> "));
    }

    Ok(())
}
