use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};

use irgraph_core::config::Config;
use irgraph_core::graph::open_store;
use irgraph_core::llm::Provider;
use irgraph_core::run::{IncidentRun, RunOptions, RunReport};
use irgraph_core::storage::{fingerprint, FileRunStore, RunStore};
use irgraph_core::subgraph::SubgraphBuilder;

#[derive(Parser)]
#[command(name = "irgraph")]
#[command(about = "Ground incident-response playbooks in an ontology graph", long_about = None)]
struct Cli {
    /// Config file to use instead of the default search path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// File holding the incident or alert text
    #[arg(long)]
    alert: PathBuf,

    /// Comma-separated seed labels; skips the planner
    #[arg(long, value_delimiter = ',')]
    seeds: Option<Vec<String>>,

    /// Where to write run artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the round cap
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Do not write run artifacts
    #[arg(long)]
    no_save: bool,

    /// Print the full run report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and explore the ontology for an incident
    Explore(RunArgs),
    /// Explore, then synthesize a playbook
    Generate(RunArgs),
    /// Show how labels resolve to seed nodes
    Resolve {
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// List stored runs for an incident
    Runs {
        #[arg(long)]
        alert: PathBuf,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("loading {}", path.display()))?,
        None => Config::load().wrap_err("loading configuration")?,
    };

    match cli.command {
        Commands::Explore(args) => run(config, args, false).await,
        Commands::Generate(args) => run(config, args, true).await,
        Commands::Resolve { labels } => resolve(config, &labels).await,
        Commands::Runs { alert } => list_runs(config, &alert),
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

fn read_alert(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading alert {}", path.display()))?;
    if text.trim().is_empty() {
        return Err(eyre!("alert file {} is empty", path.display()));
    }
    Ok(text)
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

async fn run(mut config: Config, args: RunArgs, playbook: bool) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.to_string_lossy().into_owned();
    }
    if let Some(rounds) = args.max_rounds {
        config.exploration.max_rounds = rounds;
    }

    let incident = read_alert(&args.alert)?;
    let llm = Provider::build_from_config(&config.llm).wrap_err("building LLM client")?;
    let store = open_store(&config.graph)
        .await
        .wrap_err("opening graph store")?;

    let bar = spinner(if playbook {
        "Exploring ontology and writing playbook"
    } else {
        "Exploring ontology"
    });
    let report = IncidentRun::new(llm, store.as_ref(), config.exploration.clone())
        .execute(
            &incident,
            RunOptions {
                seed_labels: args.seeds,
                synthesize_playbook: playbook,
            },
        )
        .await;
    bar.finish_and_clear();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if args.no_save {
        return Ok(());
    }
    let runs = FileRunStore::new(config.output.clone());
    let dir = report.persist(&runs).wrap_err("saving run")?;
    tracing::info!(dir = %dir.display(), "run saved");

    Ok(())
}

fn print_summary(report: &RunReport) {
    let exploration = &report.exploration;
    println!("Run {}", report.key);
    println!("  Seeds:      {}", report.seed.initial_nodes.join(", "));
    if !exploration.unresolved_labels.is_empty() {
        println!("  Unresolved: {}", exploration.unresolved_labels.join(", "));
    }
    println!(
        "  Result:     {} after {} round(s)",
        exploration.state, exploration.rounds
    );
    println!(
        "  Subgraph:   {} nodes, {} relationships",
        exploration.subgraph.node_count(),
        exploration.subgraph.relationship_count()
    );
    for round in &exploration.history {
        println!(
            "    round {:>2}: expanded {}, +{} nodes, +{} relationships",
            round.round,
            round.requested.len(),
            round.nodes_added,
            round.relationships_added
        );
    }
    if let Some(playbook) = &report.playbook {
        println!();
        println!("{}", playbook.incident_summary.overview);
    }
}

async fn resolve(config: Config, labels: &[String]) -> Result<()> {
    let store = open_store(&config.graph)
        .await
        .wrap_err("opening graph store")?;
    let builder = SubgraphBuilder::new(store.as_ref())
        .with_neighbor_limit(config.exploration.neighbor_limit);
    let report = builder.build_initial(labels, 0).await?;

    for uri in &report.seeds {
        let label = report
            .subgraph
            .node(uri)
            .map(|n| n.display_label())
            .unwrap_or(uri.as_str());
        println!("{}  {}", label, uri);
    }
    for label in &report.unresolved {
        println!("{}  (no match)", label);
    }
    Ok(())
}

fn list_runs(config: Config, alert: &Path) -> Result<()> {
    let incident = read_alert(alert)?;
    let print = fingerprint(&incident);
    let runs = FileRunStore::new(config.output).list_runs(&print)?;

    if runs.is_empty() {
        println!("No runs recorded for {}", print);
    }
    for run in runs {
        println!("{}/{}", print, run);
    }
    Ok(())
}
