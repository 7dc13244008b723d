//! Lineage CLI - edit and query a pipeline lineage graph

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check, completions, edge, history, io, node, search, version};
use lineage_core::GraphStore;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version, about = "Data-pipeline lineage graph editor")]
pub struct Cli {
    /// Graph file (default: platform data dir)
    #[arg(short, long, global = true)]
    pub graph: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the graph file path
    pub fn graph_path(&self) -> PathBuf {
        self.graph
            .clone()
            .unwrap_or_else(config::default_graph_file)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage nodes
    Node(node::NodeArgs),
    /// Manage edges
    Edge(edge::EdgeArgs),
    /// Manage dataset versions on a node
    Version(version::VersionArgs),
    /// Manage whole-graph snapshots
    History(history::HistoryArgs),
    /// Search the graph
    Search(search::SearchArgs),
    /// Check path properties against the local filesystem
    Check(check::CheckArgs),
    /// Export the graph to a file or stdout
    Export(io::ExportArgs),
    /// Import a graph file, replacing the current graph
    Import(io::ImportArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context: the loaded graph and where to write it back
pub struct AppContext {
    pub store: GraphStore,
    graph_path: PathBuf,
}

impl AppContext {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let graph_path = cli.graph_path();
        let mut store = GraphStore::new();

        if graph_path.exists() {
            let contents = std::fs::read_to_string(&graph_path)?;
            store.import_json(&contents)?;
            tracing::debug!(path = ?graph_path, nodes = store.nodes().len(), "loaded graph");
        } else {
            tracing::debug!(path = ?graph_path, "starting with an empty graph");
        }

        Ok(Self { store, graph_path })
    }

    /// Rewrite the graph file from the current store
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.graph_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.graph_path.with_extension("json.tmp");
        std::fs::write(&tmp, self.store.export_json()?)?;
        std::fs::rename(&tmp, &self.graph_path)?;
        tracing::debug!(path = ?self.graph_path, "saved graph");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting lineage CLI");

    if let Commands::Completions(args) = &cli.command {
        return completions::run(args);
    }

    let mut ctx = AppContext::load(&cli)?;

    match &cli.command {
        Commands::Node(args) => node::run(args, &cli, &mut ctx)?,
        Commands::Edge(args) => edge::run(args, &cli, &mut ctx)?,
        Commands::Version(args) => version::run(args, &cli, &mut ctx)?,
        Commands::History(args) => history::run(args, &cli, &mut ctx)?,
        Commands::Search(args) => search::run(args, &cli, &ctx)?,
        Commands::Check(args) => check::run(args, &cli, &ctx).await?,
        Commands::Export(args) => io::run_export(args, &cli, &ctx)?,
        Commands::Import(args) => io::run_import(args, &cli, &mut ctx)?,
        Commands::Completions(_) => unreachable!("handled above"),
    }

    Ok(())
}
