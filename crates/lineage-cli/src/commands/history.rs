//! Whole-graph snapshot history commands
//!
//! The history lives in a sibling file of the graph file and is loaded
//! and rewritten around each command, like the graph itself.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::history::DEFAULT_AUTHOR;
use lineage_core::{GraphHistory, SnapshotId};

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Capture the current graph as a new snapshot
    Snapshot {
        /// Snapshot description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Snapshot author
        #[arg(long, default_value = DEFAULT_AUTHOR)]
        author: String,
    },
    /// List snapshots
    List,
    /// Restore the graph from a snapshot
    Restore {
        /// Snapshot id
        id: SnapshotId,
    },
    /// Export the snapshot history
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a snapshot history, replacing the current one
    Import {
        /// Input file (JSON)
        file: PathBuf,
    },
}

fn history_path(cli: &Cli) -> PathBuf {
    cli.graph_path().with_extension("history.json")
}

fn load_history(cli: &Cli) -> anyhow::Result<GraphHistory> {
    let path = history_path(cli);
    let mut history = GraphHistory::new();
    if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        history.import_json(&contents)?;
        tracing::debug!(path = ?path, snapshots = history.len(), "loaded history");
    }
    Ok(history)
}

fn save_history(cli: &Cli, history: &GraphHistory) -> anyhow::Result<()> {
    let path = history_path(cli);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(&history.export())?)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

pub fn run(args: &HistoryArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    let mut history = load_history(cli)?;

    match &args.command {
        HistoryCommands::Snapshot {
            description,
            author,
        } => {
            let snapshot = history.create(ctx.store.export(), description.as_str(), author.as_str());
            println!(
                "Created snapshot {} ({} nodes, {} edges)",
                snapshot.id,
                snapshot.data.nodes.len(),
                snapshot.data.edges.len()
            );
            save_history(cli, &history)?;
        }
        HistoryCommands::List => match OutputFormat::from(cli.format.as_str()) {
            OutputFormat::Json => println!("{}", output::to_json(&history.export())),
            OutputFormat::Table => print!(
                "{}",
                output::snapshot_table(history.snapshots(), history.current_id())
            ),
        },
        HistoryCommands::Restore { id } => {
            let data = history.switch(id)?.data.clone();
            ctx.store.import(data)?;
            ctx.save()?;
            save_history(cli, &history)?;
            println!(
                "Restored snapshot {} ({} nodes, {} edges)",
                id,
                ctx.store.nodes().len(),
                ctx.store.edges().len()
            );
        }
        HistoryCommands::Export { output } => {
            let json = serde_json::to_string_pretty(&history.export())?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    println!("Exported {} snapshots to {}", history.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        HistoryCommands::Import { file } => {
            let contents = std::fs::read_to_string(file)?;
            history.import_json(&contents)?;
            save_history(cli, &history)?;
            println!("Imported {} snapshots", history.len());
        }
    }
    Ok(())
}
