//! Dataset version commands

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{Command, CommandOutcome, NodeId, VersionId, VersionMetadata};

#[derive(Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommands,
}

#[derive(Subcommand)]
pub enum VersionCommands {
    /// Create a new dataset version and make it current
    Create {
        /// Node id
        node: u64,
        /// Dataset file path
        path: String,
        /// Version description
        #[arg(short, long, default_value = "")]
        description: String,
        /// File size in bytes
        #[arg(long)]
        size: Option<u64>,
        /// Row count
        #[arg(long)]
        rows: Option<u64>,
        /// Column name (repeatable)
        #[arg(long = "column")]
        columns: Vec<String>,
    },
    /// Switch the current version
    Switch {
        /// Node id
        node: u64,
        /// Version id
        version: VersionId,
    },
    /// Delete a version
    Delete {
        /// Node id
        node: u64,
        /// Version id
        version: VersionId,
    },
    /// List a node's versions
    List {
        /// Node id
        node: u64,
    },
    /// Export a node's version ledger
    Export {
        /// Node id
        node: u64,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a version ledger into a node, replacing its ledger
    Import {
        /// Node id
        node: u64,
        /// Input file (JSON)
        file: PathBuf,
    },
}

pub fn run(args: &VersionArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        VersionCommands::Create {
            node,
            path,
            description,
            size,
            rows,
            columns,
        } => {
            let metadata = if size.is_some() || rows.is_some() || !columns.is_empty() {
                Some(VersionMetadata {
                    size: *size,
                    row_count: *rows,
                    columns: (!columns.is_empty()).then(|| columns.clone()),
                    ..Default::default()
                })
            } else {
                None
            };

            let outcome = ctx.store.apply(Command::CreateVersion {
                node: NodeId(*node),
                path: path.clone(),
                description: description.clone(),
                metadata,
            })?;
            ctx.save()?;
            if let CommandOutcome::VersionCreated(version) = outcome {
                println!("Created version {} ({})", version.id, version.path);
            }
        }
        VersionCommands::Switch { node, version } => {
            let outcome = ctx.store.apply(Command::SwitchVersion {
                node: NodeId(*node),
                version: version.clone(),
            })?;
            ctx.save()?;
            if let CommandOutcome::VersionSwitched(version) = outcome {
                println!("Switched to version {} ({})", version.id, version.path);
            }
        }
        VersionCommands::Delete { node, version } => {
            ctx.store.apply(Command::DeleteVersion {
                node: NodeId(*node),
                version: version.clone(),
            })?;
            ctx.save()?;
            println!("Deleted version {version}");

            let ledger = ctx.store.ledger(NodeId(*node))?;
            match ledger.current_id() {
                Some(current) => println!("Current version is now {current}"),
                None => println!("No versions remain"),
            }
        }
        VersionCommands::List { node } => {
            let ledger = ctx.store.ledger(NodeId(*node))?;
            match OutputFormat::from(cli.format.as_str()) {
                OutputFormat::Json => println!("{}", output::to_json(&ledger.export())),
                OutputFormat::Table => print!(
                    "{}",
                    output::version_table(ledger.versions(), ledger.current_id())
                ),
            }
        }
        VersionCommands::Export { node, output } => {
            let ledger = ctx.store.ledger(NodeId(*node))?;
            let json = serde_json::to_string_pretty(&ledger.export())?;
            match output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    println!("Exported {} versions to {}", ledger.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        VersionCommands::Import { node, file } => {
            let contents = std::fs::read_to_string(file)?;
            let imported = ctx.store.with_ledger(NodeId(*node), |ledger| {
                ledger.import_json(&contents)?;
                Ok(ledger.len())
            })?;
            ctx.save()?;
            println!("Imported {imported} versions into node {node}");
        }
    }
    Ok(())
}
