//! Edge commands

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{Command, CommandOutcome, EdgeId, NodeId};

#[derive(Args)]
pub struct EdgeArgs {
    #[command(subcommand)]
    pub command: EdgeCommands,
}

#[derive(Subcommand)]
pub enum EdgeCommands {
    /// Add a directed edge between two nodes
    Add {
        /// Source node id
        from: u64,
        /// Target node id
        to: u64,
    },
    /// Delete an edge by id
    Delete {
        /// Edge id
        id: String,
    },
    /// List edges
    List,
}

pub fn run(args: &EdgeArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        EdgeCommands::Add { from, to } => {
            let outcome = ctx.store.apply(Command::AddEdge {
                from: NodeId(*from),
                to: NodeId(*to),
            })?;
            ctx.save()?;
            if let CommandOutcome::EdgeAdded(edge) = outcome {
                println!(
                    "Added edge {} ({} -> {})",
                    edge.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                    edge.from,
                    edge.to
                );
            }
        }
        EdgeCommands::Delete { id } => {
            ctx.store.apply(Command::DeleteEdge {
                id: EdgeId::from(id.as_str()),
            })?;
            ctx.save()?;
            println!("Deleted edge {id}");
        }
        EdgeCommands::List => match OutputFormat::from(cli.format.as_str()) {
            OutputFormat::Json => println!("{}", output::to_json(&ctx.store.edges())),
            OutputFormat::Table => print!("{}", output::edge_table(ctx.store.edges())),
        },
    }
    Ok(())
}
