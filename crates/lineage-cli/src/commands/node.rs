//! Node commands

use clap::{Args, Subcommand};

use crate::commands::parse_kv;
use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};
use lineage_core::{Command, CommandOutcome, NewNode, NodeId, NodePatch, NodeType};

#[derive(Args)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommands,
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Add a new node
    Add {
        /// Node label
        label: String,
        /// Node type: source, transform, output
        #[arg(short = 't', long, default_value = "transform")]
        r#type: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Properties as KEY=VALUE (repeatable)
        #[arg(long = "prop", value_name = "KEY=VALUE")]
        prop: Vec<String>,
        /// Path properties as KEY=PATH (repeatable)
        #[arg(long = "path-prop", value_name = "KEY=PATH")]
        path_prop: Vec<String>,
    },
    /// Update an existing node
    Update {
        /// Node id
        id: u64,
        /// New label
        #[arg(long)]
        label: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New type: source, transform, output
        #[arg(long = "set-type")]
        r#type: Option<String>,
        /// Set properties as KEY=VALUE (repeatable)
        #[arg(long = "prop", value_name = "KEY=VALUE")]
        prop: Vec<String>,
        /// Set path properties as KEY=PATH (repeatable)
        #[arg(long = "path-prop", value_name = "KEY=PATH")]
        path_prop: Vec<String>,
    },
    /// Delete a node and its incident edges
    Delete {
        /// Node id
        id: u64,
    },
    /// Show one node in full
    Show {
        /// Node id
        id: u64,
    },
    /// List nodes
    List {
        /// Filter by type
        #[arg(short = 't', long)]
        r#type: Option<String>,
    },
}

pub fn run(args: &NodeArgs, cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    match &args.command {
        NodeCommands::Add {
            label,
            r#type,
            description,
            prop,
            path_prop,
        } => {
            let mut draft = NewNode::new(label).with_type(r#type.parse::<NodeType>()?);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            for raw in prop {
                let (k, v) = parse_kv(raw)?;
                draft = draft.with_property(k, v);
            }
            for raw in path_prop {
                let (k, v) = parse_kv(raw)?;
                draft = draft.with_path_property(k, v);
            }

            let outcome = ctx.store.apply(Command::AddNode { draft })?;
            ctx.save()?;
            if let CommandOutcome::NodeAdded(node) = outcome {
                println!("Added node {} ({}: {})", node.id, node.node_type, node.label);
            }
        }
        NodeCommands::Update {
            id,
            label,
            description,
            r#type,
            prop,
            path_prop,
        } => {
            let mut patch = NodePatch::new();
            if let Some(label) = label {
                patch = patch.set_label(label);
            }
            if let Some(description) = description {
                patch = patch.set_description(description);
            }
            if let Some(t) = r#type {
                patch = patch.set_type(t.parse::<NodeType>()?);
            }
            for raw in prop {
                let (k, v) = parse_kv(raw)?;
                patch = patch.set_property(k, v);
            }
            for raw in path_prop {
                let (k, v) = parse_kv(raw)?;
                patch = patch.set_path_property(k, v);
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass --label, --description, --set-type, --prop or --path-prop");
            }

            ctx.store.apply(Command::UpdateNode {
                id: NodeId(*id),
                patch,
            })?;
            ctx.save()?;
            println!("Updated node {id}");
        }
        NodeCommands::Delete { id } => {
            let outcome = ctx.store.apply(Command::DeleteNode { id: NodeId(*id) })?;
            ctx.save()?;
            if let CommandOutcome::NodeDeleted(node) = outcome {
                println!("Deleted node {} ({})", node.id, node.label);
            }
        }
        NodeCommands::Show { id } => {
            let node = ctx
                .store
                .node(NodeId(*id))
                .ok_or_else(|| anyhow::anyhow!("node not found: {id}"))?;
            println!("{}", output::to_json(node));
        }
        NodeCommands::List { r#type } => {
            let type_filter = r#type
                .as_deref()
                .map(str::parse::<NodeType>)
                .transpose()?;
            let nodes: Vec<_> = ctx
                .store
                .nodes()
                .iter()
                .filter(|n| type_filter.map_or(true, |t| n.node_type == t))
                .collect();

            match OutputFormat::from(cli.format.as_str()) {
                OutputFormat::Json => println!("{}", output::to_json(&nodes)),
                OutputFormat::Table => print!("{}", output::node_table(&nodes)),
            }
        }
    }
    Ok(())
}
