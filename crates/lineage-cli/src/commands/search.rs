//! Search command

use clap::Args;

use crate::commands::parse_kv;
use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};
use lineage_filter::{discover_properties, evaluate, FilterQuery, TypeFilter};

#[derive(Args)]
pub struct SearchArgs {
    /// Term matched against node labels and descriptions
    pub term: Option<String>,

    /// Filter by type: all, source, transform, output
    #[arg(short = 't', long, default_value = "all")]
    pub r#type: String,

    /// Property filter as KEY=VALUE (repeatable, all must match)
    #[arg(long = "prop", value_name = "KEY=VALUE")]
    pub prop: Vec<String>,

    /// List discoverable property keys instead of searching
    #[arg(long)]
    pub keys: bool,
}

pub fn run(args: &SearchArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let mut query = FilterQuery::text(args.term.clone().unwrap_or_default())
        .with_type(args.r#type.parse::<TypeFilter>().map_err(anyhow::Error::msg)?);
    for raw in &args.prop {
        let (k, v) = parse_kv(raw)?;
        query = query.with_property_filter(k, v);
    }

    if args.keys {
        for key in discover_properties(ctx.store.nodes(), &query.active_keys()) {
            println!("{key}");
        }
        return Ok(());
    }

    let matched = evaluate(ctx.store.nodes(), &query);
    tracing::info!(matched = matched.len(), "search finished");

    let nodes: Vec<_> = matched
        .iter()
        .filter_map(|id| ctx.store.node(*id))
        .collect();
    match OutputFormat::from(cli.format.as_str()) {
        OutputFormat::Json => println!("{}", output::to_json(&nodes)),
        OutputFormat::Table => {
            if nodes.is_empty() {
                println!("No matching nodes");
            } else {
                print!("{}", output::node_table(&nodes));
            }
        }
    }
    Ok(())
}
