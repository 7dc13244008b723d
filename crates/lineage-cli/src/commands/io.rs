//! Whole-graph import/export commands

use std::path::PathBuf;

use clap::Args;

use crate::{AppContext, Cli};
use lineage_core::Command;

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Input file (JSON graph export)
    pub file: PathBuf,
}

pub fn run_export(args: &ExportArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let json = ctx.store.export_json()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!(
                "Exported {} nodes and {} edges to {}",
                ctx.store.nodes().len(),
                ctx.store.edges().len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_import(args: &ImportArgs, _cli: &Cli, ctx: &mut AppContext) -> anyhow::Result<()> {
    tracing::info!(file = ?args.file, "importing graph");
    let blob = std::fs::read_to_string(&args.file)?;

    ctx.store.apply(Command::ImportGraph { blob })?;
    ctx.save()?;
    println!(
        "Imported {} nodes and {} edges",
        ctx.store.nodes().len(),
        ctx.store.edges().len()
    );
    Ok(())
}
