//! Path property check command

use clap::Args;

use crate::{AppContext, Cli};
use lineage_core::{EditSession, NodeId};
use lineage_pathcheck::{resolve_status, LocalPathChecker, PathCheckRequest, PathValidator};

#[derive(Args)]
pub struct CheckArgs {
    /// Node id
    pub node: u64,

    /// Check only this path property key (default: all)
    #[arg(short, long)]
    pub key: Option<String>,
}

pub async fn run(args: &CheckArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let mut session = EditSession::begin(&ctx.store, NodeId(args.node))?;

    let keys: Vec<String> = match &args.key {
        Some(key) => vec![key.clone()],
        None => session.node().path_properties.keys().cloned().collect(),
    };
    if keys.is_empty() {
        println!("Node {} has no path properties", args.node);
        return Ok(());
    }

    let checker = LocalPathChecker::new();
    for key in keys {
        let Some(ticket) = session.begin_path_check(&key) else {
            anyhow::bail!("no path property named {key} on node {}", args.node);
        };
        let value = session.path_property(&key).unwrap_or_default().to_string();

        let response = checker.check_path(&PathCheckRequest::local(&value)).await;
        let status = resolve_status(&response);
        session.record_path_check(&ticket, status);

        match response.error {
            Some(reason) => println!("{key} = {value}: {status} ({reason})"),
            None => println!("{key} = {value}: {status}"),
        }
    }
    Ok(())
}
