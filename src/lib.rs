// src/lib.rs

//! In-process executor for a DAG of named units of work.
//!
//! Callers implement [`dag::Node`] for each unit, then hand the batch to
//! [`engine::process`] (or a configured [`engine::Processor`]). The batch is
//! validated into a [`dag::Graph`], dispatched in topological order and run
//! on a fixed-size worker pool; no node starts before all of its parents
//! have finished.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::dag::{Graph, Node};
use crate::engine::Processor;
use crate::errors::Result;
use crate::exec::CommandNode;

pub use crate::engine::process;
pub use crate::errors::{DagError, IgnorableError, ProcessError};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - command nodes
/// - the processor
/// - Ctrl-C handling (cancels the run)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let nodes: Vec<Arc<dyn Node>> = CommandNode::from_config(&cfg)
        .into_iter()
        .map(|n| Arc::new(n) as Arc<dyn Node>)
        .collect();

    let workers = args.workers.unwrap_or(cfg.config.workers);

    if args.dry_run {
        let graph = Graph::build(&nodes)?;
        print_dry_run(&cfg, &graph, workers);
        return Ok(());
    }

    let token = CancellationToken::new();

    // Ctrl-C → stop handing out new nodes.
    {
        let token = token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling run");
            token.cancel();
        });
    }

    Processor::new(workers).run(nodes, token).await
}

/// Print the pipeline and its dispatch order.
fn print_dry_run(cfg: &ConfigFile, graph: &Graph, workers: i64) {
    println!("dagexec dry-run");
    println!("  workers = {}", Processor::new(workers).workers());
    println!();

    println!("nodes ({}), in dispatch order:", graph.len());
    for id in graph.order() {
        println!("  - {id}");
        if let Some(node) = cfg.node.get(id) {
            println!("      cmd: {}", node.cmd);
            if !node.after.is_empty() {
                println!("      after: {:?}", node.after);
            }
            if node.ignore_failure {
                println!("      ignore_failure: true");
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
