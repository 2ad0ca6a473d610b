// src/dag/node.rs

//! The capability every unit of work hands to the executor.

use std::future::Future;
use std::pin::Pin;

/// Future returned by [`Node::run`].
pub type NodeFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// A named unit of work with declared dependencies.
///
/// The executor only ever calls `run` once per node and only after every
/// node listed in `parent_ids` has finished.
///
/// Returning an error wrapping [`crate::errors::IgnorableError`] marks the
/// failure as non-fatal: it is logged and children still run. Any other
/// error is fatal for the run.
pub trait Node: Send + Sync {
    /// Unique, stable identifier.
    fn id(&self) -> &str;

    /// IDs of the nodes that must finish before this one starts.
    fn parent_ids(&self) -> &[String];

    /// The effect to perform.
    fn run(&self) -> NodeFuture<'_>;
}
