// src/dag/mod.rs

//! DAG representation.
//!
//! - [`node`] is the capability callers implement for each unit of work.
//! - [`graph`] validates a batch of nodes and derives the dispatch order.
//! - [`task`] is the per-run record a worker executes.
//! - [`latch`] is the dependency countdown a task's ready wait blocks on.

pub mod graph;
pub mod latch;
pub mod node;
pub mod task;

pub use graph::Graph;
pub use latch::DependencyLatch;
pub use node::{Node, NodeFuture};
pub use task::Task;
