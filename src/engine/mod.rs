// src/engine/mod.rs

//! Execution engine.
//!
//! A run is one dispatcher feeding tasks in topological order into a
//! hand-off channel, and a fixed pool of workers pulling from it:
//!
//! - [`dispatcher`] owns the send side and never reorders.
//! - [`worker`] blocks on each task's ready wait, runs the action, then
//!   notifies children.
//! - [`processor`] validates input, wires the two together and reports the
//!   first fatal failure.
//! - [`hooks`] is the observability interface workers report through.
//!
//! Liveness: the first task in the order has no parents, and every
//! ancestor of a task is dispatched before it, so with at least one worker
//! some ready wait always resolves. This only holds because dispatch
//! follows a valid topological order.

pub mod dispatcher;
pub mod hooks;
pub mod processor;
pub mod worker;

pub use hooks::{ActionOutcome, ProcessHook, TracingHook, WorkerExit};
pub use processor::{Processor, process};
