// src/engine/hooks.rs

//! Observability hook invoked by workers at fixed lifecycle points.
//!
//! Workers never log directly; they call a [`ProcessHook`]. The default
//! [`TracingHook`] turns each call into a structured `tracing` event, and
//! tests can plug in their own implementation to record the sequence.

use tracing::{debug, error, info, warn};

/// Result of a single node action, as seen by the hook.
#[derive(Debug, Clone, Copy)]
pub enum ActionOutcome<'a> {
    Succeeded,
    /// Failed with an ignorable error; children are still notified.
    Ignored(&'a anyhow::Error),
    /// Failed fatally; children are not notified.
    Failed(&'a anyhow::Error),
}

/// Why a worker left the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The dispatch channel was closed and drained.
    ChannelClosed,
    /// The cancellation token fired.
    Cancelled,
    /// The worker reported a fatal node failure.
    FatalFailure,
}

/// Lifecycle callbacks. Every method defaults to a no-op.
pub trait ProcessHook: Send + Sync {
    fn ready_wait_started(&self, _worker: usize, _node: &str, _remaining: usize) {}

    fn ready_wait_finished(&self, _worker: usize, _node: &str) {}

    fn action_started(&self, _worker: usize, _node: &str, _children: usize) {}

    fn action_finished(&self, _worker: usize, _node: &str, _outcome: ActionOutcome<'_>) {}

    fn child_notified(&self, _worker: usize, _parent: &str, _child: &str, _remaining: usize) {}

    /// A parent finished but the child's countdown was already at zero.
    fn child_already_released(&self, _worker: usize, _parent: &str, _child: &str) {}

    fn worker_exited(&self, _worker: usize, _reason: WorkerExit) {}
}

/// Default hook: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl ProcessHook for TracingHook {
    fn ready_wait_started(&self, worker: usize, node: &str, remaining: usize) {
        debug!(worker, node = %node, remaining, "waiting on dependencies");
    }

    fn ready_wait_finished(&self, worker: usize, node: &str) {
        debug!(worker, node = %node, "dependencies satisfied");
    }

    fn action_started(&self, worker: usize, node: &str, children: usize) {
        info!(worker, node = %node, children, "start");
    }

    fn action_finished(&self, worker: usize, node: &str, outcome: ActionOutcome<'_>) {
        match outcome {
            ActionOutcome::Succeeded => info!(worker, node = %node, "finish"),
            ActionOutcome::Ignored(err) => warn!(
                worker,
                node = %node,
                error = %format!("{err:#}"),
                "node failed with ignorable error; continuing"
            ),
            ActionOutcome::Failed(err) => error!(
                worker,
                node = %node,
                error = %format!("{err:#}"),
                "node failed; its dependents will not run"
            ),
        }
    }

    fn child_notified(&self, worker: usize, parent: &str, child: &str, remaining: usize) {
        debug!(
            worker,
            parent = %parent,
            child = %child,
            remaining,
            "notified child that parent is done"
        );
    }

    fn child_already_released(&self, worker: usize, parent: &str, child: &str) {
        warn!(
            worker,
            parent = %parent,
            child = %child,
            "child has no parents left to wait for; notification ignored"
        );
    }

    fn worker_exited(&self, worker: usize, reason: WorkerExit) {
        debug!(worker, ?reason, "worker exited");
    }
}
