// src/engine/processor.rs

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::dag::{Graph, Node};
use crate::engine::dispatcher::spawn_dispatcher;
use crate::engine::hooks::{ProcessHook, TracingHook};
use crate::engine::worker::{WorkerContext, spawn_worker};
use crate::errors::{DagError, Result};

/// Runs a batch of nodes on a fixed-size worker pool.
pub struct Processor {
    workers: usize,
    hook: Arc<dyn ProcessHook>,
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl Processor {
    /// A worker count of zero or less is normalized to 1.
    pub fn new(workers: i64) -> Self {
        let workers = usize::try_from(workers).unwrap_or(0).max(1);
        Self {
            workers,
            hook: Arc::new(TracingHook),
        }
    }

    /// Replace the default [`TracingHook`].
    pub fn with_hook(mut self, hook: Arc<dyn ProcessHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Validate `nodes`, then run every node once its parents are done.
    ///
    /// Returns the first fatal node failure as [`DagError::Process`]. When
    /// that happens, workers blocked on descendants of the failed node are
    /// left behind rather than joined; they never run.
    ///
    /// If `token` fires before every action was invoked the result is
    /// [`DagError::Cancelled`]. Actions already running are not interrupted.
    pub async fn run(&self, nodes: Vec<Arc<dyn Node>>, token: CancellationToken) -> Result<()> {
        if nodes.is_empty() {
            return Err(DagError::NothingToDo);
        }

        let graph = Graph::build(&nodes)?;
        let total = graph.len();
        // No more than one worker per task can ever receive work.
        let workers = self.workers.min(total);
        info!(nodes = total, workers, "starting run");

        let (task_tx, task_rx) = mpsc::channel(1);
        // Each worker reports at most one failure, so sends never block.
        let (err_tx, mut err_rx) = mpsc::channel(workers);
        let invoked = Arc::new(AtomicUsize::new(0));

        // Detached: the dispatcher ends on its own once the channel is
        // drained, cancelled, or every worker has gone.
        let _dispatcher = spawn_dispatcher(graph.into_tasks(), task_tx, token.clone());

        let ctx = WorkerContext {
            tasks: Arc::new(Mutex::new(task_rx)),
            errors: err_tx,
            token: token.clone(),
            hook: Arc::clone(&self.hook),
            invoked: Arc::clone(&invoked),
        };
        let _pool: Vec<_> = (0..workers)
            .map(|id| spawn_worker(id, ctx.clone()))
            .collect();
        // Only workers may hold error senders, so the channel closes exactly
        // when the last worker exits.
        drop(ctx);

        match err_rx.recv().await {
            Some(err) => {
                error!(
                    node = %err.node_id,
                    worker = err.worker_id,
                    "run aborted by fatal node failure"
                );
                Err(err.into())
            }
            None => {
                let invoked = invoked.load(Ordering::Acquire);
                if invoked < total && token.is_cancelled() {
                    warn!(invoked, total, "run cancelled");
                    return Err(DagError::Cancelled);
                }
                info!(invoked, "run complete");
                Ok(())
            }
        }
    }
}

/// Run `nodes` on `workers` workers with the default tracing hook.
///
/// See [`Processor::run`] for the result semantics.
pub async fn process(
    nodes: Vec<Arc<dyn Node>>,
    workers: i64,
    token: CancellationToken,
) -> Result<()> {
    Processor::new(workers).run(nodes, token).await
}
