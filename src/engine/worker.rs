// src/engine/worker.rs

//! A single member of the worker pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dag::Task;
use crate::engine::hooks::{ActionOutcome, ProcessHook, WorkerExit};
use crate::errors::{ProcessError, is_ignorable};

/// Receiving end of the dispatch channel, shared by every worker.
pub type SharedReceiver = Arc<Mutex<mpsc::Receiver<Arc<Task>>>>;

/// Everything a worker needs besides its id.
#[derive(Clone)]
pub struct WorkerContext {
    pub tasks: SharedReceiver,
    pub errors: mpsc::Sender<ProcessError>,
    pub token: CancellationToken,
    pub hook: Arc<dyn ProcessHook>,
    /// Number of actions invoked so far, across all workers.
    pub invoked: Arc<AtomicUsize>,
}

pub fn spawn_worker(id: usize, ctx: WorkerContext) -> JoinHandle<WorkerExit> {
    tokio::spawn(async move {
        let reason = run_worker(id, &ctx).await;
        ctx.hook.worker_exited(id, reason);
        reason
    })
}

/// Pull tasks until the channel closes, the token fires or a node fails
/// fatally.
///
/// A fatal failure is reported on `ctx.errors` and the worker leaves the
/// pool without notifying the failed task's children. Those children stay
/// blocked in their ready wait for good.
async fn run_worker(id: usize, ctx: &WorkerContext) -> WorkerExit {
    loop {
        let task = tokio::select! {
            biased;

            _ = ctx.token.cancelled() => return WorkerExit::Cancelled,

            next = async { ctx.tasks.lock().await.recv().await } => match next {
                Some(task) => task,
                None => return WorkerExit::ChannelClosed,
            },
        };

        ctx.hook
            .ready_wait_started(id, task.id(), task.latch().remaining());
        task.latch().wait().await;
        ctx.hook.ready_wait_finished(id, task.id());

        ctx.hook.action_started(id, task.id(), task.children().len());
        ctx.invoked.fetch_add(1, Ordering::AcqRel);
        let result = invoke(&task).await;

        match result {
            Ok(()) => ctx.hook.action_finished(id, task.id(), ActionOutcome::Succeeded),
            Err(err) if is_ignorable(&err) => {
                ctx.hook
                    .action_finished(id, task.id(), ActionOutcome::Ignored(&err));
            }
            Err(err) => {
                ctx.hook
                    .action_finished(id, task.id(), ActionOutcome::Failed(&err));
                // The aggregator only needs the first failure; if it already
                // returned, the receiver is gone and this send fails.
                let _ = ctx.errors.send(ProcessError::new(task.id(), id, err)).await;
                return WorkerExit::FatalFailure;
            }
        }

        for child in task.children() {
            match child.latch().count_down() {
                Some(remaining) => ctx.hook.child_notified(id, task.id(), child.id(), remaining),
                None => ctx.hook.child_already_released(id, task.id(), child.id()),
            }
        }
    }
}

/// Run the node's action on its own tokio task so a panicking action turns
/// into a fatal failure instead of silently taking the worker down.
async fn invoke(task: &Arc<Task>) -> anyhow::Result<()> {
    let task = Arc::clone(task);
    match tokio::spawn(async move { task.node().run().await }).await {
        Ok(result) => result,
        Err(join_err) if join_err.is_panic() => Err(anyhow!("node action panicked")),
        Err(join_err) => Err(anyhow!(join_err).context("node action did not complete")),
    }
}
