// src/engine/dispatcher.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::dag::Task;

/// Spawn the dispatcher.
///
/// Sends `tasks` one by one, strictly in the given (topological) order, and
/// closes the channel by dropping the sender when done. Workers only make
/// progress without deadlocking because of this ordering, so nothing here
/// may skip or reorder.
///
/// Stops early if the token fires or every receiver is gone.
pub fn spawn_dispatcher(
    tasks: Vec<Arc<Task>>,
    tx: mpsc::Sender<Arc<Task>>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let total = tasks.len();
        let mut sent = 0usize;

        for task in tasks {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    debug!(sent, total, "dispatcher cancelled");
                    return;
                }

                res = tx.send(task) => {
                    if let Err(mpsc::error::SendError(task)) = res {
                        debug!(
                            node = %task.id(),
                            sent,
                            total,
                            "no workers left to receive; dispatcher stopping"
                        );
                        return;
                    }
                    sent += 1;
                }
            }
        }

        debug!(sent, "dispatcher finished; closing channel");
    })
}
