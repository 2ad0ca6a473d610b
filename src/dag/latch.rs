// src/dag/latch.rs

//! Per-task dependency countdown.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Countdown of unfinished parents that a worker can suspend on.
///
/// Many parents call [`count_down`](Self::count_down); exactly one worker
/// calls [`wait`](Self::wait). The count never drops below zero.
#[derive(Debug)]
pub struct DependencyLatch {
    remaining: AtomicUsize,
    notify: Notify,
}

impl DependencyLatch {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            notify: Notify::new(),
        }
    }

    /// Number of parents that have not reported yet.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Suspend until the countdown reaches zero.
    pub async fn wait(&self) {
        loop {
            // Register interest before checking the count so a count_down
            // racing with us cannot be missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Record one finished parent.
    ///
    /// Returns the remaining count, or `None` if the latch was already at
    /// zero (the count is left untouched in that case).
    pub fn count_down(&self) -> Option<usize> {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => {
                self.notify.notify_waiters();
                Some(0)
            }
            Ok(prev) => Some(prev - 1),
            Err(_) => None,
        }
    }
}
