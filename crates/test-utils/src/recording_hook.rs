use std::sync::Mutex;

use dagexec::engine::{ActionOutcome, ProcessHook, WorkerExit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    ReadyWaitStarted { worker: usize, node: String },
    ReadyWaitFinished { worker: usize, node: String },
    ActionStarted { worker: usize, node: String },
    ActionSucceeded { worker: usize, node: String },
    ActionIgnored { worker: usize, node: String },
    ActionFailed { worker: usize, node: String },
    ChildNotified { parent: String, child: String, remaining: usize },
    ChildAlreadyReleased { parent: String, child: String },
    WorkerExited { worker: usize, reason: WorkerExit },
}

/// Hook that records every callback, in order.
#[derive(Debug, Default)]
pub struct RecordingHook {
    events: Mutex<Vec<HookEvent>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn worker_exits(&self) -> Vec<WorkerExit> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HookEvent::WorkerExited { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: HookEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProcessHook for RecordingHook {
    fn ready_wait_started(&self, worker: usize, node: &str, _remaining: usize) {
        self.push(HookEvent::ReadyWaitStarted {
            worker,
            node: node.to_string(),
        });
    }

    fn ready_wait_finished(&self, worker: usize, node: &str) {
        self.push(HookEvent::ReadyWaitFinished {
            worker,
            node: node.to_string(),
        });
    }

    fn action_started(&self, worker: usize, node: &str, _children: usize) {
        self.push(HookEvent::ActionStarted {
            worker,
            node: node.to_string(),
        });
    }

    fn action_finished(&self, worker: usize, node: &str, outcome: ActionOutcome<'_>) {
        let node = node.to_string();
        self.push(match outcome {
            ActionOutcome::Succeeded => HookEvent::ActionSucceeded { worker, node },
            ActionOutcome::Ignored(_) => HookEvent::ActionIgnored { worker, node },
            ActionOutcome::Failed(_) => HookEvent::ActionFailed { worker, node },
        });
    }

    fn child_notified(&self, _worker: usize, parent: &str, child: &str, remaining: usize) {
        self.push(HookEvent::ChildNotified {
            parent: parent.to_string(),
            child: child.to_string(),
            remaining,
        });
    }

    fn child_already_released(&self, _worker: usize, parent: &str, child: &str) {
        self.push(HookEvent::ChildAlreadyReleased {
            parent: parent.to_string(),
            child: child.to_string(),
        });
    }

    fn worker_exited(&self, worker: usize, reason: WorkerExit) {
        self.push(HookEvent::WorkerExited { worker, reason });
    }
}
