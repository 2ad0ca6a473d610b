use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use dagexec::dag::{Node, NodeFuture};
use dagexec::errors::IgnorableError;

/// What a [`FakeNode`] does when run.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Succeed,
    Ignorable(String),
    Fatal(String),
    Panic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Started(String),
    Finished(String),
}

/// Shared, ordered record of node starts and finishes.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: LogEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Index of `event` in the log, if it happened.
    pub fn position(&self, event: &LogEvent) -> Option<usize> {
        self.events.lock().unwrap().iter().position(|e| e == event)
    }

    pub fn started(&self, id: &str) -> bool {
        self.times_started(id) > 0
    }

    pub fn times_started(&self, id: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, LogEvent::Started(s) if s == id))
            .count()
    }

    /// IDs in the order they started.
    pub fn start_order(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                LogEvent::Started(id) => Some(id.clone()),
                LogEvent::Finished(_) => None,
            })
            .collect()
    }

    /// Panics unless `child` started after every one of `parents` finished.
    pub fn assert_started_after(&self, child: &str, parents: &[&str]) {
        let start = self
            .position(&LogEvent::Started(child.to_string()))
            .unwrap_or_else(|| panic!("{child} never started"));
        for parent in parents {
            let finish = self
                .position(&LogEvent::Finished(parent.to_string()))
                .unwrap_or_else(|| panic!("{parent} never finished"));
            assert!(
                finish < start,
                "{child} started before {parent} finished: {:?}",
                self.events()
            );
        }
    }
}

/// Configurable node for tests.
#[derive(Debug, Clone)]
pub struct FakeNode {
    id: String,
    parents: Vec<String>,
    outcome: FakeOutcome,
    delay: Duration,
    log: ExecutionLog,
}

impl FakeNode {
    pub fn new(id: &str, parents: &[&str], log: &ExecutionLog) -> Self {
        Self {
            id: id.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            outcome: FakeOutcome::Succeed,
            delay: Duration::ZERO,
            log: log.clone(),
        }
    }

    pub fn delay(mut self, dur: Duration) -> Self {
        self.delay = dur;
        self
    }

    pub fn outcome(mut self, outcome: FakeOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn ignorable(self, msg: &str) -> Self {
        self.outcome(FakeOutcome::Ignorable(msg.to_string()))
    }

    pub fn fatal(self, msg: &str) -> Self {
        self.outcome(FakeOutcome::Fatal(msg.to_string()))
    }

    pub fn panics(self) -> Self {
        self.outcome(FakeOutcome::Panic)
    }
}

impl Node for FakeNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_ids(&self) -> &[String] {
        &self.parents
    }

    fn run(&self) -> NodeFuture<'_> {
        Box::pin(async move {
            self.log.push(LogEvent::Started(self.id.clone()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.log.push(LogEvent::Finished(self.id.clone()));

            match &self.outcome {
                FakeOutcome::Succeed => Ok(()),
                FakeOutcome::Ignorable(msg) => Err(anyhow::Error::new(IgnorableError::new(msg.clone()))),
                FakeOutcome::Fatal(msg) => Err(anyhow!(msg.clone())),
                FakeOutcome::Panic => panic!("fake node {} panicked", self.id),
            }
        })
    }
}
