// tests/cancellation.rs

mod common;
use crate::common::{SETTLE, init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use dagexec::engine::{Processor, WorkerExit, process};
use dagexec::errors::DagError;
use dagexec_test_utils::{ExecutionLog, NodeSetBuilder, RecordingHook};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn cancelled_before_start_runs_nothing() {
    init_tracing();

    let log = ExecutionLog::new();
    let hook = Arc::new(RecordingHook::new());
    let nodes = NodeSetBuilder::new(&log)
        .node("A", &[])
        .node("B", &["A"])
        .build();

    let token = CancellationToken::new();
    token.cancel();

    let err = with_timeout(Processor::new(2).with_hook(hook.clone()).run(nodes, token))
        .await
        .unwrap_err();
    assert!(matches!(err, DagError::Cancelled), "got {err:?}");
    assert!(log.events().is_empty());
    assert_eq!(
        hook.worker_exits(),
        vec![WorkerExit::Cancelled, WorkerExit::Cancelled]
    );
}

#[tokio::test]
async fn running_action_is_not_interrupted() {
    init_tracing();

    let log = ExecutionLog::new();
    let nodes = NodeSetBuilder::new(&log)
        .node_with("A", &[], |n| n.delay(Duration::from_millis(100)))
        .node("B", &["A"])
        .build();

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
    }

    let err = with_timeout(process(nodes, 1, token)).await.unwrap_err();
    assert!(matches!(err, DagError::Cancelled), "got {err:?}");

    tokio::time::sleep(SETTLE).await;
    assert!(log.events().contains(&dagexec_test_utils::LogEvent::Finished("A".into())));
    assert!(!log.started("B"));
}

#[tokio::test]
async fn cancelling_after_completion_is_harmless() {
    init_tracing();

    let log = ExecutionLog::new();
    let nodes = NodeSetBuilder::new(&log)
        .node("A", &[])
        .node("B", &["A"])
        .build();

    let token = CancellationToken::new();
    with_timeout(process(nodes, 2, token.clone())).await.unwrap();
    token.cancel();

    assert_eq!(log.start_order(), vec!["A", "B"]);
}
