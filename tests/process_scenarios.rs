// tests/process_scenarios.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use dagexec::engine::{Processor, process};
use dagexec::errors::DagError;
use dagexec_test_utils::{ExecutionLog, HookEvent, NodeSetBuilder, RecordingHook};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn diamond_runs_join_after_both_branches() {
    init_tracing();

    let log = ExecutionLog::new();
    let nodes = NodeSetBuilder::new(&log)
        .node("A", &[])
        .node_with("B", &["A"], |n| n.delay(Duration::from_millis(20)))
        .node_with("C", &["A"], |n| n.delay(Duration::from_millis(10)))
        .node("D", &["B", "C"])
        .build();

    with_timeout(process(nodes, 2, CancellationToken::new()))
        .await
        .unwrap();

    for id in ["A", "B", "C", "D"] {
        assert_eq!(log.times_started(id), 1, "{id} should run exactly once");
    }
    log.assert_started_after("B", &["A"]);
    log.assert_started_after("C", &["A"]);
    log.assert_started_after("D", &["B", "C"]);
}

#[tokio::test]
async fn declaration_order_does_not_matter() {
    init_tracing();

    let log = ExecutionLog::new();
    let nodes = NodeSetBuilder::new(&log)
        .node("D", &["B", "C"])
        .node("C", &["A"])
        .node("B", &["A"])
        .node("A", &[])
        .build();

    with_timeout(process(nodes, 1, CancellationToken::new()))
        .await
        .unwrap();

    assert_eq!(log.start_order().first().map(String::as_str), Some("A"));
    assert_eq!(log.start_order().last().map(String::as_str), Some("D"));
}

#[tokio::test]
async fn non_positive_worker_count_still_completes() {
    init_tracing();

    for workers in [0, -3] {
        let log = ExecutionLog::new();
        let nodes = NodeSetBuilder::new(&log)
            .node("A", &[])
            .node("B", &["A"])
            .node("C", &["B"])
            .build();

        with_timeout(process(nodes, workers, CancellationToken::new()))
            .await
            .unwrap();
        assert_eq!(log.start_order(), vec!["A", "B", "C"]);
    }
}

#[tokio::test]
async fn huge_worker_count_is_capped_by_node_count() {
    init_tracing();

    let log = ExecutionLog::new();
    let hook = Arc::new(RecordingHook::new());
    let nodes = NodeSetBuilder::new(&log)
        .node("A", &[])
        .node("B", &["A"])
        .build();

    let processor = Processor::new(i64::MAX).with_hook(hook.clone());
    assert_eq!(processor.workers(), usize::try_from(i64::MAX).unwrap());

    with_timeout(processor.run(nodes, CancellationToken::new()))
        .await
        .unwrap();

    assert_eq!(log.start_order(), vec!["A", "B"]);
    assert_eq!(hook.worker_exits().len(), 2, "one worker per node at most");
}

#[tokio::test]
async fn max_worker_count_through_process() {
    init_tracing();

    let log = ExecutionLog::new();
    let nodes = NodeSetBuilder::new(&log).node("A", &[]).build();

    with_timeout(process(nodes, i64::MAX, CancellationToken::new()))
        .await
        .unwrap();
    assert_eq!(log.times_started("A"), 1);
}

#[tokio::test]
async fn wide_graph_runs_every_node_once() {
    init_tracing();

    let log = ExecutionLog::new();
    let mut builder = NodeSetBuilder::new(&log).node("root", &[]);
    let mids: Vec<String> = (0..20).map(|i| format!("mid_{i}")).collect();
    for id in &mids {
        builder = builder.node_with(id, &["root"], |n| n.delay(Duration::from_millis(2)));
    }
    let mid_refs: Vec<&str> = mids.iter().map(String::as_str).collect();
    let nodes = builder.node("sink", &mid_refs).build();

    with_timeout(process(nodes, 8, CancellationToken::new()))
        .await
        .unwrap();

    assert_eq!(log.times_started("root"), 1);
    for id in &mids {
        assert_eq!(log.times_started(id), 1);
    }
    log.assert_started_after("sink", &mid_refs);
}

#[tokio::test]
async fn ignorable_failure_still_releases_children() {
    init_tracing();

    let log = ExecutionLog::new();
    let hook = Arc::new(RecordingHook::new());
    let nodes = NodeSetBuilder::new(&log)
        .node_with("A", &[], |n| n.ignorable("optional step skipped"))
        .node("B", &["A"])
        .build();

    with_timeout(
        Processor::new(1)
            .with_hook(hook.clone())
            .run(nodes, CancellationToken::new()),
    )
    .await
    .unwrap();

    assert!(log.started("B"));
    let events = hook.events();
    assert!(events.contains(&HookEvent::ActionIgnored {
        worker: 0,
        node: "A".to_string()
    }));
    assert!(events.contains(&HookEvent::ChildNotified {
        parent: "A".to_string(),
        child: "B".to_string(),
        remaining: 0,
    }));
}

#[tokio::test]
async fn hook_sees_lifecycle_in_order() {
    init_tracing();

    let log = ExecutionLog::new();
    let hook = Arc::new(RecordingHook::new());
    let nodes = NodeSetBuilder::new(&log).node("only", &[]).build();

    with_timeout(
        Processor::new(1)
            .with_hook(hook.clone())
            .run(nodes, CancellationToken::new()),
    )
    .await
    .unwrap();

    let node = || "only".to_string();
    assert_eq!(
        hook.events(),
        vec![
            HookEvent::ReadyWaitStarted { worker: 0, node: node() },
            HookEvent::ReadyWaitFinished { worker: 0, node: node() },
            HookEvent::ActionStarted { worker: 0, node: node() },
            HookEvent::ActionSucceeded { worker: 0, node: node() },
            HookEvent::WorkerExited {
                worker: 0,
                reason: dagexec::engine::WorkerExit::ChannelClosed
            },
        ]
    );
}

#[tokio::test]
async fn construction_errors_run_nothing() {
    init_tracing();

    let log = ExecutionLog::new();

    let cyclic = NodeSetBuilder::new(&log)
        .node("A", &["B"])
        .node("B", &["A"])
        .build();
    let err = process(cyclic, 2, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, DagError::Cycle(_)), "got {err:?}");

    let unresolved = NodeSetBuilder::new(&log).node("A", &["Z"]).build();
    let err = process(unresolved, 2, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, DagError::UnresolvedDependency { ref node, ref parent } if node == "A" && parent == "Z"),
        "got {err:?}"
    );

    let duplicate = NodeSetBuilder::new(&log).node("A", &[]).node("A", &[]).build();
    let err = process(duplicate, 2, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DagError::DuplicateId(ref id) if id == "A"), "got {err:?}");

    let err = process(Vec::new(), 2, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DagError::NothingToDo));
    assert_eq!(err.to_string(), "nothing to do");

    assert!(log.events().is_empty(), "no action may run: {:?}", log.events());
}
