use std::sync::Arc;

use ludoquiz_core::domain::{Block, ConnectionState, Span};
use ludoquiz_core::impls::{FileBackend, InMemoryBackend, RecordingAnalyticsSink};
use ludoquiz_core::{BridgeBuilder, Document, HostNotification, QuizResult, RunningBridge};

fn sorted(mut results: Vec<QuizResult>) -> Vec<QuizResult> {
    results.sort_by(|a, b| a.id.cmp(&b.id));
    results
}

/// Shut down and collect every notification the bridge sent.
async fn finish(mut running: RunningBridge) -> Vec<HostNotification> {
    running.shutdown_and_join().await;
    let mut out = Vec::new();
    while let Ok(notification) = running.notifications.try_recv() {
        out.push(notification);
    }
    out
}

fn start(backend: InMemoryBackend) -> RunningBridge {
    BridgeBuilder::new()
        .backend(Arc::new(backend))
        .build()
        .unwrap()
        .start()
}

#[tokio::test]
async fn fresh_storage_loads_an_empty_history_once() {
    let running = start(InMemoryBackend::new());
    running.handle.request_initial_results();
    running.handle.request_initial_results();

    let notifications = finish(running).await;
    assert_eq!(notifications, vec![HostNotification::ResultsLoaded(vec![])]);
}

#[tokio::test]
async fn stored_results_are_merged_and_reloaded() {
    let backend = InMemoryBackend::new();

    let running = start(backend.clone());
    running.handle.request_store_result(QuizResult::new("q1", 3));
    running.handle.request_store_result(QuizResult::new("q2", 2));
    let _ = finish(running).await;

    let running = start(backend.clone());
    running.handle.request_store_result(QuizResult::new("q1", 1));
    let _ = finish(running).await;

    let running = start(backend);
    running.handle.request_initial_results();
    let notifications = finish(running).await;

    let [HostNotification::ResultsLoaded(results)] = notifications.as_slice() else {
        panic!("expected exactly one notification, got {notifications:?}");
    };
    assert_eq!(
        sorted(results.clone()),
        vec![QuizResult::new("q1", 3), QuizResult::new("q2", 2)]
    );
}

#[tokio::test]
async fn requests_sent_before_initialize_completes_are_kept() {
    let backend = InMemoryBackend::new();
    let mut running = start(backend.clone());
    for score in [1, 4, 2] {
        running.handle.request_store_result(QuizResult::new("q1", score));
    }
    running.shutdown_and_join().await;

    assert_eq!(running.store().connection_state(), ConnectionState::Ready);
    assert_eq!(running.store().load_all().await, vec![QuizResult::new("q1", 4)]);
}

#[tokio::test]
async fn unavailable_storage_still_answers_with_empty_history() {
    let running = start(InMemoryBackend::unavailable());
    running.handle.request_store_result(QuizResult::new("q1", 3));
    running.handle.request_initial_results();
    running.handle.request_store_result(QuizResult::new("q1", 5));
    running.handle.request_initial_results();

    let notifications = finish(running).await;
    assert_eq!(notifications, vec![HostNotification::ResultsLoaded(vec![])]);
}

#[tokio::test]
async fn load_on_start_delivers_without_a_request() {
    let backend = InMemoryBackend::new();
    let running = start(backend.clone());
    running.handle.request_store_result(QuizResult::new("q1", 2));
    let _ = finish(running).await;

    let running = BridgeBuilder::new()
        .backend(Arc::new(backend))
        .load_on_start(true)
        .build()
        .unwrap()
        .start();
    running.handle.request_initial_results();

    let notifications = finish(running).await;
    assert_eq!(
        notifications,
        vec![HostNotification::ResultsLoaded(vec![QuizResult::new("q1", 2)])]
    );
}

#[tokio::test]
async fn events_reach_the_analytics_sink_in_order() {
    let sink = RecordingAnalyticsSink::new();
    let running = BridgeBuilder::new()
        .backend(Arc::new(InMemoryBackend::new()))
        .analytics(Arc::new(sink.clone()))
        .build()
        .unwrap()
        .start();

    running.handle.log_event("quiz-started");
    running.handle.log_event("quiz-finished");
    let _ = finish(running).await;

    assert_eq!(sink.events(), vec!["quiz-started", "quiz-finished"]);
}

#[tokio::test]
async fn analytics_failures_do_not_disturb_the_bridge() {
    let running = BridgeBuilder::new()
        .backend(Arc::new(InMemoryBackend::new()))
        .analytics(Arc::new(RecordingAnalyticsSink::failing()))
        .build()
        .unwrap()
        .start();

    running.handle.log_event("quiz-started");
    running.handle.request_store_result(QuizResult::new("q1", 1));
    running.handle.request_initial_results();

    let notifications = finish(running).await;
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn requests_after_shutdown_are_dropped_quietly() {
    let backend = InMemoryBackend::new();
    let mut running = start(backend.clone());
    running.shutdown_and_join().await;

    running.handle.request_store_result(QuizResult::new("q1", 3));
    running.handle.request_initial_results();
    assert!(running.notifications.try_recv().is_err());
    assert!(running.store().load_all().await.is_empty());
}

#[tokio::test]
async fn render_blocks_is_synchronous() {
    let running = start(InMemoryBackend::new());
    let doc = Document::new(vec![Block::text("h2", vec![Span::plain("Welcome")])]);

    let markup = running.handle.render_blocks(&doc);
    assert_eq!(markup.to_html(), "<div><h2>Welcome</h2></div>");
    let _ = finish(running).await;
}

#[tokio::test]
async fn file_backed_history_survives_restarts() {
    let dir = tempfile::tempdir().unwrap();

    let running = BridgeBuilder::new()
        .backend(Arc::new(FileBackend::new(dir.path())))
        .build()
        .unwrap()
        .start();
    running.handle.request_store_result(QuizResult::new("q1", 3));
    running.handle.request_store_result(QuizResult::new("q1", 5));
    let _ = finish(running).await;

    let running = BridgeBuilder::new()
        .backend(Arc::new(FileBackend::new(dir.path())))
        .load_on_start(true)
        .build()
        .unwrap()
        .start();
    let notifications = finish(running).await;
    assert_eq!(
        notifications,
        vec![HostNotification::ResultsLoaded(vec![QuizResult::new("q1", 5)])]
    );
}
