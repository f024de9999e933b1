//! Integration tests for the dashboard event relay
//!
//! Covers the observable relay contract end to end with mock seams:
//! - deferred success for modern-mode dual builds
//! - synchronized dual progress bars
//! - serve-task notification sequences
//! - stats-file ingestion (real files via FileStatsSource)
//! - fail-forward behavior on missing stats files

use std::sync::Arc;

use serde_json::{json, Value};

use buildboard::{
    DashboardEntry, DashboardPayload, DashboardRelay, EntryKind, FileStatsSource, IpcMessage,
    MockNotifier, MockStatsSource, SharedData, TaskType, UiPlugin,
};

// ============================================================================
// Test helpers
// ============================================================================

struct Harness {
    relay: Arc<DashboardRelay>,
    store: SharedData,
    notifier: Arc<MockNotifier>,
    stats: Arc<MockStatsSource>,
}

fn harness() -> Harness {
    let store = SharedData::new();
    let notifier = Arc::new(MockNotifier::new());
    let stats = Arc::new(MockStatsSource::new());
    let relay = Arc::new(DashboardRelay::new(
        store.namespace(""),
        stats.clone(),
        notifier.clone(),
    ));
    relay.attach();
    Harness {
        relay,
        store,
        notifier,
        stats,
    }
}

fn modern_harness() -> Harness {
    let h = harness();
    h.store.set("modern-mode", json!(true));
    h
}

fn message(task: TaskType, entries: Vec<(EntryKind, Value)>) -> IpcMessage {
    IpcMessage {
        webpack_dashboard_data: Some(DashboardPayload {
            kind: task,
            value: entries
                .into_iter()
                .map(|(kind, value)| DashboardEntry { kind, value })
                .collect(),
        }),
        vue_serve: None,
    }
}

fn status(task: TaskType, value: &str) -> IpcMessage {
    message(task, vec![(EntryKind::Status, json!(value))])
}

fn progress(task: TaskType, value: i64) -> IpcMessage {
    message(task, vec![(EntryKind::Progress, json!(value))])
}

// ============================================================================
// Deferred modern-build success
// ============================================================================

#[tokio::test]
async fn build_success_is_deferred_until_modern_build_succeeds() {
    let h = modern_harness();

    h.relay
        .handle_message(&status(TaskType::Build, "Success"))
        .await
        .unwrap();
    assert!(h.store.get("build-status").is_none());
    assert!(h.store.get("build-modern-status").is_none());

    h.relay
        .handle_message(&status(TaskType::BuildModern, "Success"))
        .await
        .unwrap();
    assert_eq!(h.store.get("build-status").unwrap(), "Success");
    assert_eq!(h.store.get("build-modern-status").unwrap(), "Success");
}

#[tokio::test]
async fn non_success_build_statuses_pass_through_in_modern_mode() {
    let h = modern_harness();

    h.relay
        .handle_message(&status(TaskType::Build, "Compiling"))
        .await
        .unwrap();
    assert_eq!(h.store.get("build-status").unwrap(), "Compiling");

    h.relay
        .handle_message(&status(TaskType::Build, "Failed"))
        .await
        .unwrap();
    assert_eq!(h.store.get("build-status").unwrap(), "Failed");
}

#[tokio::test]
async fn build_success_stores_directly_without_modern_mode() {
    let h = harness();

    h.relay
        .handle_message(&status(TaskType::Build, "Success"))
        .await
        .unwrap();
    assert_eq!(h.store.get("build-status").unwrap(), "Success");
    assert!(h.store.get("build-modern-status").is_none());
}

// ============================================================================
// Dual progress bars
// ============================================================================

#[tokio::test]
async fn modern_progress_merges_under_both_keys() {
    let h = modern_harness();

    h.relay
        .handle_message(&progress(TaskType::Build, 30))
        .await
        .unwrap();
    let expected = json!({ "build": 30, "build-modern": 0 });
    assert_eq!(h.store.get("build-progress").unwrap(), expected);
    assert_eq!(h.store.get("build-modern-progress").unwrap(), expected);

    h.relay
        .handle_message(&progress(TaskType::BuildModern, 50))
        .await
        .unwrap();
    let expected = json!({ "build": 30, "build-modern": 50 });
    assert_eq!(h.store.get("build-progress").unwrap(), expected);
    assert_eq!(h.store.get("build-modern-progress").unwrap(), expected);
}

#[tokio::test]
async fn serve_progress_never_merges() {
    let h = modern_harness();

    h.relay
        .handle_message(&progress(TaskType::Serve, 10))
        .await
        .unwrap();
    assert_eq!(h.store.get("serve-progress").unwrap(), json!({ "serve": 10 }));
    assert!(h.store.get("build-progress").is_none());
}

// ============================================================================
// Serve notifications
// ============================================================================

#[tokio::test]
async fn first_success_notifies_app_ready_exactly_once() {
    let h = harness();

    h.relay
        .handle_message(&status(TaskType::Serve, "Success"))
        .await
        .unwrap();
    h.relay
        .handle_message(&status(TaskType::Serve, "Success"))
        .await
        .unwrap();

    assert_eq!(h.notifier.titles(), vec!["App ready"]);
}

#[tokio::test]
async fn failed_then_success_notifies_failed_then_fixed() {
    let h = harness();

    h.relay
        .handle_message(&status(TaskType::Serve, "Failed"))
        .await
        .unwrap();
    h.relay
        .handle_message(&status(TaskType::Serve, "Success"))
        .await
        .unwrap();

    assert_eq!(h.notifier.titles(), vec!["Build failed", "Build fixed"]);
}

#[tokio::test]
async fn full_serve_session_notification_sequence() {
    let h = harness();

    for value in ["Success", "Failed", "Success", "Success"] {
        h.relay
            .handle_message(&status(TaskType::Serve, value))
            .await
            .unwrap();
    }

    assert_eq!(
        h.notifier.titles(),
        vec!["App ready", "Build failed", "Build fixed"]
    );
}

#[tokio::test]
async fn build_statuses_never_notify() {
    let h = harness();

    h.relay
        .handle_message(&status(TaskType::Build, "Failed"))
        .await
        .unwrap();
    h.relay
        .handle_message(&status(TaskType::Build, "Success"))
        .await
        .unwrap();

    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn session_reset_rearms_first_run() {
    let h = harness();

    h.relay
        .handle_message(&status(TaskType::Serve, "Success"))
        .await
        .unwrap();
    h.relay.reset_session();
    h.relay
        .handle_message(&status(TaskType::Serve, "Success"))
        .await
        .unwrap();

    assert_eq!(h.notifier.titles(), vec!["App ready", "App ready"]);
}

// ============================================================================
// Stats ingestion
// ============================================================================

#[tokio::test]
async fn stats_entry_publishes_blob_and_discards_source() {
    let h = harness();
    h.stats.put(TaskType::Build, json!({ "assets": ["app.js"] }));

    h.relay
        .handle_message(&message(
            TaskType::Build,
            vec![(EntryKind::Stats, Value::Null)],
        ))
        .await
        .unwrap();

    assert_eq!(
        h.store.get("build-stats").unwrap(),
        json!({ "assets": ["app.js"] })
    );
    assert_eq!(h.stats.loaded(), vec![TaskType::Build]);
    assert_eq!(h.stats.discarded(), vec![TaskType::Build]);
}

#[tokio::test]
async fn stats_entry_reads_conventional_file_and_removes_it() {
    let dir = tempfile::TempDir::new().unwrap();
    let modules = dir.path().join("node_modules");
    std::fs::create_dir_all(&modules).unwrap();
    std::fs::write(modules.join(".stats-build.json"), r#"{"size": 2048}"#).unwrap();

    let store = SharedData::new();
    let source = FileStatsSource::new(dir.path());
    let stats_path = source.stats_path(TaskType::Build);
    let relay = DashboardRelay::new(
        store.namespace(""),
        Arc::new(source),
        Arc::new(MockNotifier::new()),
    );
    relay.attach();

    relay
        .handle_message(&message(
            TaskType::Build,
            vec![(EntryKind::Stats, Value::Null)],
        ))
        .await
        .unwrap();

    assert_eq!(store.get("build-stats").unwrap(), json!({ "size": 2048 }));
    assert!(!stats_path.exists());
}

#[tokio::test]
async fn missing_stats_file_aborts_remaining_entries() {
    let h = harness();

    let result = h
        .relay
        .handle_message(&message(
            TaskType::Build,
            vec![
                (EntryKind::Stats, Value::Null),
                (EntryKind::Status, json!("Success")),
            ],
        ))
        .await;

    assert!(result.is_err());
    assert!(h.store.get("build-stats").is_none());
    assert!(h.store.get("build-status").is_none());
}

// ============================================================================
// Catch-all entries and subscriptions
// ============================================================================

#[tokio::test]
async fn operations_and_unknown_entries_relay_verbatim() {
    let h = harness();

    h.relay
        .handle_message(&message(
            TaskType::Serve,
            vec![
                (EntryKind::Operations, json!("idle")),
                (EntryKind::Other("assets".into()), json!([{ "name": "app.js" }])),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(h.store.get("serve-operations").unwrap(), "idle");
    assert_eq!(
        h.store.get("serve-assets").unwrap(),
        json!([{ "name": "app.js" }])
    );
}

#[tokio::test]
async fn plugin_subscribers_see_namespaced_updates() {
    let plugin = UiPlugin::new(
        SharedData::new(),
        Arc::new(MockStatsSource::new()),
        Arc::new(MockNotifier::new()),
    )
    .unwrap();
    plugin.relay().attach();
    let mut rx = plugin.store().subscribe();

    plugin
        .handle_ipc(&status(TaskType::Build, "Compiling"))
        .await
        .unwrap();

    let change = rx.recv().await.unwrap();
    assert_eq!(change.key, "org.vue.webpack.build-status");
    assert_eq!(change.value.unwrap(), "Compiling");
}
