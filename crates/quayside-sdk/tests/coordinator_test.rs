//! Polling coordinator behavior against a scripted runtime CLI.
//!
//! All tests run on tokio's paused clock: sleeps auto-advance once every
//! task is idle, so intervals and slow invocations cost no real time.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use quayside_catalog::CatalogClient;
use quayside_catalog::testing::ScriptedRunner;
use quayside_common::error::QuaysideError;
use quayside_sdk::PollingCoordinator;
use tokio::time::sleep;

const STATUS: &str = "system status";

fn coordinator(runner: &Arc<ScriptedRunner>) -> PollingCoordinator {
    PollingCoordinator::new(CatalogClient::with_runner("container", runner.clone()))
}

fn with_db_container() -> Arc<ScriptedRunner> {
    let runner = ScriptedRunner::healthy();
    runner.reply_ok(
        "list --all --format json",
        r#"[{"status":"running","configuration":{"id":"db","image":{"reference":"pg:17"},
            "platform":{"os":"linux","architecture":"arm64"},
            "mounts":[{"source":"/vols/pgdata","destination":"/var/lib/postgresql",
                       "type":{"volume":{"name":"pgdata","format":"ext4"}}}]},
            "networks":[{"address":"192.168.64.3/24"}]}]"#,
    );
    runner.reply_ok("images list --format json", r#"[{"reference":"pg:17","size":"150MB"}]"#);
    runner.reply_ok("volume list --format json", r#"[{"name":"pgdata","format":"ext4"}]"#);
    Arc::new(runner)
}

#[tokio::test(start_paused = true)]
async fn refresh_now_publishes_full_snapshot() {
    let runner = with_db_container();
    let c = coordinator(&runner);

    let snapshot = c.refresh_now().await;
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.status, "apiserver is running");
    assert!(snapshot.system_running);
    assert!(!snapshot.is_error());

    let db = c.container("db").unwrap();
    assert_eq!(db.image, "pg:17");
    assert_eq!(db.state, "running");
    assert!(db.running);
    assert_eq!(db.platform().as_deref(), Some("linux/arm64"));
    assert_eq!(db.address.as_deref(), Some("192.168.64.3/24"));
    assert_eq!(db.mounts.len(), 1);
    assert_eq!(db.mounts[0].volume_name.as_deref(), Some("pgdata"));

    assert_eq!(snapshot.images[0].reference, "pg:17");
    assert_eq!(snapshot.volumes[0].name, "pgdata");
}

#[tokio::test(start_paused = true)]
async fn any_failed_read_collapses_the_snapshot() {
    let runner = with_db_container();
    runner.reply_exit("images list --format json", 1, "Error: XPC connection error");
    let c = coordinator(&runner);

    let snapshot = c.refresh_now().await;
    assert_eq!(snapshot.status, "Error");
    assert!(!snapshot.system_running);
    assert!(snapshot.containers.is_empty());
    assert!(snapshot.images.is_empty());
    assert!(snapshot.volumes.is_empty());
    assert!(matches!(
        c.last_error().as_deref(),
        Some(QuaysideError::ExecutionFailed { exit_code: 1, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn successful_cycle_clears_previous_error() {
    let runner = with_db_container();
    runner.reply_exit("volume list --format json", 1, "boom");
    let c = coordinator(&runner);
    assert!(c.refresh_now().await.is_error());

    runner.reply_ok("volume list --format json", "[]");
    let snapshot = c.refresh_now().await;
    assert!(!snapshot.is_error());
    assert!(c.last_error().is_none());
    assert_eq!(snapshot.containers.len(), 1);
    assert_eq!(snapshot.generation, 2);
}

#[tokio::test(start_paused = true)]
async fn polling_refreshes_immediately_then_on_interval() {
    let runner = with_db_container();
    let c = coordinator(&runner);
    let mut listener = c.subscribe();

    c.start_polling(Duration::from_secs(5)).await;
    assert!(c.is_polling().await);
    assert_eq!(c.polling_interval().await, Some(Duration::from_secs(5)));

    let first = listener.next().await.unwrap();
    assert_eq!(first.generation, 1);
    assert_eq!(first.containers[0].id, "db");

    let second = listener.next().await.unwrap();
    assert_eq!(second.generation, 2);

    c.stop_polling().await;
    assert!(!c.is_polling().await);
}

#[tokio::test(start_paused = true)]
async fn starting_twice_leaves_a_single_loop() {
    let runner = Arc::new(ScriptedRunner::healthy());
    runner.set_delay(Duration::from_secs(1));
    let c = coordinator(&runner);

    c.start_polling(Duration::from_secs(10)).await;
    c.start_polling(Duration::from_secs(10)).await;
    sleep(Duration::from_secs(35)).await;
    c.stop_polling().await;

    assert_eq!(runner.count(STATUS), 4);
    assert!(runner.peak_in_flight() <= 4);
}

#[tokio::test(start_paused = true)]
async fn restarting_the_loop_keeps_a_queued_refresh() {
    let runner = Arc::new(ScriptedRunner::healthy());
    runner.set_delay(Duration::from_secs(2));
    let c = coordinator(&runner);

    c.start_polling(Duration::from_secs(30)).await;
    sleep(Duration::from_secs(3)).await;
    assert_eq!(c.snapshot().generation, 1);

    c.refresh();
    sleep(Duration::from_secs(1)).await;
    c.start_polling(Duration::from_secs(30)).await;
    sleep(Duration::from_secs(5)).await;
    c.stop_polling().await;

    assert_eq!(runner.count(STATUS), 3);
    assert_eq!(c.snapshot().generation, 3);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_published_after_stop() {
    let runner = Arc::new(ScriptedRunner::healthy());
    let c = coordinator(&runner);

    c.start_polling(Duration::from_secs(10)).await;
    sleep(Duration::from_secs(1)).await;
    c.stop_polling().await;
    let generation = c.snapshot().generation;
    let calls = runner.calls().len();
    assert_eq!(generation, 1);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(c.snapshot().generation, generation);
    assert_eq!(runner.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn in_flight_cycle_publishes_before_stop_returns() {
    let runner = Arc::new(ScriptedRunner::healthy());
    runner.set_delay(Duration::from_secs(2));
    let c = coordinator(&runner);

    c.start_polling(Duration::from_secs(10)).await;
    sleep(Duration::from_secs(1)).await;
    assert_eq!(c.snapshot().generation, 0);

    c.stop_polling().await;
    assert_eq!(c.snapshot().generation, 1);
    assert_eq!(c.snapshot().status, "apiserver is running");

    sleep(Duration::from_secs(60)).await;
    assert_eq!(c.snapshot().generation, 1);
    assert_eq!(runner.count(STATUS), 1);
}

#[tokio::test(start_paused = true)]
async fn detached_refresh_started_before_stop_is_discarded() {
    let runner = Arc::new(ScriptedRunner::healthy());
    runner.set_delay(Duration::from_secs(2));
    let c = coordinator(&runner);

    c.refresh();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(runner.count(STATUS), 1);

    c.stop_polling().await;
    sleep(Duration::from_secs(10)).await;
    assert_eq!(c.snapshot().generation, 0);
}

#[tokio::test(start_paused = true)]
async fn stop_without_loop_is_a_no_op() {
    let runner = Arc::new(ScriptedRunner::healthy());
    let c = coordinator(&runner);
    c.stop_polling().await;
    c.stop_polling().await;
    assert!(!c.is_polling().await);
    assert!(runner.calls().is_empty());

    let snapshot = c.refresh_now().await;
    assert_eq!(snapshot.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_waits_for_the_running_cycle() {
    let runner = Arc::new(ScriptedRunner::healthy());
    runner.set_delay(Duration::from_secs(2));
    let c = coordinator(&runner);

    c.start_polling(Duration::from_secs(30)).await;
    sleep(Duration::from_secs(1)).await;
    let snapshot = c.refresh_now().await;
    c.stop_polling().await;

    assert_eq!(snapshot.generation, 2);
    assert_eq!(runner.count(STATUS), 2);
    assert!(runner.peak_in_flight() <= 4);
}

#[tokio::test(start_paused = true)]
async fn background_refresh_notifies_listeners() {
    let runner = with_db_container();
    let c = coordinator(&runner);
    let mut listener = c.subscribe();
    assert_eq!(listener.current().generation, 0);

    c.refresh();
    let snapshot = listener.next().await.unwrap();
    assert_eq!(snapshot.generation, 1);
    assert!(!listener.has_changed());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_coordinator_ends_the_loop() {
    let runner = Arc::new(ScriptedRunner::healthy());
    let c = coordinator(&runner);
    let mut listener = c.subscribe();

    c.start_polling(Duration::from_secs(5)).await;
    sleep(Duration::from_secs(1)).await;
    drop(c);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(runner.count(STATUS), 1);
    let _ = listener.current();
    assert!(listener.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn writes_pass_through_without_refreshing() {
    let runner = Arc::new(ScriptedRunner::healthy());
    let c = coordinator(&runner);

    c.start_container("db").await.unwrap();
    c.delete_volume("pgdata").await.unwrap();
    assert_eq!(runner.count("start db"), 1);
    assert_eq!(runner.count("volume delete pgdata"), 1);
    assert_eq!(runner.count(STATUS), 0);
    assert_eq!(c.snapshot().generation, 0);
}
