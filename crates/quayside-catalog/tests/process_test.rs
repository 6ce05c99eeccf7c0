//! End-to-end tests running the catalog client against a fake runtime CLI.
//!
//! Each test writes a shell script standing in for the `container` binary
//! into a temporary directory and points a process-backed client at it.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use quayside_catalog::{CatalogClient, CommandRunner, NewContainer, ProcessRunner};
use quayside_common::error::QuaysideError;

fn write_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("container");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path
}

const FAKE_RUNTIME: &str = r#"
case "$*" in
  "list --all --format json")
    echo '[{"status":"running","configuration":{"id":"db","image":{"reference":"pg:17"},"platform":{"os":"linux","architecture":"arm64"}}}]'
    ;;
  "images list --format json")
    echo 'REFERENCE SIZE'
    echo 'pg:17 150MB'
    ;;
  "volume list --format json")
    echo '[{"name":"pgdata","format":"ext4"}]'
    ;;
  "system status")
    echo 'apiserver is running'
    ;;
  "stop ghost")
    echo "Error: container ghost not found" >&2
    exit 4
    ;;
  *)
    echo "$*" >> "$(dirname "$0")/writes.log"
    ;;
esac
"#;

#[tokio::test]
async fn reads_parse_real_process_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = CatalogClient::new(write_script(dir.path(), FAKE_RUNTIME));

    let containers = client.list_containers().await.expect("containers");
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].id, "db");
    assert!(containers[0].running);

    let images = client.list_images().await.expect("images");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].reference, "pg:17");
    assert_eq!(images[0].size.as_deref(), Some("150MB"));

    let volumes = client.list_volumes().await.expect("volumes");
    assert_eq!(volumes[0].format.as_deref(), Some("ext4"));

    let status = client.system_status().await.expect("status");
    assert!(status.running);
}

#[tokio::test]
async fn writes_pass_exact_argument_vectors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = CatalogClient::new(write_script(dir.path(), FAKE_RUNTIME));

    let mut request = NewContainer {
        name: "db".into(),
        image: "pg:17".into(),
        ..NewContainer::default()
    };
    let _ = request.volumes.insert("pgdata".into(), "/data".into());
    client.create_container(&request).await.expect("create");
    client.start_container("db").await.expect("start");

    let log = std::fs::read_to_string(dir.path().join("writes.log")).expect("log");
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        vec!["create --name db --volume pgdata:/data pg:17", "start db"]
    );
}

#[tokio::test]
async fn non_zero_exit_carries_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = CatalogClient::new(write_script(dir.path(), FAKE_RUNTIME));

    let err = client.stop_container("ghost").await.unwrap_err();
    match err {
        QuaysideError::ExecutionFailed {
            exit_code, output, ..
        } => {
            assert_eq!(exit_code, 4);
            assert_eq!(output, "Error: container ghost not found");
        }
        other => unreachable!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(
        dir.path(),
        "i=0\nwhile [ $i -lt 20000 ]; do echo \"out line $i\"; echo \"err line $i\" >&2; i=$((i+1)); done",
    );

    let output = ProcessRunner.run(&script, &[]).await.expect("run");
    assert_eq!(output.exit_code, 0);
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 20_000);
    assert_eq!(String::from_utf8_lossy(&output.stderr).lines().count(), 20_000);
}

#[tokio::test]
async fn hung_process_is_cut_off_by_timeout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = CatalogClient::new(write_script(dir.path(), "sleep 30"))
        .with_timeout(Some(Duration::from_millis(200)));

    let err = client.list_volumes().await.unwrap_err();
    assert!(matches!(err, QuaysideError::Timeout { .. }));
}
