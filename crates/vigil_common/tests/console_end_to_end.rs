//! End-to-end console tests against a scripted telemetry source.
//!
//! Tests verify:
//! - Metrics errors mark every bound field and recover on the next tick
//! - A ports body with a failure status puts the task in its error state
//! - Chart buffers keep only the newest samples
//! - Log filter edits always re-query page 1
//! - Hanging requests time out without stalling other tasks
//! - Teardown stops polling

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use vigil_common::api::{PATH_LOGS, PATH_METRICS, PATH_NETWORK_PORTS, PATH_PROCESSES};
use vigil_common::client::{FakeResponse, FakeTelemetrySource};
use vigil_common::console::read;
use vigil_common::{Config, Console, FetchError, LogLevelFilter, TaskState};

const METRIC_FIELDS: [&str; 4] = ["cpu-value", "memory-value", "disk-read", "disk-write"];

/// Helper to build a metrics payload
fn metrics_json(cpu: f64, second: u32) -> Value {
    json!({
        "cpu": cpu,
        "memory": {"usage_percent": 40.0},
        "disk_io": {"read_iops": 5, "write_iops": 2},
        "datetime": format!("2024-02-28 10:00:{:02}", second)
    })
}

fn console_with(config: &Config, source: &Arc<FakeTelemetrySource>) -> Console {
    Console::new(config, source.clone()).unwrap()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn metrics_error_marks_fields_then_recovers() {
    let source = Arc::new(FakeTelemetrySource::new());
    source
        .respond_error(
            PATH_METRICS,
            FetchError::Status {
                status: 500,
                path: PATH_METRICS.into(),
            },
        )
        .respond_json(PATH_METRICS, metrics_json(12.5, 1));

    let mut console = console_with(&Config::default(), &source);
    console.start();
    settle().await;

    {
        let metrics = read(&console.panels().metrics);
        for id in METRIC_FIELDS {
            assert_eq!(metrics.field(id).unwrap().render(), "Error", "field {}", id);
        }
    }
    assert_eq!(console.status("metrics").unwrap().state, TaskState::Error);

    // One interval later, no restart needed
    tokio::time::sleep(Duration::from_secs(1)).await;
    {
        let metrics = read(&console.panels().metrics);
        assert_eq!(metrics.field("cpu-value").unwrap().render(), "12.5%");
        assert_eq!(metrics.field("memory-value").unwrap().render(), "40%");
        assert_eq!(metrics.field("disk-read").unwrap().render(), "5 IOPS");
        assert_eq!(metrics.field("disk-write").unwrap().render(), "2 IOPS");
    }
    assert_eq!(console.status("metrics").unwrap().state, TaskState::Success);
    console.shutdown();
}

#[tokio::test(start_paused = true)]
async fn ports_failure_status_is_task_error() {
    let source = Arc::new(FakeTelemetrySource::new());
    source.respond_json(PATH_NETWORK_PORTS, json!({"status": "error"}));

    let mut console = console_with(&Config::default(), &source);
    console.start();
    settle().await;
    console.shutdown();

    let status = console.status("ports").unwrap();
    assert_eq!(status.state, TaskState::Error);
    assert_eq!(status.failures, 1);
    assert_eq!(status.successes, 0);
    assert!(matches!(status.last_error, Some(FetchError::Rejected(_))));
    assert!(read(&console.panels().ports).table().is_error());
}

#[tokio::test(start_paused = true)]
async fn chart_keeps_last_capacity_samples() {
    let source = Arc::new(FakeTelemetrySource::new());
    for (i, cpu) in [60.0, 70.0, 80.0, 90.0].into_iter().enumerate() {
        source.respond_json(PATH_METRICS, metrics_json(cpu, i as u32));
    }
    let mut config = Config::default();
    config.buffers.metrics_points = 3;

    let mut console = console_with(&config, &source);
    console.start();
    tokio::time::sleep(Duration::from_millis(3_010)).await;
    console.shutdown();

    assert_eq!(source.calls(PATH_METRICS), 4);
    let metrics = read(&console.panels().metrics);
    let cpu = &metrics.charts()[0].series()[0];
    let values: Vec<f64> = cpu.snapshot().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![70.0, 80.0, 90.0]);
    assert_eq!(cpu.first_label(), Some("10:00:01"));
    assert_eq!(cpu.last_label(), Some("10:00:03"));
}

#[tokio::test(start_paused = true)]
async fn log_filter_change_requests_first_page() {
    let source = Arc::new(FakeTelemetrySource::new());
    source.respond_json(PATH_LOGS, json!({"logs": [], "total": 500}));

    let mut console = console_with(&Config::default(), &source);
    console.start();
    settle().await;

    console.update_log_filter(|c| c.go_to_page(4));
    settle().await;
    console.update_log_filter(|c| c.set_level(LogLevelFilter::Error));
    settle().await;

    let pages: Vec<String> = source
        .requests()
        .into_iter()
        .filter(|r| r.path() == PATH_LOGS)
        .map(|r| r.param("page").unwrap_or_default().to_string())
        .collect();
    assert_eq!(pages, vec!["1", "4", "1"]);

    let logs = read(&console.panels().logs);
    assert_eq!(logs.controller().filter().level, LogLevelFilter::Error);
    assert_eq!(logs.pagination().total_pages, 10);
    assert_eq!(logs.total().render(), "500");
}

#[tokio::test(start_paused = true)]
async fn process_search_refreshes_and_filters() {
    let source = Arc::new(FakeTelemetrySource::new());
    source.respond_json(
        PATH_PROCESSES,
        json!([
            {"pid": 1, "name": "systemd", "cpu_percent": 0.1, "memory_percent": 0.3},
            {"pid": 812, "name": "postgres", "cpu_percent": 4.0, "memory_percent": 9.1}
        ]),
    );

    let mut console = console_with(&Config::default(), &source);
    console.start();
    settle().await;
    assert_eq!(read(&console.panels().processes).table().rows().len(), 2);

    console.set_process_search("POST");
    settle().await;
    assert_eq!(source.calls(PATH_PROCESSES), 2);
    let processes = read(&console.panels().processes);
    assert_eq!(processes.table().rows().len(), 1);
    assert_eq!(processes.table().rows()[0].pid, 812);
}

#[tokio::test(start_paused = true)]
async fn hanging_request_only_stalls_its_own_task() {
    let source = Arc::new(FakeTelemetrySource::new());
    source
        .respond(PATH_METRICS, FakeResponse::Hang)
        .respond_json(PATH_METRICS, metrics_json(33.0, 0));
    source.respond_json(
        PATH_PROCESSES,
        json!([{"pid": 7, "name": "sshd", "cpu_percent": 0.0, "memory_percent": 0.1}]),
    );

    let mut console = console_with(&Config::default(), &source);
    console.start();

    tokio::time::sleep(Duration::from_millis(9_500)).await;
    assert_eq!(console.status("metrics").unwrap().state, TaskState::InFlight);
    assert_eq!(source.calls(PATH_METRICS), 1, "no overlapping fetch while hung");
    // Processes kept its own 5s cadence meanwhile
    assert_eq!(source.calls(PATH_PROCESSES), 2);
    assert_eq!(console.status("processes").unwrap().state, TaskState::Success);

    tokio::time::sleep(Duration::from_millis(3_000)).await;
    let status = console.status("metrics").unwrap();
    assert_eq!(status.state, TaskState::Success);
    assert_eq!(status.failures, 1);
    assert_eq!(
        read(&console.panels().metrics).field("cpu-value").unwrap().render(),
        "33%"
    );
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_polling() {
    let source = Arc::new(FakeTelemetrySource::gated());
    source.respond_json(PATH_METRICS, metrics_json(1.0, 0));

    let mut console = console_with(&Config::default(), &source);
    console.start();
    settle().await;
    assert_eq!(source.calls(PATH_METRICS), 1);

    let metrics = Arc::downgrade(&console.panels().metrics);
    drop(console);
    assert!(metrics.upgrade().is_none(), "panels released with the console");

    // Late results have nowhere to land
    source.release(64);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(source.calls(PATH_METRICS), 1);
}
