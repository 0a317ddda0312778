//! Health and authentication-gate checks.

mod common;

use common::spawn_app;
use serde_json::Value;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn health_check_reports_ok() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to reach /health");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid health body");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[serial]
async fn readiness_check_reports_ok() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to reach /ready");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_serves_prometheus_text() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to reach /metrics");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[serial]
async fn protected_routes_require_a_session() {
    let Some(app) = spawn_app().await else { return };

    for path in ["/clients", "/services", "/invoices/pending", "/pricing", "/audit"] {
        let response = app
            .client
            .get(format!("{}{}", app.address, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 401, "expected 401 for {}", path);
    }
}
