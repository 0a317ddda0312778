//! Statistics and audit-trail integration tests.

mod common;

use chrono::{Datelike, Utc};
use common::spawn_app;
use rust_decimal::Decimal;
use serde_json::Value;
use serial_test::serial;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).expect("valid decimal literal")
}

#[tokio::test]
#[serial]
async fn entity_counts_follow_the_data() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;
    app.set_standard_pricing().await;

    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;
    app.issue_invoice(service_id, 118).await;

    let stats: Value = app
        .client
        .get(format!("{}/stats", app.address))
        .send()
        .await
        .expect("Failed to get stats")
        .json()
        .await
        .expect("Invalid stats body");

    assert_eq!(stats["clients"], 1);
    assert_eq!(stats["services"], 1);
    assert_eq!(stats["unpaid_invoices"], 1);
}

#[tokio::test]
#[serial]
async fn invoice_revenue_lands_in_the_current_buckets() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;
    app.set_standard_pricing().await;

    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;
    app.issue_invoice(service_id, 118).await;

    let revenue: Value = app
        .client
        .get(format!("{}/stats/invoice-revenue", app.address))
        .send()
        .await
        .expect("Failed to get revenue")
        .json()
        .await
        .expect("Invalid revenue body");

    let weekdays = revenue["weekdays"].as_array().expect("weekday buckets");
    let months = revenue["months"].as_array().expect("month buckets");
    assert_eq!(weekdays.len(), 7);
    assert_eq!(months.len(), 12);

    let now = Utc::now();
    let weekday_slot = now.weekday().num_days_from_monday() as usize;
    let month_slot = now.month() as usize - 1;

    let weekday_total =
        Decimal::from_str_exact(weekdays[weekday_slot].as_str().expect("decimal string"))
            .expect("valid decimal");
    let month_total = Decimal::from_str_exact(months[month_slot].as_str().expect("decimal string"))
        .expect("valid decimal");

    assert_eq!(weekday_total, dec("3.60"));
    assert_eq!(month_total, dec("3.60"));
}

#[tokio::test]
#[serial]
async fn connection_revenue_has_one_series_per_kind() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;

    let revenue: Value = app
        .client
        .get(format!("{}/stats/connection-revenue", app.address))
        .send()
        .await
        .expect("Failed to get revenue")
        .json()
        .await
        .expect("Invalid revenue body");

    for series in ["upfront", "financed", "reconnection"] {
        assert_eq!(
            revenue[series].as_array().map(|a| a.len()),
            Some(12),
            "series {} should have 12 buckets",
            series
        );
    }
}

#[tokio::test]
#[serial]
async fn audit_trail_records_actions_and_purges_stale_entries() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;

    app.create_client().await;

    let entries: Vec<Value> = app
        .client
        .get(format!("{}/audit", app.address))
        .send()
        .await
        .expect("Failed to list audit entries")
        .json()
        .await
        .expect("Invalid audit body");
    assert!(entries.iter().any(|e| e["category"] == "client_created"));

    // Everything is fresh, so the purge removes nothing.
    let body: Value = app
        .client
        .delete(format!("{}/audit/stale", app.address))
        .send()
        .await
        .expect("Failed to purge audit entries")
        .json()
        .await
        .expect("Invalid purge body");
    assert_eq!(body["deleted"], 0);
}
