//! Invoice issuance, revision, and deletion integration tests.

mod common;

use chrono::{Datelike, Duration, Utc};
use common::{dec_of, id_of, spawn_app, TestApp};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).expect("valid decimal literal")
}

async fn fresh_billed_service(app: &TestApp) -> (Uuid, Uuid) {
    app.reset_billing_data().await;
    app.set_standard_pricing().await;
    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;
    (client_id, service_id)
}

#[tokio::test]
#[serial]
async fn consumption_within_allowance_costs_base_price() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 105).await;

    assert_eq!(invoice["total_consumption"], 5);
    assert_eq!(dec_of(&invoice, "total_amount"), dec("2.00"));
    assert_eq!(invoice["previous_reading"], 100);
    assert_eq!(invoice["current_reading"], 105);
    // The live configuration was snapshotted into the invoice.
    assert_eq!(dec_of(&invoice, "base_allowance"), dec("10"));
    assert_eq!(dec_of(&invoice, "overage_unit"), dec("5"));

    // The service's stored reading advanced with the issuance.
    let service: Value = app
        .client
        .get(format!("{}/services/{}", app.address, service_id))
        .send()
        .await
        .expect("Failed to get service")
        .json()
        .await
        .expect("Invalid service body");
    assert_eq!(service["previous_reading"], 105);
}

#[tokio::test]
#[serial]
async fn overage_is_charged_per_fractional_unit() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    // 18 m3 consumed, 8 over the allowance: 2.00 + (8/5) * 1.00 = 3.60.
    let invoice = app.issue_invoice(service_id, 118).await;

    assert_eq!(invoice["total_consumption"], 18);
    assert_eq!(dec_of(&invoice, "total_amount"), dec("3.60"));
}

#[tokio::test]
#[serial]
async fn second_issuance_in_the_same_month_conflicts() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    app.issue_invoice(service_id, 110).await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .json(&json!({ "service_id": service_id, "current_reading": 120 }))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[serial]
async fn suspended_service_cannot_be_billed() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let response = app
        .client
        .put(format!("{}/services/{}/status", app.address, service_id))
        .json(&json!({ "active": false }))
        .send()
        .await
        .expect("Failed to suspend service");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .json(&json!({ "service_id": service_id, "current_reading": 110 }))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn reading_below_previous_is_rejected() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .json(&json!({ "service_id": service_id, "current_reading": 90 }))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn issuance_without_pricing_fails() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;
    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .json(&json!({ "service_id": service_id, "current_reading": 110 }))
        .send()
        .await
        .expect("Failed to send issue request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn revision_recomputes_from_the_snapshot() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 118).await;
    let invoice_id = id_of(&invoice, "invoice_id");

    // Change the live pricing afterwards must not affect the revision, so
    // revise against the snapshot: 15 m3 -> 2.00 + (5/5) * 1.00 = 3.00.
    let response = app
        .client
        .put(format!("{}/invoices/{}/reading", app.address, invoice_id))
        .json(&json!({ "current_reading": 115 }))
        .send()
        .await
        .expect("Failed to revise reading");
    assert_eq!(response.status(), 200);
    let revised: Value = response.json().await.expect("Invalid invoice body");

    assert_eq!(revised["total_consumption"], 15);
    assert_eq!(dec_of(&revised, "total_amount"), dec("3.00"));

    // The owning service follows the corrected reading.
    let service: Value = app
        .client
        .get(format!("{}/services/{}", app.address, service_id))
        .send()
        .await
        .expect("Failed to get service")
        .json()
        .await
        .expect("Invalid service body");
    assert_eq!(service["previous_reading"], 115);
}

#[tokio::test]
#[serial]
async fn revision_below_the_invoice_previous_reading_fails_unchanged() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 118).await;
    let invoice_id = id_of(&invoice, "invoice_id");

    let response = app
        .client
        .put(format!("{}/invoices/{}/reading", app.address, invoice_id))
        .json(&json!({ "current_reading": 90 }))
        .send()
        .await
        .expect("Failed to send revise request");
    assert_eq!(response.status(), 400);

    // Nothing moved.
    let fetched: Value = app
        .client
        .get(format!("{}/invoices/{}", app.address, invoice_id))
        .send()
        .await
        .expect("Failed to get invoice")
        .json()
        .await
        .expect("Invalid invoice body");
    assert_eq!(fetched["current_reading"], 118);
    assert_eq!(dec_of(&fetched, "total_amount"), dec("3.60"));
}

#[tokio::test]
#[serial]
async fn paid_invoices_cannot_be_revised() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 118).await;
    let invoice_id = id_of(&invoice, "invoice_id");

    let response = app
        .client
        .put(format!("{}/invoices/{}/payment", app.address, invoice_id))
        .json(&json!({ "paid": true }))
        .send()
        .await
        .expect("Failed to mark paid");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .put(format!("{}/invoices/{}/reading", app.address, invoice_id))
        .json(&json!({ "current_reading": 120 }))
        .send()
        .await
        .expect("Failed to send revise request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn current_month_invoices_cannot_be_deleted() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 118).await;
    let invoice_id = id_of(&invoice, "invoice_id");

    let response = app
        .client
        .delete(format!("{}/invoices/{}", app.address, invoice_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn deleting_a_past_invoice_restores_the_service_reading() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (_, service_id) = fresh_billed_service(&app).await;

    // Seed an invoice from the previous billing month directly; issuance
    // only ever writes into the current one.
    let last_month = Utc::now() - Duration::days(32);
    let invoice_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO invoices
            (invoice_id, service_id, issued_utc, period_year, period_month,
             base_allowance, overage_unit, base_price, overage_unit_price,
             previous_reading, current_reading, total_consumption, total_amount)
        VALUES ($1, $2, $3, $4, $5, 10, 5, 2.00, 1.00, 100, 120, 20, 4.00)
        "#,
    )
    .bind(invoice_id)
    .bind(service_id)
    .bind(last_month)
    .bind(last_month.year())
    .bind(last_month.month() as i32)
    .execute(app.db.pool())
    .await
    .expect("Failed to seed past invoice");

    sqlx::query("UPDATE service_connections SET previous_reading = 120 WHERE service_id = $1")
        .bind(service_id)
        .execute(app.db.pool())
        .await
        .expect("Failed to advance service reading");

    let response = app
        .client
        .delete(format!("{}/invoices/{}", app.address, invoice_id))
        .send()
        .await
        .expect("Failed to delete invoice");
    assert_eq!(response.status(), 204);

    let service: Value = app
        .client
        .get(format!("{}/services/{}", app.address, service_id))
        .send()
        .await
        .expect("Failed to get service")
        .json()
        .await
        .expect("Invalid service body");
    assert_eq!(service["previous_reading"], 100);
}

#[tokio::test]
#[serial]
async fn pending_list_tracks_unpaid_invoices() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    let (client_id, service_id) = fresh_billed_service(&app).await;

    let invoice = app.issue_invoice(service_id, 118).await;
    let invoice_id = id_of(&invoice, "invoice_id");

    let pending: Vec<Value> = app
        .client
        .get(format!("{}/invoices/pending", app.address))
        .send()
        .await
        .expect("Failed to list pending")
        .json()
        .await
        .expect("Invalid pending body");
    let row = pending
        .iter()
        .find(|p| p["invoice_id"] == invoice_id.to_string())
        .expect("invoice missing from pending list");
    assert_eq!(row["client"]["client_id"], client_id.to_string());

    let response = app
        .client
        .put(format!("{}/invoices/{}/payment", app.address, invoice_id))
        .json(&json!({ "paid": true }))
        .send()
        .await
        .expect("Failed to mark paid");
    assert_eq!(response.status(), 200);

    let pending: Vec<Value> = app
        .client
        .get(format!("{}/invoices/pending", app.address))
        .send()
        .await
        .expect("Failed to list pending")
        .json()
        .await
        .expect("Invalid pending body");
    assert!(!pending
        .iter()
        .any(|p| p["invoice_id"] == invoice_id.to_string()));
}
