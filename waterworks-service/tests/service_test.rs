//! Service connection CRUD integration tests.

mod common;

use common::spawn_app;
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn roster_shows_owner_and_billing_flag() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;
    app.reset_billing_data().await;
    app.set_standard_pricing().await;

    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;

    let roster: Vec<Value> = app
        .client
        .get(format!("{}/services", app.address))
        .send()
        .await
        .expect("Failed to list services")
        .json()
        .await
        .expect("Invalid roster body");

    let row = roster
        .iter()
        .find(|r| r["service_id"] == service_id.to_string())
        .expect("service missing from roster");
    assert_eq!(row["current_period_billed"], false);
    assert_eq!(row["client"]["client_id"], client_id.to_string());

    // Issue this month's invoice; the flag flips.
    app.issue_invoice(service_id, 105).await;

    let roster: Vec<Value> = app
        .client
        .get(format!("{}/services", app.address))
        .send()
        .await
        .expect("Failed to list services")
        .json()
        .await
        .expect("Invalid roster body");

    let row = roster
        .iter()
        .find(|r| r["service_id"] == service_id.to_string())
        .expect("service missing from roster");
    assert_eq!(row["current_period_billed"], true);
}

#[tokio::test]
#[serial]
async fn services_of_a_missing_client_are_not_found() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let response = app
        .client
        .get(format!("{}/clients/{}/services", app.address, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[serial]
async fn update_reassign_and_status_flow() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let first_owner = app.create_client().await;
    let second_owner = app.create_client().await;
    let service_id = app.create_service(first_owner, 50).await;

    // Partial update normalizes the address and keeps the numbers.
    let response = app
        .client
        .put(format!("{}/services/{}", app.address, service_id))
        .json(&json!({ "address": "  calle  SUCRE 42 " }))
        .send()
        .await
        .expect("Failed to update service");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid service body");
    assert_eq!(body["address"], "Calle Sucre 42");
    assert_eq!(body["previous_reading"], 50);

    // Reassign to the second client.
    let response = app
        .client
        .put(format!("{}/services/{}/client", app.address, service_id))
        .json(&json!({ "client_id": second_owner }))
        .send()
        .await
        .expect("Failed to reassign service");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid service body");
    assert_eq!(body["client_id"], second_owner.to_string());

    // Suspend it.
    let response = app
        .client
        .put(format!("{}/services/{}/status", app.address, service_id))
        .json(&json!({ "active": false }))
        .send()
        .await
        .expect("Failed to set status");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid service body");
    assert_eq!(body["active"], false);

    // The first client no longer lists it; the second does.
    let services: Vec<Value> = app
        .client
        .get(format!("{}/clients/{}/services", app.address, second_owner))
        .send()
        .await
        .expect("Failed to list services")
        .json()
        .await
        .expect("Invalid services body");
    assert!(services
        .iter()
        .any(|s| s["service_id"] == service_id.to_string()));
}

#[tokio::test]
#[serial]
async fn duplicate_connection_number_conflicts() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let client_id = app.create_client().await;
    let connection_number = common::rand_digits();

    let payload = |meter: u32| {
        json!({
            "client_id": client_id,
            "connection_number": connection_number,
            "meter_number": meter,
            "address": "Main Street 123",
            "active": true,
            "previous_reading": 0
        })
    };

    let response = app
        .client
        .post(format!("{}/services", app.address))
        .json(&payload(common::rand_digits()))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(response.status(), 201);

    let response = app
        .client
        .post(format!("{}/services", app.address))
        .json(&payload(common::rand_digits()))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(response.status(), 409);
}
