//! Client CRUD integration tests.

mod common;

use common::{rand_digits, spawn_app};
use serde_json::{json, Value};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn create_client_normalizes_names() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let national_id = format!("{:010}", rand_digits());
    let response = app
        .client
        .post(format!("{}/clients", app.address))
        .json(&json!({
            "national_id": national_id,
            "first_names": "  maría  fernanda ",
            "last_names": "LÓPEZ vega",
            "phone": "0991234567"
        }))
        .send()
        .await
        .expect("Failed to create client");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Invalid client body");
    assert_eq!(body["first_names"], "María Fernanda");
    assert_eq!(body["last_names"], "López Vega");
    assert_eq!(body["national_id"], national_id.as_str());
}

#[tokio::test]
#[serial]
async fn duplicate_national_id_conflicts() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let national_id = format!("{:010}", rand_digits());
    let payload = json!({
        "national_id": national_id,
        "first_names": "Ana",
        "last_names": "Paredes",
        "phone": "0991234567"
    });

    for expected in [201, 409] {
        let response = app
            .client
            .post(format!("{}/clients", app.address))
            .json(&payload)
            .send()
            .await
            .expect("Failed to create client");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[serial]
async fn malformed_national_id_is_rejected() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    // Wrong length fails validation.
    let response = app
        .client
        .post(format!("{}/clients", app.address))
        .json(&json!({
            "national_id": "123",
            "first_names": "Ana",
            "last_names": "Paredes"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Right length but not digits.
    let response = app
        .client
        .post(format!("{}/clients", app.address))
        .json(&json!({
            "national_id": "12345abcde",
            "first_names": "Ana",
            "last_names": "Paredes"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[serial]
async fn update_is_partial_and_delete_removes() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let client_id = app.create_client().await;

    // Only the phone changes; names stay.
    let response = app
        .client
        .put(format!("{}/clients/{}", app.address, client_id))
        .json(&json!({ "phone": "0987654321" }))
        .send()
        .await
        .expect("Failed to update client");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid client body");
    assert_eq!(body["phone"], "0987654321");
    assert_eq!(body["first_names"], "Test");

    let response = app
        .client
        .delete(format!("{}/clients/{}", app.address, client_id))
        .send()
        .await
        .expect("Failed to delete client");
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .get(format!("{}/clients/{}", app.address, client_id))
        .send()
        .await
        .expect("Failed to get client");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[serial]
async fn deleting_a_client_cascades_to_services() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let client_id = app.create_client().await;
    let service_id = app.create_service(client_id, 100).await;

    let response = app
        .client
        .delete(format!("{}/clients/{}", app.address, client_id))
        .send()
        .await
        .expect("Failed to delete client");
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .get(format!("{}/services/{}", app.address, service_id))
        .send()
        .await
        .expect("Failed to get service");
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Invalid error body");
    assert!(body["error"].is_string());
}
