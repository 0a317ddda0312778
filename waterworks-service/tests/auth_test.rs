//! Login, logout, and admin account management.

mod common;

use common::{spawn_app, ADMIN_PASSWORD, ADMIN_USERNAME};
use serde_json::{json, Value};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn login_with_wrong_password_is_rejected() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "username": ADMIN_USERNAME, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[serial]
async fn login_with_unknown_username_is_rejected() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "username": "nobody", "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[serial]
async fn login_opens_a_session_and_logout_closes_it() {
    let Some(app) = spawn_app().await else { return };

    app.login().await;

    let response = app
        .client
        .get(format!("{}/clients", app.address))
        .send()
        .await
        .expect("Failed to list clients");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .post(format!("{}/auth/logout", app.address))
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .get(format!("{}/clients", app.address))
        .send()
        .await
        .expect("Failed to list clients");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[serial]
async fn admin_accounts_can_be_created_reset_and_deleted() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let username = format!("operator-{}", common::rand_digits());

    // Create a second admin.
    let response = app
        .client
        .post(format!("{}/admins", app.address))
        .json(&json!({ "username": username, "password": "first-password" }))
        .send()
        .await
        .expect("Failed to create admin");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Invalid admin body");
    let admin_id = common::id_of(&body, "admin_id");

    // The roster lists it; the superadmin itself is never listed.
    let admins: Vec<Value> = app
        .client
        .get(format!("{}/admins", app.address))
        .send()
        .await
        .expect("Failed to list admins")
        .json()
        .await
        .expect("Invalid admins body");
    assert!(admins.iter().any(|a| a["username"] == username.as_str()));
    assert!(!admins.iter().any(|a| a["username"] == ADMIN_USERNAME));

    // Reset its password and sign in with the new one.
    let response = app
        .client
        .put(format!("{}/admins/password", app.address))
        .json(&json!({ "admin_id": admin_id, "new_password": "second-password" }))
        .send()
        .await
        .expect("Failed to reset password");
    assert_eq!(response.status(), 200);

    let other = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build http client");
    let response = other
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "username": username, "password": "second-password" }))
        .send()
        .await
        .expect("Failed to login as new admin");
    assert_eq!(response.status(), 200);

    // Delete it; logging in again fails.
    let response = app
        .client
        .delete(format!("{}/admins/{}", app.address, admin_id))
        .send()
        .await
        .expect("Failed to delete admin");
    assert_eq!(response.status(), 204);

    let response = other
        .post(format!("{}/auth/login", app.address))
        .json(&json!({ "username": username, "password": "second-password" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[serial]
async fn duplicate_usernames_conflict() {
    let Some(app) = spawn_app().await else { return };
    app.login().await;

    let username = format!("operator-{}", common::rand_digits());
    for expected in [201, 409] {
        let response = app
            .client
            .post(format!("{}/admins", app.address))
            .json(&json!({ "username": username, "password": "some-password" }))
            .send()
            .await
            .expect("Failed to create admin");
        assert_eq!(response.status(), expected);
    }
}
