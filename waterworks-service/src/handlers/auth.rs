//! Sign-in and sign-out.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use service_core::error::AppError;

use crate::dtos::{LoginRequest, MessageResponse, SessionResponse};
use crate::models::AuditCategory;
use crate::services::metrics::LOGINS_TOTAL;
use crate::utils::token::{generate_session_token, hash_session_token};
use crate::utils::{password, ValidatedJson};
use crate::AppState;

/// Verify credentials and open a cookie session.
///
/// Unknown usernames and wrong passwords produce the same error so the
/// endpoint does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let admin = state
        .db
        .find_admin_by_username(&req.username)
        .await?
        .filter(|admin| password::verify_password(&req.password, &admin.password_hash))
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Invalid username or password")))?;

    let now = Utc::now();
    state.db.delete_expired_sessions(now).await?;

    let token = generate_session_token();
    let expires_utc = now + Duration::hours(state.config.session.ttl_hours);
    state
        .db
        .create_session(admin.admin_id, &hash_session_token(&token), expires_utc)
        .await?;

    state
        .audit
        .record(AuditCategory::Login, admin.admin_id, None)
        .await?;

    LOGINS_TOTAL.inc();

    tracing::info!(admin_id = %admin.admin_id, username = %admin.username, "Admin signed in");

    let cookie = Cookie::build((state.config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            username: admin.username,
            expires_utc,
        }),
    ))
}

/// Close the current session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
        state
            .db
            .delete_session(&hash_session_token(cookie.value()))
            .await?;
    }

    let jar = jar.remove(Cookie::from(state.config.session.cookie_name.clone()));

    Ok((jar, Json(MessageResponse::new("Signed out"))))
}
