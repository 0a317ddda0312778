//! Cookie-session authentication for the admin API.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::utils::token::hash_session_token;
use crate::AppState;

/// Identity of the admin driving the current request.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub admin_id: Uuid,
    pub username: String,
    pub superadmin: bool,
}

/// Middleware requiring a live admin session.
///
/// Reads the session cookie, resolves its hashed token to an admin, and
/// stores the identity in request extensions for the `CurrentAdmin`
/// extractor.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(&state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Not signed in")))?;

    let admin = state
        .db
        .find_session_admin(&hash_session_token(&token), Utc::now())
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Session is invalid or expired")))?;

    req.extensions_mut().insert(CurrentAdmin {
        admin_id: admin.admin_id,
        username: admin.username,
        superadmin: admin.superadmin,
    });

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentAdmin>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Admin identity missing from request extensions"
            ))
        })
    }
}
