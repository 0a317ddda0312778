use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// System administrator account.
///
/// The first account is bootstrapped at startup as the superadmin; it can
/// neither be deleted nor have its password reset through the API.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub admin_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub superadmin: bool,
    pub created_utc: DateTime<Utc>,
}

/// An admin session backed by a hashed cookie token.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub session_id: Uuid,
    pub admin_id: Uuid,
    pub token_hash: String,
    pub created_utc: DateTime<Utc>,
    pub expires_utc: DateTime<Utc>,
}
