//! Audit trail for administrative actions.

use chrono::{Duration, Utc};
use service_core::error::AppError;
use sqlx::postgres::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{AuditCategory, AuditEntry};

/// Entries older than this are eligible for the stale purge.
const RETENTION_DAYS: i64 = 60;

/// Records and queries (category, acting admin, optional detail) entries.
#[derive(Clone)]
pub struct AuditTrail {
    pool: PgPool,
}

impl AuditTrail {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one entry. Failures are reported, never retried.
    #[instrument(skip(self, detail), fields(category = category.as_str(), admin_id = %admin_id))]
    pub async fn record(
        &self,
        category: AuditCategory,
        admin_id: Uuid,
        detail: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (log_id, category, admin_id, detail)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category.as_str())
        .bind(admin_id)
        .bind(detail)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to record audit entry: {}", e)))?;

        Ok(())
    }

    /// All entries with the acting admin's username, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<AuditEntry>, AppError> {
        sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT l.log_id, l.category, a.username, l.detail, l.logged_utc
            FROM audit_logs l
            JOIN admins a ON a.admin_id = l.admin_id
            ORDER BY l.logged_utc DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list audit entries: {}", e)))
    }

    /// Delete entries older than the retention window. Returns how many went.
    #[instrument(skip(self))]
    pub async fn purge_stale(&self) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);

        let result = sqlx::query("DELETE FROM audit_logs WHERE logged_utc <= $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to purge audit entries: {}", e))
            })?;

        info!(deleted = result.rows_affected(), "Stale audit entries purged");

        Ok(result.rows_affected())
    }
}
