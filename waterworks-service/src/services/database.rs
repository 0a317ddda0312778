//! Database service for waterworks-service.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    Admin, AdminSession, Client, ConnectionPayment, CreateClient, CreateConnectionPayment,
    CreatePricing, CreateServiceConnection, Invoice, InvoiceWithParties, Notification,
    NotificationWithParties, PaymentKind, PaymentWithParties, PricingConfig, ServiceConnection,
    ServiceOverview, UpdateClient, UpdatePricing, UpdateServiceConnection,
};
use crate::services::billing::{consumption_charge, PricingTerms};
use crate::services::metrics::{DB_QUERY_DURATION, INVOICES_ISSUED_TOTAL, INVOICE_AMOUNT_TOTAL};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "waterworks-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Admin Operations
    // -------------------------------------------------------------------------

    pub async fn count_admins(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count admins: {}", e)))
    }

    /// Create an admin account.
    #[instrument(skip(self, password_hash))]
    pub async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
        superadmin: bool,
    ) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (admin_id, username, password_hash, superadmin)
            VALUES ($1, $2, $3, $4)
            RETURNING admin_id, username, password_hash, superadmin, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(superadmin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Username '{}' is already taken", username))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create admin: {}", e)),
        })?;

        info!(admin_id = %admin.admin_id, username = %admin.username, "Admin created");

        Ok(admin)
    }

    pub async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(
            "SELECT admin_id, username, password_hash, superadmin, created_utc FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to look up admin: {}", e)))
    }

    pub async fn get_admin(&self, admin_id: Uuid) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(
            "SELECT admin_id, username, password_hash, superadmin, created_utc FROM admins WHERE admin_id = $1",
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get admin: {}", e)))
    }

    /// List every admin except the superadmin.
    pub async fn list_admins(&self) -> Result<Vec<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(
            r#"
            SELECT admin_id, username, password_hash, superadmin, created_utc
            FROM admins
            WHERE NOT superadmin
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list admins: {}", e)))
    }

    #[instrument(skip(self, password_hash))]
    pub async fn set_admin_password(
        &self,
        admin_id: Uuid,
        password_hash: &str,
    ) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(
            r#"
            UPDATE admins
            SET password_hash = $2
            WHERE admin_id = $1
            RETURNING admin_id, username, password_hash, superadmin, created_utc
            "#,
        )
        .bind(admin_id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to set password: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn delete_admin(&self, admin_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM admins WHERE admin_id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete admin: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Session Operations
    // -------------------------------------------------------------------------

    pub async fn create_session(
        &self,
        admin_id: Uuid,
        token_hash: &str,
        expires_utc: DateTime<Utc>,
    ) -> Result<AdminSession, AppError> {
        sqlx::query_as::<_, AdminSession>(
            r#"
            INSERT INTO admin_sessions (session_id, admin_id, token_hash, expires_utc)
            VALUES ($1, $2, $3, $4)
            RETURNING session_id, admin_id, token_hash, created_utc, expires_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(admin_id)
        .bind(token_hash)
        .bind(expires_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create session: {}", e)))
    }

    /// Resolve a live (unexpired) session token to its admin.
    pub async fn find_session_admin(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>(
            r#"
            SELECT a.admin_id, a.username, a.password_hash, a.superadmin, a.created_utc
            FROM admin_sessions s
            JOIN admins a ON a.admin_id = s.admin_id
            WHERE s.token_hash = $1 AND s.expires_utc > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to resolve session: {}", e)))
    }

    pub async fn delete_session(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete session: {}", e)))?;
        Ok(())
    }

    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_utc <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to purge sessions: {}", e))
            })?;
        Ok(result.rows_affected())
    }

    // -------------------------------------------------------------------------
    // Client Operations
    // -------------------------------------------------------------------------

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT client_id, national_id, first_names, last_names, phone, created_utc
            FROM clients
            ORDER BY last_names, first_names
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list clients: {}", e)))
    }

    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT client_id, national_id, first_names, last_names, phone, created_utc
            FROM clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get client: {}", e)))
    }

    /// Register a client.
    #[instrument(skip(self, input), fields(national_id = %input.national_id))]
    pub async fn create_client(&self, input: &CreateClient) -> Result<Client, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (client_id, national_id, first_names, last_names, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING client_id, national_id, first_names, last_names, phone, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.national_id)
        .bind(&input.first_names)
        .bind(&input.last_names)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A client with national id '{}' already exists",
                    input.national_id
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create client: {}", e)),
        })?;

        timer.observe_duration();

        info!(client_id = %client.client_id, "Client registered");

        Ok(client)
    }

    /// Partial update; absent fields keep their stored value.
    #[instrument(skip(self, input))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: &UpdateClient,
    ) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET national_id = COALESCE($2, national_id),
                first_names = COALESCE($3, first_names),
                last_names = COALESCE($4, last_names),
                phone = COALESCE($5, phone)
            WHERE client_id = $1
            RETURNING client_id, national_id, first_names, last_names, phone, created_utc
            "#,
        )
        .bind(client_id)
        .bind(&input.national_id)
        .bind(&input.first_names)
        .bind(&input.last_names)
        .bind(&input.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Another client already uses this national id"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update client: {}", e)),
        })
    }

    /// Delete a client; their services and invoices cascade.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete client: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Service Connection Operations
    // -------------------------------------------------------------------------

    /// The service roster with owners and a billed-this-month flag.
    #[instrument(skip(self))]
    pub async fn list_services(&self, now: DateTime<Utc>) -> Result<Vec<ServiceOverview>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_services"])
            .start_timer();

        let services = sqlx::query_as::<_, ServiceOverview>(
            r#"
            SELECT s.service_id, s.connection_number, s.meter_number, s.address, s.active,
                   s.previous_reading,
                   c.client_id, c.national_id, c.first_names, c.last_names, c.phone,
                   EXISTS (
                       SELECT 1 FROM invoices i
                       WHERE i.service_id = s.service_id
                         AND i.period_year = $1 AND i.period_month = $2
                   ) AS current_period_billed
            FROM service_connections s
            JOIN clients c ON c.client_id = s.client_id
            ORDER BY s.connection_number
            "#,
        )
        .bind(now.year())
        .bind(now.month() as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list services: {}", e)))?;

        timer.observe_duration();

        Ok(services)
    }

    pub async fn list_services_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ServiceConnection>, AppError> {
        sqlx::query_as::<_, ServiceConnection>(
            r#"
            SELECT service_id, client_id, connection_number, meter_number, address, active,
                   previous_reading, created_utc
            FROM service_connections
            WHERE client_id = $1
            ORDER BY connection_number
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list services: {}", e)))
    }

    pub async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceConnection>, AppError> {
        sqlx::query_as::<_, ServiceConnection>(
            r#"
            SELECT service_id, client_id, connection_number, meter_number, address, active,
                   previous_reading, created_utc
            FROM service_connections
            WHERE service_id = $1
            "#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service: {}", e)))
    }

    /// Install a service connection for an existing client.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create_service(
        &self,
        input: &CreateServiceConnection,
    ) -> Result<ServiceConnection, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_service"])
            .start_timer();

        let service = sqlx::query_as::<_, ServiceConnection>(
            r#"
            INSERT INTO service_connections
                (service_id, client_id, connection_number, meter_number, address, active, previous_reading)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING service_id, client_id, connection_number, meter_number, address, active,
                      previous_reading, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.client_id)
        .bind(input.connection_number)
        .bind(input.meter_number)
        .bind(&input.address)
        .bind(input.active)
        .bind(input.previous_reading)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Connection or meter number is already in use"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create service: {}", e)),
        })?;

        timer.observe_duration();

        info!(service_id = %service.service_id, "Service connection installed");

        Ok(service)
    }

    /// Partial update; absent fields keep their stored value.
    #[instrument(skip(self, input))]
    pub async fn update_service(
        &self,
        service_id: Uuid,
        input: &UpdateServiceConnection,
    ) -> Result<Option<ServiceConnection>, AppError> {
        sqlx::query_as::<_, ServiceConnection>(
            r#"
            UPDATE service_connections
            SET connection_number = COALESCE($2, connection_number),
                meter_number = COALESCE($3, meter_number),
                address = COALESCE($4, address)
            WHERE service_id = $1
            RETURNING service_id, client_id, connection_number, meter_number, address, active,
                      previous_reading, created_utc
            "#,
        )
        .bind(service_id)
        .bind(input.connection_number)
        .bind(input.meter_number)
        .bind(&input.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Connection or meter number is already in use"
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update service: {}", e)),
        })
    }

    pub async fn reassign_service(
        &self,
        service_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<ServiceConnection>, AppError> {
        sqlx::query_as::<_, ServiceConnection>(
            r#"
            UPDATE service_connections
            SET client_id = $2
            WHERE service_id = $1
            RETURNING service_id, client_id, connection_number, meter_number, address, active,
                      previous_reading, created_utc
            "#,
        )
        .bind(service_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to reassign service: {}", e)))
    }

    pub async fn set_service_status(
        &self,
        service_id: Uuid,
        active: bool,
    ) -> Result<Option<ServiceConnection>, AppError> {
        sqlx::query_as::<_, ServiceConnection>(
            r#"
            UPDATE service_connections
            SET active = $2
            WHERE service_id = $1
            RETURNING service_id, client_id, connection_number, meter_number, address, active,
                      previous_reading, created_utc
            "#,
        )
        .bind(service_id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to set service status: {}", e)))
    }

    /// Delete a service connection; its invoices, payments, and
    /// notifications cascade.
    #[instrument(skip(self))]
    pub async fn delete_service(&self, service_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM service_connections WHERE service_id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete service: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Pricing Configuration Operations
    // -------------------------------------------------------------------------

    pub async fn get_pricing(&self) -> Result<Option<PricingConfig>, AppError> {
        sqlx::query_as::<_, PricingConfig>(
            r#"
            SELECT config_id, base_allowance, overage_unit, base_price, overage_unit_price,
                   reconnection_fee, updated_utc
            FROM pricing_config
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get pricing: {}", e)))
    }

    /// Create the singleton pricing row.
    #[instrument(skip(self, input))]
    pub async fn create_pricing(&self, input: &CreatePricing) -> Result<PricingConfig, AppError> {
        let pricing = sqlx::query_as::<_, PricingConfig>(
            r#"
            INSERT INTO pricing_config
                (config_id, base_allowance, overage_unit, base_price, overage_unit_price, reconnection_fee)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING config_id, base_allowance, overage_unit, base_price, overage_unit_price,
                      reconnection_fee, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.base_allowance)
        .bind(input.overage_unit)
        .bind(input.base_price)
        .bind(input.overage_unit_price)
        .bind(input.reconnection_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("A pricing configuration already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create pricing: {}", e)),
        })?;

        info!(config_id = %pricing.config_id, "Pricing configuration created");

        Ok(pricing)
    }

    /// Update the pricing row. Fails while invoices issued in the current
    /// calendar month exist: those invoices froze the pricing that produced
    /// them.
    #[instrument(skip(self, input))]
    pub async fn update_pricing(
        &self,
        input: &UpdatePricing,
        now: DateTime<Utc>,
    ) -> Result<PricingConfig, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let current = sqlx::query_as::<_, PricingConfig>(
            r#"
            SELECT config_id, base_allowance, overage_unit, base_price, overage_unit_price,
                   reconnection_fee, updated_utc
            FROM pricing_config
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get pricing: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No pricing configuration exists")))?;

        let frozen = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM invoices WHERE period_year = $1 AND period_month = $2)",
        )
        .bind(now.year())
        .bind(now.month() as i32)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to check invoices: {}", e)))?;

        if frozen {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Invoices have already been issued this month with the current pricing"
            )));
        }

        let pricing = sqlx::query_as::<_, PricingConfig>(
            r#"
            UPDATE pricing_config
            SET base_allowance = COALESCE($2, base_allowance),
                overage_unit = COALESCE($3, overage_unit),
                base_price = COALESCE($4, base_price),
                overage_unit_price = COALESCE($5, overage_unit_price),
                reconnection_fee = COALESCE($6, reconnection_fee),
                updated_utc = $7
            WHERE config_id = $1
            RETURNING config_id, base_allowance, overage_unit, base_price, overage_unit_price,
                      reconnection_fee, updated_utc
            "#,
        )
        .bind(current.config_id)
        .bind(input.base_allowance)
        .bind(input.overage_unit)
        .bind(input.base_price)
        .bind(input.overage_unit_price)
        .bind(input.reconnection_fee)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update pricing: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(config_id = %pricing.config_id, "Pricing configuration updated");

        Ok(pricing)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    pub async fn list_invoices_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, service_id, issued_utc, period_year, period_month,
                   base_allowance, overage_unit, base_price, overage_unit_price,
                   previous_reading, current_reading, total_consumption, total_amount, paid
            FROM invoices
            WHERE service_id = $1
            ORDER BY issued_utc DESC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))
    }

    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, service_id, issued_utc, period_year, period_month,
                   base_allowance, overage_unit, base_price, overage_unit_price,
                   previous_reading, current_reading, total_consumption, total_amount, paid
            FROM invoices
            WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))
    }

    pub async fn get_invoice_with_parties(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<InvoiceWithParties>, AppError> {
        sqlx::query_as::<_, InvoiceWithParties>(
            r#"
            SELECT i.invoice_id, i.service_id, i.issued_utc, i.period_year, i.period_month,
                   i.base_allowance, i.overage_unit, i.base_price, i.overage_unit_price,
                   i.previous_reading, i.current_reading, i.total_consumption, i.total_amount,
                   i.paid,
                   s.connection_number, s.meter_number, s.address,
                   s.active AS service_active, s.previous_reading AS service_previous_reading,
                   c.client_id, c.national_id, c.first_names, c.last_names, c.phone
            FROM invoices i
            JOIN service_connections s ON s.service_id = i.service_id
            JOIN clients c ON c.client_id = s.client_id
            WHERE i.invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))
    }

    /// All unpaid invoices with their service and client.
    pub async fn list_pending_invoices(&self) -> Result<Vec<InvoiceWithParties>, AppError> {
        sqlx::query_as::<_, InvoiceWithParties>(
            r#"
            SELECT i.invoice_id, i.service_id, i.issued_utc, i.period_year, i.period_month,
                   i.base_allowance, i.overage_unit, i.base_price, i.overage_unit_price,
                   i.previous_reading, i.current_reading, i.total_consumption, i.total_amount,
                   i.paid,
                   s.connection_number, s.meter_number, s.address,
                   s.active AS service_active, s.previous_reading AS service_previous_reading,
                   c.client_id, c.national_id, c.first_names, c.last_names, c.phone
            FROM invoices i
            JOIN service_connections s ON s.service_id = i.service_id
            JOIN clients c ON c.client_id = s.client_id
            WHERE NOT i.paid
            ORDER BY i.issued_utc
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list pending invoices: {}", e)))
    }

    /// Issue the monthly invoice for a service from a new meter reading.
    ///
    /// Computes the tiered charge from the live pricing configuration,
    /// snapshots that configuration into the invoice, and advances the
    /// service's previous reading, all in one transaction. The
    /// (service, year, month) unique constraint turns a concurrent
    /// duplicate into a conflict instead of a double issuance.
    #[instrument(skip(self), fields(service_id = %service_id, current_reading = current_reading))]
    pub async fn issue_invoice(
        &self,
        service_id: Uuid,
        current_reading: i64,
        now: DateTime<Utc>,
    ) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["issue_invoice"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let service = sqlx::query_as::<_, ServiceConnection>(
            r#"
            SELECT service_id, client_id, connection_number, meter_number, address, active,
                   previous_reading, created_utc
            FROM service_connections
            WHERE service_id = $1
            FOR UPDATE
            "#,
        )
        .bind(service_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service connection not found")))?;

        if !service.active {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Service connection is suspended"
            )));
        }

        if current_reading < service.previous_reading {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Current reading {} is below the service's previous reading {}",
                current_reading,
                service.previous_reading
            )));
        }

        let already_billed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM invoices
                WHERE service_id = $1 AND period_year = $2 AND period_month = $3
            )
            "#,
        )
        .bind(service_id)
        .bind(now.year())
        .bind(now.month() as i32)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to check invoices: {}", e)))?;

        if already_billed {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "An invoice for this service already exists for the current month"
            )));
        }

        let pricing = sqlx::query_as::<_, PricingConfig>(
            r#"
            SELECT config_id, base_allowance, overage_unit, base_price, overage_unit_price,
                   reconnection_fee, updated_utc
            FROM pricing_config
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get pricing: {}", e)))?
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("No pricing configuration exists"))
        })?;

        let total_consumption = current_reading - service.previous_reading;
        let terms = PricingTerms::of_config(&pricing);
        let total_amount = consumption_charge(&terms, total_consumption)?;

        let result = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices
                (invoice_id, service_id, issued_utc, period_year, period_month,
                 base_allowance, overage_unit, base_price, overage_unit_price,
                 previous_reading, current_reading, total_consumption, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING invoice_id, service_id, issued_utc, period_year, period_month,
                      base_allowance, overage_unit, base_price, overage_unit_price,
                      previous_reading, current_reading, total_consumption, total_amount, paid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(service_id)
        .bind(now)
        .bind(now.year())
        .bind(now.month() as i32)
        .bind(pricing.base_allowance)
        .bind(pricing.overage_unit)
        .bind(pricing.base_price)
        .bind(pricing.overage_unit_price)
        .bind(service.previous_reading)
        .bind(current_reading)
        .bind(total_consumption)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await;

        let invoice = match result {
            Ok(invoice) => invoice,
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                // Concurrent issuance lost the race against the constraint.
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "An invoice for this service already exists for the current month"
                )));
            }
            Err(e) => {
                return Err(AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to insert invoice: {}",
                    e
                )));
            }
        };

        sqlx::query("UPDATE service_connections SET previous_reading = $2 WHERE service_id = $1")
            .bind(service_id)
            .bind(current_reading)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to advance reading: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        INVOICES_ISSUED_TOTAL.inc();
        INVOICE_AMOUNT_TOTAL.inc_by(total_amount.to_f64().unwrap_or(0.0));

        info!(
            invoice_id = %invoice.invoice_id,
            service_id = %service_id,
            total_consumption = total_consumption,
            total_amount = %total_amount,
            "Invoice issued"
        );

        Ok(invoice)
    }

    pub async fn set_invoice_paid(
        &self,
        invoice_id: Uuid,
        paid: bool,
    ) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET paid = $2
            WHERE invoice_id = $1
            RETURNING invoice_id, service_id, issued_utc, period_year, period_month,
                      base_allowance, overage_unit, base_price, overage_unit_price,
                      previous_reading, current_reading, total_consumption, total_amount, paid
            "#,
        )
        .bind(invoice_id)
        .bind(paid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to set invoice paid: {}", e)))
    }

    /// Correct the current reading of an invoice issued this month.
    ///
    /// Recomputes consumption and charge against the invoice's own pricing
    /// snapshot, then moves the invoice and the owning service's previous
    /// reading together.
    #[instrument(skip(self), fields(invoice_id = %invoice_id, corrected_reading = corrected_reading))]
    pub async fn revise_invoice_reading(
        &self,
        invoice_id: Uuid,
        corrected_reading: i64,
        now: DateTime<Utc>,
    ) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["revise_invoice_reading"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, service_id, issued_utc, period_year, period_month,
                   base_allowance, overage_unit, base_price, overage_unit_price,
                   previous_reading, current_reading, total_consumption, total_amount, paid
            FROM invoices
            WHERE invoice_id = $1
            FOR UPDATE
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

        if invoice.period_year != now.year() || invoice.period_month != now.month() as i32 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invoice does not belong to the current billing month"
            )));
        }

        if invoice.paid {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invoice has already been paid"
            )));
        }

        if corrected_reading < invoice.previous_reading {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Corrected reading {} is below the invoice's previous reading {}",
                corrected_reading,
                invoice.previous_reading
            )));
        }

        let total_consumption = corrected_reading - invoice.previous_reading;
        let terms = PricingTerms::of_invoice(&invoice);
        let total_amount = consumption_charge(&terms, total_consumption)?;

        let revised = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET current_reading = $2, total_consumption = $3, total_amount = $4
            WHERE invoice_id = $1
            RETURNING invoice_id, service_id, issued_utc, period_year, period_month,
                      base_allowance, overage_unit, base_price, overage_unit_price,
                      previous_reading, current_reading, total_consumption, total_amount, paid
            "#,
        )
        .bind(invoice_id)
        .bind(corrected_reading)
        .bind(total_consumption)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to revise invoice: {}", e)))?;

        sqlx::query("UPDATE service_connections SET previous_reading = $2 WHERE service_id = $1")
            .bind(invoice.service_id)
            .bind(corrected_reading)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to advance reading: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            invoice_id = %invoice_id,
            total_consumption = total_consumption,
            total_amount = %total_amount,
            "Invoice reading revised"
        );

        Ok(revised)
    }

    /// Delete an invoice from a past billing month and roll the owning
    /// service's previous reading back to the invoice's starting reading.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn delete_invoice(
        &self,
        invoice_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, service_id, issued_utc, period_year, period_month,
                   base_allowance, overage_unit, base_price, overage_unit_price,
                   previous_reading, current_reading, total_consumption, total_amount, paid
            FROM invoices
            WHERE invoice_id = $1
            FOR UPDATE
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

        if invoice.period_year == now.year() && invoice.period_month == now.month() as i32 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invoices from the current billing month cannot be deleted"
            )));
        }

        sqlx::query("DELETE FROM invoices WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e)))?;

        sqlx::query("UPDATE service_connections SET previous_reading = $2 WHERE service_id = $1")
            .bind(invoice.service_id)
            .bind(invoice.previous_reading)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to restore reading: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(
            invoice_id = %invoice_id,
            service_id = %invoice.service_id,
            restored_reading = invoice.previous_reading,
            "Invoice deleted"
        );

        Ok(invoice)
    }

    // -------------------------------------------------------------------------
    // Connection Payment Operations
    // -------------------------------------------------------------------------

    pub async fn list_payments(
        &self,
        kind: PaymentKind,
    ) -> Result<Vec<PaymentWithParties>, AppError> {
        sqlx::query_as::<_, PaymentWithParties>(
            r#"
            SELECT p.payment_id, p.service_id, p.kind, p.issued_utc, p.total, p.down_payment,
                   p.installment_1, p.installment_2, p.installment_3,
                   p.installment_4, p.installment_5, p.installment_6,
                   s.connection_number, s.meter_number, s.address, s.active AS service_active,
                   s.previous_reading AS service_previous_reading,
                   c.client_id, c.national_id, c.first_names, c.last_names, c.phone
            FROM connection_payments p
            JOIN service_connections s ON s.service_id = p.service_id
            JOIN clients c ON c.client_id = s.client_id
            WHERE p.kind = $1
            ORDER BY p.issued_utc DESC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))
    }

    /// Record a connection fee payment; installments start at zero.
    #[instrument(skip(self, input), fields(service_id = %input.service_id, kind = input.kind.as_str()))]
    pub async fn create_payment(
        &self,
        input: &CreateConnectionPayment,
    ) -> Result<ConnectionPayment, AppError> {
        if input.total < Decimal::ZERO || input.down_payment < Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Amounts must not be negative"
            )));
        }

        if input.down_payment > input.total {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Down payment exceeds the total owed"
            )));
        }

        let payment = sqlx::query_as::<_, ConnectionPayment>(
            r#"
            INSERT INTO connection_payments (payment_id, service_id, kind, total, down_payment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING payment_id, service_id, kind, issued_utc, total, down_payment,
                      installment_1, installment_2, installment_3,
                      installment_4, installment_5, installment_6
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.service_id)
        .bind(input.kind.as_str())
        .bind(input.total)
        .bind(input.down_payment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create payment: {}", e)))?;

        info!(payment_id = %payment.payment_id, "Connection payment recorded");

        Ok(payment)
    }

    /// Overwrite the six installment fields.
    ///
    /// The whole write is rejected when the down payment plus the new
    /// installments would exceed the total owed, leaving every field as it
    /// was.
    #[instrument(skip(self, installments), fields(payment_id = %payment_id))]
    pub async fn update_installments(
        &self,
        payment_id: Uuid,
        installments: [Decimal; 6],
    ) -> Result<ConnectionPayment, AppError> {
        if installments.iter().any(|amount| *amount < Decimal::ZERO) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Installments must not be negative"
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let payment = sqlx::query_as::<_, ConnectionPayment>(
            r#"
            SELECT payment_id, service_id, kind, issued_utc, total, down_payment,
                   installment_1, installment_2, installment_3,
                   installment_4, installment_5, installment_6
            FROM connection_payments
            WHERE payment_id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payment: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

        let paid_total = payment.down_payment + installments.iter().sum::<Decimal>();
        if paid_total > payment.total {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Paid total {} exceeds the total owed {}",
                paid_total,
                payment.total
            )));
        }

        let updated = sqlx::query_as::<_, ConnectionPayment>(
            r#"
            UPDATE connection_payments
            SET installment_1 = $2, installment_2 = $3, installment_3 = $4,
                installment_4 = $5, installment_5 = $6, installment_6 = $7
            WHERE payment_id = $1
            RETURNING payment_id, service_id, kind, issued_utc, total, down_payment,
                      installment_1, installment_2, installment_3,
                      installment_4, installment_5, installment_6
            "#,
        )
        .bind(payment_id)
        .bind(installments[0])
        .bind(installments[1])
        .bind(installments[2])
        .bind(installments[3])
        .bind(installments[4])
        .bind(installments[5])
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update installments: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        info!(payment_id = %payment_id, paid_total = %paid_total, "Installments updated");

        Ok(updated)
    }

    /// Delete a payment record. A financed payment may only go once fully
    /// paid.
    #[instrument(skip(self))]
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let payment = sqlx::query_as::<_, ConnectionPayment>(
            r#"
            SELECT payment_id, service_id, kind, issued_utc, total, down_payment,
                   installment_1, installment_2, installment_3,
                   installment_4, installment_5, installment_6
            FROM connection_payments
            WHERE payment_id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payment: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

        if payment.kind == PaymentKind::Financed.as_str() && payment.outstanding() > Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Financed payment still has {} outstanding",
                payment.outstanding()
            )));
        }

        sqlx::query("DELETE FROM connection_payments WHERE payment_id = $1")
            .bind(payment_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete payment: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Notification Operations
    // -------------------------------------------------------------------------

    pub async fn list_notifications(
        &self,
        service_id: Option<Uuid>,
    ) -> Result<Vec<NotificationWithParties>, AppError> {
        sqlx::query_as::<_, NotificationWithParties>(
            r#"
            SELECT n.notification_id, n.service_id, n.issued_utc, n.amount, n.paid,
                   s.connection_number, s.meter_number,
                   c.client_id, c.national_id, c.first_names, c.last_names, c.phone
            FROM notifications n
            JOIN service_connections s ON s.service_id = n.service_id
            JOIN clients c ON c.client_id = s.client_id
            WHERE $1::uuid IS NULL OR n.service_id = $1
            ORDER BY n.issued_utc DESC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list notifications: {}", e)))
    }

    pub async fn create_notification(&self, service_id: Uuid) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (notification_id, service_id)
            VALUES ($1, $2)
            RETURNING notification_id, service_id, issued_utc, amount, paid
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create notification: {}", e))
        })?;

        info!(notification_id = %notification.notification_id, "Notification created");

        Ok(notification)
    }

    /// Flip the paid flag and return the new state.
    pub async fn toggle_notification_paid(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET paid = NOT paid
            WHERE notification_id = $1
            RETURNING notification_id, service_id, issued_utc, amount, paid
            "#,
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to toggle notification: {}", e))
        })
    }

    pub async fn delete_notification(&self, notification_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE notification_id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete notification: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete paid notifications, optionally scoped to one service.
    #[instrument(skip(self))]
    pub async fn delete_settled_notifications(
        &self,
        service_id: Option<Uuid>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE paid AND ($1::uuid IS NULL OR service_id = $1)",
        )
        .bind(service_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to delete notifications: {}", e))
        })?;

        Ok(result.rows_affected())
    }

    // -------------------------------------------------------------------------
    // Statistics Operations
    // -------------------------------------------------------------------------

    /// Client count, service count, and unpaid-invoice count.
    pub async fn entity_counts(&self) -> Result<(i64, i64, i64), AppError> {
        let counts = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM clients),
                   (SELECT COUNT(*) FROM service_connections),
                   (SELECT COUNT(*) FROM invoices WHERE NOT paid)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count entities: {}", e)))?;

        Ok(counts)
    }

    /// Invoice totals per weekday (Monday first) for the given UTC window.
    pub async fn invoice_revenue_by_weekday(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<[Decimal; 7], AppError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT EXTRACT(ISODOW FROM issued_utc AT TIME ZONE 'UTC')::INT AS weekday,
                   SUM(total_amount)
            FROM invoices
            WHERE issued_utc >= $1 AND issued_utc < $2
            GROUP BY weekday
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum revenue: {}", e)))?;

        let mut buckets = [Decimal::ZERO; 7];
        for (weekday, total) in rows {
            if (1..=7).contains(&weekday) {
                buckets[(weekday - 1) as usize] = total;
            }
        }

        Ok(buckets)
    }

    /// Invoice totals per month of one year (January first).
    pub async fn invoice_revenue_by_month(&self, year: i32) -> Result<[Decimal; 12], AppError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT period_month, SUM(total_amount)
            FROM invoices
            WHERE period_year = $1
            GROUP BY period_month
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum revenue: {}", e)))?;

        let mut buckets = [Decimal::ZERO; 12];
        for (month, total) in rows {
            if (1..=12).contains(&month) {
                buckets[(month - 1) as usize] = total;
            }
        }

        Ok(buckets)
    }

    /// Collected connection-fee totals (down payment plus installments) per
    /// month of one year for a payment kind.
    pub async fn connection_revenue_by_month(
        &self,
        kind: PaymentKind,
        year: i32,
    ) -> Result<[Decimal; 12], AppError> {
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT EXTRACT(MONTH FROM issued_utc AT TIME ZONE 'UTC')::INT AS month,
                   SUM(down_payment + installment_1 + installment_2 + installment_3
                       + installment_4 + installment_5 + installment_6)
            FROM connection_payments
            WHERE kind = $1
              AND EXTRACT(YEAR FROM issued_utc AT TIME ZONE 'UTC')::INT = $2
            GROUP BY month
            "#,
        )
        .bind(kind.as_str())
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum revenue: {}", e)))?;

        let mut buckets = [Decimal::ZERO; 12];
        for (month, total) in rows {
            if (1..=12).contains(&month) {
                buckets[(month - 1) as usize] = total;
            }
        }

        Ok(buckets)
    }
}
