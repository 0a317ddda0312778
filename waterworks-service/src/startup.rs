//! Application startup and lifecycle management.

use axum::{
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use secrecy::ExposeSecret;
use serde_json::json;
use service_core::error::AppError;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::request_id_middleware;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::WaterworksConfig;
use crate::handlers;
use crate::middleware::session_middleware;
use crate::services::{get_metrics, AuditTrail, Database};
use crate::utils::password;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: WaterworksConfig,
    pub db: Database,
    pub audit: AuditTrail,
}

/// Health check endpoint with a database connectivity probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": state.config.service_name,
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": state.config.service_name,
                "error": e.to_string()
            })),
        ),
    }
}

/// Readiness check endpoint.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Create the superadmin account when the admins table is empty.
async fn bootstrap_superadmin(db: &Database, config: &WaterworksConfig) -> Result<(), AppError> {
    if db.count_admins().await? > 0 {
        return Ok(());
    }

    let password_hash = password::hash_password(config.bootstrap.admin_password.expose_secret())?;
    db.create_admin(&config.bootstrap.admin_username, &password_hash, true)
        .await?;

    tracing::info!(
        username = %config.bootstrap.admin_username,
        "Bootstrapped superadmin account"
    );

    Ok(())
}

/// Everything behind the admin session, plus the public routes.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/admins",
            get(handlers::admins::list_admins).post(handlers::admins::create_admin),
        )
        .route("/admins/password", put(handlers::admins::reset_password))
        .route("/admins/:admin_id", delete(handlers::admins::delete_admin))
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clients/:client_id",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/clients/:client_id/services",
            get(handlers::services::list_for_client),
        )
        .route(
            "/services",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route(
            "/services/:service_id",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route(
            "/services/:service_id/client",
            put(handlers::services::reassign_service),
        )
        .route(
            "/services/:service_id/status",
            put(handlers::services::set_service_status),
        )
        .route(
            "/services/:service_id/invoices",
            get(handlers::invoices::list_for_service),
        )
        .route(
            "/services/:service_id/notifications",
            get(handlers::notifications::list_for_service)
                .post(handlers::notifications::create_notification),
        )
        .route(
            "/services/:service_id/notifications/settled",
            delete(handlers::notifications::delete_settled_for_service),
        )
        .route("/invoices", post(handlers::invoices::issue_invoice))
        .route("/invoices/pending", get(handlers::invoices::list_pending))
        .route(
            "/invoices/:invoice_id",
            get(handlers::invoices::get_invoice).delete(handlers::invoices::delete_invoice),
        )
        .route(
            "/invoices/:invoice_id/payment",
            put(handlers::invoices::set_paid),
        )
        .route(
            "/invoices/:invoice_id/reading",
            put(handlers::invoices::revise_reading),
        )
        .route(
            "/pricing",
            get(handlers::pricing::get_pricing).put(handlers::pricing::update_pricing),
        )
        .route(
            "/payments",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/payments/:payment_id",
            delete(handlers::payments::delete_payment),
        )
        .route(
            "/payments/:payment_id/installments",
            put(handlers::payments::update_installments),
        )
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notifications/settled",
            delete(handlers::notifications::delete_settled),
        )
        .route(
            "/notifications/:notification_id",
            delete(handlers::notifications::delete_notification),
        )
        .route(
            "/notifications/:notification_id/payment",
            put(handlers::notifications::toggle_paid),
        )
        .route("/audit", get(handlers::audit::list_entries))
        .route("/audit/stale", delete(handlers::audit::purge_stale))
        .route("/stats", get(handlers::stats::entity_counts))
        .route(
            "/stats/invoice-revenue",
            get(handlers::stats::invoice_revenue),
        )
        .route(
            "/stats/connection-revenue",
            get(handlers::stats::connection_revenue),
        )
        .layer(from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: WaterworksConfig) -> Result<Self, AppError> {
        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;
        bootstrap_superadmin(&db, &config).await?;

        let audit = AuditTrail::new(db.pool().clone());

        let state = AppState {
            config: config.clone(),
            db,
            audit,
        };

        // Port 0 picks a random free port; used by the integration tests.
        let addr = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Waterworks service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the application state for sharing with tests.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
