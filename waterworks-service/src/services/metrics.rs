//! Prometheus metrics for waterworks-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_histogram_vec, register_int_counter, Counter, HistogramVec,
    IntCounter, TextEncoder,
};

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "waterworks_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Invoices issued since startup.
pub static INVOICES_ISSUED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waterworks_invoices_issued_total",
        "Total number of invoices issued"
    )
    .expect("Failed to register invoices_issued_total")
});

/// Monetary total billed through invoice issuance and revision.
pub static INVOICE_AMOUNT_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "waterworks_invoice_amount_total",
        "Total amount billed on issued invoices"
    )
    .expect("Failed to register invoice_amount_total")
});

/// Admin logins since startup.
pub static LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waterworks_logins_total",
        "Total number of successful admin logins"
    )
    .expect("Failed to register logins_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&INVOICES_ISSUED_TOTAL);
    Lazy::force(&INVOICE_AMOUNT_TOTAL);
    Lazy::force(&LOGINS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
