//! Services module for waterworks-service.

pub mod audit;
pub mod billing;
pub mod database;
pub mod metrics;

pub use audit::AuditTrail;
pub use billing::{consumption_charge, PricingTerms};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
