//! flink-operator library crate
//!
//! Admission validation for FlinkCluster custom resources: the CRD types,
//! the create/update validation policies, and the webhook and health servers
//! that expose them.

pub mod config;
pub mod crd;
pub mod health;
pub mod quantity;
pub mod webhooks;

pub use config::OperatorConfig;
pub use health::HealthState;
pub use webhooks::{
    ValidationError, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError,
    run_webhook_server, validate_create, validate_update,
};
