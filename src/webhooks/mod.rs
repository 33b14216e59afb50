//! Webhook module for validating FlinkCluster admission requests.
//!
//! - CREATE: the full spec is validated field by field
//! - UPDATE: the spec is immutable except for requesting job cancellation
//! - DELETE and CONNECT are always allowed

pub mod error;
pub mod policies;
mod server;

pub use error::{ValidationError, WebhookError};
pub use policies::{
    ValidationContext, ValidationResult, validate_all, validate_create, validate_update,
};
pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookState, create_webhook_router,
    run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
