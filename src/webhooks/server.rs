//! Admission webhook server.
//!
//! Provides the HTTPS endpoint the API server calls for FlinkCluster
//! CREATE and UPDATE requests.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration pointing at `/validate-flinkcluster`
//! 3. Mount the TLS certificate secret to the operator pod at /etc/webhook/certs/

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::Resource;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use tracing::{debug, error, info, warn};

use crate::crd::FlinkCluster;
use crate::health::HealthState;
use crate::webhooks::error::WebhookError;
use crate::webhooks::policies::{ValidationContext, ValidationResult, validate_all};

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
#[derive(Default)]
pub struct WebhookState {
    pub health_state: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(health_state: Option<Arc<HealthState>>) -> Self {
        Self { health_state }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Decode an admission object into a typed FlinkCluster.
///
/// Unknown enumeration values fail here, with serde naming the offending
/// value and the accepted ones.
fn decode_cluster(object: &DynamicObject) -> Result<FlinkCluster, serde_json::Error> {
    serde_json::to_value(object).and_then(serde_json::from_value)
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate-flinkcluster", post(validate_flinkcluster))
        .with_state(state)
}

/// Evaluate a CREATE or UPDATE request against the validation policies
fn review(request: &AdmissionRequest<DynamicObject>) -> ValidationResult {
    let Some(object) = &request.object else {
        return ValidationResult::denied("InvalidRequest", "Missing object in request");
    };
    let resource = match decode_cluster(object) {
        Ok(resource) => resource,
        Err(e) => {
            return ValidationResult::denied(
                "MalformedObject",
                &format!("invalid FlinkCluster: {}", e),
            );
        }
    };

    let old_resource = if request.operation == Operation::Update {
        let Some(old_object) = &request.old_object else {
            return ValidationResult::denied(
                "InvalidRequest",
                "Missing oldObject in UPDATE request",
            );
        };
        match decode_cluster(old_object) {
            Ok(old) => Some(old),
            Err(e) => {
                return ValidationResult::denied(
                    "MalformedObject",
                    &format!("invalid stored FlinkCluster: {}", e),
                );
            }
        }
    } else {
        None
    };

    let ctx = ValidationContext {
        resource: &resource,
        old_resource: old_resource.as_ref(),
        dry_run: request.dry_run,
        namespace: request.namespace.as_deref(),
    };

    validate_all(&ctx)
}

/// FlinkCluster admission webhook handler
async fn validate_flinkcluster(
    State(state): State<Arc<WebhookState>>,
    Json(review_body): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<DynamicObject> = match review_body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    let operation = operation_label(&request.operation);
    debug!(
        uid = %uid,
        operation,
        namespace = ?request.namespace,
        name = ?request.name,
        dry_run = request.dry_run,
        "Processing admission request"
    );

    // Only CREATE and UPDATE are validated
    if matches!(request.operation, Operation::Delete | Operation::Connect) {
        info!(uid = %uid, operation, "Admission request allowed");
        return (
            StatusCode::OK,
            Json(AdmissionResponse::from(&request).into_review()),
        );
    }

    let started = Instant::now();
    let result = review(&request);
    let elapsed = started.elapsed().as_secs_f64();

    if let Some(health_state) = &state.health_state {
        health_state.metrics.record_admission(
            operation,
            result.allowed,
            result.reason.as_deref(),
            elapsed,
        );
    }

    if !result.allowed {
        let reason = result
            .reason
            .unwrap_or_else(|| "ValidationFailed".to_string());
        let message = result
            .message
            .unwrap_or_else(|| "Validation failed".to_string());
        if reason == "MalformedObject" || reason == "InvalidRequest" {
            error!(
                uid = %uid,
                operation,
                reason = %reason,
                message = %message,
                "Admission request rejected as malformed"
            );
        } else {
            warn!(uid = %uid, operation, reason = %reason, message = %message, "Admission request denied");
        }
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &message, &reason)),
        );
    }

    info!(uid = %uid, operation, "Admission request allowed");
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

/// Bind the webhook listener on all interfaces.
fn bind_listener(port: u16) -> Result<std::net::TcpListener, WebhookError> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener =
        std::net::TcpListener::bind(addr).map_err(|source| WebhookError::Bind { port, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| WebhookError::Bind { port, source })?;
    Ok(listener)
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on `port` and serves the /validate-flinkcluster endpoint.
/// TLS certificates are loaded from the paths specified. The health state is
/// marked ready only once the listener is bound.
///
/// # Arguments
/// * `health_state` - Shared health state for admission metrics
/// * `port` - Port to listen on
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    health_state: Option<Arc<HealthState>>,
    port: u16,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::path::PathBuf;

    let state = Arc::new(WebhookState::new(health_state.clone()));
    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let listener = bind_listener(port)?;
    info!(port, "Webhook server listening with TLS");

    if let Some(health_state) = &health_state {
        health_state.set_ready(true).await;
    }

    axum_server::from_tcp_rustls(listener, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
