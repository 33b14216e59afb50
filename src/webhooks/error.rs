//! Error types for admission validation and the webhook server.

use thiserror::Error;

/// A rejected FlinkCluster specification.
///
/// Validation stops at the first failed check, so a rejection always carries
/// exactly one of these. The message names the offending field and, where it
/// helps, the offending value and what would have been accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Missing cluster name or namespace
    #[error("{0}")]
    InvalidIdentity(String),

    /// Missing image name or pull policy
    #[error("{0}")]
    InvalidImageSpec(String),

    /// JobManager replicas, access scope or off-heap ratio out of contract
    #[error("{0}")]
    InvalidManagerSpec(String),

    /// TaskManager replicas out of contract
    #[error("{0}")]
    InvalidWorkerSpec(String),

    /// Job jar, parallelism, restart policy or cleanup policy out of contract
    #[error("{0}")]
    InvalidJobSpec(String),

    /// Port missing or inside the reserved range
    #[error("{0}")]
    InvalidPort(String),

    /// Off-heap minimum missing or larger than the memory limit
    #[error("{0}")]
    InvalidMemoryConfig(String),

    /// Cleanup action missing
    #[error("{0}")]
    InvalidCleanupAction(String),

    /// Update changes a field other than `job.cancelRequested`
    #[error("{0}")]
    SpecImmutable(String),

    /// Update resets `job.cancelRequested` from true
    #[error("{0}")]
    IrreversibleCancel(String),

    /// Create with `job.cancelRequested` already true
    #[error("{0}")]
    PrematureCancelFlag(String),
}

impl ValidationError {
    /// Machine-readable reason reported alongside the admission denial.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidIdentity(_) => "InvalidIdentity",
            ValidationError::InvalidImageSpec(_) => "InvalidImageSpec",
            ValidationError::InvalidManagerSpec(_) => "InvalidManagerSpec",
            ValidationError::InvalidWorkerSpec(_) => "InvalidWorkerSpec",
            ValidationError::InvalidJobSpec(_) => "InvalidJobSpec",
            ValidationError::InvalidPort(_) => "InvalidPort",
            ValidationError::InvalidMemoryConfig(_) => "InvalidMemoryConfig",
            ValidationError::InvalidCleanupAction(_) => "InvalidCleanupAction",
            ValidationError::SpecImmutable(_) => "SpecImmutable",
            ValidationError::IrreversibleCancel(_) => "IrreversibleCancel",
            ValidationError::PrematureCancelFlag(_) => "PrematureCancelFlag",
        }
    }
}

/// Result type alias for validation checks
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Listener could not be bound
    #[error("failed to bind webhook port {port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}
