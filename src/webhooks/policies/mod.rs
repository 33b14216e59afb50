//! Validation policies for FlinkCluster admission webhooks.
//!
//! Policies are organized by operation:
//! - CREATE: identity, image, JobManager, TaskManager and job checks, in that order
//! - UPDATE: immutability (the spec is frozen except for a job cancel request)
//!
//! Every check is fail-fast: the first violation is returned and nothing
//! after it runs.

pub mod identity;
pub mod image;
pub mod immutability;
pub mod job;
pub mod job_manager;
pub mod ports;
pub mod task_manager;

use crate::crd::FlinkCluster;
use crate::webhooks::error::{Result, ValidationError};

/// Result of a validation check
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub allowed: bool,
    /// Reason for denial (if not allowed)
    pub reason: Option<String>,
    /// Detailed message (if not allowed)
    pub message: Option<String>,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
        }
    }

    /// Create a denied result
    pub fn denied(reason: &str, message: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
        }
    }
}

impl From<Result<()>> for ValidationResult {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::allowed(),
            Err(e) => Self::from(e),
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self::denied(error.reason(), &error.to_string())
    }
}

/// Context for validation
pub struct ValidationContext<'a> {
    /// The resource being validated
    pub resource: &'a FlinkCluster,
    /// The old resource (for UPDATE operations)
    pub old_resource: Option<&'a FlinkCluster>,
    /// Whether this is a dry-run request
    pub dry_run: bool,
    /// The namespace of the request
    pub namespace: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    /// Check if this is an UPDATE operation
    pub fn is_update(&self) -> bool {
        self.old_resource.is_some()
    }
}

/// Validate a new FlinkCluster
pub fn validate_create(cluster: &FlinkCluster) -> Result<()> {
    identity::validate(cluster)?;
    image::validate(&cluster.spec.image)?;
    job_manager::validate(&cluster.spec.job_manager)?;
    task_manager::validate(&cluster.spec.task_manager)?;
    job::validate(cluster.spec.job.as_ref())?;
    Ok(())
}

/// Validate an update of an existing FlinkCluster
pub fn validate_update(old: &FlinkCluster, new: &FlinkCluster) -> Result<()> {
    immutability::validate(old, new)
}

/// Run the policies for the operation described by `ctx`
pub fn validate_all(ctx: &ValidationContext<'_>) -> ValidationResult {
    match ctx.old_resource {
        Some(old) => validate_update(old, ctx.resource).into(),
        None => validate_create(ctx.resource).into(),
    }
}
