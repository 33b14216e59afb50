//! Job validation policy.
//!
//! Only applies when a job is attached to the cluster.
//!
//! Validates:
//! - Jar file is set
//! - Parallelism is at least 1
//! - Restart policy is set
//! - Both cleanup actions are set
//! - A new job is not already cancelled

use crate::crd::{CleanupAction, JobRestartPolicy, JobSpec, allowed_values};
use crate::webhooks::error::{Result, ValidationError};

/// Minimum job parallelism
pub const MIN_PARALLELISM: i32 = 1;

/// Validate the optional job spec
pub fn validate(job: Option<&JobSpec>) -> Result<()> {
    let Some(job) = job else {
        return Ok(());
    };

    if job.jar_file.is_empty() {
        return Err(ValidationError::InvalidJobSpec(
            "job jarFile is unspecified".to_string(),
        ));
    }

    match job.parallelism {
        None => {
            return Err(ValidationError::InvalidJobSpec(
                "job parallelism is unspecified".to_string(),
            ));
        }
        Some(parallelism) if parallelism < MIN_PARALLELISM => {
            return Err(ValidationError::InvalidJobSpec(format!(
                "job parallelism must be >= {} (got {})",
                MIN_PARALLELISM, parallelism
            )));
        }
        Some(_) => {}
    }

    match job.restart_policy {
        Some(JobRestartPolicy::Never | JobRestartPolicy::OnFailure) => {}
        None => {
            return Err(ValidationError::InvalidJobSpec(format!(
                "job restartPolicy is unspecified, must be one of: {}",
                allowed_values(&JobRestartPolicy::ALL)
            )));
        }
    }

    let Some(cleanup_policy) = &job.cleanup_policy else {
        return Err(ValidationError::InvalidJobSpec(
            "job cleanupPolicy is unspecified".to_string(),
        ));
    };
    validate_cleanup_action(
        "cleanupPolicy.afterJobSucceeds",
        cleanup_policy.after_job_succeeds,
    )?;
    validate_cleanup_action("cleanupPolicy.afterJobFails", cleanup_policy.after_job_fails)?;

    if job.is_cancel_requested() {
        return Err(ValidationError::PrematureCancelFlag(
            "property `cancelRequested` cannot be set to true for a new job".to_string(),
        ));
    }

    Ok(())
}

fn validate_cleanup_action(property: &str, action: Option<CleanupAction>) -> Result<()> {
    match action {
        Some(
            CleanupAction::DeleteCluster
            | CleanupAction::DeleteTaskManager
            | CleanupAction::KeepCluster,
        ) => Ok(()),
        None => Err(ValidationError::InvalidCleanupAction(format!(
            "job {} is unspecified, must be one of: {}",
            property,
            allowed_values(&CleanupAction::ALL)
        ))),
    }
}
