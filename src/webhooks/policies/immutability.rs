//! Immutability validation policy.
//!
//! Only enforced on UPDATE operations.
//!
//! A FlinkCluster spec cannot change once it has been admitted, with one
//! exception: `job.cancelRequested` may be flipped from false (or unset) to
//! true, provided nothing else in the spec changes at the same time. Once
//! set, the flag can never be cleared again.
//!
//! Metadata is not compared. Names and namespaces cannot change through an
//! update, and label, annotation or resourceVersion changes are not spec
//! changes.

use crate::crd::FlinkCluster;
use crate::webhooks::error::{Result, ValidationError};

/// Validate an update from `old` to `new`
pub fn validate(old: &FlinkCluster, new: &FlinkCluster) -> Result<()> {
    if is_cancel_transition(old, new)? {
        return Ok(());
    }

    if old.spec != new.spec {
        return Err(ValidationError::SpecImmutable(
            "the cluster properties are not updatable".to_string(),
        ));
    }

    Ok(())
}

/// Check whether the update only requests cancellation of the job.
///
/// Returns an error when the update tries to clear a previously set cancel
/// request.
fn is_cancel_transition(old: &FlinkCluster, new: &FlinkCluster) -> Result<bool> {
    let (Some(old_job), Some(new_job)) = (&old.spec.job, &new.spec.job) else {
        return Ok(false);
    };

    let was_requested = old_job.is_cancel_requested();
    let now_requested = new_job.is_cancel_requested();

    if was_requested && !now_requested {
        return Err(ValidationError::IrreversibleCancel(
            "updating cancelRequested from true to false is not allowed".to_string(),
        ));
    }

    if !was_requested && now_requested {
        // Only the cancel flag may differ
        let mut old_spec = old.spec.clone();
        if let Some(job) = old_spec.job.as_mut() {
            job.cancel_requested = new_job.cancel_requested;
        }
        return Ok(old_spec == new.spec);
    }

    Ok(false)
}
