//! JobManager validation policy.
//!
//! Validates:
//! - Exactly one JobManager replica (no HA JobManager)
//! - Access scope is set
//! - RPC, blob, query and UI ports are outside the reserved range
//! - Off-heap memory ratio is a percentage
//! - Off-heap memory minimum is set and fits in the memory limit

use super::ports::validate_port;
use crate::crd::{AccessScope, JobManagerSpec, allowed_values};
use crate::quantity::{memory_limit_bytes, to_mebibytes};
use crate::webhooks::error::{Result, ValidationError};

/// The only supported JobManager replica count
pub const JOB_MANAGER_REPLICAS: i32 = 1;

/// Upper bound of the off-heap memory ratio (percent)
pub const MAX_OFF_HEAP_RATIO: i32 = 100;

const COMPONENT: &str = "jobmanager";

/// Validate the JobManager spec
pub fn validate(spec: &JobManagerSpec) -> Result<()> {
    validate_replicas(spec)?;
    validate_access_scope(spec)?;
    validate_ports(spec)?;
    validate_off_heap_ratio(spec)?;
    validate_off_heap_min(spec)?;
    Ok(())
}

fn validate_replicas(spec: &JobManagerSpec) -> Result<()> {
    if spec.replicas != Some(JOB_MANAGER_REPLICAS) {
        let got = spec
            .replicas
            .map_or_else(|| "unspecified".to_string(), |r| r.to_string());
        return Err(ValidationError::InvalidManagerSpec(format!(
            "invalid JobManager replicas, it must be {} (got {})",
            JOB_MANAGER_REPLICAS, got
        )));
    }
    Ok(())
}

fn validate_access_scope(spec: &JobManagerSpec) -> Result<()> {
    match spec.access_scope {
        Some(AccessScope::Cluster | AccessScope::Vpc | AccessScope::External) => Ok(()),
        None => Err(ValidationError::InvalidManagerSpec(format!(
            "JobManager accessScope is unspecified, must be one of: {}",
            allowed_values(&AccessScope::ALL)
        ))),
    }
}

fn validate_ports(spec: &JobManagerSpec) -> Result<()> {
    validate_port(spec.ports.rpc, "rpc", COMPONENT)?;
    validate_port(spec.ports.blob, "blob", COMPONENT)?;
    validate_port(spec.ports.query, "query", COMPONENT)?;
    validate_port(spec.ports.ui, "ui", COMPONENT)?;
    Ok(())
}

fn validate_off_heap_ratio(spec: &JobManagerSpec) -> Result<()> {
    match spec.memory_off_heap_ratio {
        Some(ratio) if (0..=MAX_OFF_HEAP_RATIO).contains(&ratio) => Ok(()),
        Some(ratio) => Err(ValidationError::InvalidManagerSpec(format!(
            "invalid JobManager memoryOffHeapRatio {}, it must be between 0 and {}",
            ratio, MAX_OFF_HEAP_RATIO
        ))),
        None => Err(ValidationError::InvalidManagerSpec(format!(
            "JobManager memoryOffHeapRatio is unspecified, it must be between 0 and {}",
            MAX_OFF_HEAP_RATIO
        ))),
    }
}

fn validate_off_heap_min(spec: &JobManagerSpec) -> Result<()> {
    let Some(off_heap_min) = spec.memory_off_heap_min else {
        return Err(ValidationError::InvalidMemoryConfig(
            "invalid JobManager memory configuration, memoryOffHeapMin is not specified"
                .to_string(),
        ));
    };

    let limit_bytes = memory_limit_bytes(spec.resources.as_ref()).map_err(|e| {
        ValidationError::InvalidMemoryConfig(format!(
            "invalid JobManager memory limit: {}",
            e
        ))
    })?;
    let limit_mib = to_mebibytes(limit_bytes);

    if i64::from(off_heap_min) > limit_mib {
        return Err(ValidationError::InvalidMemoryConfig(format!(
            "invalid JobManager memory configuration, memory limit ({}Mi) must be larger than memoryOffHeapMin ({}Mi)",
            limit_mib, off_heap_min
        )));
    }

    Ok(())
}
