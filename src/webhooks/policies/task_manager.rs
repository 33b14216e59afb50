//! TaskManager validation policy.
//!
//! Validates:
//! - At least one TaskManager replica
//! - RPC, data and query ports are outside the reserved range

use super::ports::validate_port;
use crate::crd::TaskManagerSpec;
use crate::webhooks::error::{Result, ValidationError};

/// Minimum number of TaskManager replicas
pub const MIN_TASK_MANAGER_REPLICAS: i32 = 1;

const COMPONENT: &str = "taskmanager";

/// Validate the TaskManager spec
pub fn validate(spec: &TaskManagerSpec) -> Result<()> {
    if spec.replicas < MIN_TASK_MANAGER_REPLICAS {
        return Err(ValidationError::InvalidWorkerSpec(format!(
            "invalid TaskManager replicas {}, it must be >= {}",
            spec.replicas, MIN_TASK_MANAGER_REPLICAS
        )));
    }

    validate_port(spec.ports.rpc, "rpc", COMPONENT)?;
    validate_port(spec.ports.data, "data", COMPONENT)?;
    validate_port(spec.ports.query, "query", COMPONENT)?;

    Ok(())
}
