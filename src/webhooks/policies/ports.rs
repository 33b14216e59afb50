//! Port validation shared by the JobManager and TaskManager policies.
//!
//! A port must be set and must lie above the reserved range (1-1024),
//! regardless of which component exposes it.

use crate::crd::RESERVED_PORT_MAX;
use crate::webhooks::error::{Result, ValidationError};

/// Validate a single component port
pub fn validate_port(port: Option<i32>, name: &str, component: &str) -> Result<()> {
    let Some(port) = port else {
        return Err(ValidationError::InvalidPort(format!(
            "{} {} port is unspecified",
            component, name
        )));
    };

    if port <= RESERVED_PORT_MAX {
        return Err(ValidationError::InvalidPort(format!(
            "invalid {} {} port: {}, must be > {}",
            component, name, port, RESERVED_PORT_MAX
        )));
    }

    Ok(())
}
