//! Identity validation policy.
//!
//! Validates:
//! - The cluster has a name
//! - The cluster has a namespace

use crate::crd::FlinkCluster;
use crate::webhooks::error::{Result, ValidationError};

/// Validate the cluster name and namespace
pub fn validate(cluster: &FlinkCluster) -> Result<()> {
    let name = cluster.metadata.name.as_deref().unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationError::InvalidIdentity(
            "cluster name is unspecified".to_string(),
        ));
    }

    let namespace = cluster.metadata.namespace.as_deref().unwrap_or_default();
    if namespace.is_empty() {
        return Err(ValidationError::InvalidIdentity(
            "cluster namespace is unspecified".to_string(),
        ));
    }

    Ok(())
}
