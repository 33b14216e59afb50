//! Image validation policy.
//!
//! Validates:
//! - Image name is set
//! - Pull policy is one of Always, IfNotPresent, Never

use crate::crd::{ImagePullPolicy, ImageSpec, allowed_values};
use crate::webhooks::error::{Result, ValidationError};

/// Validate the container image
pub fn validate(image: &ImageSpec) -> Result<()> {
    if image.name.is_empty() {
        return Err(ValidationError::InvalidImageSpec(
            "image name is unspecified".to_string(),
        ));
    }

    match image.pull_policy {
        Some(ImagePullPolicy::Always | ImagePullPolicy::IfNotPresent | ImagePullPolicy::Never) => {
            Ok(())
        }
        None => Err(ValidationError::InvalidImageSpec(format!(
            "image pullPolicy is unspecified, must be one of: {}",
            allowed_values(&ImagePullPolicy::ALL)
        ))),
    }
}
