//! Runtime configuration read from the environment.
//!
//! | Variable            | Default                       |
//! |---------------------|-------------------------------|
//! | `WEBHOOK_PORT`      | 9443                          |
//! | `HEALTH_PORT`       | 8080                          |
//! | `WEBHOOK_CERT_PATH` | `/etc/webhook/certs/tls.crt`  |
//! | `WEBHOOK_KEY_PATH`  | `/etc/webhook/certs/tls.key`  |

use thiserror::Error;

use crate::webhooks::{WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT};

/// Default health/metrics server port
pub const HEALTH_PORT: u16 = 8080;

/// Errors reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value '{value}' for {key}: {source}")]
    InvalidValue {
        key: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Operator configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Port the admission webhook listens on (TLS)
    pub webhook_port: u16,
    /// Port the health and metrics server listens on
    pub health_port: u16,
    /// PEM certificate for the webhook server
    pub cert_path: String,
    /// PEM private key for the webhook server
    pub key_path: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
            cert_path: WEBHOOK_CERT_PATH.to_string(),
            key_path: WEBHOOK_KEY_PATH.to_string(),
        }
    }
}

impl OperatorConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            webhook_port: parse_port(&lookup, "WEBHOOK_PORT", defaults.webhook_port)?,
            health_port: parse_port(&lookup, "HEALTH_PORT", defaults.health_port)?,
            cert_path: lookup("WEBHOOK_CERT_PATH").unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH").unwrap_or(defaults.key_path),
        })
    }
}

fn parse_port<F>(lookup: &F, key: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidValue { key, value, source }),
        None => Ok(default),
    }
}
