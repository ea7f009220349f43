//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Listener names are present and unique
//! - Addresses parse, durations are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one listener must be configured")]
    NoListeners,
    #[error("listener #{index} has an empty name")]
    EmptyListenerName { index: usize },
    #[error("listener name `{0}` is used more than once")]
    DuplicateListenerName(String),
    #[error("listener `{name}` has invalid bind address `{address}`")]
    InvalidBindAddress { name: String, address: String },
    #[error("shutdown grace period must be greater than zero")]
    ZeroGracePeriod,
    #[error("http request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listeners.is_empty() {
        errors.push(ValidationError::NoListeners);
    }

    let mut seen = HashSet::new();
    for (index, listener) in config.listeners.iter().enumerate() {
        if listener.name.trim().is_empty() {
            errors.push(ValidationError::EmptyListenerName { index });
        } else if !seen.insert(listener.name.as_str()) {
            errors.push(ValidationError::DuplicateListenerName(listener.name.clone()));
        }

        if listener.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress {
                name: listener.name.clone(),
                address: listener.bind_address.clone(),
            });
        }
    }

    if config.shutdown.grace_period_ms == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ListenerConfig;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = AppConfig::default();
        config.listeners = vec![
            ListenerConfig::new("a", "127.0.0.1:1"),
            ListenerConfig::new("a", ":8899"),
            ListenerConfig::new(" ", "127.0.0.1:2"),
        ];
        config.shutdown.grace_period_ms = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateListenerName("a".into()),
                ValidationError::InvalidBindAddress {
                    name: "a".into(),
                    address: ":8899".into(),
                },
                ValidationError::EmptyListenerName { index: 2 },
                ValidationError::ZeroGracePeriod,
                ValidationError::InvalidMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn empty_listener_list_is_rejected() {
        let mut config = AppConfig::default();
        config.listeners.clear();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::NoListeners])
        );
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
