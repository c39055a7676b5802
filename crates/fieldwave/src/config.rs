// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Environment configuration.
//!
//! One value is required before anything touches the network: the target
//! database name. Credentials are optional and forwarded to the server
//! verbatim.

use thiserror::Error;

/// Required: name of the target database.
pub const ENV_DATABASE: &str = "FIELDWAVE_DB";

/// Optional: username forwarded to the server.
pub const ENV_USER: &str = "FIELDWAVE_USER";

/// Optional: password forwarded to the server.
pub const ENV_PASSWORD: &str = "FIELDWAVE_PASSWORD";

/// Configuration errors. Fatal before any network action.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// A required variable is present but blank.
    #[error("environment variable {0} is empty")]
    Empty(&'static str),
}

/// Startup configuration sourced from the process environment.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Target database name.
    pub database: String,
    /// Optional `(user, password)` passthrough credentials.
    pub credentials: Option<(String, String)>,
}

impl FeedConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// `from_env` is a thin wrapper over this; tests drive it directly so
    /// they never mutate the real process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup(ENV_DATABASE) {
            None => return Err(ConfigError::Missing(ENV_DATABASE)),
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::Empty(ENV_DATABASE))
            }
            Some(value) => value,
        };

        // Credentials only count when both halves are present.
        let credentials = match (lookup(ENV_USER), lookup(ENV_PASSWORD)) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        };

        Ok(Self {
            database,
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_database_name_required() {
        let env = env_of(&[]);
        let result = FeedConfig::from_lookup(|key| env.get(key).cloned());
        assert_eq!(result.unwrap_err(), ConfigError::Missing(ENV_DATABASE));
    }

    #[test]
    fn test_blank_database_name_rejected() {
        let env = env_of(&[(ENV_DATABASE, "  ")]);
        let result = FeedConfig::from_lookup(|key| env.get(key).cloned());
        assert_eq!(result.unwrap_err(), ConfigError::Empty(ENV_DATABASE));
    }

    #[test]
    fn test_database_name_round_trips() {
        let env = env_of(&[(ENV_DATABASE, "fieldsim")]);
        let config = FeedConfig::from_lookup(|key| env.get(key).cloned()).expect("config");
        assert_eq!(config.database, "fieldsim");
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_credentials_need_both_halves() {
        let env = env_of(&[(ENV_DATABASE, "fieldsim"), (ENV_USER, "sensor")]);
        let config = FeedConfig::from_lookup(|key| env.get(key).cloned()).expect("config");
        assert!(config.credentials.is_none());

        let env = env_of(&[
            (ENV_DATABASE, "fieldsim"),
            (ENV_USER, "sensor"),
            (ENV_PASSWORD, "hunter2"),
        ]);
        let config = FeedConfig::from_lookup(|key| env.get(key).cloned()).expect("config");
        assert_eq!(
            config.credentials,
            Some(("sensor".to_string(), "hunter2".to_string()))
        );
    }
}
