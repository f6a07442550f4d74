//! Server settings read from the environment at start-up.
//!
//! | variable               | default     | meaning                                    |
//! |------------------------|-------------|--------------------------------------------|
//! | `RPS_PORT`             | `54555`     | HTTP and WebSocket listen port             |
//! | `RPS_BIND_ADDR`        | `0.0.0.0`   | listen address                             |
//! | `RPS_TIMER_WORKERS`    | `2`         | threads running countdown callbacks        |
//! | `RPS_COUNTDOWN_PACING` | `inherited` | `inherited` or `announced` stage waits     |

use std::env;

use thiserror::Error;

use crate::timer::CountdownPacing;

pub const DEFAULT_PORT: u16 = 54555;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_TIMER_WORKERS: usize = 2;

pub const ENV_PORT: &str = "RPS_PORT";
pub const ENV_BIND_ADDR: &str = "RPS_BIND_ADDR";
pub const ENV_TIMER_WORKERS: &str = "RPS_TIMER_WORKERS";
pub const ENV_COUNTDOWN_PACING: &str = "RPS_COUNTDOWN_PACING";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a port number in 1..=65535, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidWorkers { var: &'static str, value: String },

    #[error("{var} must be \"inherited\" or \"announced\", got {value:?}")]
    InvalidPacing { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub timer_workers: usize,
    pub pacing: CountdownPacing,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            timer_workers: DEFAULT_TIMER_WORKERS,
            pacing: CountdownPacing::default(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(addr) = get(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        if let Some(value) = get(ENV_PORT) {
            config.port = match value.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(ConfigError::InvalidPort { var: ENV_PORT, value }),
            };
        }
        if let Some(value) = get(ENV_TIMER_WORKERS) {
            config.timer_workers = match value.parse::<usize>() {
                Ok(workers) if workers > 0 => workers,
                _ => return Err(ConfigError::InvalidWorkers { var: ENV_TIMER_WORKERS, value }),
            };
        }
        if let Some(value) = get(ENV_COUNTDOWN_PACING) {
            config.pacing = match value.to_ascii_lowercase().as_str() {
                "inherited" => CountdownPacing::Inherited,
                "announced" => CountdownPacing::Announced,
                _ => return Err(ConfigError::InvalidPacing { var: ENV_COUNTDOWN_PACING, value }),
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.pacing, CountdownPacing::Inherited);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_PORT, "7000"),
            (ENV_BIND_ADDR, "127.0.0.1"),
            (ENV_TIMER_WORKERS, "4"),
            (ENV_COUNTDOWN_PACING, " Announced "),
        ]))
        .unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.timer_workers, 4);
        assert_eq!(config.pacing, CountdownPacing::Announced);
    }

    #[test]
    fn test_port_read_from_rps_port() {
        let config = ServerConfig::from_lookup(lookup(&[("RPS_PORT", "8081"), ("RPS_TCP_PORT", "9")])).unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_PORT, "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in ["0", "65536", "http", "-1"] {
            assert!(matches!(
                ServerConfig::from_lookup(lookup(&[(ENV_PORT, bad)])),
                Err(ConfigError::InvalidPort { .. })
            ));
        }
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_TIMER_WORKERS, "0")])),
            Err(ConfigError::InvalidWorkers { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(ENV_COUNTDOWN_PACING, "fast")])),
            Err(ConfigError::InvalidPacing { .. })
        ));
    }
}
