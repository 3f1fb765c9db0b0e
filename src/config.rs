use std::{env, net::SocketAddr, str::FromStr};

use thiserror::Error;

use crate::rpc::frame::DEFAULT_MAX_FRAME_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
}

impl FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidTransport),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: TransportMode,
    pub bind_addr: String,
    pub bind_port: u16,
    pub max_frame_bytes: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RPC_TRANSPORT must be one of: stdio, http")]
    InvalidTransport,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("RPC_MAX_FRAME_BYTES must be a positive integer")]
    InvalidMaxFrameBytes,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset and blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let transport = read("RPC_TRANSPORT")
            .map(|value| value.parse::<TransportMode>())
            .transpose()?
            .unwrap_or(TransportMode::Stdio);
        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let max_frame_bytes = read("RPC_MAX_FRAME_BYTES")
            .map(|value| {
                value
                    .parse::<usize>()
                    .ok()
                    .filter(|bytes| *bytes > 0)
                    .ok_or(ConfigError::InvalidMaxFrameBytes)
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_FRAME_BYTES);

        let config = Self {
            transport,
            bind_addr,
            bind_port,
            max_frame_bytes,
        };

        if config.transport == TransportMode::Http {
            let _ = config.bind_socket()?;
        }
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = config_from(&[]).expect("config should parse");
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.max_frame_bytes, DEFAULT_MAX_FRAME_BYTES);
    }

    #[test]
    fn http_transport_with_custom_socket() {
        let config = config_from(&[
            ("RPC_TRANSPORT", "HTTP"),
            ("BIND_ADDR", "0.0.0.0"),
            ("BIND_PORT", "9000"),
        ])
        .expect("config should parse");

        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(
            config.bind_socket().expect("socket"),
            "0.0.0.0:9000".parse().expect("valid socket")
        );
    }

    #[test]
    fn unknown_transport_fails() {
        let err = config_from(&[("RPC_TRANSPORT", "carrier-pigeon")]).expect_err("bad transport");
        assert!(matches!(err, ConfigError::InvalidTransport));
    }

    #[test]
    fn invalid_port_fails() {
        let err = config_from(&[("BIND_PORT", "70000")]).expect_err("bad port");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn zero_frame_limit_fails() {
        let err = config_from(&[("RPC_MAX_FRAME_BYTES", "0")]).expect_err("bad limit");
        assert!(matches!(err, ConfigError::InvalidMaxFrameBytes));
    }

    #[test]
    fn invalid_bind_addr_fails_only_for_http() {
        assert!(config_from(&[("BIND_ADDR", "not an ip")]).is_ok());

        let err = config_from(&[("RPC_TRANSPORT", "http"), ("BIND_ADDR", "not an ip")])
            .expect_err("bad socket");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }
}
