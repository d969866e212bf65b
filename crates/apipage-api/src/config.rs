//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use apipage_realtime::client::ConnectionConfig;
use apipage_realtime::hub::DEFAULT_CLIENT_BUFFER;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Prefix every route is mounted under; empty or `/segment[/segment…]`.
    pub base_path: String,
    /// `PostgreSQL` connection string. `None` selects the in-memory stores.
    pub database_url: Option<String>,
    /// Upper bound of the connection pool.
    pub database_max_connections: u32,
    /// Capacity of each WebSocket client's outbound queue.
    pub ws_client_buffer: usize,
    /// Heartbeat, idle and write limits of each WebSocket connection.
    pub ws_connection: ConnectionConfig,
    /// Directory holding the single-page frontend, if it is served here.
    pub static_dir: Option<PathBuf>,
    /// OTLP collector endpoint; tracing export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            base_path: String::new(),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            ws_client_buffer: DEFAULT_CLIENT_BUFFER,
            ws_connection: ConnectionConfig::default(),
            static_dir: None,
            otlp_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let ws_client_buffer = parse_or(&get, "WS_CLIENT_BUFFER", defaults.ws_client_buffer)?;
        if ws_client_buffer == 0 {
            return Err(AppError::Config(
                "WS_CLIENT_BUFFER must be at least 1".to_owned(),
            ));
        }

        let ws_connection = ConnectionConfig {
            heartbeat_interval: seconds_or(
                &get,
                "WS_HEARTBEAT_SECS",
                defaults.ws_connection.heartbeat_interval,
            )?,
            idle_timeout: seconds_or(
                &get,
                "WS_IDLE_TIMEOUT_SECS",
                defaults.ws_connection.idle_timeout,
            )?,
            write_timeout: seconds_or(
                &get,
                "WS_WRITE_TIMEOUT_SECS",
                defaults.ws_connection.write_timeout,
            )?,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            base_path: normalize_base_path(get("BASE_PATH").as_deref())?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            ws_client_buffer,
            ws_connection,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
        None => Ok(default),
    }
}

/// Reads a whole number of seconds; zero is rejected.
fn seconds_or<G>(get: &G, key: &str, default: Duration) -> Result<Duration, AppError>
where
    G: Fn(&str) -> Option<String>,
{
    let seconds: u64 = parse_or(get, key, default.as_secs())?;
    if seconds == 0 {
        return Err(AppError::Config(format!("{key} must be at least 1")));
    }
    Ok(Duration::from_secs(seconds))
}

fn normalize_base_path(raw: Option<&str>) -> Result<String, AppError> {
    let Some(raw) = raw else {
        return Ok(String::new());
    };
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(AppError::Config(format!(
            "BASE_PATH must start with '/' ({raw:?})"
        )));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.ws_client_buffer, 32);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_all_variables_are_read() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("BASE_PATH", "/admin/"),
            ("DATABASE_URL", "postgres://localhost/apipage"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("WS_CLIENT_BUFFER", "64"),
            ("WS_HEARTBEAT_SECS", "5"),
            ("WS_IDLE_TIMEOUT_SECS", "15"),
            ("WS_WRITE_TIMEOUT_SECS", "2"),
            ("STATIC_DIR", "public"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_path, "/admin");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/apipage")
        );
        assert_eq!(config.database_max_connections, 4);
        assert_eq!(config.ws_client_buffer, 64);
        assert_eq!(
            config.ws_connection,
            ConnectionConfig {
                heartbeat_interval: Duration::from_secs(5),
                idle_timeout: Duration::from_secs(15),
                write_timeout: Duration::from_secs(2),
            }
        );
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  "), ("BASE_PATH", "/")]).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.base_path, "");
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();

        assert!(matches!(err, AppError::Config(msg) if msg.contains("PORT")));
    }

    #[test]
    fn test_zero_client_buffer_is_rejected() {
        let err = config_from(&[("WS_CLIENT_BUFFER", "0")]).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_zero_write_timeout_is_rejected() {
        let err = config_from(&[("WS_WRITE_TIMEOUT_SECS", "0")]).unwrap_err();

        assert!(matches!(err, AppError::Config(msg) if msg.contains("WS_WRITE_TIMEOUT_SECS")));
    }

    #[test]
    fn test_relative_base_path_is_rejected() {
        let err = config_from(&[("BASE_PATH", "admin")]).unwrap_err();

        assert!(matches!(err, AppError::Config(msg) if msg.contains("BASE_PATH")));
    }

    #[test]
    fn test_unparsable_host_fails_at_socket_addr() {
        let config = config_from(&[("HOST", "not a host")]).unwrap();

        assert!(config.socket_addr().is_err());
    }
}
