//! Server configuration loaded from environment variables.
//!
//! ```rust,no_run
//! use wisp::config::ServerConfig;
//!
//! # fn main() -> Result<(), wisp::config::ConfigError> {
//! let config = ServerConfig::from_env()?;
//! println!("serving {} on {}:{}", config.graphql_path, config.host, config.port);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {message}")]
    ParseError { key: String, message: String },

    #[error("Failed to load .env file: {0}")]
    DotenvError(#[from] dotenv::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `WISP_HOST`
    pub host: String,
    /// `WISP_PORT`
    pub port: u16,
    /// `GRAPHQL_PATH`
    pub graphql_path: String,
    /// `GRAPHIQL_PATH`
    pub graphiql_path: String,
    /// `GRAPHIQL_ENABLED`, on by default in debug builds only.
    pub graphiql_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
            graphql_path: "/graphql".to_string(),
            graphiql_path: "/graphiql".to_string(),
            graphiql_enabled: cfg!(debug_assertions),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: var_or("WISP_HOST", defaults.host)?,
            port: var_or("WISP_PORT", defaults.port)?,
            graphql_path: var_or("GRAPHQL_PATH", defaults.graphql_path)?,
            graphiql_path: var_or("GRAPHIQL_PATH", defaults.graphiql_path)?,
            graphiql_enabled: var_or("GRAPHIQL_ENABLED", defaults.graphiql_enabled)?,
        })
    }

    /// Load a .env file into the process environment, then read it.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        dotenv::from_path(path.into())?;
        Self::from_env()
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "WISP_HOST",
        "WISP_PORT",
        "GRAPHQL_PATH",
        "GRAPHIQL_PATH",
        "GRAPHIQL_ENABLED",
    ];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3030);
        assert_eq!(config.graphql_path, "/graphql");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear();
        env::set_var("WISP_PORT", "8080");
        env::set_var("GRAPHQL_PATH", "/api/graphql");
        env::set_var("GRAPHIQL_ENABLED", "false");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.graphql_path, "/api/graphql");
        assert!(!config.graphiql_enabled);

        clear();
    }

    #[test]
    #[serial]
    fn test_parse_error_names_the_key() {
        clear();
        env::set_var("WISP_PORT", "not-a-port");

        match ServerConfig::from_env() {
            Err(ConfigError::ParseError { key, .. }) => assert_eq!(key, "WISP_PORT"),
            other => panic!("expected ParseError, got {:?}", other),
        }

        clear();
    }

    #[test]
    #[serial]
    fn test_missing_env_file() {
        let result = ServerConfig::from_file("/nonexistent/.env.wisp");
        assert!(matches!(result, Err(ConfigError::DotenvError(_))));
    }
}
