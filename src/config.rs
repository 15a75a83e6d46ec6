//! Configuration Management
//!
//! Features:
//! - Environment presets (dev/staging/prod)
//! - Environment variable overrides
//! - Input size limits for the analyzer
//! - Configuration validation

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(Error::ConfigError(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub environment: Environment,

    /// HTTP surface
    pub server: ServerConfig,

    /// Input size limits
    pub limits: LimitsConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Max request body size in bytes
    pub max_body_size: usize,

    pub enable_cors: bool,

    pub enable_compression: bool,

    /// Per-request tracing spans
    pub enable_tracing: bool,
}

/// Largest system the analyzer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_processes: usize,
    pub max_resources: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_processes: 10,
            max_resources: 10,
        }
    }
}

impl LimitsConfig {
    pub fn check_dimensions(&self, processes: usize, resources: usize) -> Result<()> {
        if processes > self.max_processes || resources > self.max_resources {
            return Err(Error::LimitExceeded(format!(
                "Maximum {} processes and {} resources allowed (got {} processes, {} resources)",
                self.max_processes, self.max_resources, processes, resources
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl DetectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let env = std::env::var("DEADLOCK_ENV")
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .parse()?;

        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Staging => Self::staging(),
            Environment::Production => Self::production(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                request_timeout: 30,
                max_body_size: 1024 * 1024, // 1MB
                enable_cors: true,
                enable_compression: false,
                enable_tracing: true,
            },
            limits: LimitsConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.host = "0.0.0.0".to_string();
        config.server.enable_compression = true;
        config.logging.level = "info".to_string();
        config
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout: 10,
                max_body_size: 256 * 1024, // 256KB
                enable_cors: false, // Configure explicitly
                enable_compression: true,
                enable_tracing: true,
            },
            limits: LimitsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        // Server
        if let Ok(host) = std::env::var("DEADLOCK_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DEADLOCK_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::ConfigError("Invalid DEADLOCK_PORT".to_string()))?;
        }

        // Limits
        if let Ok(max) = std::env::var("DEADLOCK_MAX_PROCESSES") {
            self.limits.max_processes = max
                .parse()
                .map_err(|_| Error::ConfigError("Invalid DEADLOCK_MAX_PROCESSES".to_string()))?;
        }
        if let Ok(max) = std::env::var("DEADLOCK_MAX_RESOURCES") {
            self.limits.max_resources = max
                .parse()
                .map_err(|_| Error::ConfigError("Invalid DEADLOCK_MAX_RESOURCES".to_string()))?;
        }

        // Logging
        if let Ok(level) = std::env::var("DEADLOCK_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DEADLOCK_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.limits.max_processes == 0 || self.limits.max_resources == 0 {
            return Err(Error::ConfigError(
                "Process and resource limits must be at least 1".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log format: {}. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            )));
        }

        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                Error::ConfigError(format!(
                    "Invalid bind address: {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }

    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout)
    }
}

/// Configuration builder for programmatic setup
pub struct ConfigBuilder {
    config: DetectorConfig,
}

impl ConfigBuilder {
    pub fn new(env: Environment) -> Self {
        let config = match env {
            Environment::Development => DetectorConfig::development(),
            Environment::Staging => DetectorConfig::staging(),
            Environment::Production => DetectorConfig::production(),
        };

        Self { config }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_limits(mut self, max_processes: usize, max_resources: usize) -> Self {
        self.config.limits = LimitsConfig {
            max_processes,
            max_resources,
        };
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Result<DetectorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config() {
        let config = DetectorConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.limits, LimitsConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_config() {
        let config = DetectorConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.request_timeout_duration(), Duration::from_secs(10));
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new(Environment::Staging)
            .with_port(4000)
            .with_limits(20, 5)
            .build()
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.limits.max_processes, 20);
        assert_eq!(config.bind_addr().unwrap().port(), 4000);
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let result = ConfigBuilder::new(Environment::Development)
            .with_log_level("loud")
            .build();
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let result = ConfigBuilder::new(Environment::Development).with_limits(0, 3).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_limits_check_dimensions() {
        let limits = LimitsConfig::default();
        assert!(limits.check_dimensions(10, 10).is_ok());
        assert!(matches!(limits.check_dimensions(11, 2), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }
}
