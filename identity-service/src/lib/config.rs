use std::env;
use std::time::Duration;

use auth::MAX_TOKEN_LIFETIME_SECS;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Minimum length of the token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub kafka: KafkaConfig,
    pub cookie: CookieConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

/// Lifetime accessors assume `Config::validate` has passed.
impl JwtConfig {
    pub fn access_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_ttl_secs)
    }

    pub fn refresh_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_ttl_secs)
    }
}

/// Argon2id work factor.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub session_results_topic: String,
    pub dispatch_timeout_ms: u64,
}

impl KafkaConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub domain: Option<String>,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub reject_orphaned_refresh: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaintenanceConfig {
    /// Refresh token sweep period; 0 disables the sweeper
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.jwt.access_token_ttl_secs <= 0 || self.jwt.refresh_token_ttl_secs <= 0 {
            return Err(ConfigError::Message(
                "jwt token lifetimes must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_ttl_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::Message(format!(
                "jwt.refresh_token_ttl_secs must not exceed {}",
                MAX_TOKEN_LIFETIME_SECS
            )));
        }
        if self.jwt.access_token_ttl_secs >= self.jwt.refresh_token_ttl_secs {
            return Err(ConfigError::Message(
                "jwt.access_token_ttl_secs must be shorter than jwt.refresh_token_ttl_secs"
                    .to_string(),
            ));
        }
        if self.kafka.dispatch_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "kafka.dispatch_timeout_ms must be positive".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/identity".to_string(),
                max_connections: 5,
            },
            server: ServerConfig { http_port: 8080 },
            jwt: JwtConfig {
                secret: "x".repeat(MIN_SECRET_LEN),
                access_token_ttl_secs: 300,
                refresh_token_ttl_secs: 1_209_600,
            },
            password: PasswordConfig {
                memory_kib: 19456,
                iterations: 2,
                parallelism: 1,
            },
            kafka: KafkaConfig {
                brokers: "localhost:9092".to_string(),
                session_results_topic: "session-results".to_string(),
                dispatch_timeout_ms: 5000,
            },
            cookie: CookieConfig {
                domain: None,
                secure: false,
            },
            credentials: CredentialsConfig::default(),
            maintenance: MaintenanceConfig {
                sweep_interval_secs: 3600,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = valid();
        config.jwt.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_access_must_be_shorter_than_refresh() {
        let mut config = valid();
        config.jwt.access_token_ttl_secs = config.jwt.refresh_token_ttl_secs;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_lifetime_rejected() {
        let mut config = valid();
        config.jwt.access_token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        let mut config = valid();
        config.jwt.refresh_token_ttl_secs = 10_000_000_000_000;
        assert!(config.validate().is_err());

        config.jwt.refresh_token_ttl_secs = MAX_TOKEN_LIFETIME_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dispatch_timeout_conversion() {
        assert_eq!(valid().kafka.dispatch_timeout(), Duration::from_secs(5));
        assert_eq!(valid().jwt.refresh_lifetime().num_days(), 14);
    }
}
