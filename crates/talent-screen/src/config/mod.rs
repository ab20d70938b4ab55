use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the one-off training run performed before the service starts answering.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningSettings {
    /// Seed for the synthetic training set.
    pub seed: u64,
    /// Number of synthetic records to generate when no dataset file is configured.
    pub samples: usize,
    pub rounds: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Number of attributions returned per explanation.
    pub top_k: usize,
    /// Optional CSV of labeled candidates used instead of synthetic data.
    pub dataset: Option<PathBuf>,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 1000,
            rounds: 100,
            learning_rate: 0.1,
            max_depth: 3,
            top_k: 3,
            dataset: None,
        }
    }
}

impl ScreeningSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            seed: parse_var("SCREENING_SEED", defaults.seed)?,
            samples: parse_var("SCREENING_SAMPLES", defaults.samples)?,
            rounds: parse_var("SCREENING_ROUNDS", defaults.rounds)?,
            learning_rate: parse_var("SCREENING_LEARNING_RATE", defaults.learning_rate)?,
            max_depth: parse_var("SCREENING_MAX_DEPTH", defaults.max_depth)?,
            top_k: parse_var("SCREENING_TOP_K", defaults.top_k)?,
            dataset: env::var("SCREENING_DATASET")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be numeric, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCREENING_SEED",
            "SCREENING_SAMPLES",
            "SCREENING_ROUNDS",
            "SCREENING_LEARNING_RATE",
            "SCREENING_MAX_DEPTH",
            "SCREENING_TOP_K",
            "SCREENING_DATASET",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.screening, ScreeningSettings::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn screening_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_SEED", "7");
        env::set_var("SCREENING_ROUNDS", " 40 ");
        env::set_var("SCREENING_LEARNING_RATE", "0.25");
        env::set_var("SCREENING_DATASET", "data/candidates.csv");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.screening.seed, 7);
        assert_eq!(config.screening.rounds, 40);
        assert_eq!(config.screening.learning_rate, 0.25);
        assert_eq!(config.screening.samples, 1000);
        assert_eq!(
            config.screening.dataset,
            Some(PathBuf::from("data/candidates.csv"))
        );
    }

    #[test]
    fn rejects_non_numeric_screening_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCREENING_MAX_DEPTH", "deep");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidNumber { name, value }) => {
                assert_eq!(name, "SCREENING_MAX_DEPTH");
                assert_eq!(value, "deep");
            }
            other => panic!("expected invalid number error, got {other:?}"),
        }
    }
}
