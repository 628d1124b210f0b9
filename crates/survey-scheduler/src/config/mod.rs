use crate::workflows::survey::{ClassifierRules, StatusThresholds, SurveyScheduler};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub scheduling: SchedulingConfig,
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

        let defaults = StatusThresholds::default();
        let thresholds = StatusThresholds {
            due_soon_days: day_count("APP_DUE_SOON_DAYS", defaults.due_soon_days)?,
            critical_days: day_count("APP_CRITICAL_DAYS", defaults.critical_days)?,
            badly_overdue_days: day_count("APP_BADLY_OVERDUE_DAYS", defaults.badly_overdue_days)?,
        };
        if thresholds.critical_days > thresholds.due_soon_days {
            return Err(ConfigError::InvertedThresholds {
                critical_days: thresholds.critical_days,
                due_soon_days: thresholds.due_soon_days,
            });
        }

        let classifier_rules = env::var("APP_CLASSIFIER_RULES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scheduling: SchedulingConfig {
                thresholds,
                classifier_rules,
            },
        })
    }
}

fn day_count(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(i64::from)
            .map_err(|_| ConfigError::InvalidDayCount { name, value: raw }),
        Err(_) => Ok(default),
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

/// Status bands and an optional replacement classifier table.
#[derive(Debug, Clone, Default)]
pub struct SchedulingConfig {
    pub thresholds: StatusThresholds,
    pub classifier_rules: Option<PathBuf>,
}

impl SchedulingConfig {
    pub fn load_rules(&self) -> Result<ClassifierRules, ConfigError> {
        let Some(path) = &self.classifier_rules else {
            return Ok(ClassifierRules::standard());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesUnreadable {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::RulesInvalid {
            path: path.clone(),
            source,
        })
    }

    pub fn scheduler(&self) -> Result<SurveyScheduler, ConfigError> {
        Ok(SurveyScheduler::new(self.load_rules()?, self.thresholds))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidDayCount {
        name: &'static str,
        value: String,
    },
    InvertedThresholds {
        critical_days: i64,
        due_soon_days: i64,
    },
    RulesUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    RulesInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDayCount { name, value } => {
                write!(f, "{name} must be a non-negative day count, got '{value}'")
            }
            ConfigError::InvertedThresholds {
                critical_days,
                due_soon_days,
            } => write!(
                f,
                "APP_CRITICAL_DAYS ({critical_days}) cannot exceed APP_DUE_SOON_DAYS ({due_soon_days})"
            ),
            ConfigError::RulesUnreadable { path, .. } => {
                write!(f, "unable to read classifier rules at {}", path.display())
            }
            ConfigError::RulesInvalid { path, .. } => {
                write!(f, "classifier rules at {} are not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidDayCount { .. }
            | ConfigError::InvertedThresholds { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RulesUnreadable { source, .. } => Some(source),
            ConfigError::RulesInvalid { source, .. } => Some(source),
        }
    }
}
