use std::env;
use std::fmt;

use crate::workflows::claims::{ReviewPolicy, MAX_SCORE};

/// Distinguishes runtime behavior for different stages of the reviewer.
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
    pub review: ReviewPolicy,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let review = match env::var("APP_MANUAL_REVIEW_THRESHOLD") {
            Ok(raw) => ReviewPolicy {
                manual_review_threshold: parse_threshold(&raw)?,
            },
            Err(_) => ReviewPolicy::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            review,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_threshold(raw: &str) -> Result<u8, ConfigError> {
    let invalid = || ConfigError::InvalidReviewThreshold {
        value: raw.to_string(),
    };

    let threshold = raw.trim().parse::<u8>().map_err(|_| invalid())?;
    if threshold > MAX_SCORE {
        return Err(invalid());
    }
    Ok(threshold)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidReviewThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidReviewThreshold { value } => write!(
                f,
                "APP_MANUAL_REVIEW_THRESHOLD must be an integer between 0 and {MAX_SCORE} (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

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
        env::remove_var("APP_ENV");
        env::remove_var("APP_MANUAL_REVIEW_THRESHOLD");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.review, ReviewPolicy::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_review_threshold_and_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "Production");
        env::set_var("APP_MANUAL_REVIEW_THRESHOLD", " 70 ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.review.manual_review_threshold, 70);
        reset_env();
    }

    #[test]
    fn rejects_threshold_above_max_score() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MANUAL_REVIEW_THRESHOLD", "140");
        match AppConfig::load() {
            Err(ConfigError::InvalidReviewThreshold { value }) => assert_eq!(value, "140"),
            other => panic!("expected invalid threshold, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MANUAL_REVIEW_THRESHOLD", "high");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidReviewThreshold { .. })
        ));
        reset_env();
    }
}
