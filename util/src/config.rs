//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Only the binaries read it. Library code (the watcher, the ingestion service,
//! delivery channels) receives plain values built from it at startup.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub watcher_poll_seconds: u64,
    pub alert_threshold: f64,
    pub high_risk_threshold: f64,
    pub watcher_batch_size: u64,
    pub watcher_dedup: String,
    pub watcher_realert_seconds: u64,
    pub watcher_persist_cursor: bool,
    pub delivery_timeout_seconds: u64,
    pub scorer: String,
    pub alert_webhook_url: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub alert_email_from: String,
    pub alert_email_to: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

/// Port the API listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a default so the service can boot with an empty
    /// environment; `DATABASE_PATH` defaults to `data/pulsewatch.db`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "pulsewatch".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: flag("LOG_TO_STDOUT", false),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/pulsewatch.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parsed("PORT", DEFAULT_PORT),
            watcher_poll_seconds: parsed("WATCHER_POLL_SECONDS", 8),
            alert_threshold: parsed("ALERT_THRESHOLD", 75.0),
            high_risk_threshold: parsed("HIGH_RISK_THRESHOLD", 85.0),
            watcher_batch_size: parsed("WATCHER_BATCH_SIZE", 500),
            watcher_dedup: env::var("WATCHER_DEDUP").unwrap_or_else(|_| "message".into()),
            watcher_realert_seconds: parsed("WATCHER_REALERT_SECONDS", 3600),
            watcher_persist_cursor: flag("WATCHER_PERSIST_CURSOR", true),
            delivery_timeout_seconds: parsed("DELIVERY_TIMEOUT_SECONDS", 5),
            scorer: env::var("SCORER").unwrap_or_else(|_| "heuristic".into()),
            alert_webhook_url: env::var("ALERT_WEBHOOK_URL").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            alert_email_from: env::var("ALERT_EMAIL_FROM").unwrap_or_default(),
            alert_email_to: env::var("ALERT_EMAIL_TO").unwrap_or_default(),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_watcher_poll_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.watcher_poll_seconds = value);
    }

    pub fn set_alert_threshold(value: f64) {
        AppConfig::set_field(|cfg| cfg.alert_threshold = value);
    }

    pub fn set_high_risk_threshold(value: f64) {
        AppConfig::set_field(|cfg| cfg.high_risk_threshold = value);
    }

    pub fn set_watcher_dedup(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.watcher_dedup = value.into());
    }

    pub fn set_watcher_persist_cursor(value: bool) {
        AppConfig::set_field(|cfg| cfg.watcher_persist_cursor = value);
    }

    pub fn set_scorer(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.scorer = value.into());
    }

    pub fn set_alert_webhook_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.alert_webhook_url = value.into());
    }
}

// --- Free accessors, mirroring the fields the binaries read ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn watcher_poll_seconds() -> u64 {
    AppConfig::global().watcher_poll_seconds
}

pub fn alert_threshold() -> f64 {
    AppConfig::global().alert_threshold
}

pub fn high_risk_threshold() -> f64 {
    AppConfig::global().high_risk_threshold
}

pub fn watcher_batch_size() -> u64 {
    AppConfig::global().watcher_batch_size
}

pub fn watcher_dedup() -> String {
    AppConfig::global().watcher_dedup.clone()
}

pub fn watcher_realert_seconds() -> u64 {
    AppConfig::global().watcher_realert_seconds
}

pub fn watcher_persist_cursor() -> bool {
    AppConfig::global().watcher_persist_cursor
}

pub fn delivery_timeout_seconds() -> u64 {
    AppConfig::global().delivery_timeout_seconds
}

pub fn scorer() -> String {
    AppConfig::global().scorer.clone()
}

pub fn alert_webhook_url() -> String {
    AppConfig::global().alert_webhook_url.clone()
}

pub fn smtp_host() -> String {
    AppConfig::global().smtp_host.clone()
}

pub fn smtp_username() -> String {
    AppConfig::global().smtp_username.clone()
}

pub fn smtp_password() -> String {
    AppConfig::global().smtp_password.clone()
}

pub fn alert_email_from() -> String {
    AppConfig::global().alert_email_from.clone()
}

/// Comma separated in the environment; blanks dropped.
pub fn alert_email_to() -> Vec<String> {
    AppConfig::global()
        .alert_email_to
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_loaded_values() {
        AppConfig::set_alert_threshold(60.0);
        AppConfig::set_watcher_dedup("condition");
        assert_eq!(alert_threshold(), 60.0);
        assert_eq!(watcher_dedup(), "condition");
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn malformed_numbers_fall_back_to_defaults() {
        unsafe {
            env::set_var("WATCHER_POLL_SECONDS", "soon");
        }
        AppConfig::reset();
        assert_eq!(AppConfig::from_env().watcher_poll_seconds, 8);
        unsafe {
            env::remove_var("WATCHER_POLL_SECONDS");
        }
        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn email_recipients_are_split_and_trimmed() {
        unsafe {
            env::set_var("ALERT_EMAIL_TO", "ops@example.com, ,oncall@example.com ");
        }
        AppConfig::reset();
        assert_eq!(
            alert_email_to(),
            vec!["ops@example.com".to_string(), "oncall@example.com".to_string()]
        );
        unsafe {
            env::remove_var("ALERT_EMAIL_TO");
        }
        AppConfig::reset();
    }
}
