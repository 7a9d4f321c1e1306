use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Application-level constants
pub const APP_NAME: &str = "HealthConnect";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,healthconnect_lib=debug"
}

/// Get the application data directory.
/// ~/HealthConnect/ on all platforms; falls back to the working directory
/// when no home directory can be resolved (sandboxed webviews).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// SQLite file backing the persistent local store.
pub fn storage_db_path() -> PathBuf {
    app_data_dir().join("local_storage.db")
}

/// Maximum entries kept per health-log category.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 365;

/// Bound on every append-only health log sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    pub max_entries: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_LOG_ENTRIES,
        }
    }
}

/// Runtime tunables. Production values mirror the timings users saw on
/// the site; `instant()` zeroes every simulated delay for tests.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Booking draft auto-save period.
    pub auto_save_interval: Duration,
    /// Simulated booking submission latency.
    pub submit_delay: Duration,
    /// Simulated symptom analysis latency.
    pub analysis_delay: Duration,
    /// Simulated assistant reply latency.
    pub bot_reply_delay: Duration,
    /// Toasts kept on screen at once.
    pub max_visible_toasts: usize,
    pub retention: RetentionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save_interval: Duration::from_secs(30),
            submit_delay: Duration::from_millis(2000),
            analysis_delay: Duration::from_millis(2000),
            bot_reply_delay: Duration::from_millis(1000),
            max_visible_toasts: 5,
            retention: RetentionPolicy::default(),
        }
    }
}

impl Settings {
    pub fn instant() -> Self {
        Self {
            submit_delay: Duration::ZERO,
            analysis_delay: Duration::ZERO,
            bot_reply_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_named_after_app() {
        assert!(app_data_dir().ends_with("HealthConnect"));
    }

    #[test]
    fn storage_db_under_app_data() {
        let db = storage_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("local_storage.db"));
    }

    #[test]
    fn app_name_is_healthconnect() {
        assert_eq!(APP_NAME, "HealthConnect");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_settings_match_site_timings() {
        let s = Settings::default();
        assert_eq!(s.auto_save_interval, Duration::from_secs(30));
        assert_eq!(s.submit_delay, Duration::from_millis(2000));
        assert_eq!(s.retention.max_entries, DEFAULT_MAX_LOG_ENTRIES);
    }

    #[test]
    fn instant_settings_keep_auto_save_period() {
        let s = Settings::instant();
        assert_eq!(s.submit_delay, Duration::ZERO);
        assert_eq!(s.auto_save_interval, Duration::from_secs(30));
    }
}
