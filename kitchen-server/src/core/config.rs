use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WORK_DIR: &str = "./data";
const DEFAULT_DB_FILE: &str = "kitchen.redb";
const DEFAULT_DISPLAY_TIMEOUT_MS: i64 = 20_000;
const DEFAULT_MONITOR_TICK_MS: u64 = 1_000;
const DEFAULT_CHANNEL_CAPACITY: usize = 65_536;
const DEFAULT_TAX_RATE: f64 = 0.21;

/// Server configuration
///
/// # Environment variables
///
/// All values can be overridden through the environment:
///
/// | variable | default | description |
/// |----------|---------|-------------|
/// | KITCHEN_WORK_DIR | ./data | work directory (database file lives here) |
/// | KITCHEN_DB_FILE | kitchen.redb | database file name |
/// | DISPLAY_TIMEOUT_MS | 20000 | display window before a long order requeues |
/// | MONITOR_TICK_MS | 1000 | timeout monitor sweep interval |
/// | CHANNEL_CAPACITY | 65536 | realtime hub buffer per topic |
/// | TAX_RATE | 0.21 | checkout tax fraction |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// `LOG_LEVEL` and `LOG_DIR` are read by the logger setup before the config
/// loads, so invalid config values can still be reported.
///
/// # Example
///
/// ```ignore
/// KITCHEN_WORK_DIR=/data/kitchen DISPLAY_TIMEOUT_MS=30000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database file
    pub work_dir: String,
    /// Database file name inside the work directory
    pub db_file: String,
    /// How long a long-cooking order may hold the display (milliseconds)
    pub display_timeout_ms: i64,
    /// Timeout monitor sweep interval (milliseconds)
    pub monitor_tick_ms: u64,
    /// Broadcast buffer per realtime topic
    pub channel_capacity: usize,
    /// Tax fraction applied at checkout (0.21 for 21%)
    pub tax_rate: f64,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables use the defaults; unparsable or out-of-range values
    /// fall back to the default with a warning.
    pub fn from_env() -> Self {
        let mut config = Self {
            work_dir: std::env::var("KITCHEN_WORK_DIR")
                .unwrap_or_else(|_| DEFAULT_WORK_DIR.into()),
            db_file: std::env::var("KITCHEN_DB_FILE").unwrap_or_else(|_| DEFAULT_DB_FILE.into()),
            display_timeout_ms: parse_var("DISPLAY_TIMEOUT_MS", DEFAULT_DISPLAY_TIMEOUT_MS),
            monitor_tick_ms: parse_var("MONITOR_TICK_MS", DEFAULT_MONITOR_TICK_MS),
            channel_capacity: parse_var("CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY),
            tax_rate: parse_var("TAX_RATE", DEFAULT_TAX_RATE),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        };

        if config.display_timeout_ms <= 0 {
            tracing::warn!(
                "DISPLAY_TIMEOUT_MS must be positive, got {}; using {}",
                config.display_timeout_ms,
                DEFAULT_DISPLAY_TIMEOUT_MS
            );
            config.display_timeout_ms = DEFAULT_DISPLAY_TIMEOUT_MS;
        }
        if config.monitor_tick_ms == 0 {
            tracing::warn!("MONITOR_TICK_MS must be positive; using {DEFAULT_MONITOR_TICK_MS}");
            config.monitor_tick_ms = DEFAULT_MONITOR_TICK_MS;
        }
        if !(0.0..=1.0).contains(&config.tax_rate) {
            tracing::warn!(
                "TAX_RATE must be a fraction between 0 and 1, got {}; using {}",
                config.tax_rate,
                DEFAULT_TAX_RATE
            );
            config.tax_rate = DEFAULT_TAX_RATE;
        }

        config
    }

    /// Override the file-system and timing knobs, for tests
    pub fn with_overrides(
        work_dir: impl Into<String>,
        display_timeout_ms: i64,
        monitor_tick_ms: u64,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.display_timeout_ms = display_timeout_ms;
        config.monitor_tick_ms = monitor_tick_ms;
        config
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }

    /// Create the work directory if it does not exist yet
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    /// Monitor sweep interval as a [`Duration`]
    pub fn monitor_tick(&self) -> Duration {
        Duration::from_millis(self.monitor_tick_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Invalid {name}={raw}; using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path_joins_work_dir_and_file() {
        let mut config = Config::with_overrides("/tmp/kitchen-test", 20_000, 1_000);
        config.db_file = "orders.redb".to_string();
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/kitchen-test/orders.redb")
        );
    }

    #[test]
    fn test_overrides_apply_timing() {
        let config = Config::with_overrides("/tmp/x", 5_000, 250);
        assert_eq!(config.display_timeout_ms, 5_000);
        assert_eq!(config.monitor_tick(), Duration::from_millis(250));
    }
}
