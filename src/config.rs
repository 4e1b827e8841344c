use crate::domain::errors::ConfigError;
use chrono::{DateTime, NaiveDate, Utc};

/// Options for one ledger run
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub asset_base: String,              // Source asset of the market symbol (e.g. BTC)
    pub asset_quote: String,             // Quote asset of the market symbol (e.g. USDT)
    pub time_start: Option<DateTime<Utc>>,
    pub time_end: Option<DateTime<Utc>>,
    pub target_symbol: String, // Every amount in the report is valued in this symbol
    pub cache_path: String,    // Root directory of the JSON caches
    pub import_dir: String,    // Directory scanned for importer snapshots
    pub force_update: bool,    // Re-import even when the cache already holds data
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            asset_base: "BTC".to_string(),
            asset_quote: "USDT".to_string(),
            time_start: None,
            time_end: None,
            target_symbol: "USDT".to_string(),
            cache_path: "cache".to_string(),
            import_dir: "imports".to_string(),
            force_update: false,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> LedgerConfig {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> LedgerConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LedgerConfig::default();

        if let Some(base) = lookup("LEDGER_ASSET_BASE") {
            config.asset_base = base.trim().to_uppercase();
        }

        if let Some(quote) = lookup("LEDGER_ASSET_QUOTE") {
            config.asset_quote = quote.trim().to_uppercase();
        }

        if let Some(target) = lookup("LEDGER_TARGET_SYMBOL") {
            config.target_symbol = target.trim().to_uppercase();
        }

        if let Some(start) = lookup("LEDGER_TIME_START") {
            match parse_time(&start) {
                Some(value) => config.time_start = Some(value),
                None => {
                    tracing::warn!(
                        "Failed to parse LEDGER_TIME_START '{}' (expected RFC 3339 or YYYY-MM-DD), leaving it unset",
                        start
                    );
                }
            }
        }

        if let Some(end) = lookup("LEDGER_TIME_END") {
            match parse_time(&end) {
                Some(value) => config.time_end = Some(value),
                None => {
                    tracing::warn!(
                        "Failed to parse LEDGER_TIME_END '{}' (expected RFC 3339 or YYYY-MM-DD), leaving it unset",
                        end
                    );
                }
            }
        }

        if let Some(path) = lookup("LEDGER_CACHE_PATH") {
            config.cache_path = path;
        }

        if let Some(dir) = lookup("LEDGER_IMPORT_DIR") {
            config.import_dir = dir;
        }

        if let Some(force) = lookup("LEDGER_FORCE_UPDATE") {
            config.force_update = force.to_lowercase() == "true" || force == "1";
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let time_start = self.time_start.ok_or(ConfigError::Missing("LEDGER_TIME_START"))?;

        if self.target_symbol.trim().is_empty() {
            return Err(ConfigError::Missing("LEDGER_TARGET_SYMBOL"));
        }
        if self.asset_base.trim().is_empty() {
            return Err(ConfigError::Missing("LEDGER_ASSET_BASE"));
        }
        if self.asset_quote.trim().is_empty() {
            return Err(ConfigError::Missing("LEDGER_ASSET_QUOTE"));
        }
        if self.cache_path.trim().is_empty() {
            return Err(ConfigError::Missing("LEDGER_CACHE_PATH"));
        }

        if let Some(time_end) = self.time_end {
            if time_start >= time_end {
                return Err(ConfigError::Invalid(format!(
                    "start time {} must be before end time {}",
                    time_start, time_end
                )));
            }
        }

        Ok(())
    }
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
