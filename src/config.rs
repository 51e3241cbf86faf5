use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use chrono_tz::Tz;

use crate::service::calendar_service::FetchFallback;
use crate::service::slot_service::SlotStrategy;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

// Default deployment zone; override with SCHEDULER_TIMEZONE.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_RETRIES: u32 = 1;

/// Per-request scheduling knobs, resolved once at startup and passed into the
/// service. No process-wide mutable state.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub timezone: Tz,
    pub slot_strategy: SlotStrategy,
    pub fetch_fallback: FetchFallback,
    pub fetch_timeout: Duration,
    pub fetch_retries: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE
                .parse()
                .expect("default timezone is a valid IANA name"),
            slot_strategy: SlotStrategy::ConflictAware,
            fetch_fallback: FetchFallback::Empty,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            fetch_retries: DEFAULT_FETCH_RETRIES,
        }
    }
}

impl SchedulerConfig {
    /// Builds the config through a key lookup (config file merged with env,
    /// see main.rs). Unset keys keep their defaults.
    pub fn resolve<F>(get: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SchedulerConfig::default();
        if let Some(zone) = get("SCHEDULER_TIMEZONE") {
            config.timezone = zone
                .parse::<Tz>()
                .map_err(|_| format!("Invalid SCHEDULER_TIMEZONE: {}", zone))?;
        }
        if let Some(strategy) = get("SLOT_STRATEGY") {
            config.slot_strategy = SlotStrategy::parse(&strategy)?;
        }
        if let Some(fallback) = get("FETCH_FALLBACK") {
            config.fetch_fallback = FetchFallback::parse(&fallback)?;
        }
        if let Some(secs) = get("FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| format!("Invalid FETCH_TIMEOUT_SECS: {}", secs))?;
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = get("FETCH_RETRIES") {
            config.fetch_retries = retries
                .parse()
                .map_err(|_| format!("Invalid FETCH_RETRIES: {}", retries))?;
        }
        Ok(config)
    }
}
