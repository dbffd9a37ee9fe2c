//! Engine configuration.
//!
//! # Responsibility
//! - Carry the local offset and trailing window sizes used by trend views.
//! - Validate values before any aggregation runs.
//!
//! # Invariants
//! - Window counts are strictly positive.
//! - The local offset is within +/-18 hours.

use chrono::FixedOffset;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default trailing day count for the daily trend.
pub const DEFAULT_DAILY_WINDOW_COUNT: usize = 14;
/// Default trailing month count for the monthly trend.
pub const DEFAULT_MONTHLY_WINDOW_COUNT: usize = 5;
/// Default trailing day count for the contribution heat-map.
pub const DEFAULT_HEATMAP_WINDOW_COUNT: usize = 365;

const MAX_OFFSET_MINUTES: u32 = 18 * 60;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Offset lies outside the representable +/-18h range.
    InvalidUtcOffset(i32),
    /// A window count is zero.
    EmptyWindow(&'static str),
    /// Input is not valid configuration JSON.
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtcOffset(minutes) => {
                write!(f, "utc offset must be within +/-18h, got {minutes} minutes")
            }
            Self::EmptyWindow(name) => write!(f, "`{name}` must be greater than zero"),
            Self::Parse(message) => write!(f, "invalid engine config: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Aggregation settings shared by every view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Local offset east of UTC, in minutes, used for calendar bucketing.
    pub utc_offset_minutes: i32,
    pub daily_window_count: usize,
    pub monthly_window_count: usize,
    pub heatmap_window_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            daily_window_count: DEFAULT_DAILY_WINDOW_COUNT,
            monthly_window_count: DEFAULT_MONTHLY_WINDOW_COUNT,
            heatmap_window_count: DEFAULT_HEATMAP_WINDOW_COUNT,
        }
    }
}

impl EngineConfig {
    /// Parses and validates configuration from JSON. Missing keys use defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        if self.daily_window_count == 0 {
            return Err(ConfigError::EmptyWindow("daily_window_count"));
        }
        if self.monthly_window_count == 0 {
            return Err(ConfigError::EmptyWindow("monthly_window_count"));
        }
        if self.heatmap_window_count == 0 {
            return Err(ConfigError::EmptyWindow("heatmap_window_count"));
        }
        Ok(())
    }

    /// Local offset used for calendar-day normalization.
    pub fn local_offset(&self) -> Result<FixedOffset, ConfigError> {
        let invalid = ConfigError::InvalidUtcOffset(self.utc_offset_minutes);
        if self.utc_offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES {
            return Err(invalid);
        }
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(invalid)
    }
}
