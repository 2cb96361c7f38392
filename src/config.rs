use crate::error::{BleachError, Result};
use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// 420 seconds is 7 minutes
pub const DEFAULT_TIME_WINDOW_SECS: i64 = 420;
// One year; a chain of ballots spread wider than this is not a burst
pub const MAX_TIME_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;
pub const DEFAULT_QUALIFYING_LENGTH: usize = 2;
pub const DEFAULT_CHAIN_EMPTY_WEIGHT: u32 = 100;
pub const DEFAULT_CHAIN_WITH_FEEDBACK_WEIGHT: u32 = 20;
pub const DEFAULT_SHORT_FEEDBACK_MAX_WORDS: usize = 3;
pub const DEFAULT_SHORT_FEEDBACK_WEIGHT: u32 = 25;
pub const DEFAULT_INCOMPLETE_RATING_WEIGHT: u32 = 50;
pub const DEFAULT_INCOMPLETE_FEEDBACK_WEIGHT: u32 = 50;
pub const DEFAULT_DUPLICATE_WEIGHT: u32 = 75;

// Ballots scoring at or above this are left out of the clean set
pub const DEFAULT_CLEAN_CUTOFF: u32 = 75;
// Central standard time
pub const DEFAULT_UTC_OFFSET: &str = "-06:00";

/// Thresholds and weights read by the risk checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub time_window_secs: i64,
    pub qualifying_length: usize,
    pub chain_empty_weight: u32,
    pub chain_with_feedback_weight: u32,
    pub short_feedback_max_words: usize,
    pub short_feedback_weight: u32,
    pub incomplete_rating_weight: u32,
    pub incomplete_feedback_weight: u32,
    pub duplicate_weight: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            time_window_secs: DEFAULT_TIME_WINDOW_SECS,
            qualifying_length: DEFAULT_QUALIFYING_LENGTH,
            chain_empty_weight: DEFAULT_CHAIN_EMPTY_WEIGHT,
            chain_with_feedback_weight: DEFAULT_CHAIN_WITH_FEEDBACK_WEIGHT,
            short_feedback_max_words: DEFAULT_SHORT_FEEDBACK_MAX_WORDS,
            short_feedback_weight: DEFAULT_SHORT_FEEDBACK_WEIGHT,
            incomplete_rating_weight: DEFAULT_INCOMPLETE_RATING_WEIGHT,
            incomplete_feedback_weight: DEFAULT_INCOMPLETE_FEEDBACK_WEIGHT,
            duplicate_weight: DEFAULT_DUPLICATE_WEIGHT,
        }
    }
}

impl RiskConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            time_window_secs: parse_or(&lookup, "BALLOTBLEACH_TIME_WINDOW_SECS", defaults.time_window_secs)?,
            qualifying_length: parse_or(&lookup, "BALLOTBLEACH_QUALIFYING_LENGTH", defaults.qualifying_length)?,
            chain_empty_weight: parse_or(&lookup, "BALLOTBLEACH_CHAIN_EMPTY_WEIGHT", defaults.chain_empty_weight)?,
            chain_with_feedback_weight: parse_or(
                &lookup,
                "BALLOTBLEACH_CHAIN_WITH_FEEDBACK_WEIGHT",
                defaults.chain_with_feedback_weight,
            )?,
            short_feedback_max_words: parse_or(
                &lookup,
                "BALLOTBLEACH_SHORT_FEEDBACK_MAX_WORDS",
                defaults.short_feedback_max_words,
            )?,
            short_feedback_weight: parse_or(&lookup, "BALLOTBLEACH_SHORT_FEEDBACK_WEIGHT", defaults.short_feedback_weight)?,
            incomplete_rating_weight: parse_or(
                &lookup,
                "BALLOTBLEACH_INCOMPLETE_RATING_WEIGHT",
                defaults.incomplete_rating_weight,
            )?,
            incomplete_feedback_weight: parse_or(
                &lookup,
                "BALLOTBLEACH_INCOMPLETE_FEEDBACK_WEIGHT",
                defaults.incomplete_feedback_weight,
            )?,
            duplicate_weight: parse_or(&lookup, "BALLOTBLEACH_DUPLICATE_WEIGHT", defaults.duplicate_weight)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_window_secs < 0 {
            return Err(BleachError::config(
                "BALLOTBLEACH_TIME_WINDOW_SECS",
                "time window cannot be negative",
            ));
        }
        if self.time_window_secs > MAX_TIME_WINDOW_SECS {
            return Err(BleachError::config(
                "BALLOTBLEACH_TIME_WINDOW_SECS",
                format!("time window cannot exceed {} seconds", MAX_TIME_WINDOW_SECS),
            ));
        }
        if self.qualifying_length == 0 {
            return Err(BleachError::config(
                "BALLOTBLEACH_QUALIFYING_LENGTH",
                "qualifying length must be at least 1",
            ));
        }
        let weights = [
            ("BALLOTBLEACH_CHAIN_EMPTY_WEIGHT", self.chain_empty_weight),
            ("BALLOTBLEACH_CHAIN_WITH_FEEDBACK_WEIGHT", self.chain_with_feedback_weight),
            ("BALLOTBLEACH_SHORT_FEEDBACK_WEIGHT", self.short_feedback_weight),
            ("BALLOTBLEACH_INCOMPLETE_RATING_WEIGHT", self.incomplete_rating_weight),
            ("BALLOTBLEACH_INCOMPLETE_FEEDBACK_WEIGHT", self.incomplete_feedback_weight),
            ("BALLOTBLEACH_DUPLICATE_WEIGHT", self.duplicate_weight),
        ];
        for (key, weight) in weights {
            if weight == 0 {
                return Err(BleachError::config(key, "risk weights must be positive"));
            }
        }
        Ok(())
    }
}

/// Settings for a command-line run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub out_dir: PathBuf,
    pub clean_cutoff: u32,
    pub default_offset: FixedOffset,
    pub skip_first_row: bool,
    pub chart_options_file: Option<PathBuf>,
    pub risk: RiskConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Same defaults the original scripts used, relative to the home directory
        let home = lookup("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        let data_file = lookup("BALLOTBLEACH_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("dev/data/council_survey_newest.csv"));
        let out_dir = lookup("BALLOTBLEACH_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("dev/data"));

        let offset_str = lookup("BALLOTBLEACH_UTC_OFFSET").unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_string());
        let default_offset = FixedOffset::from_str(offset_str.trim())
            .map_err(|e| BleachError::config("BALLOTBLEACH_UTC_OFFSET", e.to_string()))?;

        Ok(Self {
            data_file,
            out_dir,
            clean_cutoff: parse_or(&lookup, "BALLOTBLEACH_CLEAN_CUTOFF", DEFAULT_CLEAN_CUTOFF)?,
            default_offset,
            skip_first_row: parse_or(&lookup, "BALLOTBLEACH_SKIP_FIRST_ROW", true)?,
            chart_options_file: lookup("BALLOTBLEACH_CHART_OPTIONS").map(PathBuf::from),
            risk: RiskConfig::from_lookup(&lookup)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| BleachError::config(key, format!("{:?}: {}", raw, e))),
        _ => Ok(default),
    }
}
