//! Game settings and configuration file loading
//!
//! Settings use an rc-style format: one `key = value` per line, `#` starts a
//! comment. Keys not present keep their default value.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Tunable numbers for player state decay and role elections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Initial sanitation is drawn from `sanitation_lowest_initvalue..=99`
    pub sanitation_lowest_initvalue: u8,
    /// Upper bound in seconds for each randomized decay wait
    pub sanitation_drop_interval: u64,
    pub sanitation_drop_bloody: i32,
    pub sanitation_drop_soak: i32,
    /// Upper bound of the ticks-at-zero countdown
    pub scoredrop_sanitation_count: u32,
    pub sanitation_scoredrop: i64,
    /// Seconds until a soaked player dries
    pub drying_time: u64,
    pub itemuse_default_score: i64,
    pub election_multiplier: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sanitation_lowest_initvalue: SANITATION_LOWEST_INITVALUE,
            sanitation_drop_interval: SANITATION_DROP_INTERVAL,
            sanitation_drop_bloody: SANITATIONDROP_BLOODY,
            sanitation_drop_soak: SANITATIONDROP_SOAK,
            scoredrop_sanitation_count: SCOREDROP_SANITATION_COUNT,
            sanitation_scoredrop: SANITATION_SCOREDROP,
            drying_time: DRYING_TIME,
            itemuse_default_score: ITEMUSE_DEFAULT_SCORE,
            election_multiplier: ELECTION_MULTIPLIER,
        }
    }
}

impl GameSettings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_config(&contents)
    }

    /// Parse settings from a config string
    pub fn parse_config(contents: &str) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        for (idx, raw) in contents.lines().enumerate() {
            let line = match raw.split_once('#') {
                Some((before, _)) => before.trim(),
                None => raw.trim(),
            };
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(SettingsError::Parse {
                    line: idx + 1,
                    text: raw.to_string(),
                });
            };
            settings.set(key.trim(), value.trim())?;
        }

        Ok(settings)
    }

    /// Set a single setting by name
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "sanitation_lowest_initvalue" => {
                self.sanitation_lowest_initvalue = parse_value(key, value)?;
                if self.sanitation_lowest_initvalue > SANITATION_MAX {
                    return Err(invalid(key, value));
                }
            }
            "sanitation_drop_interval" => {
                self.sanitation_drop_interval = parse_value(key, value)?;
                if self.sanitation_drop_interval == 0 {
                    return Err(invalid(key, value));
                }
            }
            "sanitation_drop_bloody" => self.sanitation_drop_bloody = parse_value(key, value)?,
            "sanitation_drop_soak" => self.sanitation_drop_soak = parse_value(key, value)?,
            "scoredrop_sanitation_count" => {
                self.scoredrop_sanitation_count = parse_value(key, value)?;
                if self.scoredrop_sanitation_count == 0 {
                    return Err(invalid(key, value));
                }
            }
            "sanitation_scoredrop" => self.sanitation_scoredrop = parse_value(key, value)?,
            "drying_time" => self.drying_time = parse_value(key, value)?,
            "itemuse_default_score" => self.itemuse_default_score = parse_value(key, value)?,
            "election_multiplier" => {
                self.election_multiplier = parse_value(key, value)?;
                if !(1..=ELECTION_MULTIPLIER_MAX).contains(&self.election_multiplier) {
                    return Err(invalid(key, value));
                }
            }
            _ => return Err(SettingsError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    pub fn drying_duration(&self) -> Duration {
        Duration::from_secs(self.drying_time)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
