// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Tunables of a [`LocationTracker`](crate::LocationTracker).
///
/// The intervals are (de)serialized as fractional seconds:
///
/// ```json
/// {
///     "max_location_history": 100,
///     "minimum_callback_interval_foreground": 5.0,
///     "minimum_callback_interval_background": 60.0
/// }
/// ```
///
/// The camel case names `maxLocationHistory`, `minimumCallBackIntervalForeground`
/// and `minimumCallBackIntervalBackground` are read as well. Missing fields fall
/// back to their defaults. A configuration is only
/// accepted by the tracker after [`TrackerConfig::validate`] succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Number of accepted samples kept in the history buffer.
    #[serde(alias = "maxLocationHistory")]
    pub max_location_history: usize,

    /// Minimum time between two accepted samples while in foreground.
    #[serde(with = "common::serde::seconds", alias = "minimumCallBackIntervalForeground")]
    pub minimum_callback_interval_foreground: Duration,

    /// Minimum time between two accepted samples while in background.
    #[serde(with = "common::serde::seconds", alias = "minimumCallBackIntervalBackground")]
    pub minimum_callback_interval_background: Duration,
}

impl TrackerConfig {
    pub const DEFAULT_MAX_LOCATION_HISTORY: usize = 100;
    pub const DEFAULT_FOREGROUND_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_BACKGROUND_INTERVAL: Duration = Duration::from_secs(60);

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidConfiguration`] if `max_location_history` is zero.
    pub fn new(
        max_location_history: usize,
        minimum_callback_interval_foreground: Duration,
        minimum_callback_interval_background: Duration,
    ) -> Result<Self, TrackerError> {
        let config = TrackerConfig {
            max_location_history,
            minimum_callback_interval_foreground,
            minimum_callback_interval_background,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        let config: TrackerConfig = serde_json::from_str(json)
            .map_err(|e| TrackerError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Checks the configuration for values the tracker can't work with.
    ///
    /// A background interval shorter than the foreground interval is unusual
    /// but legal and only logged.
    pub fn validate(&self) -> Result<(), TrackerError> {
        validate_history_capacity(self.max_location_history)?;
        if self.minimum_callback_interval_background < self.minimum_callback_interval_foreground {
            warn!(
                "Background interval {:?} is shorter than foreground interval {:?}",
                self.minimum_callback_interval_background,
                self.minimum_callback_interval_foreground
            );
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_location_history: TrackerConfig::DEFAULT_MAX_LOCATION_HISTORY,
            minimum_callback_interval_foreground: TrackerConfig::DEFAULT_FOREGROUND_INTERVAL,
            minimum_callback_interval_background: TrackerConfig::DEFAULT_BACKGROUND_INTERVAL,
        }
    }
}

pub(crate) fn validate_history_capacity(capacity: usize) -> Result<(), TrackerError> {
    if capacity == 0 {
        return Err(TrackerError::InvalidConfiguration(
            "max_location_history must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Converts an interval given in seconds into a [`Duration`].
///
/// # Errors
///
/// Returns [`TrackerError::InvalidConfiguration`] for negative, infinite or NaN values.
pub fn interval_from_secs(seconds: f64) -> Result<Duration, TrackerError> {
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        TrackerError::InvalidConfiguration(format!("Interval of {seconds} seconds: {e}"))
    })
}
