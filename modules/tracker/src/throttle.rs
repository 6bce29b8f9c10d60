// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{DateTime, Utc};
use common::position::TrackingMode;
use std::time::Duration;

/// Decides whether a sample captured at `now` may pass the gate.
///
/// A sample passes if no sample was accepted before, or if at least `interval`
/// elapsed since the last accepted one. The boundary is inclusive.
///
/// Timestamps earlier than `last_accepted` count as zero elapsed time, so a
/// clock that jumps backwards suppresses acceptance until it has caught up
/// again. No further correction of clock discontinuities takes place.
///
/// ```rust
/// use chrono::{TimeDelta, Utc};
/// use std::time::Duration;
/// use tracker::throttle::accept;
///
/// let last = Utc::now();
/// let interval = Duration::from_secs(5);
/// assert!(accept(last, None, interval));
/// assert!(!accept(last + TimeDelta::seconds(4), Some(last), interval));
/// assert!(accept(last + TimeDelta::seconds(5), Some(last), interval));
/// ```
pub fn accept(
    now: DateTime<Utc>,
    last_accepted: Option<DateTime<Utc>>,
    interval: Duration,
) -> bool {
    let Some(last_accepted) = last_accepted else {
        return true;
    };
    elapsed(now, last_accepted) >= interval
}

fn elapsed(now: DateTime<Utc>, since: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

/// The stateful part of the throttle decision.
///
/// Tracks the mode dependent intervals and the time of the last accepted sample.
/// Not synchronized, the owner serializes access.
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    foreground_interval: Duration,
    background_interval: Duration,
    mode: TrackingMode,
    last_accepted: Option<DateTime<Utc>>,
}

impl ThrottleGate {
    pub fn new(foreground_interval: Duration, background_interval: Duration) -> Self {
        ThrottleGate {
            foreground_interval,
            background_interval,
            mode: TrackingMode::default(),
            last_accepted: None,
        }
    }

    /// Returns the interval of the current mode.
    pub fn interval(&self) -> Duration {
        match self.mode {
            TrackingMode::Foreground => self.foreground_interval,
            TrackingMode::Background => self.background_interval,
        }
    }

    /// Applies [`accept`] to `now` and records it as last accepted time on success.
    pub fn admit(&mut self, now: DateTime<Utc>) -> bool {
        if !accept(now, self.last_accepted, self.interval()) {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }

    /// Forgets the last accepted time, so the next sample passes unconditionally.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    /// Switches the mode. The last accepted time is kept.
    pub fn set_mode(&mut self, mode: TrackingMode) {
        self.mode = mode;
    }

    pub fn set_foreground_interval(&mut self, interval: Duration) {
        self.foreground_interval = interval;
    }

    pub fn set_background_interval(&mut self, interval: Duration) {
        self.background_interval = interval;
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn foreground_interval(&self) -> Duration {
        self.foreground_interval
    }

    pub fn background_interval(&self) -> Duration {
        self.background_interval
    }

    pub fn last_accepted(&self) -> Option<DateTime<Utc>> {
        self.last_accepted
    }
}
