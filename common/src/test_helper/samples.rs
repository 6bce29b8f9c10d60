// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::position::{Position, PositionSample};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// The fixed point in time all test samples are relative to.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 17, 10, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("Test base time is ambiguous"))
}

/// Returns a sample captured `seconds` after [`base_time`].
///
/// The coordinate moves slightly with the time offset so that samples
/// are distinguishable by position as well.
pub fn sample_at(seconds: i64) -> PositionSample {
    sample_at_millis(seconds * 1000)
}

/// Returns a sample captured `millis` milliseconds after [`base_time`].
pub fn sample_at_millis(millis: i64) -> PositionSample {
    let offset = millis as f64 / 1_000_000.0;
    PositionSample::new(
        52.0270889 + offset,
        11.2803483 + offset,
        base_time() + TimeDelta::milliseconds(millis),
    )
    .with_horizontal_accuracy(5.0)
}

/// A short stretch of track positions.
pub fn get_positions() -> Vec<Position> {
    vec![
        Position::new(&52.026649, &11.282535),
        Position::new(&52.026751, &11.282047),
        Position::new(&52.026807, &11.281746),
    ]
}
