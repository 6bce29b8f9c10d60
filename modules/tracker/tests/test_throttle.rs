// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::TimeDelta;
use common::{
    position::TrackingMode,
    test_helper::samples::{base_time, sample_at, sample_at_millis},
};
use std::time::Duration;
use tracker::throttle::{ThrottleGate, accept};

const FOREGROUND: Duration = Duration::from_secs(5);
const BACKGROUND: Duration = Duration::from_secs(60);

#[test]
fn accept_without_previous_sample() {
    assert!(accept(base_time(), None, FOREGROUND));
    assert!(accept(base_time(), None, Duration::MAX));
}

#[test]
fn reject_before_interval_elapsed() {
    let last = base_time();
    assert!(!accept(last + TimeDelta::seconds(4), Some(last), FOREGROUND));
    assert!(!accept(
        last + TimeDelta::milliseconds(4999),
        Some(last),
        FOREGROUND
    ));
}

#[test]
fn accept_on_interval_boundary() {
    let last = base_time();
    assert!(accept(last + TimeDelta::seconds(5), Some(last), FOREGROUND));
}

#[test]
fn zero_interval_accepts_everything() {
    let last = base_time();
    assert!(accept(last, Some(last), Duration::ZERO));
    assert!(accept(last - TimeDelta::seconds(1), Some(last), Duration::ZERO));
}

#[test]
fn reject_sample_older_than_last_accepted() {
    let last = base_time();
    assert!(!accept(last - TimeDelta::seconds(30), Some(last), FOREGROUND));
}

#[test]
fn gate_applies_interval_of_mode() {
    let mut gate = ThrottleGate::new(FOREGROUND, BACKGROUND);
    assert_eq!(gate.mode(), TrackingMode::Foreground);
    assert_eq!(gate.interval(), FOREGROUND);

    gate.set_mode(TrackingMode::Background);
    assert_eq!(gate.interval(), BACKGROUND);
}

#[test]
fn gate_accepts_exactly_the_throttle_rule() {
    let mut gate = ThrottleGate::new(Duration::from_millis(1000), BACKGROUND);
    // A sample every 300 ms: accepted are 0, 1200, 2400, ...
    let accepted: Vec<i64> = (0..20)
        .map(|i| i * 300)
        .filter(|millis| gate.admit(sample_at_millis(*millis).timestamp()))
        .collect();
    assert_eq!(accepted, vec![0, 1200, 2400, 3600, 4800]);
}

#[test]
fn acceptance_is_independent_of_arrival_rate() {
    let timestamps = [0_i64, 1, 2, 5, 6, 9, 10, 11, 15, 16, 21];
    let mut gate = ThrottleGate::new(FOREGROUND, BACKGROUND);
    let mut last: Option<i64> = None;
    for second in timestamps {
        let expected = last.is_none_or(|last| second - last >= 5);
        assert_eq!(gate.admit(sample_at(second).timestamp()), expected, "t={second}");
        if expected {
            last = Some(second);
        }
    }
}

#[test]
fn mode_switch_keeps_last_accepted_time() {
    let mut gate = ThrottleGate::new(FOREGROUND, BACKGROUND);
    assert!(gate.admit(sample_at(0).timestamp()));
    assert!(!gate.admit(sample_at(4).timestamp()));
    assert!(gate.admit(sample_at(5).timestamp()));

    gate.set_mode(TrackingMode::Background);

    assert_eq!(gate.last_accepted(), Some(sample_at(5).timestamp()));
    assert!(!gate.admit(sample_at(6).timestamp()));
    assert!(gate.admit(sample_at(65).timestamp()));
}

#[test]
fn reset_forgets_last_accepted_time() {
    let mut gate = ThrottleGate::new(FOREGROUND, BACKGROUND);
    assert!(gate.admit(sample_at(0).timestamp()));
    gate.reset();
    assert_eq!(gate.last_accepted(), None);
    assert!(gate.admit(sample_at(1).timestamp()));
}
