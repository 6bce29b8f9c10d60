// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{TimeZone, Utc};
use common::{
    position::{Position, PositionSample, TrackingMode},
    test_helper::samples::{base_time, sample_at},
};

fn get_sample_as_json<'a>() -> &'a str {
    r#"
    {
        "latitude": 52.025833,
        "longitude": 11.279166,
        "altitude": 87.5,
        "horizontal_accuracy": 4.0,
        "vertical_accuracy": 6.0,
        "timestamp": "2025-05-17T10:00:00Z"
    }
    "#
}

fn get_sample() -> PositionSample {
    PositionSample::new(
        52.025833,
        11.279166,
        Utc.with_ymd_and_hms(2025, 5, 17, 10, 0, 0).unwrap(),
    )
    .with_altitude(87.5, 6.0)
    .with_horizontal_accuracy(4.0)
}

#[test]
pub fn deserialize_sample_from_json() {
    let sample = PositionSample::from_json(get_sample_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(sample, get_sample());
    assert_eq!(sample.speed(), None);
    assert_eq!(sample.course(), None);
}

#[test]
pub fn serialized_sample_keeps_all_fields() {
    let sample = sample_at(12).with_motion(13.9, 270.0);
    let json = sample.to_json().unwrap();
    assert_eq!(PositionSample::from_json(&json).unwrap(), sample);
}

#[test]
pub fn missing_accuracy_marks_invalid_fix() {
    let json = r#"{ "latitude": 1.0, "longitude": 2.0, "timestamp": "2025-05-17T10:00:00Z" }"#;
    let sample = PositionSample::from_json(json).unwrap();
    assert!(!sample.has_valid_fix());
    assert_eq!(sample.altitude(), None);
    assert_eq!(sample.timestamp(), base_time());
}

#[test]
pub fn project_sample_onto_position() {
    let sample = get_sample();
    assert_eq!(sample.to_position(), Position::new(&52.025833, &11.279166));
    assert_eq!(
        PositionSample::from_position(&sample.to_position(), sample.timestamp()).latitude(),
        sample.latitude()
    );
}

#[test]
pub fn test_samples_are_ordered_by_offset() {
    assert!(sample_at(1).timestamp() < sample_at(2).timestamp());
    assert_eq!(
        (sample_at(5).timestamp() - sample_at(0).timestamp()).num_seconds(),
        5
    );
}

#[test]
pub fn tracking_mode_defaults_to_foreground() {
    assert_eq!(TrackingMode::default(), TrackingMode::Foreground);
    assert_eq!(
        serde_json::from_str::<TrackingMode>("\"background\"").unwrap(),
        TrackingMode::Background
    );
}

#[test]
pub fn deserialize_position_from_json() {
    let pos = Position::from_json(r#"{ "latitude": 52.025833, "longitude": 11.279166 }"#)
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(pos, Position::new(&52.025833, &11.279166));
}
