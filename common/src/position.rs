// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude.
///
/// The `Position` struct is commonly used to store a point on Earth
/// in decimal degrees. Latitude values range from -90.0 to 90.0, and
/// longitude values range from -180.0 to 180.0.
///
/// # Example
///
/// ```rust
/// use common::position::Position;
///
/// let pos = Position {
///     latitude: 52.5200,
///     longitude: 13.4050,
/// };
///
/// println!("{:?}", pos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new [`Position`] with the given latitude and longitude.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::position::Position;
    ///
    /// let pos = Position::new(&52.5200, &13.4050);
    /// assert_eq!(pos.latitude, 52.5200);
    /// ```
    pub fn new(latitude: &f64, longitude: &f64) -> Self {
        Position {
            latitude: *latitude,
            longitude: *longitude,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A single timestamped location reading.
///
/// A `PositionSample` is produced by a sample source and never changes after
/// it has been built. The optional metadata follows the conventions of mobile
/// positioning APIs: a negative horizontal accuracy marks an invalid fix.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use common::position::PositionSample;
///
/// let sample = PositionSample::new(52.0266, 11.2825, Utc::now())
///     .with_altitude(92.0, 4.0)
///     .with_horizontal_accuracy(3.5);
/// assert_eq!(sample.altitude(), Some(92.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    altitude: Option<f64>,
    #[serde(default = "PositionSample::unknown_accuracy")]
    horizontal_accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vertical_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    course: Option<f64>,
    timestamp: DateTime<Utc>,
}

impl PositionSample {
    /// Creates a new [`PositionSample`] at the given coordinate and capture time.
    ///
    /// All optional metadata is unset and the horizontal accuracy is unknown (`-1.0`).
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        PositionSample {
            latitude,
            longitude,
            altitude: None,
            horizontal_accuracy: PositionSample::unknown_accuracy(),
            vertical_accuracy: None,
            speed: None,
            course: None,
            timestamp,
        }
    }

    /// Creates a sample for the given [`Position`].
    pub fn from_position(position: &Position, timestamp: DateTime<Utc>) -> Self {
        PositionSample::new(position.latitude, position.longitude, timestamp)
    }

    /// Sets the altitude in meters and its vertical accuracy.
    pub fn with_altitude(mut self, altitude: f64, vertical_accuracy: f64) -> Self {
        self.altitude = Some(altitude);
        self.vertical_accuracy = Some(vertical_accuracy);
        self
    }

    /// Sets the radius of uncertainty of the coordinate in meters.
    pub fn with_horizontal_accuracy(mut self, accuracy: f64) -> Self {
        self.horizontal_accuracy = accuracy;
        self
    }

    /// Sets the speed in meters per second and the course in degrees relative to true north.
    pub fn with_motion(mut self, speed: f64, course: f64) -> Self {
        self.speed = Some(speed);
        self.course = Some(course);
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Returns the latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn horizontal_accuracy(&self) -> f64 {
        self.horizontal_accuracy
    }

    pub fn vertical_accuracy(&self) -> Option<f64> {
        self.vertical_accuracy
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn course(&self) -> Option<f64> {
        self.course
    }

    /// Returns the moment the reading was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` if the horizontal accuracy describes a valid fix.
    pub fn has_valid_fix(&self) -> bool {
        self.horizontal_accuracy >= 0.0
    }

    /// Projects the sample onto a bare [`Position`].
    pub fn to_position(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    fn unknown_accuracy() -> f64 {
        -1.0
    }
}

/// Selects which throttle interval applies to incoming samples.
///
/// The mode is driven by an external lifecycle collaborator; the tracker
/// has no knowledge of the host's foreground/background state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    #[default]
    Foreground,
    Background,
}
