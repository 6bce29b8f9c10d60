// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Tracker Modul for the location tracker
//!
//! Throttles raw position samples depending on the tracking mode, keeps a
//! bounded history of the accepted ones and hands them to an observer and the
//! delivery client.

pub mod config;
pub mod error;
pub mod history;
pub mod module;
pub mod sink;
pub mod throttle;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use tracker::{LocationTracker, SampleOutcome};
