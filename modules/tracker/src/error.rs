// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Errors reported by the location tracker.
///
/// Only [`TrackerError::InvalidConfiguration`] is ever returned to a caller.
/// Observer failures are logged on the accept path and never propagated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    /// A history capacity or interval was rejected while configuring the tracker.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The registered observer returned an error or panicked.
    #[error("Observer failed to handle sample: {0}")]
    SinkInvocation(String),
}
