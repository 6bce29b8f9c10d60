// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use thiserror::Error;

/// Errors that can occur while forwarding a sample to the remote collector.
///
/// A delivery error is terminal for the sample it belongs to. It is logged and
/// counted, but never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeliveryError {
    /// The delivery client was created outside of a tokio runtime.
    #[error("No tokio runtime available to run deliveries")]
    NoRuntime,

    /// The collector endpoint could not be parsed.
    #[error("Invalid collector url {0}")]
    InvalidUrl(String),

    /// The request could not be sent or no response was received.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The collector answered with a non-success status code.
    #[error("Collector rejected sample with status {0}")]
    Rejected(u16),

    /// The collector panicked while handling the sample.
    #[error("Collector panicked")]
    Panicked,
}
