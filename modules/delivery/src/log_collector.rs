// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Collector, DeliveryError};
use common::position::PositionSample;
use tracing::info;

/// A [`Collector`] that only logs the samples it receives.
///
/// Used when no remote endpoint is configured.
#[derive(Debug, Default)]
pub struct LogCollector;

#[async_trait::async_trait]
impl Collector for LogCollector {
    async fn deliver(&self, sample: &PositionSample) -> Result<(), DeliveryError> {
        info!(
            "Position lat: {}, long: {}, accuracy: {} at {}",
            sample.latitude(),
            sample.longitude(),
            sample.horizontal_accuracy(),
            sample.timestamp()
        );
        Ok(())
    }
}
