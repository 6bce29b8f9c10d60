// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Collectors and submitters for tests of modules that deliver samples.

use crate::{Collector, DeliveryError, SubmitSample};
use common::position::PositionSample;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, mpsc};

/// A [`Collector`] that forwards every sample into a channel.
pub struct RecordingCollector {
    sender: mpsc::UnboundedSender<PositionSample>,
}

impl RecordingCollector {
    /// Creates the collector together with the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PositionSample>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (RecordingCollector { sender }, receiver)
    }
}

#[async_trait::async_trait]
impl Collector for RecordingCollector {
    async fn deliver(&self, sample: &PositionSample) -> Result<(), DeliveryError> {
        self.sender
            .send(*sample)
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

/// A [`Collector`] that fails every delivery with the given error.
pub struct FailingCollector {
    pub error: DeliveryError,
}

#[async_trait::async_trait]
impl Collector for FailingCollector {
    async fn deliver(&self, _sample: &PositionSample) -> Result<(), DeliveryError> {
        Err(self.error.clone())
    }
}

/// A [`Collector`] whose deliveries hang until [`GatedCollector::open`] is called.
///
/// Simulates a slow network.
#[derive(Default)]
pub struct GatedCollector {
    gate: Notify,
    opened: Mutex<bool>,
}

impl GatedCollector {
    pub fn open(&self) {
        *self.opened.lock().unwrap_or_else(|e| e.into_inner()) = true;
        self.gate.notify_waiters();
    }

    fn is_open(&self) -> bool {
        *self.opened.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl Collector for GatedCollector {
    async fn deliver(&self, _sample: &PositionSample) -> Result<(), DeliveryError> {
        loop {
            let notified = self.gate.notified();
            if self.is_open() {
                return Ok(());
            }
            notified.await;
        }
    }
}

/// A [`SubmitSample`] that records submitted samples synchronously.
#[derive(Default, Clone)]
pub struct RecordingSubmitter {
    samples: Arc<Mutex<Vec<PositionSample>>>,
}

impl RecordingSubmitter {
    pub fn samples(&self) -> Vec<PositionSample> {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SubmitSample for RecordingSubmitter {
    fn submit(&self, sample: PositionSample) {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sample);
    }
}
