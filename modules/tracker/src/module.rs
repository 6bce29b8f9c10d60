// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    sink::{ObserverError, PositionObserver},
    tracker::LocationTracker,
};
use async_trait::async_trait;
use common::position::PositionSample;
use module_core::{Event, EventKind, Module, ModuleCtx};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

/// Drives a [`LocationTracker`] from events on the event bus.
///
/// Raw samples, start/stop requests and mode changes are forwarded to the
/// tracker. The tracker is stopped when the module quits.
pub struct TrackerModule {
    ctx: ModuleCtx,
    tracker: Arc<LocationTracker>,
}

impl TrackerModule {
    pub fn new(ctx: ModuleCtx, tracker: Arc<LocationTracker>) -> Self {
        TrackerModule { ctx, tracker }
    }

    pub fn tracker(&self) -> Arc<LocationTracker> {
        self.tracker.clone()
    }

    fn on_event(&self, kind: EventKind) {
        match kind {
            EventKind::PositionSampleEvent(sample) => {
                self.tracker.on_raw_sample(*sample);
            }
            EventKind::StartTrackingEvent(interval) => {
                debug!("Start Tracking Event received in TrackerModule");
                self.tracker.start(interval);
            }
            EventKind::StopTrackingEvent => {
                debug!("Stop Tracking Event received in TrackerModule");
                self.tracker.stop();
            }
            EventKind::TrackingModeEvent(mode) => {
                self.tracker.set_mode(mode);
            }
            _ => (),
        }
    }
}

#[async_trait]
impl Module for TrackerModule {
    async fn run(&mut self) -> Result<(), ()> {
        loop {
            match self.ctx.receiver.recv().await {
                Ok(Event {
                    kind: EventKind::QuitEvent,
                }) => break,
                Ok(event) => self.on_event(event.kind),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("TrackerModule lagged behind, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => {
                    error!("Event bus closed, TrackerModule stops");
                    break;
                }
            }
        }
        self.tracker.stop();
        Ok(())
    }
}

/// An observer that republishes accepted samples as
/// [`SampleAcceptedEvent`](EventKind::SampleAcceptedEvent)s.
///
/// Publishing without subscribers is not an error.
pub struct BusSink {
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl BusSink {
    pub fn new(ctx: &ModuleCtx) -> Self {
        BusSink {
            sender: ctx.sender.clone(),
        }
    }
}

impl PositionObserver for BusSink {
    fn on_position(&self, sample: &PositionSample) -> Result<(), ObserverError> {
        let _ = self.sender.send(Event {
            kind: EventKind::SampleAcceptedEvent(Arc::new(*sample)),
        });
        Ok(())
    }
}
