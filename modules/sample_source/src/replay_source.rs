// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::Utc;
use common::position::{Position, PositionSample};
use module_core::{Event, EventKind, Module, ModuleCtx};
use std::{
    io::{Error, ErrorKind},
    sync::Arc,
    time::Duration,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error};

#[derive(Clone)]
struct ReplaySourceConfig {
    positions: Vec<Position>,
    interval: Duration,
    horizontal_accuracy: f64,
}

/// A sample source that replays a list of positions in a constant frequency.
///
/// Every position is published as [`PositionSampleEvent`](EventKind::PositionSampleEvent),
/// stamped with the current time. After the last position the replay starts over.
pub struct ReplaySampleSource {
    ctx: ModuleCtx,
    config: Arc<ReplaySourceConfig>,
}

impl ReplaySampleSource {
    pub fn new(ctx: ModuleCtx, positions: &[Position], interval: Duration) -> Result<Self, Error> {
        if positions.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "positions parameter is empty",
            ));
        }
        if interval.is_zero() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "replay interval must not be zero",
            ));
        }
        Ok(ReplaySampleSource {
            ctx,
            config: Arc::new(ReplaySourceConfig {
                positions: positions.to_vec(),
                interval,
                horizontal_accuracy: ReplaySampleSource::HORIZONTAL_ACCURACY,
            }),
        })
    }

    // Accuracy reported for replayed positions, in meters.
    const HORIZONTAL_ACCURACY: f64 = 5.0;
}

#[async_trait::async_trait]
impl Module for ReplaySampleSource {
    async fn run(&mut self) -> Result<(), ()> {
        let config = self.config.clone();
        let sender = self.ctx.sender.clone();
        let replay_task_handle = tokio::spawn(async move { replay_task(sender, config).await });
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            if let EventKind::QuitEvent = event.kind {
                                replay_task_handle.abort();
                                run = false;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!("ReplaySampleSource skipped {skipped} events");
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed, ReplaySampleSource stops");
                            replay_task_handle.abort();
                            run = false;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

async fn replay_task(sender: tokio::sync::broadcast::Sender<Event>, config: Arc<ReplaySourceConfig>) {
    let mut timer = tokio::time::interval(config.interval);
    for position in config.positions.iter().cycle() {
        timer.tick().await;
        let sample = PositionSample::from_position(position, Utc::now())
            .with_horizontal_accuracy(config.horizontal_accuracy);
        debug!("Replaying position {:?}", position);
        let _ = sender.send(Event {
            kind: EventKind::PositionSampleEvent(Arc::new(sample)),
        });
    }
}
