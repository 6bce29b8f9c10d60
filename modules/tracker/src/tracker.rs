// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    config::{TrackerConfig, validate_history_capacity},
    error::TrackerError,
    history::HistoryBuffer,
    sink::{NotificationSink, ObserverError, PositionObserver},
    throttle::ThrottleGate,
};
use chrono::{DateTime, Utc};
use common::position::{PositionSample, TrackingMode};
use delivery::SubmitSample;
use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard},
    time::Duration,
};
use tracing::{debug, error, info, trace};

/// The result of handing a raw sample to [`LocationTracker::on_raw_sample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The sample passed the gate, was stored, notified and submitted for delivery.
    Accepted,

    /// Not enough time elapsed since the last accepted sample.
    Throttled,

    /// The tracker is stopped and dropped the sample.
    NotRunning,
}

struct TrackerState {
    running: bool,
    last_accepted_sample: Option<PositionSample>,
    gate: ThrottleGate,
    default_foreground_interval: Duration,
    history: HistoryBuffer,
    next_ticket: u64,
}

/// Hands out notification turns in acceptance order.
///
/// A sample takes a ticket while the state lock is held and waits for its turn
/// after the lock is released, so observers run one at a time and in the order
/// the samples were accepted without holding the state lock.
#[derive(Default)]
struct NotifyOrder {
    turn: Mutex<u64>,
    advanced: Condvar,
}

impl NotifyOrder {
    fn wait_for(&self, ticket: u64) {
        let mut turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
        while *turn != ticket {
            turn = self.advanced.wait(turn).unwrap_or_else(|e| e.into_inner());
        }
    }

    fn advance(&self) {
        *self.turn.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.advanced.notify_all();
    }
}

/// Owner of the tracking state and gatekeeper between a sample source and the
/// rest of the pipeline.
///
/// Every raw sample runs through the throttle gate. Accepted samples are
/// appended to the history, passed to the registered observer and submitted
/// for delivery.
///
/// All state changes happen under one lock, so concurrent callers can't
/// accept two samples for the same interval. The observer is invoked after
/// that lock is released but still one sample at a time, in acceptance order.
/// It may call back into the tracker, e.g. to stop it or read the last
/// location. It must not feed samples into [`on_raw_sample`](Self::on_raw_sample)
/// from the same thread, that call would wait for the running notification.
///
/// Delivery is submitted after the observer returned.
pub struct LocationTracker {
    state: Mutex<TrackerState>,
    notify_order: NotifyOrder,
    sink: NotificationSink,
    delivery: Arc<dyn SubmitSample>,
}

impl LocationTracker {
    /// Creates a stopped tracker in foreground mode.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidConfiguration`] if `config` doesn't validate.
    pub fn new(
        config: TrackerConfig,
        delivery: Arc<dyn SubmitSample>,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let state = TrackerState {
            running: false,
            last_accepted_sample: None,
            gate: ThrottleGate::new(
                config.minimum_callback_interval_foreground,
                config.minimum_callback_interval_background,
            ),
            default_foreground_interval: config.minimum_callback_interval_foreground,
            history: HistoryBuffer::new(config.max_location_history),
            next_ticket: 0,
        };
        Ok(LocationTracker {
            state: Mutex::new(state),
            notify_order: NotifyOrder::default(),
            sink: NotificationSink::default(),
            delivery,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts tracking.
    ///
    /// `interval_override` replaces the configured foreground interval until the
    /// next start. The first sample after a start is always accepted. Calling
    /// `start` on a running tracker does nothing.
    pub fn start(&self, interval_override: Option<Duration>) {
        let mut state = self.lock_state();
        if state.running {
            debug!("Location tracking already running");
            return;
        }
        let foreground_interval = interval_override.unwrap_or(state.default_foreground_interval);
        state.gate.set_foreground_interval(foreground_interval);
        state.gate.reset();
        state.running = true;
        info!(
            "Location tracking started with foreground interval {:?} and background interval {:?}",
            foreground_interval,
            state.gate.background_interval()
        );
    }

    /// Stops tracking. Samples received while stopped are dropped.
    ///
    /// Deliveries that were already submitted are not cancelled.
    pub fn stop(&self) {
        let mut state = self.lock_state();
        if state.running {
            state.running = false;
            info!("Location tracking stopped");
        }
    }

    /// Entry point for every raw reading of the sample source.
    pub fn on_raw_sample(&self, sample: PositionSample) -> SampleOutcome {
        let ticket = {
            let mut state = self.lock_state();
            if !state.running {
                trace!("Dropping sample captured at {}, tracker stopped", sample.timestamp());
                return SampleOutcome::NotRunning;
            }
            if !state.gate.admit(sample.timestamp()) {
                trace!("Throttled sample captured at {}", sample.timestamp());
                return SampleOutcome::Throttled;
            }
            state.history.append(sample);
            state.last_accepted_sample = Some(sample);
            debug!(
                "Accepted sample lat: {}, long: {} captured at {}",
                sample.latitude(),
                sample.longitude(),
                sample.timestamp()
            );
            let ticket = state.next_ticket;
            state.next_ticket += 1;
            ticket
        };

        self.notify_order.wait_for(ticket);
        if let Err(e) = self.sink.notify(&sample) {
            error!("{}", e);
        }
        self.notify_order.advance();

        self.delivery.submit(sample);
        SampleOutcome::Accepted
    }

    /// Selects which interval the gate applies. The last accepted time is kept,
    /// so a mode switch doesn't force an immediate acceptance.
    pub fn set_mode(&self, mode: TrackingMode) {
        let mut state = self.lock_state();
        if state.gate.mode() != mode {
            debug!("Switching tracking mode to {:?}", mode);
        }
        state.gate.set_mode(mode);
    }

    /// Registers a callback for accepted samples, replacing any previous one.
    pub fn register_sink<F>(&self, callback: F)
    where
        F: Fn(&PositionSample) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.sink.register(Arc::new(callback));
    }

    /// Registers an observer for accepted samples, replacing any previous one.
    pub fn register_observer(&self, observer: Arc<dyn PositionObserver>) {
        self.sink.register(observer);
    }

    pub fn clear_sink(&self) {
        self.sink.clear();
    }

    /// Calls the registered observer with `sample` outside of the throttle path.
    ///
    /// Returns `true` if an observer is registered and handled the sample.
    pub fn notify_sink(&self, sample: &PositionSample) -> bool {
        match self.sink.notify(sample) {
            Ok(notified) => notified,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Changes the history capacity. Shrinking evicts the oldest samples.
    pub fn set_max_location_history(&self, capacity: usize) -> Result<(), TrackerError> {
        validate_history_capacity(capacity)?;
        self.lock_state().history.set_capacity(capacity);
        Ok(())
    }

    /// Replaces the configured intervals.
    ///
    /// Takes effect immediately and also replaces an interval override given to
    /// [`start`](Self::start). The last accepted time is kept.
    pub fn set_intervals(&self, foreground: Duration, background: Duration) -> Result<(), TrackerError> {
        let mut state = self.lock_state();
        TrackerConfig {
            max_location_history: state.history.capacity(),
            minimum_callback_interval_foreground: foreground,
            minimum_callback_interval_background: background,
        }
        .validate()?;
        state.default_foreground_interval = foreground;
        state.gate.set_foreground_interval(foreground);
        state.gate.set_background_interval(background);
        Ok(())
    }

    /// The currently configured values.
    pub fn config(&self) -> TrackerConfig {
        let state = self.lock_state();
        TrackerConfig {
            max_location_history: state.history.capacity(),
            minimum_callback_interval_foreground: state.default_foreground_interval,
            minimum_callback_interval_background: state.gate.background_interval(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    pub fn mode(&self) -> TrackingMode {
        self.lock_state().gate.mode()
    }

    /// The interval the gate applies right now.
    pub fn effective_interval(&self) -> Duration {
        self.lock_state().gate.interval()
    }

    pub fn last_location(&self) -> Option<PositionSample> {
        self.lock_state().last_accepted_sample
    }

    /// Capture time of the last accepted sample since the last start.
    pub fn last_location_time(&self) -> Option<DateTime<Utc>> {
        self.lock_state().gate.last_accepted()
    }

    /// The accepted samples kept in the history, oldest first.
    pub fn history(&self) -> Vec<PositionSample> {
        self.lock_state().history.snapshot()
    }

    pub fn history_len(&self) -> usize {
        self.lock_state().history.len()
    }
}
