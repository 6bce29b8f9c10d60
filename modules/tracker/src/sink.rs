// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::TrackerError;
use common::position::PositionSample;
use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, RwLock},
};

/// Error type observers may return.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Receives every sample accepted by the tracker.
///
/// The observer is called synchronously on the accept path, in acceptance
/// order. It must be fast and must not block. Slow work belongs on the
/// observer's own task.
///
/// Closures of the shape `Fn(&PositionSample) -> Result<(), ObserverError>`
/// implement this trait.
pub trait PositionObserver: Send + Sync {
    fn on_position(&self, sample: &PositionSample) -> Result<(), ObserverError>;
}

impl<F> PositionObserver for F
where
    F: Fn(&PositionSample) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_position(&self, sample: &PositionSample) -> Result<(), ObserverError> {
        self(sample)
    }
}

/// Holds at most one [`PositionObserver`].
///
/// Registering replaces the previous observer. A notification takes its own
/// reference to the observer before calling it, so swapping the observer
/// while a notification is in flight never redirects that notification.
#[derive(Default)]
pub struct NotificationSink {
    observer: RwLock<Option<Arc<dyn PositionObserver>>>,
}

impl NotificationSink {
    pub fn register(&self, observer: Arc<dyn PositionObserver>) {
        *self.observer.write().unwrap_or_else(|e| e.into_inner()) = Some(observer);
    }

    pub fn clear(&self) {
        *self.observer.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_registered(&self) -> bool {
        self.observer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Calls the registered observer with `sample`.
    ///
    /// Returns `Ok(false)` if no observer is registered. Errors and panics of the
    /// observer are caught and returned as [`TrackerError::SinkInvocation`].
    pub fn notify(&self, sample: &PositionSample) -> Result<bool, TrackerError> {
        let observer = self
            .observer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let Some(observer) = observer else {
            return Ok(false);
        };
        match catch_unwind(AssertUnwindSafe(|| observer.on_position(sample))) {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => Err(TrackerError::SinkInvocation(e.to_string())),
            Err(panic) => Err(TrackerError::SinkInvocation(format!(
                "observer panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
