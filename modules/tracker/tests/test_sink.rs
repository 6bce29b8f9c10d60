// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{position::PositionSample, test_helper::samples::sample_at};
use std::sync::{Arc, Mutex};
use tracker::{
    TrackerError,
    sink::{NotificationSink, ObserverError, PositionObserver},
};

#[derive(Default)]
struct CollectingObserver {
    samples: Mutex<Vec<PositionSample>>,
}

impl PositionObserver for CollectingObserver {
    fn on_position(&self, sample: &PositionSample) -> Result<(), ObserverError> {
        self.samples.lock().unwrap().push(*sample);
        Ok(())
    }
}

#[test]
fn notify_without_observer_is_noop() {
    let sink = NotificationSink::default();
    assert!(!sink.is_registered());
    assert_eq!(sink.notify(&sample_at(0)), Ok(false));
}

#[test]
fn notify_registered_observer() {
    let sink = NotificationSink::default();
    let observer = Arc::new(CollectingObserver::default());
    sink.register(observer.clone());

    assert_eq!(sink.notify(&sample_at(0)), Ok(true));
    assert_eq!(sink.notify(&sample_at(1)), Ok(true));

    assert_eq!(
        *observer.samples.lock().unwrap(),
        vec![sample_at(0), sample_at(1)]
    );
}

#[test]
fn registering_replaces_previous_observer() {
    let sink = NotificationSink::default();
    let first = Arc::new(CollectingObserver::default());
    let second = Arc::new(CollectingObserver::default());
    sink.register(first.clone());
    sink.notify(&sample_at(0)).unwrap();
    sink.register(second.clone());
    sink.notify(&sample_at(1)).unwrap();

    assert_eq!(*first.samples.lock().unwrap(), vec![sample_at(0)]);
    assert_eq!(*second.samples.lock().unwrap(), vec![sample_at(1)]);
}

#[test]
fn clear_removes_observer() {
    let sink = NotificationSink::default();
    let observer = Arc::new(CollectingObserver::default());
    sink.register(observer.clone());
    sink.clear();

    assert_eq!(sink.notify(&sample_at(0)), Ok(false));
    assert!(observer.samples.lock().unwrap().is_empty());
}

#[test]
fn report_observer_error() {
    let sink = NotificationSink::default();
    let observer = |_: &PositionSample| -> Result<(), ObserverError> { Err("disk full".into()) };
    sink.register(Arc::new(observer));

    assert_eq!(
        sink.notify(&sample_at(0)),
        Err(TrackerError::SinkInvocation("disk full".to_string()))
    );
}

#[test]
fn report_observer_panic() {
    let sink = NotificationSink::default();
    let observer = |_: &PositionSample| -> Result<(), ObserverError> { panic!("boom") };
    sink.register(Arc::new(observer));

    let result = sink.notify(&sample_at(0));

    assert_eq!(
        result,
        Err(TrackerError::SinkInvocation("observer panicked: boom".to_string()))
    );
}
