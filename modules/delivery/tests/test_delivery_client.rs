// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::test_helper::samples::sample_at;
use delivery::{
    Collector, DeliveryClient, DeliveryError, DeliveryStats, SubmitSample,
    test_helper::{FailingCollector, GatedCollector, RecordingCollector},
};
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;

const TIMEOUT_MS: u64 = 100;

async fn wait_until_settled(stats: &DeliveryStats, count: u64) {
    timeout(Duration::from_millis(TIMEOUT_MS), async {
        while stats.delivered() + stats.failed() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("Deliveries didn't settle in time");
}

#[test]
fn report_creation_error_outside_runtime() {
    let (collector, _receiver) = RecordingCollector::new();
    let client = DeliveryClient::new(Arc::new(collector));
    assert!(matches!(client, Err(DeliveryError::NoRuntime)));
}

#[tokio::test]
#[test_log::test]
async fn forward_submitted_sample_to_collector() {
    let (collector, mut receiver) = RecordingCollector::new();
    let client = DeliveryClient::new(Arc::new(collector)).unwrap();

    client.submit(sample_at(7));

    let delivered = timeout(Duration::from_millis(TIMEOUT_MS), receiver.recv())
        .await
        .expect("Sample not delivered in time")
        .unwrap();
    assert_eq!(delivered, sample_at(7));
    wait_until_settled(&client.stats(), 1).await;
    assert_eq!(client.stats().delivered(), 1);
    assert_eq!(client.stats().in_flight(), 0);
}

#[tokio::test]
#[test_log::test]
async fn count_failed_deliveries_without_retry() {
    let collector = FailingCollector {
        error: DeliveryError::Rejected(503),
    };
    let client = DeliveryClient::new(Arc::new(collector)).unwrap();

    client.submit(sample_at(1));
    client.submit(sample_at(2));

    let stats = client.stats();
    wait_until_settled(&stats, 2).await;
    assert_eq!(stats.submitted(), 2);
    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.delivered(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[test_log::test]
async fn submit_returns_while_collector_hangs() {
    let collector = Arc::new(GatedCollector::default());
    let client = DeliveryClient::new(collector.clone()).unwrap();

    for second in 0..10 {
        client.submit(sample_at(second));
    }
    let stats = client.stats();
    assert_eq!(stats.submitted(), 10);
    assert_eq!(stats.delivered(), 0);
    assert_eq!(stats.in_flight(), 10);

    collector.open();
    wait_until_settled(&stats, 10).await;
    assert_eq!(stats.delivered(), 10);
}

struct PanickingCollector;

#[async_trait::async_trait]
impl Collector for PanickingCollector {
    async fn deliver(
        &self,
        _sample: &common::position::PositionSample,
    ) -> Result<(), DeliveryError> {
        panic!("collector exploded");
    }
}

#[tokio::test]
#[test_log::test]
async fn count_panicking_collector_as_failure() {
    let client = DeliveryClient::new(Arc::new(PanickingCollector)).unwrap();

    client.submit(sample_at(0));

    let stats = client.stats();
    wait_until_settled(&stats, 1).await;
    assert_eq!(stats.failed(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[test_log::test]
async fn wait_idle_is_bounded_and_sees_finished_deliveries() {
    let collector = Arc::new(GatedCollector::default());
    let client = DeliveryClient::new(collector.clone()).unwrap();
    let stats = client.stats();
    assert!(stats.wait_idle(Duration::ZERO).await);

    client.submit(sample_at(0));
    client.submit(sample_at(1));
    assert!(!stats.wait_idle(Duration::from_millis(20)).await);
    assert_eq!(stats.in_flight(), 2);

    collector.open();
    assert!(stats.wait_idle(Duration::from_millis(TIMEOUT_MS)).await);
    assert_eq!(stats.delivered(), 2);
}
