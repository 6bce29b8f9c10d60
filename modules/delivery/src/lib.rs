// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Delivery Modul for the location tracker
//!
//! Forwards accepted position samples to a remote collector without blocking
//! the caller. Every submitted sample is transmitted on its own tokio task, so
//! any number of deliveries may be in flight at once and may complete out of order.

use common::position::PositionSample;
use futures::FutureExt;
use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tracing::{debug, error};

pub mod error;
pub mod http_collector;
pub mod log_collector;
pub mod test_helper;

pub use error::DeliveryError;

/// The remote end that accepted samples are forwarded to.
///
/// Implementations perform a single transmission attempt per call. Retry and
/// persistence policies, if any, belong to the implementation.
#[async_trait::async_trait]
pub trait Collector: Send + Sync {
    async fn deliver(&self, sample: &PositionSample) -> Result<(), DeliveryError>;
}

/// Hands a sample over for asynchronous transmission.
///
/// `submit` must return promptly regardless of network latency.
pub trait SubmitSample: Send + Sync {
    fn submit(&self, sample: PositionSample);
}

/// Counters describing the deliveries of a [`DeliveryClient`].
#[derive(Debug, Default)]
pub struct DeliveryStats {
    submitted: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl DeliveryStats {
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Acquire)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }

    /// Number of deliveries that are submitted but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.submitted()
            .saturating_sub(self.delivered() + self.failed())
    }

    /// Waits until no delivery is in flight, but at most `limit`.
    ///
    /// Returns `true` if all submitted deliveries finished in time.
    pub async fn wait_idle(&self, limit: Duration) -> bool {
        let idle = async {
            while self.in_flight() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(limit, idle).await.is_ok()
    }
}

/// Forwards samples to a [`Collector`] on a tokio runtime.
///
/// The client never cancels in-flight deliveries. Dropping the client or
/// stopping the tracker leaves already submitted samples to complete or fail
/// on their own.
pub struct DeliveryClient {
    collector: Arc<dyn Collector>,
    runtime: tokio::runtime::Handle,
    stats: Arc<DeliveryStats>,
}

impl DeliveryClient {
    /// Creates a client that runs its deliveries on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::NoRuntime`] if called outside of a tokio runtime.
    pub fn new(collector: Arc<dyn Collector>) -> Result<Self, DeliveryError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| DeliveryError::NoRuntime)?;
        Ok(DeliveryClient::with_runtime(collector, runtime))
    }

    /// Creates a client that runs its deliveries on the given runtime.
    pub fn with_runtime(collector: Arc<dyn Collector>, runtime: tokio::runtime::Handle) -> Self {
        DeliveryClient {
            collector,
            runtime,
            stats: Arc::new(DeliveryStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<DeliveryStats> {
        self.stats.clone()
    }
}

impl SubmitSample for DeliveryClient {
    fn submit(&self, sample: PositionSample) {
        self.stats.submitted.fetch_add(1, Ordering::AcqRel);
        let collector = self.collector.clone();
        let stats = self.stats.clone();
        self.runtime.spawn(async move {
            let result = AssertUnwindSafe(collector.deliver(&sample))
                .catch_unwind()
                .await
                .unwrap_or(Err(DeliveryError::Panicked));
            match result {
                Ok(()) => {
                    stats.delivered.fetch_add(1, Ordering::AcqRel);
                    debug!("Delivered sample captured at {}", sample.timestamp());
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::AcqRel);
                    error!(
                        "Failed to deliver sample captured at {}. Error: {}",
                        sample.timestamp(),
                        e
                    );
                }
            }
        });
    }
}
