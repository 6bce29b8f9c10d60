// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Collector, DeliveryError};
use common::position::PositionSample;
use std::time::Duration;
use tracing::debug;

/// A [`Collector`] that posts every sample as JSON to a remote HTTP endpoint.
///
/// Uses a reusable `reqwest::Client` so that connections are pooled between
/// deliveries. Any non-success status code is treated as a rejection.
pub struct HttpCollector {
    http: reqwest::Client,
    url: reqwest::Url,
}

impl HttpCollector {
    /// Creates a collector posting to `url` without a request timeout.
    pub fn new(url: &str) -> Result<Self, DeliveryError> {
        HttpCollector::build(url, reqwest::Client::builder())
    }

    /// Creates a collector posting to `url` that gives up on a request after `timeout`.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        HttpCollector::build(url, reqwest::Client::builder().timeout(timeout))
    }

    fn build(url: &str, builder: reqwest::ClientBuilder) -> Result<Self, DeliveryError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| DeliveryError::InvalidUrl(format!("{url}: {e}")))?;
        let http = builder
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(HttpCollector { http, url })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait::async_trait]
impl Collector for HttpCollector {
    async fn deliver(&self, sample: &PositionSample) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(self.url.clone())
            .json(sample)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("Collector {} answered with status {}", self.url, status);
        if !status.is_success() {
            return Err(DeliveryError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
