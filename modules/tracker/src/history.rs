// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::PositionSample;
use std::collections::VecDeque;

/// A bounded store of the most recently accepted samples.
///
/// Samples are kept in insertion order. Appending to a full buffer evicts the
/// oldest sample first. A buffer with capacity 0 never grows.
///
/// ```rust
/// use chrono::Utc;
/// use common::position::PositionSample;
/// use tracker::history::HistoryBuffer;
///
/// let mut history = HistoryBuffer::new(2);
/// for latitude in [1.0, 2.0, 3.0] {
///     history.append(PositionSample::new(latitude, 0.0, Utc::now()));
/// }
/// let latitudes: Vec<f64> = history.snapshot().iter().map(|s| s.latitude()).collect();
/// assert_eq!(latitudes, vec![2.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<PositionSample>,
    capacity: usize,
}

impl HistoryBuffer {
    // Upper bound for the up front allocation, larger buffers grow on demand.
    const PREALLOCATION_LIMIT: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        HistoryBuffer {
            samples: VecDeque::with_capacity(capacity.min(HistoryBuffer::PREALLOCATION_LIMIT)),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest one if the buffer is full.
    pub fn append(&mut self, sample: PositionSample) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Returns a copy of the stored samples, oldest first.
    pub fn snapshot(&self) -> Vec<PositionSample> {
        self.samples.iter().copied().collect()
    }

    /// Returns the most recently appended sample.
    pub fn latest(&self) -> Option<PositionSample> {
        self.samples.back().copied()
    }

    /// Changes the capacity. Shrinking evicts the oldest samples.
    pub fn set_capacity(&mut self, capacity: usize) {
        while self.samples.len() > capacity {
            self.samples.pop_front();
        }
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
