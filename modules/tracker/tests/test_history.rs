// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::test_helper::samples::sample_at;
use tracker::history::HistoryBuffer;

#[test]
fn keep_insertion_order() {
    let mut history = HistoryBuffer::new(5);
    for second in 0..3 {
        history.append(sample_at(second));
    }
    assert_eq!(
        history.snapshot(),
        vec![sample_at(0), sample_at(1), sample_at(2)]
    );
    assert_eq!(history.latest(), Some(sample_at(2)));
}

#[test]
fn evict_oldest_on_overflow() {
    let mut history = HistoryBuffer::new(3);
    for second in 0..10 {
        history.append(sample_at(second));
        assert!(history.len() <= history.capacity());
    }
    assert_eq!(
        history.snapshot(),
        vec![sample_at(7), sample_at(8), sample_at(9)]
    );
}

#[test]
fn zero_capacity_never_grows() {
    let mut history = HistoryBuffer::new(0);
    history.append(sample_at(0));
    assert!(history.is_empty());
    assert_eq!(history.latest(), None);
    assert!(history.snapshot().is_empty());
}

#[test]
fn empty_history_has_no_latest() {
    let history = HistoryBuffer::new(4);
    assert_eq!(history.latest(), None);
    assert_eq!(history.len(), 0);
}

#[test]
fn snapshot_is_detached_from_buffer() {
    let mut history = HistoryBuffer::new(2);
    history.append(sample_at(0));
    let mut snapshot = history.snapshot();
    snapshot.clear();
    history.append(sample_at(1));
    assert_eq!(history.snapshot(), vec![sample_at(0), sample_at(1)]);
}

#[test]
fn shrinking_capacity_evicts_oldest() {
    let mut history = HistoryBuffer::new(5);
    for second in 0..5 {
        history.append(sample_at(second));
    }
    history.set_capacity(2);
    assert_eq!(history.snapshot(), vec![sample_at(3), sample_at(4)]);

    history.set_capacity(3);
    history.append(sample_at(5));
    assert_eq!(
        history.snapshot(),
        vec![sample_at(3), sample_at(4), sample_at(5)]
    );
}
