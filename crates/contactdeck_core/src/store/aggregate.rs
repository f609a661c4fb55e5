//! In-memory aggregate of normalized contacts.
//!
//! # Responsibility
//! - Hold the released (visible) prefix and the private not-yet-released buffer.
//! - Release buffered records in order, in bounded batches.
//!
//! # Invariants
//! - `visible` only grows between two `replace` calls; batches are appended.
//! - `visible ++ buffer` preserves the order handed to `replace`.

use crate::model::contact::Contact;
use std::collections::VecDeque;
use std::ops::Range;

/// Owned contact set: visible prefix plus pending buffer.
#[derive(Debug, Default)]
pub struct AggregateStore {
    visible: Vec<Contact>,
    buffer: VecDeque<Contact>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole aggregate, releasing at most `initial_batch` records.
    ///
    /// Returns the number of released records.
    pub fn replace(&mut self, contacts: Vec<Contact>, initial_batch: usize) -> usize {
        let mut buffer = VecDeque::from(contacts);
        let released = initial_batch.min(buffer.len());
        self.visible = buffer.drain(..released).collect();
        self.buffer = buffer;
        released
    }

    /// Moves up to `batch_size` buffered records into the visible set.
    ///
    /// Returns the index range of the newly visible records.
    pub fn release_next(&mut self, batch_size: usize) -> Range<usize> {
        let start = self.visible.len();
        let count = batch_size.min(self.buffer.len());
        self.visible.extend(self.buffer.drain(..count));
        start..self.visible.len()
    }

    /// Removes and returns every known record, visible first.
    pub fn take_all(&mut self) -> Vec<Contact> {
        let mut all = std::mem::take(&mut self.visible);
        all.extend(std::mem::take(&mut self.buffer));
        all
    }

    pub fn clear(&mut self) {
        self.visible.clear();
        self.buffer.clear();
    }

    /// Records released to collaborators so far.
    pub fn visible(&self) -> &[Contact] {
        &self.visible
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Visible plus buffered record count.
    pub fn total_known(&self) -> usize {
        self.visible.len() + self.buffer.len()
    }

    pub fn is_fully_released(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::AggregateStore;
    use crate::ingest::normalize::normalize;
    use crate::model::raw::RawContact;

    fn contacts(count: usize) -> Vec<crate::model::contact::Contact> {
        (0..count)
            .map(|index| {
                normalize(&RawContact {
                    id: Some(format!("c{index}")),
                    ..RawContact::default()
                })
            })
            .collect()
    }

    #[test]
    fn replace_releases_initial_prefix_only() {
        let mut store = AggregateStore::new();
        let released = store.replace(contacts(7), 3);

        assert_eq!(released, 3);
        assert_eq!(store.visible().len(), 3);
        assert_eq!(store.buffered_len(), 4);
        assert_eq!(store.total_known(), 7);
    }

    #[test]
    fn release_next_appends_in_order() {
        let mut store = AggregateStore::new();
        store.replace(contacts(7), 3);

        assert_eq!(store.release_next(3), 3..6);
        assert_eq!(store.release_next(3), 6..7);
        assert_eq!(store.release_next(3), 7..7);
        assert!(store.is_fully_released());

        let ids: Vec<_> = store.visible().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c1", "c2", "c3", "c4", "c5", "c6"]);
    }

    #[test]
    fn take_all_returns_visible_then_buffered() {
        let mut store = AggregateStore::new();
        store.replace(contacts(4), 1);
        let all = store.take_all();

        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id, "c0");
        assert_eq!(all[3].id, "c3");
        assert_eq!(store.total_known(), 0);
    }
}
