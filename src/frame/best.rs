//! Bounded frame holding the best `N` entries, at most one per key.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::order::insertion_index_desc;

use super::{FrameEntry, is_descending};

/// Exact inverse of one [`BestFrame::upsert`] that changed the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BestUndo<K, P> {
    /// New entry inserted at `at`; nothing was evicted.
    Inserted {
        /// Insertion index.
        at: usize,
    },
    /// New entry inserted at `at`, pushing `evicted` out of the frame from `evicted_at`.
    Displaced {
        /// Insertion index.
        at: usize,
        /// Index the evicted entry occupied right before it was removed.
        evicted_at: usize,
        /// The evicted entry.
        evicted: FrameEntry<K, P>,
    },
    /// Existing entry improved and moved from `from` to `to`.
    Updated {
        /// Index before the update.
        from: usize,
        /// Index after the update.
        to: usize,
        /// Rating before the update.
        rating: f64,
        /// Payload before the update.
        payload: P,
    },
}

/// Deep copy of a [`BestFrame`]'s contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestFrameSnapshot<K, P> {
    pub entries: Vec<FrameEntry<K, P>>,
    pub total_rating: f64,
}

/// Keeps the best `capacity` rated entries sorted descending by rating.
///
/// Only one entry per key is kept; a second score for a key replaces the first
/// only when it rates strictly higher.
#[derive(Debug, Clone)]
pub struct BestFrame<K, P> {
    entries: Vec<FrameEntry<K, P>>,
    total_rating: f64,
    capacity: usize,
}

impl<K, P> BestFrame<K, P>
where
    K: Clone + PartialEq + Debug,
    P: Clone + Debug,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            total_rating: 0.0,
            capacity,
        }
    }

    /// Running sum of all entry ratings.
    pub fn total_rating(&self) -> f64 {
        self.total_rating
    }

    /// Total rating averaged over the full capacity.
    pub fn overall_rating(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.total_rating / self.capacity as f64
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted descending by rating.
    pub fn entries(&self) -> &[FrameEntry<K, P>] {
        &self.entries
    }

    pub fn get(&self, key: &K) -> Option<&FrameEntry<K, P>> {
        self.position(key).map(|idx| &self.entries[idx])
    }

    pub fn make_snapshot(&self) -> BestFrameSnapshot<K, P> {
        BestFrameSnapshot {
            entries: self.entries.clone(),
            total_rating: self.total_rating,
        }
    }

    pub fn load_snapshot(&mut self, snapshot: &BestFrameSnapshot<K, P>) {
        self.entries.clone_from(&snapshot.entries);
        self.total_rating = snapshot.total_rating;
    }

    /// Inserts a new entry or improves the existing entry for `key`.
    ///
    /// Returns `None` when the frame did not change.
    pub fn upsert(&mut self, key: K, rating: f64, payload: P) -> Option<BestUndo<K, P>> {
        let undo = self.apply_upsert(key, rating, payload);
        if undo.is_some() {
            self.assert_sorted("upsert");
        }
        undo
    }

    /// Reverts one change made by [`BestFrame::upsert`]. Tokens must be applied LIFO.
    pub fn undo(&mut self, undo: &BestUndo<K, P>) {
        match undo {
            BestUndo::Inserted { at } => {
                self.remove_at(*at);
            }
            BestUndo::Displaced {
                at,
                evicted_at,
                evicted,
            } => {
                // mirror of the forward path: the frame briefly holds capacity + 1 entries
                self.total_rating += evicted.rating;
                self.entries.insert(*evicted_at, evicted.clone());
                self.remove_at(*at);
            }
            BestUndo::Updated {
                from,
                to,
                rating,
                payload,
            } => {
                let mut entry = self.entries.remove(*to);
                self.total_rating += rating - entry.rating;
                entry.rating = *rating;
                entry.payload = payload.clone();
                self.entries.insert(*from, entry);
            }
        }
        self.assert_sorted("undo");
    }

    fn apply_upsert(&mut self, key: K, rating: f64, payload: P) -> Option<BestUndo<K, P>> {
        if let Some(idx) = self.position(&key) {
            if rating <= self.entries[idx].rating {
                return None;
            }
            return Some(self.update(idx, rating, payload));
        }

        if self.entries.len() < self.capacity {
            let at = self.insert(FrameEntry::new(key, rating, payload));
            return Some(BestUndo::Inserted { at });
        }

        let lowest = self.entries.last()?.rating;
        if rating <= lowest {
            return None;
        }

        let at = self.insert(FrameEntry::new(key, rating, payload));
        let evicted_at = self.entries.len() - 1;
        let evicted = self.remove_at(evicted_at);
        Some(BestUndo::Displaced {
            at,
            evicted_at,
            evicted,
        })
    }

    fn update(&mut self, from: usize, rating: f64, payload: P) -> BestUndo<K, P> {
        // the old entry rates lower, so the new slot is at or before `from`
        let to = insertion_index_desc(&self.entries, &rating, |e| e.rating);
        let mut entry = self.entries.remove(from);
        self.total_rating += rating - entry.rating;
        let old_rating = std::mem::replace(&mut entry.rating, rating);
        let old_payload = std::mem::replace(&mut entry.payload, payload);
        self.entries.insert(to, entry);
        BestUndo::Updated {
            from,
            to,
            rating: old_rating,
            payload: old_payload,
        }
    }

    fn insert(&mut self, entry: FrameEntry<K, P>) -> usize {
        let at = insertion_index_desc(&self.entries, &entry.rating, |e| e.rating);
        self.total_rating += entry.rating;
        self.entries.insert(at, entry);
        at
    }

    fn remove_at(&mut self, idx: usize) -> FrameEntry<K, P> {
        let entry = self.entries.remove(idx);
        self.total_rating -= entry.rating;
        entry
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|e| e.key == *key)
    }

    fn assert_sorted(&self, during: &str) {
        if self.entries.len() > self.capacity || !is_descending(&self.entries) {
            tracing::error!(
                during,
                capacity = self.capacity,
                entries = ?self.entries,
                "best frame invariant violated"
            );
            panic!("best frame is no longer sorted or exceeds capacity after {during}");
        }
    }
}
