//! Frame sorted by rating that also remembers insertion age.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::order::{insertion_index_desc, min_index};

use super::{FrameEntry, is_descending};

/// Monotonic insertion age.
pub type Age = u64;

/// Entry removed by one of the pop operations, with enough context to put it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popped<K, P> {
    /// Index the entry occupied in rating order.
    pub at: usize,
    /// Age the entry was pushed with.
    pub age: Age,
    /// The removed entry.
    pub entry: FrameEntry<K, P>,
}

/// Exact inverse of one [`AgeFrame`] mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgeUndo<K, P> {
    /// Entry pushed at this rating-order index.
    Pushed {
        /// Insertion index.
        at: usize,
    },
    /// Entry popped.
    Popped(Popped<K, P>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeFrameSnapshot<K, P> {
    pub by_rating: Vec<FrameEntry<K, P>>,
    pub ages: Vec<Age>,
    pub age_counter: Age,
}

/// Unbounded set of entries sorted descending by rating, each tagged with the age
/// it was pushed at. `by_rating[i]` and `ages[i]` always describe the same entry.
#[derive(Debug, Clone)]
pub struct AgeFrame<K, P> {
    by_rating: Vec<FrameEntry<K, P>>,
    ages: Vec<Age>,
    age_counter: Age,
}

impl<K, P> Default for AgeFrame<K, P> {
    fn default() -> Self {
        Self {
            by_rating: Vec::new(),
            ages: Vec::new(),
            age_counter: 0,
        }
    }
}

impl<K, P> AgeFrame<K, P>
where
    K: Clone + Debug,
    P: Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_rating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rating.is_empty()
    }

    /// Sum of all ratings, recomputed from the entries.
    pub fn total_rating(&self) -> f64 {
        self.by_rating.iter().map(|e| e.rating).sum()
    }

    /// Entries sorted descending by rating.
    pub fn entries(&self) -> &[FrameEntry<K, P>] {
        &self.by_rating
    }

    /// Ages, index-aligned with [`AgeFrame::entries`].
    pub fn ages(&self) -> &[Age] {
        &self.ages
    }

    pub fn make_snapshot(&self) -> AgeFrameSnapshot<K, P> {
        AgeFrameSnapshot {
            by_rating: self.by_rating.clone(),
            ages: self.ages.clone(),
            age_counter: self.age_counter,
        }
    }

    pub fn load_snapshot(&mut self, snapshot: &AgeFrameSnapshot<K, P>) {
        self.by_rating.clone_from(&snapshot.by_rating);
        self.ages.clone_from(&snapshot.ages);
        self.age_counter = snapshot.age_counter;
    }

    /// Inserts by rating and stamps the entry with the next age.
    pub fn push(&mut self, key: K, rating: f64, payload: P) -> usize {
        let at = insertion_index_desc(&self.by_rating, &rating, |e| e.rating);
        self.by_rating.insert(at, FrameEntry::new(key, rating, payload));
        self.ages.insert(at, self.age_counter);
        self.age_counter += 1;
        self.assert_consistent("push");
        at
    }

    /// Removes the entry with the smallest age.
    pub fn pop_oldest(&mut self) -> Option<Popped<K, P>> {
        self.pop_oldest_from(0)
    }

    /// Removes the oldest entry among those rated strictly below `threshold`.
    ///
    /// Entries below the threshold form a contiguous suffix of the rating order.
    pub fn pop_oldest_below(&mut self, threshold: f64) -> Option<Popped<K, P>> {
        let start = self.by_rating.partition_point(|e| e.rating >= threshold);
        self.pop_oldest_from(start)
    }

    /// Removes the oldest entry among rating-order positions `start..`.
    pub fn pop_oldest_from(&mut self, start: usize) -> Option<Popped<K, P>> {
        let offset = min_index(self.ages.get(start..)?)?;
        Some(self.pop_index(start + offset))
    }

    pub fn undo(&mut self, undo: &AgeUndo<K, P>) {
        match undo {
            AgeUndo::Pushed { at } => self.undo_push(*at),
            AgeUndo::Popped(popped) => self.undo_pop(popped),
        }
    }

    /// Reverts a [`AgeFrame::push`] that returned `at`. Must be the latest push still applied.
    pub fn undo_push(&mut self, at: usize) {
        self.by_rating.remove(at);
        let age = self.ages.remove(at);
        self.age_counter -= 1;
        debug_assert_eq!(age, self.age_counter, "pushes must be undone newest first");
        self.assert_consistent("undo push");
    }

    pub fn undo_pop(&mut self, popped: &Popped<K, P>) {
        self.by_rating.insert(popped.at, popped.entry.clone());
        self.ages.insert(popped.at, popped.age);
        self.assert_consistent("undo pop");
    }

    fn pop_index(&mut self, at: usize) -> Popped<K, P> {
        let entry = self.by_rating.remove(at);
        let age = self.ages.remove(at);
        Popped { at, age, entry }
    }

    fn assert_consistent(&self, during: &str) {
        if self.by_rating.len() != self.ages.len() || !is_descending(&self.by_rating) {
            tracing::error!(
                during,
                entries = ?self.by_rating,
                ages = ?self.ages,
                "age frame invariant violated"
            );
            panic!("age frame is unsorted or misaligned after {during}");
        }
    }
}
