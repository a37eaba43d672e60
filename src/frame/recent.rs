//! Recent window: the best `top` ratings among the `max` most recently tracked scores.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::{
    FrameEntry, Points,
    age::{AgeFrame, AgeFrameSnapshot, Popped},
};

/// Exact inverse of one accepted [`RecentFrame::offer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentUndo<K, P> {
    /// Rating-order index of the pushed entry.
    pub pushed_at: usize,
    /// Entry evicted to make room, if the window was full.
    pub evicted: Option<Popped<K, P>>,
}

/// Tracks up to `max` recent scores and rates the `top` best of them.
///
/// Once the window is full, a score that reaches the top tier evicts the oldest
/// entry outside the top tier; a score below the top tier evicts the globally oldest
/// entry unless its points are at least the weakest top-tier points, in which case
/// it is ignored.
#[derive(Debug, Clone)]
pub struct RecentFrame<K, P> {
    frame: AgeFrame<K, P>,
    top: usize,
    max: usize,
    pinned: Option<f64>,
}

impl<K, P> RecentFrame<K, P>
where
    K: Clone + Debug,
    P: Clone + Debug + Points,
{
    pub fn new(top: usize, max: usize) -> Self {
        debug_assert!(top < max, "recent window needs top < max");
        Self {
            frame: AgeFrame::new(),
            top,
            max,
            pinned: None,
        }
    }

    pub fn top_size(&self) -> usize {
        self.top
    }

    pub fn max_size(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Underlying age-ordered frame.
    pub fn frame(&self) -> &AgeFrame<K, P> {
        &self.frame
    }

    /// Current top-tier entries, best first.
    pub fn top(&self) -> &[FrameEntry<K, P>] {
        let entries = self.frame.entries();
        &entries[..self.top.min(entries.len())]
    }

    /// Sum of the top-tier ratings, or the pinned value while one is set.
    pub fn total_rating(&self) -> f64 {
        if let Some(pinned) = self.pinned {
            return pinned;
        }
        self.top().iter().map(|e| e.rating).sum()
    }

    pub fn overall_rating(&self) -> f64 {
        if self.top == 0 {
            return 0.0;
        }
        self.total_rating() / self.top as f64
    }

    /// Overrides [`RecentFrame::total_rating`] without touching the tracked entries.
    pub fn pin_rating(&mut self, total: f64) {
        self.pinned = Some(total);
    }

    pub fn unpin(&mut self) {
        self.pinned = None;
    }

    pub fn make_snapshot(&self) -> AgeFrameSnapshot<K, P> {
        self.frame.make_snapshot()
    }

    pub fn load_snapshot(&mut self, snapshot: &AgeFrameSnapshot<K, P>) {
        self.frame.load_snapshot(snapshot);
    }

    /// Offers a freshly played score to the window. `None` means it was rejected.
    pub fn offer(
        &mut self,
        key: K,
        rating: f64,
        payload: P,
        excluded: bool,
    ) -> Option<RecentUndo<K, P>> {
        if excluded {
            return None;
        }

        if self.frame.len() < self.max {
            let pushed_at = self.frame.push(key, rating, payload);
            return Some(RecentUndo {
                pushed_at,
                evicted: None,
            });
        }

        let top = self.top();
        let floor = top.last()?.rating;
        let evicted = if rating >= floor {
            // everything rated at the floor may still sit past the top positions
            let below = self.frame.pop_oldest_below(floor);
            match below {
                Some(popped) => popped,
                None => self.frame.pop_oldest_from(self.top)?,
            }
        } else {
            let weakest_points = top.iter().map(|e| e.payload.points()).min()?;
            if payload.points() >= weakest_points {
                return None;
            }
            self.frame.pop_oldest()?
        };

        let pushed_at = self.frame.push(key, rating, payload);
        Some(RecentUndo {
            pushed_at,
            evicted: Some(evicted),
        })
    }

    pub fn undo(&mut self, undo: &RecentUndo<K, P>) {
        self.frame.undo_push(undo.pushed_at);
        if let Some(evicted) = &undo.evicted {
            self.frame.undo_pop(evicted);
        }
    }
}
