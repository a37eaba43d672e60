//! Rated frames: ordered containers with exact, reversible mutation.

use serde::{Deserialize, Serialize};

/// Frames that keep age order alongside rating order.
pub mod age;
/// Best-N frame keyed by chart.
pub mod best;
/// Top-K-of-recent-M window built on [`age::AgeFrame`].
pub mod recent;

/// One rated entry in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry<K, P> {
    /// Unique key within the frame (a chart id).
    pub key: K,
    /// Rating used for ordering.
    pub rating: f64,
    /// Attached data.
    pub payload: P,
}

impl<K, P> FrameEntry<K, P> {
    pub fn new(key: K, rating: f64, payload: P) -> Self {
        Self { key, rating, payload }
    }
}

/// Secondary metric consulted by [`recent::RecentFrame`] when a score misses the top tier.
pub trait Points {
    /// Raw points of the score.
    fn points(&self) -> u32;
}

impl Points for u32 {
    fn points(&self) -> u32 {
        *self
    }
}

/// Returns true when ratings never increase from one entry to the next.
pub(crate) fn is_descending<K, P>(entries: &[FrameEntry<K, P>]) -> bool {
    entries.windows(2).all(|pair| pair[0].rating >= pair[1].rating)
}
