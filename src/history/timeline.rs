//! Translation between a unified timeline index and (era, score position).
//!
//! The unified timeline interleaves score positions with one marker per era change:
//!
//! ```text
//!   unified   score   era   boundary
//!     310      310     0
//!     311      311     0
//!     312      311     1      yes     <- era change after 311 scores
//!     313      312     1
//!     314      313     1
//!     315      313     2      yes
//!     316      313     3      yes     <- an era with no scores
//!     317      314     3
//! ```
//!
//! The score count pauses for one unit at every boundary while the era count
//! advances instead.

use serde::{Deserialize, Serialize};

/// Decomposed unified index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Number of scores applied in the era's history.
    pub score_index: usize,
    /// Era whose calculator is shown.
    pub era: usize,
    /// True when this index is an era-change marker.
    pub at_boundary: bool,
}

/// Era boundaries expressed as score positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeline {
    // boundaries[k]: scores played before era k + 1 begins
    boundaries: Vec<usize>,
    // ends[k]: last unified index still belonging to era k
    ends: Vec<usize>,
}

impl Timeline {
    /// `boundaries` must be non-decreasing; equal values describe eras without scores.
    pub fn new(boundaries: Vec<usize>) -> Self {
        debug_assert!(
            boundaries.windows(2).all(|w| w[0] <= w[1]),
            "era boundaries must be non-decreasing"
        );
        let ends = boundaries.iter().enumerate().map(|(k, b)| b + k).collect();
        Self { boundaries, ends }
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    pub fn era_count(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// Last unified index for a sequence of `scores` events.
    pub fn last_index(&self, scores: usize) -> usize {
        scores + self.boundaries.len()
    }

    /// Unified indexes of the era-change markers.
    pub fn boundary_indexes(&self) -> Vec<usize> {
        self.ends.iter().map(|end| end + 1).collect()
    }

    pub fn locate(&self, index: usize) -> Position {
        let era = self.ends.partition_point(|&end| end < index);
        let score_index = index - era;
        let at_boundary = era
            .checked_sub(1)
            .is_some_and(|prev| self.boundaries[prev] == score_index);
        Position {
            score_index,
            era,
            at_boundary,
        }
    }
}
