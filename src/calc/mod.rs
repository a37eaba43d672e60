//! Rating calculators: per-score formulas plus routing into frames.

use serde::{Deserialize, Serialize};

use crate::frame::Points;

/// Pre-Refresh ruleset with a recent window.
pub mod classic;
/// Rating curves shared by the rulesets.
pub mod curve;
/// Best points per chart.
pub mod personal_best;
/// Re:Fresh ruleset with lamps and platinum rating.
pub mod refresh;

/// State machine driven by [`crate::history::RatingHistory`].
///
/// `add_score` returns `None` when the score cannot be rated at all (unknown chart);
/// nothing is mutated in that case. Every returned token must be passed back to
/// `undo_score` in exact reverse order of creation.
pub trait Calculator {
    type Score;
    type Chart;
    type Undo;
    type Snapshot;

    fn add_score(&mut self, score: &Self::Score, chart: &Self::Chart) -> Option<Self::Undo>;
    fn undo_score(&mut self, undo: &Self::Undo);
    fn make_snapshot(&self) -> Self::Snapshot;
    fn load_snapshot(&mut self, snapshot: &Self::Snapshot);
}

/// Which bounded frame a chart's rating is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// Older content.
    Best,
    /// Content from the current version.
    New,
}

/// A played score as submitted to a calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput<X = ()> {
    pub points: u32,
    /// Caller data carried into frame payloads untouched.
    pub extra: X,
}

impl ScoreInput<()> {
    pub fn new(points: u32) -> Self {
        Self { points, extra: () }
    }
}

impl<X> Points for ScoreInput<X> {
    fn points(&self) -> u32 {
        self.points
    }
}

/// Payload stored in point-rated frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedScore<X = ()> {
    pub points: u32,
    pub rating: f64,
    pub extra: X,
}

impl<X> Points for RatedScore<X> {
    fn points(&self) -> u32 {
        self.points
    }
}
