//! Pre-Refresh ruleset: best 30 + new 15 + recent top 10 of 30.

use std::{fmt::Debug, marker::PhantomData};

use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartInfo, ChartLookup},
    frame::{
        age::AgeFrameSnapshot,
        best::{BestFrame, BestFrameSnapshot, BestUndo},
        recent::{RecentFrame, RecentUndo},
    },
    types::ChartId,
};

use super::{
    Calculator, RatedScore, ScoreInput, Slot,
    curve::{RATING_FLOOR_POINTS, lerp, low_score_rating, truncate},
};

const TECHNICAL_BONUS: [(f64, f64); 6] = [
    (1_007_500.0, 2.0),
    (1_000_000.0, 1.5),
    (990_000.0, 1.0),
    (970_000.0, 0.0),
    (900_000.0, -4.0),
    (800_000.0, -6.0),
];

/// Rating of one score, truncated to 0.01.
pub fn score_rating(points: u32, level: f64) -> f64 {
    if points < RATING_FLOOR_POINTS {
        return low_score_rating(points, level, 100.0);
    }
    let bonus = truncate(lerp(f64::from(points), &TECHNICAL_BONUS), 100.0);
    (level + bonus).max(0.0)
}

/// Frame sizes for [`ClassicCalculator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicConfig {
    pub best: usize,
    pub new: usize,
    pub naive: usize,
    pub recent_top: usize,
    pub recent_max: usize,
}

impl Default for ClassicConfig {
    fn default() -> Self {
        Self {
            best: 30,
            new: 15,
            naive: 45,
            recent_top: 10,
            recent_max: 30,
        }
    }
}

type ScoreUndo<X> = BestUndo<ChartId, RatedScore<X>>;

/// Composite inverse of one [`ClassicCalculator`] score. `None` parts left their frame untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicUndo<X> {
    pub slot: Slot,
    pub slot_undo: Option<ScoreUndo<X>>,
    pub naive: Option<ScoreUndo<X>>,
    pub recent: Option<RecentUndo<ChartId, RatedScore<X>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicSnapshot<X> {
    pub best: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub new: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub naive: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub recent: AgeFrameSnapshot<ChartId, RatedScore<X>>,
}

/// Calculator for the pre-Refresh ruleset.
///
/// Every ranked score is routed into the best or new frame (by the chart's
/// `is_new` flag), always into the unconstrained naive frame, and into the recent
/// window unless the chart is recency-excluded.
pub struct ClassicCalculator<L, C, X = ()> {
    lookup: L,
    config: ClassicConfig,
    best: BestFrame<ChartId, RatedScore<X>>,
    new: BestFrame<ChartId, RatedScore<X>>,
    naive: BestFrame<ChartId, RatedScore<X>>,
    recent: RecentFrame<ChartId, RatedScore<X>>,
    _chart: PhantomData<fn(&C)>,
}

impl<L, C, X> ClassicCalculator<L, C, X>
where
    L: ChartLookup<C>,
    X: Clone + Debug,
{
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, ClassicConfig::default())
    }

    pub fn with_config(lookup: L, config: ClassicConfig) -> Self {
        Self {
            lookup,
            best: BestFrame::new(config.best),
            new: BestFrame::new(config.new),
            naive: BestFrame::new(config.naive),
            recent: RecentFrame::new(config.recent_top, config.recent_max),
            config,
            _chart: PhantomData,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn config(&self) -> &ClassicConfig {
        &self.config
    }

    pub fn best(&self) -> &BestFrame<ChartId, RatedScore<X>> {
        &self.best
    }

    pub fn new_frame(&self) -> &BestFrame<ChartId, RatedScore<X>> {
        &self.new
    }

    pub fn naive(&self) -> &BestFrame<ChartId, RatedScore<X>> {
        &self.naive
    }

    pub fn recent(&self) -> &RecentFrame<ChartId, RatedScore<X>> {
        &self.recent
    }

    /// Rates a score without recording it.
    pub fn rate(&self, points: u32, chart: &C) -> Option<(ChartInfo, f64)> {
        let info = self.lookup.chart_info(chart)?;
        let rating = score_rating(points, info.level);
        Some((info, rating))
    }

    /// Best + new + recent, normalized by the three frame sizes.
    pub fn overall_rating(&self) -> f64 {
        ratio(
            self.best.total_rating() + self.new.total_rating() + self.recent.total_rating(),
            self.config.best + self.config.new + self.config.recent_top,
        )
    }

    pub fn overall_no_recent_rating(&self) -> f64 {
        ratio(
            self.best.total_rating() + self.new.total_rating(),
            self.config.best + self.config.new,
        )
    }

    pub fn overall_naive_rating(&self) -> f64 {
        ratio(self.naive.total_rating(), self.config.naive)
    }

    /// Substitutes a hypothetical recent total until [`Self::unpin_recent_rating`].
    pub fn pin_recent_rating(&mut self, total: f64) {
        self.recent.pin_rating(total);
    }

    pub fn unpin_recent_rating(&mut self) {
        self.recent.unpin();
    }

    fn slot_frame(&mut self, slot: Slot) -> &mut BestFrame<ChartId, RatedScore<X>> {
        match slot {
            Slot::Best => &mut self.best,
            Slot::New => &mut self.new,
        }
    }
}

impl<L, C, X> Calculator for ClassicCalculator<L, C, X>
where
    L: ChartLookup<C>,
    X: Clone + Debug,
{
    type Score = ScoreInput<X>;
    type Chart = C;
    type Undo = ClassicUndo<X>;
    type Snapshot = ClassicSnapshot<X>;

    fn add_score(&mut self, score: &ScoreInput<X>, chart: &C) -> Option<ClassicUndo<X>> {
        let Some((info, rating)) = self.rate(score.points, chart) else {
            tracing::debug!(points = score.points, "unranked score: chart not found");
            return None;
        };
        let entry = RatedScore {
            points: score.points,
            rating,
            extra: score.extra.clone(),
        };

        let slot = if info.is_new { Slot::New } else { Slot::Best };
        let slot_undo = self
            .slot_frame(slot)
            .upsert(info.chart_id.clone(), rating, entry.clone());
        let naive = self.naive.upsert(info.chart_id.clone(), rating, entry.clone());
        let recent = self
            .recent
            .offer(info.chart_id, rating, entry, info.recency_excluded);

        Some(ClassicUndo {
            slot,
            slot_undo,
            naive,
            recent,
        })
    }

    fn undo_score(&mut self, undo: &ClassicUndo<X>) {
        if let Some(recent) = &undo.recent {
            self.recent.undo(recent);
        }
        if let Some(naive) = &undo.naive {
            self.naive.undo(naive);
        }
        if let Some(slot_undo) = &undo.slot_undo {
            self.slot_frame(undo.slot).undo(slot_undo);
        }
    }

    fn make_snapshot(&self) -> ClassicSnapshot<X> {
        ClassicSnapshot {
            best: self.best.make_snapshot(),
            new: self.new.make_snapshot(),
            naive: self.naive.make_snapshot(),
            recent: self.recent.make_snapshot(),
        }
    }

    fn load_snapshot(&mut self, snapshot: &ClassicSnapshot<X>) {
        self.best.load_snapshot(&snapshot.best);
        self.new.load_snapshot(&snapshot.new);
        self.naive.load_snapshot(&snapshot.naive);
        self.recent.load_snapshot(&snapshot.recent);
    }
}

pub(crate) fn ratio(total: f64, size: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    total / size as f64
}
