//! Re:Fresh ruleset: best 50 + new 10 + platinum 50, with lamp bonuses.

use std::{fmt::Debug, marker::PhantomData};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    chart::{ChartInfo, ChartLookup},
    frame::best::{BestFrame, BestFrameSnapshot, BestUndo},
    types::{BellLamp, ChartId, ClearLamp, GradeLamp, Lamps},
};

use super::{
    Calculator, RatedScore, Slot,
    curve::{RATING_FLOOR_POINTS, grade_lamp, lerp, low_score_rating, truncate},
};

const TECHNICAL_BONUS: [(f64, f64); 7] = [
    (1_010_000.0, 2.0),
    (1_007_500.0, 1.75),
    (1_000_000.0, 1.25),
    (990_000.0, 0.75),
    (970_000.0, 0.0),
    (900_000.0, -4.0),
    (800_000.0, -6.0),
];

pub fn bell_bonus(lamp: BellLamp) -> f64 {
    match lamp {
        BellLamp::None => 0.0,
        BellLamp::FullBell => 0.05,
    }
}

pub fn clear_bonus(lamp: ClearLamp) -> f64 {
    match lamp {
        ClearLamp::None => 0.0,
        ClearLamp::FullCombo => 0.1,
        ClearLamp::AllBreak => 0.3,
        ClearLamp::AllCriticalBreak => 0.35,
    }
}

pub fn grade_bonus(lamp: GradeLamp) -> f64 {
    match lamp {
        GradeLamp::None | GradeLamp::S => 0.0,
        GradeLamp::SS => 0.1,
        GradeLamp::SSS => 0.2,
        GradeLamp::SSSPlus => 0.3,
    }
}

/// Rating of one score under the best lamps seen so far, truncated to 0.001.
pub fn score_rating(points: u32, lamps: &Lamps, level: f64) -> f64 {
    if points < RATING_FLOOR_POINTS {
        return low_score_rating(points, level, 1000.0);
    }
    let bonus = truncate(lerp(f64::from(points), &TECHNICAL_BONUS), 1000.0);
    let lamp_bonus = bell_bonus(lamps.bell) + clear_bonus(lamps.clear) + grade_bonus(lamps.grade);
    (level + bonus + lamp_bonus).max(0.0)
}

/// Platinum rating: up to five stars above 93% of the platinum maximum.
pub fn platinum_rating(platinum: u32, max_platinum: u32, level: f64) -> f64 {
    if max_platinum == 0 {
        return 0.0;
    }
    let percentage = u64::from(platinum) * 100 / u64::from(max_platinum);
    let stars = percentage.saturating_sub(93).min(5) as f64;
    stars * level * level / 1000.0
}

/// How the lamps of a play are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    /// Raw counts; lamps are derived from them.
    Counts {
        bells: u32,
        critical: u32,
        breaks: u32,
        hits: u32,
        misses: u32,
    },
    /// Lamps supplied directly. A missing grade is derived from the points.
    Lamps {
        bell: BellLamp,
        clear: ClearLamp,
        grade: Option<GradeLamp>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshInput<X = ()> {
    pub points: u32,
    pub platinum: u32,
    pub judgement: Judgement,
    pub extra: X,
}

impl RefreshInput<()> {
    pub fn new(points: u32, platinum: u32, judgement: Judgement) -> Self {
        Self {
            points,
            platinum,
            judgement,
            extra: (),
        }
    }
}

impl<X> RefreshInput<X> {
    /// Lamps earned by this play alone.
    pub fn lamps(&self, info: &ChartInfo) -> Lamps {
        match &self.judgement {
            Judgement::Counts {
                bells,
                breaks,
                hits,
                misses,
                ..
            } => {
                let clear = match (*misses, *hits, *breaks) {
                    (0, 0, 0) => ClearLamp::AllCriticalBreak,
                    (0, 0, _) => ClearLamp::AllBreak,
                    (0, _, _) => ClearLamp::FullCombo,
                    _ => ClearLamp::None,
                };
                let bell = if *bells == info.max_bells {
                    BellLamp::FullBell
                } else {
                    BellLamp::None
                };
                Lamps {
                    bell,
                    clear,
                    grade: grade_lamp(self.points),
                }
            }
            Judgement::Lamps { bell, clear, grade } => Lamps {
                bell: *bell,
                clear: *clear,
                grade: grade.unwrap_or_else(|| grade_lamp(self.points)),
            },
        }
    }
}

/// Payload stored in the platinum frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatinumScore<X = ()> {
    pub platinum: u32,
    pub rating: f64,
    pub extra: X,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub best: usize,
    pub new: usize,
    pub naive: usize,
    pub platinum: usize,
    /// Every frame total is divided by this value, regardless of frame size.
    pub divisor: f64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            best: 50,
            new: 10,
            naive: 60,
            platinum: 50,
            divisor: 50.0,
        }
    }
}

/// Lamps of `chart_id` before a play raised them; `None` when the chart had no lamps yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LampUndo {
    pub chart_id: ChartId,
    pub previous: Option<Lamps>,
}

type ScoreUndo<X> = BestUndo<ChartId, RatedScore<X>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshUndo<X> {
    pub lamps: Option<LampUndo>,
    pub slot: Slot,
    pub slot_undo: Option<ScoreUndo<X>>,
    pub naive: Option<ScoreUndo<X>>,
    pub platinum: Option<BestUndo<ChartId, PlatinumScore<X>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSnapshot<X> {
    pub best: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub new: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub naive: BestFrameSnapshot<ChartId, RatedScore<X>>,
    pub platinum: BestFrameSnapshot<ChartId, PlatinumScore<X>>,
    pub lamps: HashMap<ChartId, Lamps>,
}

/// Calculator for the Re:Fresh ruleset.
///
/// Lamps are tracked per chart and only ever improve; the rating of a play uses
/// the best lamps achieved on that chart so far.
pub struct RefreshCalculator<L, C, X = ()> {
    lookup: L,
    config: RefreshConfig,
    best: BestFrame<ChartId, RatedScore<X>>,
    new: BestFrame<ChartId, RatedScore<X>>,
    naive: BestFrame<ChartId, RatedScore<X>>,
    platinum: BestFrame<ChartId, PlatinumScore<X>>,
    lamps: HashMap<ChartId, Lamps>,
    _chart: PhantomData<fn(&C)>,
}

impl<L, C, X> RefreshCalculator<L, C, X>
where
    L: ChartLookup<C>,
    X: Clone + Debug,
{
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, RefreshConfig::default())
    }

    pub fn with_config(lookup: L, config: RefreshConfig) -> Self {
        Self {
            lookup,
            best: BestFrame::new(config.best),
            new: BestFrame::new(config.new),
            naive: BestFrame::new(config.naive),
            platinum: BestFrame::new(config.platinum),
            lamps: HashMap::new(),
            config,
            _chart: PhantomData,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn config(&self) -> &RefreshConfig {
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

    pub fn platinum(&self) -> &BestFrame<ChartId, PlatinumScore<X>> {
        &self.platinum
    }

    /// Best lamps recorded for a chart.
    pub fn lamps(&self, chart_id: &ChartId) -> Option<&Lamps> {
        self.lamps.get(chart_id)
    }

    pub fn overall_rating(&self) -> f64 {
        let total =
            self.best.total_rating() + self.new.total_rating() + self.platinum.total_rating();
        total / self.config.divisor
    }

    pub fn overall_naive_rating(&self) -> f64 {
        (self.naive.total_rating() + self.platinum.total_rating()) / self.config.divisor
    }

    /// Merges `earned` into the chart's lamps, keeping the better lamp of each kind.
    fn raise_lamps(&mut self, chart_id: &ChartId, earned: Lamps) -> (Lamps, Option<LampUndo>) {
        let Some(current) = self.lamps.get_mut(chart_id) else {
            self.lamps.insert(chart_id.clone(), earned);
            return (
                earned,
                Some(LampUndo {
                    chart_id: chart_id.clone(),
                    previous: None,
                }),
            );
        };

        let merged = Lamps {
            bell: current.bell.max(earned.bell),
            clear: current.clear.max(earned.clear),
            grade: current.grade.max(earned.grade),
        };
        if merged == *current {
            return (merged, None);
        }
        let previous = std::mem::replace(current, merged);
        (
            merged,
            Some(LampUndo {
                chart_id: chart_id.clone(),
                previous: Some(previous),
            }),
        )
    }

    fn undo_lamps(&mut self, undo: &LampUndo) {
        match undo.previous {
            Some(previous) => {
                self.lamps.insert(undo.chart_id.clone(), previous);
            }
            None => {
                self.lamps.remove(&undo.chart_id);
            }
        }
    }

    fn slot_frame(&mut self, slot: Slot) -> &mut BestFrame<ChartId, RatedScore<X>> {
        match slot {
            Slot::Best => &mut self.best,
            Slot::New => &mut self.new,
        }
    }
}

impl<L, C, X> Calculator for RefreshCalculator<L, C, X>
where
    L: ChartLookup<C>,
    X: Clone + Debug,
{
    type Score = RefreshInput<X>;
    type Chart = C;
    type Undo = RefreshUndo<X>;
    type Snapshot = RefreshSnapshot<X>;

    fn add_score(&mut self, score: &RefreshInput<X>, chart: &C) -> Option<RefreshUndo<X>> {
        let Some(info) = self.lookup.chart_info(chart) else {
            tracing::debug!(points = score.points, "unranked score: chart not found");
            return None;
        };

        let (lamps, lamps_undo) = self.raise_lamps(&info.chart_id, score.lamps(&info));
        let rating = score_rating(score.points, &lamps, info.level);
        let entry = RatedScore {
            points: score.points,
            rating,
            extra: score.extra.clone(),
        };
        let platinum_entry = PlatinumScore {
            platinum: score.platinum,
            rating: platinum_rating(score.platinum, info.max_platinum, info.level),
            extra: score.extra.clone(),
        };

        let slot = if info.is_new { Slot::New } else { Slot::Best };
        let slot_undo = self
            .slot_frame(slot)
            .upsert(info.chart_id.clone(), rating, entry.clone());
        let naive = self.naive.upsert(info.chart_id.clone(), rating, entry);
        let platinum = self
            .platinum
            .upsert(info.chart_id, platinum_entry.rating, platinum_entry);

        Some(RefreshUndo {
            lamps: lamps_undo,
            slot,
            slot_undo,
            naive,
            platinum,
        })
    }

    fn undo_score(&mut self, undo: &RefreshUndo<X>) {
        if let Some(platinum) = &undo.platinum {
            self.platinum.undo(platinum);
        }
        if let Some(naive) = &undo.naive {
            self.naive.undo(naive);
        }
        if let Some(slot_undo) = &undo.slot_undo {
            self.slot_frame(undo.slot).undo(slot_undo);
        }
        if let Some(lamps) = &undo.lamps {
            self.undo_lamps(lamps);
        }
    }

    fn make_snapshot(&self) -> RefreshSnapshot<X> {
        RefreshSnapshot {
            best: self.best.make_snapshot(),
            new: self.new.make_snapshot(),
            naive: self.naive.make_snapshot(),
            platinum: self.platinum.make_snapshot(),
            lamps: self.lamps.clone(),
        }
    }

    fn load_snapshot(&mut self, snapshot: &RefreshSnapshot<X>) {
        self.best.load_snapshot(&snapshot.best);
        self.new.load_snapshot(&snapshot.new);
        self.naive.load_snapshot(&snapshot.naive);
        self.platinum.load_snapshot(&snapshot.platinum);
        self.lamps.clone_from(&snapshot.lamps);
    }
}
