//! History spanning several calculator eras (game versions).

use std::sync::Arc;

use crate::{
    calc::Calculator,
    order::{insertion_index_asc, last_region_start},
    types::TimestampMs,
};

use super::{
    HistoryConfig, HistoryError,
    seekable::{HistoryEvent, RatingHistory},
    timeline::{Position, Timeline},
};

/// A calculator and the moment its ruleset takes effect.
pub struct Era<C> {
    pub calculator: C,
    pub starts_at: TimestampMs,
}

impl<C> Era<C> {
    pub fn new(calculator: C, starts_at: TimestampMs) -> Self {
        Self { calculator, starts_at }
    }
}

/// One [`RatingHistory`] per era over the same score sequence, navigated through a
/// unified index that also stops once at every era change.
///
/// At an era-change marker the new era's calculator is shown with exactly the scores
/// played before the change, so the effect of the ruleset switch is visible on its own.
pub struct VersionChangeHistory<C: Calculator> {
    histories: Vec<RatingHistory<C>>,
    era_starts: Vec<TimestampMs>,
    timestamps: Vec<TimestampMs>,
    timeline: Timeline,
    current: usize,
}

impl<C: Calculator> VersionChangeHistory<C> {
    /// `events` must be sorted by timestamp and `eras` by start time. A score whose
    /// timestamp equals an era start belongs to that era.
    pub fn new(
        eras: Vec<Era<C>>,
        events: impl Into<Arc<[HistoryEvent<C::Score, C::Chart>]>>,
        timestamp: impl Fn(&C::Score) -> TimestampMs,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        if eras.is_empty() {
            return Err(HistoryError::NoEras);
        }
        if let Some(pos) = eras.windows(2).position(|w| w[1].starts_at < w[0].starts_at) {
            return Err(HistoryError::UnorderedEras { index: pos + 1 });
        }
        config.validate()?;

        let events = events.into();
        let timestamps: Vec<TimestampMs> = events.iter().map(|e| timestamp(&e.score)).collect();
        let era_starts: Vec<TimestampMs> = eras.iter().map(|era| era.starts_at).collect();
        let boundaries = era_starts[1..]
            .iter()
            .map(|start| insertion_index_asc(&timestamps, start, |t| *t))
            .collect();
        let timeline = Timeline::new(boundaries);
        tracing::debug!(
            eras = era_starts.len(),
            events = events.len(),
            boundaries = ?timeline.boundaries(),
            "built version change timeline"
        );

        let histories = eras
            .into_iter()
            .map(|era| {
                RatingHistory::with_config(era.calculator, Arc::clone(&events), config.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            histories,
            era_starts,
            timestamps,
            timeline,
            current: 0,
        })
    }

    /// Last valid unified index: every score plus one marker per era change.
    pub fn last_index(&self) -> usize {
        self.timeline.last_index(self.timestamps.len())
    }

    pub fn event_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn position(&self) -> Position {
        self.timeline.locate(self.current)
    }

    pub fn era_index(&self) -> usize {
        self.position().era
    }

    pub fn score_index(&self) -> usize {
        self.position().score_index
    }

    pub fn at_boundary(&self) -> bool {
        self.position().at_boundary
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Unified indexes of the era-change markers.
    pub fn boundary_indexes(&self) -> Vec<usize> {
        self.timeline.boundary_indexes()
    }

    pub fn histories(&self) -> &[RatingHistory<C>] {
        &self.histories
    }

    /// Calculator of the era at the current index.
    pub fn calc(&self) -> &C {
        self.histories[self.era_index()].calc()
    }

    /// Calculator of the era that `index` falls into, in whatever state it currently is.
    pub fn calc_at(&self, index: usize) -> Result<&C, HistoryError> {
        self.check(index)?;
        let era = self.timeline.locate(index).era;
        Ok(self.histories[era].calc())
    }

    /// Era in effect at `ts`, or `None` before the first era starts.
    pub fn era_at_time(&self, ts: TimestampMs) -> Option<usize> {
        last_region_start(&self.era_starts, &ts, |start| *start)
    }

    /// Era start at a marker, otherwise the timestamp of the latest applied score.
    pub fn current_timestamp(&self) -> Option<TimestampMs> {
        let pos = self.position();
        if pos.at_boundary {
            return Some(self.era_starts[pos.era]);
        }
        let last = pos.score_index.checked_sub(1)?;
        self.timestamps.get(last).copied()
    }

    /// Undo token of the score that produced `index`; `None` at markers.
    pub fn output_at(&self, index: usize) -> Option<&C::Undo> {
        let pos = self.timeline.locate(index);
        if pos.at_boundary {
            return None;
        }
        self.histories.get(pos.era)?.output_at(pos.score_index)
    }

    pub fn goto(&mut self, index: usize) -> Result<(), HistoryError> {
        self.check(index)?;
        let pos = self.timeline.locate(index);
        self.histories[pos.era].goto(pos.score_index)?;
        self.current = index;
        Ok(())
    }

    pub fn seek(&mut self, delta: isize) -> Result<(), HistoryError> {
        let index = self
            .current
            .checked_add_signed(delta)
            .ok_or(HistoryError::SeekBeforeStart {
                from: self.current,
                delta,
            })?;
        self.goto(index)
    }

    fn check(&self, index: usize) -> Result<(), HistoryError> {
        let last = self.last_index();
        if index > last {
            return Err(HistoryError::OutOfRange { index, last });
        }
        Ok(())
    }
}
