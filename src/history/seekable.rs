//! History over one calculator with lazy exploration, undo, and snapshot checkpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calc::Calculator;

use super::{HistoryConfig, HistoryError};

/// One entry of the score sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent<S, Ch> {
    pub score: S,
    pub chart: Ch,
}

impl<S, Ch> HistoryEvent<S, Ch> {
    pub fn new(score: S, chart: Ch) -> Self {
        Self { score, chart }
    }
}

type Events<C> = Arc<[HistoryEvent<<C as Calculator>::Score, <C as Calculator>::Chart>]>;

/// Replays a fixed event sequence against one calculator.
///
/// Position `i` (in `0..=len()`) means exactly the first `i` events are applied.
/// Positions up to [`RatingHistory::last_explored_index`] have a cached undo token;
/// beyond it, events are applied for the first time and their tokens recorded.
/// A snapshot is kept every `snapshot_interval` positions, so any explored position
/// is reachable by undoing from the current position or by loading the nearest
/// earlier snapshot and replaying, whichever touches fewer events.
pub struct RatingHistory<C: Calculator> {
    calc: C,
    events: Events<C>,
    // undos[i] reverts events[i]
    undos: Vec<Option<C::Undo>>,
    // snapshots[k] is the state at position k * snapshot_interval
    snapshots: Vec<C::Snapshot>,
    current: usize,
    config: HistoryConfig,
}

impl<C: Calculator> RatingHistory<C> {
    /// Builds a history with the default [`HistoryConfig`]. `calc` must be freshly constructed.
    pub fn new(calc: C, events: impl Into<Events<C>>) -> Self {
        let config = HistoryConfig::default();
        Self::build(calc, events.into(), config)
    }

    pub fn with_config(
        calc: C,
        events: impl Into<Events<C>>,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        config.validate()?;
        Ok(Self::build(calc, events.into(), config))
    }

    fn build(calc: C, events: Events<C>, config: HistoryConfig) -> Self {
        let snapshots = vec![calc.make_snapshot()];
        Self {
            undos: Vec::with_capacity(events.len()),
            calc,
            events,
            snapshots,
            current: 0,
            config,
        }
    }

    /// Number of events; also the last valid position.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Highest position ever reached.
    pub fn last_explored_index(&self) -> usize {
        self.undos.len()
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn events(&self) -> &[HistoryEvent<C::Score, C::Chart>] {
        &self.events
    }

    /// Calculator state at the current position.
    pub fn calc(&self) -> &C {
        &self.calc
    }

    /// Mutable access for non-structural tweaks such as pinning a hypothetical rating.
    ///
    /// Adding or undoing scores through this reference desynchronizes the history.
    pub fn calc_mut(&mut self) -> &mut C {
        &mut self.calc
    }

    pub fn into_calculator(self) -> C {
        self.calc
    }

    /// Undo token recorded for the event that moved the history from `index - 1` to `index`.
    ///
    /// `None` at position 0, past the explored range, or when the event was unranked.
    pub fn output_at(&self, index: usize) -> Option<&C::Undo> {
        self.undos.get(index.checked_sub(1)?)?.as_ref()
    }

    /// Moves the calculator to position `index`.
    pub fn goto(&mut self, index: usize) -> Result<(), HistoryError> {
        if index > self.events.len() {
            return Err(HistoryError::OutOfRange {
                index,
                last: self.events.len(),
            });
        }
        if index == self.current {
            return Ok(());
        }

        let explored = self.last_explored_index();
        if index > explored {
            self.travel(explored);
            self.explore_to(index);
        } else {
            self.travel(index);
        }
        Ok(())
    }

    /// Moves relative to the current position.
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

    fn travel(&mut self, index: usize) {
        if index == self.current {
            return;
        }

        let interval = self.config.snapshot_interval;
        let slot = (index / interval).min(self.snapshots.len() - 1);
        let snapshot_index = slot * interval;
        let direct = self.current.abs_diff(index);
        let via_snapshot = index - snapshot_index;
        tracing::trace!(
            from = self.current,
            to = index,
            direct,
            via_snapshot,
            "planning history seek"
        );

        if via_snapshot <= direct {
            self.calc.load_snapshot(&self.snapshots[slot]);
            self.current = snapshot_index;
        }

        if index < self.current {
            for undo in self.undos[index..self.current].iter().rev().flatten() {
                self.calc.undo_score(undo);
            }
        } else {
            for event in &self.events[self.current..index] {
                let _ = self.calc.add_score(&event.score, &event.chart);
            }
        }
        self.current = index;
    }

    fn explore_to(&mut self, index: usize) {
        let interval = self.config.snapshot_interval;
        while self.current < index {
            let event = &self.events[self.current];
            let undo = self.calc.add_score(&event.score, &event.chart);
            self.undos.push(undo);
            self.current += 1;

            if self.current % interval == 0 {
                tracing::debug!(index = self.current, "captured history snapshot");
                self.snapshots.push(self.calc.make_snapshot());
            }
        }
    }
}
