//! Per-chart personal bests, replayable like any other calculator.

use std::marker::PhantomData;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{chart::ChartLookup, frame::Points, types::ChartId};

use super::Calculator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBestUndo<S> {
    pub chart_id: ChartId,
    pub previous: Option<S>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBestsSnapshot<S> {
    pub bests: HashMap<ChartId, S>,
}

/// Best score by points for every chart played so far.
pub struct PersonalBests<L, C, S> {
    lookup: L,
    bests: HashMap<ChartId, S>,
    _chart: PhantomData<fn(&C)>,
}

impl<L, C, S> PersonalBests<L, C, S>
where
    L: ChartLookup<C>,
    S: Points + Clone,
{
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            bests: HashMap::new(),
            _chart: PhantomData,
        }
    }

    pub fn get(&self, chart_id: &ChartId) -> Option<&S> {
        self.bests.get(chart_id)
    }

    pub fn len(&self) -> usize {
        self.bests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChartId, &S)> {
        self.bests.iter()
    }
}

impl<L, C, S> Calculator for PersonalBests<L, C, S>
where
    L: ChartLookup<C>,
    S: Points + Clone,
{
    type Score = S;
    type Chart = C;
    type Undo = Option<PersonalBestUndo<S>>;
    type Snapshot = PersonalBestsSnapshot<S>;

    /// `Some(None)` means the chart is known but the score did not beat the stored best.
    fn add_score(&mut self, score: &S, chart: &C) -> Option<Self::Undo> {
        let info = self.lookup.chart_info(chart)?;
        let improved = self
            .bests
            .get(&info.chart_id)
            .is_none_or(|best| best.points() < score.points());
        if !improved {
            return Some(None);
        }
        let previous = self.bests.insert(info.chart_id.clone(), score.clone());
        Some(Some(PersonalBestUndo {
            chart_id: info.chart_id,
            previous,
        }))
    }

    fn undo_score(&mut self, undo: &Self::Undo) {
        let Some(undo) = undo else {
            return;
        };
        match &undo.previous {
            Some(previous) => {
                self.bests.insert(undo.chart_id.clone(), previous.clone());
            }
            None => {
                self.bests.remove(&undo.chart_id);
            }
        }
    }

    fn make_snapshot(&self) -> Self::Snapshot {
        PersonalBestsSnapshot {
            bests: self.bests.clone(),
        }
    }

    fn load_snapshot(&mut self, snapshot: &Self::Snapshot) {
        self.bests.clone_from(&snapshot.bests);
    }
}
