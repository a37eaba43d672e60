//! Chart metadata lookup consumed by the calculators.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::{ChartId, Difficulty};

/// Metadata needed to rate a score on one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInfo {
    /// Stable chart identifier stored inside frames.
    pub chart_id: ChartId,
    /// Internal (decimal) chart level.
    pub level: f64,
    /// True when the chart counts towards the "new" frame.
    pub is_new: bool,
    /// True when scores on this chart never enter the recent window.
    pub recency_excluded: bool,
    /// Maximum platinum score on this chart.
    pub max_platinum: u32,
    /// Number of bells on this chart.
    pub max_bells: u32,
}

/// Read-only chart lookup. `None` means the chart is unknown and the score is unranked.
pub trait ChartLookup<C: ?Sized> {
    /// Resolves a chart reference to its metadata.
    fn chart_info(&self, chart: &C) -> Option<ChartInfo>;
}

impl<C: ?Sized, L: ChartLookup<C> + ?Sized> ChartLookup<C> for &L {
    fn chart_info(&self, chart: &C) -> Option<ChartInfo> {
        (**self).chart_info(chart)
    }
}

impl<C: ?Sized, L: ChartLookup<C> + ?Sized> ChartLookup<C> for Arc<L> {
    fn chart_info(&self, chart: &C) -> Option<ChartInfo> {
        (**self).chart_info(chart)
    }
}

/// Self-describing chart reference carrying its own metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicChart {
    pub id: ChartId,
    pub level: f64,
    pub difficulty: Difficulty,
    pub max_platinum: u32,
    pub bells: u32,
    pub is_new: bool,
}

impl BasicChart {
    /// MASTER chart with 100 bells and a platinum maximum of 100.
    pub fn new(id: impl Into<ChartId>, level: f64) -> Self {
        Self {
            id: id.into(),
            level,
            difficulty: Difficulty::Master,
            max_platinum: 100,
            bells: 100,
            is_new: false,
        }
    }

    pub fn with_new(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_maxima(mut self, max_platinum: u32, bells: u32) -> Self {
        self.max_platinum = max_platinum;
        self.bells = bells;
        self
    }
}

/// Lookup that reads metadata straight out of a [`BasicChart`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicChartDb;

impl ChartLookup<BasicChart> for BasicChartDb {
    fn chart_info(&self, chart: &BasicChart) -> Option<ChartInfo> {
        Some(ChartInfo {
            chart_id: chart.id.clone(),
            level: chart.level,
            is_new: chart.is_new,
            recency_excluded: chart.difficulty == Difficulty::Lunatic,
            max_platinum: chart.max_platinum,
            max_bells: chart.bells,
        })
    }
}

/// Id-keyed chart table.
///
/// Frames store only [`ChartId`]s; display code resolves them here on demand.
#[derive(Debug, Clone, Default)]
pub struct ChartTable {
    charts: HashMap<ChartId, ChartInfo>,
}

impl ChartTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a chart, returning the previous entry.
    pub fn insert(&mut self, info: ChartInfo) -> Option<ChartInfo> {
        self.charts.insert(info.chart_id.clone(), info)
    }

    pub fn get(&self, id: &ChartId) -> Option<&ChartInfo> {
        self.charts.get(id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl FromIterator<ChartInfo> for ChartTable {
    fn from_iter<I: IntoIterator<Item = ChartInfo>>(iter: I) -> Self {
        let mut table = Self::new();
        for info in iter {
            table.insert(info);
        }
        table
    }
}

impl ChartLookup<ChartId> for ChartTable {
    fn chart_info(&self, chart: &ChartId) -> Option<ChartInfo> {
        self.charts.get(chart).cloned()
    }
}

impl ChartLookup<str> for ChartTable {
    fn chart_info(&self, chart: &str) -> Option<ChartInfo> {
        self.charts.get(&ChartId::new(chart)).cloned()
    }
}
