//! Shared primitive IDs and game-related enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Millisecond timestamp used to order scores and era boundaries.
pub type TimestampMs = i64;

/// Stable, opaque chart identifier stored inside frames.
///
/// Frames only ever hold this id; chart metadata is resolved again through a
/// [`crate::chart::ChartLookup`] when it is needed for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(pub String);

impl ChartId {
    /// Builds an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Chart difficulty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// BASIC.
    Basic,
    /// ADVANCED.
    Advanced,
    /// EXPERT.
    Expert,
    /// MASTER.
    Master,
    /// LUNATIC; never counted towards the recent window.
    Lunatic,
}

/// Full-bell lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum BellLamp {
    /// No lamp.
    #[default]
    None,
    /// Full bell.
    FullBell,
}

/// Clear lamp, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ClearLamp {
    /// No lamp.
    #[default]
    None,
    /// Full combo.
    FullCombo,
    /// All break.
    AllBreak,
    /// All critical break.
    AllCriticalBreak,
}

/// Grade lamp derived from the points total, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GradeLamp {
    /// Below S.
    #[default]
    None,
    /// S.
    S,
    /// SS.
    SS,
    /// SSS.
    SSS,
    /// SSS+.
    SSSPlus,
}

/// The set of lamps shown for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lamps {
    /// Bell lamp.
    pub bell: BellLamp,
    /// Clear lamp.
    pub clear: ClearLamp,
    /// Grade lamp.
    pub grade: GradeLamp,
}
