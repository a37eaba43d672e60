//! Seekable replay of a fixed score sequence through calculators.

use serde::{Deserialize, Serialize};

/// Multi-era history.
pub mod era;
/// Single-calculator seekable history.
pub mod seekable;
/// Unified era/score index translation.
pub mod timeline;

pub use era::{Era, VersionChangeHistory};
pub use seekable::{HistoryEvent, RatingHistory};
pub use timeline::{Position, Timeline};

/// Errors returned by history navigation and construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("cannot seek {delta} from index {from}: before the first position")]
    SeekBeforeStart { from: usize, delta: isize },
    #[error("index {index} is past the end of the history (last index {last})")]
    OutOfRange { index: usize, last: usize },
    #[error("snapshot interval must be at least 1")]
    InvalidSnapshotInterval,
    #[error("a version change history needs at least one era")]
    NoEras,
    #[error("era {index} starts before the era preceding it")]
    UnorderedEras { index: usize },
}

/// Tuning for [`RatingHistory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// A full calculator snapshot is kept every this many events.
    pub snapshot_interval: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { snapshot_interval: 100 }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.snapshot_interval == 0 {
            return Err(HistoryError::InvalidSnapshotInterval);
        }
        Ok(())
    }
}
