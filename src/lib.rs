//! Versioned rating ledger over a long, ordered sequence of game scores.
//!
//! Scores are routed into bounded [`frame`]s by a [`calc::Calculator`]; every
//! mutation yields an exact undo token, and [`history`] uses those tokens plus
//! periodic snapshots to seek anywhere in the sequence cheaply, optionally across
//! several rule-set eras.
//!
//! # Examples
//!
//! ```
//! use ratinglog::{
//!     calc::{ScoreInput, classic::ClassicCalculator},
//!     chart::{BasicChart, BasicChartDb},
//!     history::{HistoryEvent, RatingHistory},
//! };
//!
//! let events: Vec<_> = (0..250u32)
//!     .map(|i| {
//!         let chart = BasicChart::new(format!("{}", i % 40), 12.0 + f64::from(i % 7) * 0.5);
//!         HistoryEvent::new(ScoreInput::new(990_000 + i * 50), chart)
//!     })
//!     .collect();
//!
//! let calc: ClassicCalculator<_, BasicChart> = ClassicCalculator::new(BasicChartDb);
//! let mut history = RatingHistory::new(calc, events);
//!
//! history.goto(200)?;
//! let at_200 = history.calc().overall_rating();
//! history.goto(50)?;
//! history.goto(200)?;
//! assert!((history.calc().overall_rating() - at_200).abs() < 1e-9);
//! # Ok::<(), ratinglog::history::HistoryError>(())
//! ```

/// Calculators, rating formulas, and the calculator trait.
pub mod calc;
/// Chart metadata lookup.
pub mod chart;
/// Bounded and age-ordered rated frames.
pub mod frame;
/// Seekable histories.
pub mod history;
/// Binary-search helpers.
pub mod order;
/// Shared primitive types and enums.
pub mod types;
