#![allow(dead_code)]

use serde::Deserialize;

use ratinglog::{
    calc::{Calculator, ScoreInput, classic::ClassicCalculator},
    chart::{BasicChart, BasicChartDb},
    history::HistoryEvent,
};

pub type Classic = ClassicCalculator<BasicChartDb, BasicChart>;
pub type ClassicEvent = HistoryEvent<ScoreInput, BasicChart>;

#[derive(Debug, Deserialize)]
struct BarrageRow {
    points: u32,
    chart: String,
    level: f64,
    is_new: bool,
}

/// 80 scores over 50 charts, with repeats, improvements and both new and old content.
pub fn barrage() -> Vec<ClassicEvent> {
    let rows: Vec<BarrageRow> =
        serde_json::from_str(include_str!("../fixtures/barrage.json")).expect("barrage fixture");
    rows.into_iter()
        .map(|row| {
            HistoryEvent::new(
                ScoreInput::new(row.points),
                BasicChart::new(row.chart, row.level).with_new(row.is_new),
            )
        })
        .collect()
}

pub fn classic() -> Classic {
    ClassicCalculator::new(BasicChartDb)
}

/// `out[i]` is the overall rating after the first `i` events.
pub fn overall_by_replay(events: &[ClassicEvent]) -> Vec<f64> {
    let mut calc = classic();
    let mut out = vec![calc.overall_rating()];
    for event in events {
        calc.add_score(&event.score, &event.chart);
        out.push(calc.overall_rating());
    }
    out
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
