mod common;

use common::{Classic, assert_close, barrage, classic};
use ratinglog::{
    calc::{
        Calculator, ScoreInput,
        classic::{ClassicCalculator, ClassicConfig, ClassicSnapshot, score_rating},
        personal_best::PersonalBests,
        refresh::{self, Judgement, RefreshCalculator, RefreshInput, platinum_rating},
    },
    chart::{BasicChart, BasicChartDb, ChartInfo, ChartTable},
    types::{BellLamp, ChartId, ClearLamp, Difficulty, GradeLamp, Lamps},
};

fn chart_keys<P>(entries: &[ratinglog::frame::FrameEntry<ChartId, P>]) -> Vec<String> {
    entries.iter().map(|e| e.key.to_string()).collect()
}

fn assert_same_state(actual: &ClassicSnapshot<()>, expected: &ClassicSnapshot<()>) {
    assert_eq!(actual.best.entries, expected.best.entries);
    assert_eq!(actual.new.entries, expected.new.entries);
    assert_eq!(actual.naive.entries, expected.naive.entries);
    assert_eq!(actual.recent, expected.recent);
    assert_close(actual.best.total_rating, expected.best.total_rating);
    assert_close(actual.new.total_rating, expected.new.total_rating);
    assert_close(actual.naive.total_rating, expected.naive.total_rating);
}

#[test]
fn classic_score_rating_follows_technical_bonus_curve() {
    assert_close(score_rating(1_010_000, 13.0), 15.0);
    assert_close(score_rating(1_007_500, 13.0), 15.0);
    assert_close(score_rating(1_000_000, 13.0), 14.5);
    assert_close(score_rating(995_000, 13.0), 14.25);
    assert_close(score_rating(970_000, 13.0), 13.0);
    assert_close(score_rating(900_000, 13.0), 9.0);
    assert_close(score_rating(800_000, 13.0), 7.0);
    assert_close(score_rating(650_000, 13.0), 3.5);
    assert_close(score_rating(400_000, 13.0), 0.0);
    assert_close(score_rating(800_000, 5.0), 0.0);
}

#[test]
fn single_score_counts_in_best_and_recent() {
    let mut calc = classic();
    let undo = calc
        .add_score(&ScoreInput::new(970_000), &BasicChart::new("a", 13.5))
        .expect("ranked");

    assert_close(calc.best().total_rating(), 13.5);
    assert_eq!(calc.new_frame().len(), 0);
    assert_close(calc.naive().total_rating(), 13.5);
    assert_close(calc.overall_rating(), 2.0 * 13.5 / 55.0);
    assert_close(calc.overall_no_recent_rating(), 13.5 / 45.0);
    assert_close(calc.overall_naive_rating(), 13.5 / 45.0);

    calc.undo_score(&undo);
    assert!(calc.best().is_empty());
    assert!(calc.recent().is_empty());
    assert_close(calc.overall_rating(), 0.0);
}

#[test]
fn new_charts_are_routed_to_the_new_frame() {
    let mut calc = classic();
    calc.add_score(&ScoreInput::new(970_000), &BasicChart::new("old", 13.0));
    calc.add_score(&ScoreInput::new(970_000), &BasicChart::new("fresh", 14.0).with_new(true));

    assert_eq!(chart_keys(calc.best().entries()), vec!["old"]);
    assert_eq!(chart_keys(calc.new_frame().entries()), vec!["fresh"]);
    assert_eq!(chart_keys(calc.naive().entries()), vec!["fresh", "old"]);
    assert_close(calc.overall_rating(), (13.0 + 14.0 + 27.0) / 55.0);
}

#[test]
fn lunatic_scores_skip_the_recent_window() {
    let mut calc = classic();
    let chart = BasicChart::new("lun", 14.5).with_difficulty(Difficulty::Lunatic);
    let undo = calc.add_score(&ScoreInput::new(970_000), &chart).expect("ranked");

    assert!(undo.recent.is_none());
    assert!(calc.recent().is_empty());
    assert_close(calc.best().total_rating(), 14.5);
}

#[test]
fn better_score_overwrites_the_chart_entry() {
    let mut calc = classic();
    let chart = BasicChart::new("a", 13.0);
    calc.add_score(&ScoreInput::new(970_000), &chart);
    let undo = calc.add_score(&ScoreInput::new(1_000_000), &chart).expect("ranked");

    assert_eq!(calc.best().len(), 1);
    assert_close(calc.best().total_rating(), 14.5);
    assert_eq!(calc.recent().len(), 2);
    assert_close(calc.recent().total_rating(), 27.5);

    calc.undo_score(&undo);
    assert_close(calc.best().total_rating(), 13.0);
    assert_eq!(calc.recent().len(), 1);

    let worse = calc.add_score(&ScoreInput::new(900_000), &chart).expect("ranked");
    assert!(worse.slot_undo.is_none());
    assert!(worse.naive.is_none());
    assert_close(calc.best().total_rating(), 13.0);
}

#[test]
fn best_frame_keeps_only_the_top_thirty() {
    let mut calc = classic();
    for i in 0..40u32 {
        let chart = BasicChart::new(format!("c{i}"), 10.0 + f64::from(i) * 0.1);
        calc.add_score(&ScoreInput::new(970_000), &chart);
    }

    let best = calc.best();
    assert_eq!(best.len(), 30);
    assert_eq!(best.entries().first().map(|e| e.key.as_str()), Some("c39"));
    assert_eq!(best.entries().last().map(|e| e.key.as_str()), Some("c10"));
    assert_eq!(calc.naive().len(), 40);
    assert_eq!(calc.recent().len(), 30);
}

#[test]
fn custom_frame_sizes_change_the_divisor() {
    let config = ClassicConfig {
        best: 2,
        new: 1,
        naive: 3,
        recent_top: 1,
        recent_max: 2,
    };
    let mut calc: Classic = ClassicCalculator::with_config(BasicChartDb, config);
    calc.add_score(&ScoreInput::new(970_000), &BasicChart::new("a", 12.0));
    assert_close(calc.overall_rating(), 24.0 / 4.0);
}

#[test]
fn pinned_recent_rating_is_used_until_unpinned() {
    let mut calc = classic();
    calc.add_score(&ScoreInput::new(970_000), &BasicChart::new("a", 12.0));
    calc.pin_recent_rating(150.0);
    assert_close(calc.overall_rating(), (12.0 + 150.0) / 55.0);
    calc.unpin_recent_rating();
    assert_close(calc.overall_rating(), 24.0 / 55.0);
}

#[test]
fn unknown_charts_are_unranked() {
    let table: ChartTable = [ChartInfo {
        chart_id: ChartId::new("known"),
        level: 12.0,
        is_new: false,
        recency_excluded: false,
        max_platinum: 100,
        max_bells: 10,
    }]
    .into_iter()
    .collect();
    let mut calc: ClassicCalculator<_, ChartId> = ClassicCalculator::new(&table);

    assert!(calc.add_score(&ScoreInput::new(1_000_000), &ChartId::new("missing")).is_none());
    assert!(calc.best().is_empty());
    assert!(calc.recent().is_empty());

    assert!(calc.add_score(&ScoreInput::new(1_000_000), &ChartId::new("known")).is_some());
    assert_eq!(calc.best().len(), 1);
}

#[test]
fn barrage_undoes_back_to_every_earlier_state() {
    let events = barrage();
    let mut calc = classic();
    let mut trail = Vec::new();

    for event in &events {
        let before = calc.make_snapshot();
        let undo = calc.add_score(&event.score, &event.chart).expect("ranked");
        trail.push((before, undo));
    }
    assert_eq!(calc.recent().len(), 30);

    while let Some((before, undo)) = trail.pop() {
        calc.undo_score(&undo);
        assert_same_state(&calc.make_snapshot(), &before);
    }
}

#[test]
fn snapshot_restores_state_after_more_scores() {
    let events = barrage();
    let mut calc = classic();
    for event in &events[..40] {
        calc.add_score(&event.score, &event.chart);
    }
    let snapshot = calc.make_snapshot();
    let rating = calc.overall_rating();

    for event in &events[40..] {
        calc.add_score(&event.score, &event.chart);
    }
    calc.load_snapshot(&snapshot);
    assert_close(calc.overall_rating(), rating);
    assert_same_state(&calc.make_snapshot(), &snapshot);
}

#[test]
fn snapshot_survives_json_round_trip() {
    let events = barrage();
    let mut calc = classic();
    for event in &events {
        calc.add_score(&event.score, &event.chart);
    }

    let json = serde_json::to_string(&calc.make_snapshot()).expect("serialize");
    let restored: ClassicSnapshot<()> = serde_json::from_str(&json).expect("deserialize");

    let mut fresh = classic();
    fresh.load_snapshot(&restored);
    assert_eq!(
        chart_keys(fresh.best().entries()),
        chart_keys(calc.best().entries())
    );
    assert_eq!(fresh.recent().frame().ages(), calc.recent().frame().ages());
    assert!((fresh.overall_rating() - calc.overall_rating()).abs() < 1e-6);
}

fn refresh_calc() -> RefreshCalculator<BasicChartDb, BasicChart> {
    RefreshCalculator::new(BasicChartDb)
}

fn lamps_only(points: u32, bell: BellLamp, clear: ClearLamp) -> RefreshInput {
    RefreshInput::new(points, 0, Judgement::Lamps { bell, clear, grade: None })
}

#[test]
fn refresh_score_rating_adds_lamp_bonuses() {
    let lamps = Lamps {
        bell: BellLamp::FullBell,
        clear: ClearLamp::AllBreak,
        grade: GradeLamp::SSSPlus,
    };
    assert_close(refresh::score_rating(1_010_000, &lamps, 14.0), 16.65);
    assert_close(refresh::score_rating(970_000, &Lamps::default(), 14.0), 14.0);
    assert_close(refresh::score_rating(990_000, &Lamps::default(), 14.0), 14.75);
}

#[test]
fn platinum_rating_counts_stars_above_ninety_three_percent() {
    assert_close(platinum_rating(93, 100, 14.0), 0.0);
    assert_close(platinum_rating(95, 100, 14.0), 2.0 * 196.0 / 1000.0);
    assert_close(platinum_rating(100, 100, 14.0), 5.0 * 196.0 / 1000.0);
    assert_close(platinum_rating(50, 0, 14.0), 0.0);
}

#[test]
fn judgement_counts_derive_lamps() {
    let info = ChartInfo {
        chart_id: ChartId::new("x"),
        level: 13.0,
        is_new: false,
        recency_excluded: false,
        max_platinum: 100,
        max_bells: 40,
    };
    let counts = |bells, breaks, hits, misses| {
        RefreshInput::new(
            1_000_000,
            0,
            Judgement::Counts {
                bells,
                critical: 500,
                breaks,
                hits,
                misses,
            },
        )
        .lamps(&info)
    };

    assert_eq!(
        counts(40, 0, 0, 0),
        Lamps {
            bell: BellLamp::FullBell,
            clear: ClearLamp::AllCriticalBreak,
            grade: GradeLamp::SSS,
        }
    );
    assert_eq!(counts(39, 3, 0, 0).clear, ClearLamp::AllBreak);
    assert_eq!(counts(39, 3, 0, 0).bell, BellLamp::None);
    assert_eq!(counts(40, 3, 2, 0).clear, ClearLamp::FullCombo);
    assert_eq!(counts(40, 3, 2, 1).clear, ClearLamp::None);
}

#[test]
fn refresh_lamps_only_improve_and_undo_exactly() {
    let mut calc = refresh_calc();
    let chart = BasicChart::new("a", 14.0);
    let id = ChartId::new("a");

    calc.add_score(&lamps_only(1_000_000, BellLamp::None, ClearLamp::FullCombo), &chart);
    assert_close(calc.best().total_rating(), 14.0 + 1.25 + 0.1 + 0.2);

    let undo = calc
        .add_score(&lamps_only(990_000, BellLamp::None, ClearLamp::AllCriticalBreak), &chart)
        .expect("ranked");
    assert_eq!(
        calc.lamps(&id),
        Some(&Lamps {
            bell: BellLamp::None,
            clear: ClearLamp::AllCriticalBreak,
            grade: GradeLamp::SSS,
        })
    );
    // the weaker play is rated with the merged lamps but still loses to the first
    assert!(undo.slot_undo.is_none());
    assert_close(calc.best().total_rating(), 15.55);

    calc.undo_score(&undo);
    assert_eq!(calc.lamps(&id).map(|l| l.clear), Some(ClearLamp::FullCombo));
}

#[test]
fn refresh_overall_divides_every_frame_by_fifty() {
    let mut calc = refresh_calc();
    let score = RefreshInput::new(
        970_000,
        100,
        Judgement::Lamps {
            bell: BellLamp::None,
            clear: ClearLamp::None,
            grade: Some(GradeLamp::None),
        },
    );
    calc.add_score(&score, &BasicChart::new("old", 13.0));
    calc.add_score(&score, &BasicChart::new("new", 12.0).with_new(true));

    let platinum = 5.0 * (169.0 + 144.0) / 1000.0;
    assert_close(calc.platinum().total_rating(), platinum);
    assert_close(calc.overall_rating(), (13.0 + 12.0 + platinum) / 50.0);
    assert_close(calc.overall_naive_rating(), (25.0 + platinum) / 50.0);
}

#[test]
fn refresh_undo_removes_first_lamps() {
    let mut calc = refresh_calc();
    let before = calc.make_snapshot();
    let undo = calc
        .add_score(
            &lamps_only(1_005_000, BellLamp::FullBell, ClearLamp::FullCombo),
            &BasicChart::new("a", 13.0),
        )
        .expect("ranked");
    assert!(calc.lamps(&ChartId::new("a")).is_some());

    calc.undo_score(&undo);
    assert!(calc.lamps(&ChartId::new("a")).is_none());
    assert!(calc.best().is_empty());
    assert!(calc.platinum().is_empty());
    assert_eq!(calc.make_snapshot().lamps, before.lamps);
}

#[test]
fn personal_bests_keep_highest_points_per_chart() {
    let mut bests: PersonalBests<BasicChartDb, BasicChart, ScoreInput> =
        PersonalBests::new(BasicChartDb);
    let chart = BasicChart::new("a", 13.0);
    let id = ChartId::new("a");

    let first = bests.add_score(&ScoreInput::new(950_000), &chart).expect("known chart");
    assert!(first.is_some());
    let worse = bests.add_score(&ScoreInput::new(900_000), &chart).expect("known chart");
    assert!(worse.is_none());
    let better = bests.add_score(&ScoreInput::new(1_001_000), &chart).expect("known chart");
    assert_eq!(bests.get(&id).map(|s| s.points), Some(1_001_000));

    bests.undo_score(&better);
    bests.undo_score(&worse);
    assert_eq!(bests.get(&id).map(|s| s.points), Some(950_000));
    bests.undo_score(&first);
    assert!(bests.is_empty());
}
