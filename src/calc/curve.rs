//! Piecewise-linear rating curves and tier tables.

use crate::{order::region, types::GradeLamp};

/// Interpolates `x` over `(x, y)` control points sorted descending by `x`.
///
/// Values above the first point clamp to its `y`; values below the last point clamp
/// to the last `y`.
pub fn lerp(x: f64, points: &[(f64, f64)]) -> f64 {
    let Some(&(top_x, top_y)) = points.first() else {
        return 0.0;
    };
    if x >= top_x {
        return top_y;
    }
    for pair in points.windows(2) {
        let (upper, lower) = (pair[0], pair[1]);
        if x >= lower.0 {
            return lower.1 + (x - lower.0) * (upper.1 - lower.1) / (upper.0 - lower.0);
        }
    }
    points.last().map_or(top_y, |p| p.1)
}

/// Truncates towards negative infinity at `1 / scale` resolution.
pub fn truncate(value: f64, scale: f64) -> f64 {
    (value * scale).floor() / scale
}

const GRADE_TIERS: [(u32, GradeLamp); 5] = [
    (0, GradeLamp::None),
    (970_000, GradeLamp::S),
    (990_000, GradeLamp::SS),
    (1_000_000, GradeLamp::SSS),
    (1_007_500, GradeLamp::SSSPlus),
];

pub fn grade_lamp(points: u32) -> GradeLamp {
    region(&GRADE_TIERS, &points, |tier| tier.0).map_or(GradeLamp::None, |tier| tier.1)
}

/// Rating below the 800000-point floor, shared by every ruleset.
pub fn low_score_rating(points: u32, level: f64, scale: f64) -> f64 {
    let points = f64::from(points);
    truncate((level - 6.0) * (points - 500_000.0) / 300_000.0, scale).max(0.0)
}

pub const RATING_FLOOR_POINTS: u32 = 800_000;
