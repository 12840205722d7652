use crate::catalog::{Direction, MetricDefinition};
use serde::Serialize;

/// Percent difference above which two values count as meaningfully different.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    A,
    B,
}

/// Pairwise result for two values of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub metric_id: String,
    pub team_a_value: f64,
    pub team_b_value: f64,
    pub percent_difference: f64,
    pub is_significant: bool,
    /// `None` for neutral metrics or when the gap is not significant.
    pub better_team: Option<Side>,
}

/// Compares two values relative to their mean.
///
/// A zero mean yields a 0% difference that is never significant.
pub fn compute_comparison(
    definition: &MetricDefinition,
    value_a: f64,
    value_b: f64,
    threshold_percent: f64,
) -> ComparisonRecord {
    let average = (value_a + value_b) / 2.0;
    let percent_difference = relative_difference(value_a - value_b, average);
    let is_significant = percent_difference > threshold_percent;

    let better_team = if is_significant {
        favoured_side(definition.direction, value_a, value_b)
    } else {
        None
    };

    ComparisonRecord {
        metric_id: definition.id.clone(),
        team_a_value: value_a,
        team_b_value: value_b,
        percent_difference,
        is_significant,
        better_team,
    }
}

fn favoured_side(direction: Direction, value_a: f64, value_b: f64) -> Option<Side> {
    let a_higher = value_a > value_b;
    match direction {
        Direction::HigherIsBetter => Some(if a_higher { Side::A } else { Side::B }),
        Direction::LowerIsBetter => Some(if a_higher { Side::B } else { Side::A }),
        Direction::Neutral => None,
    }
}

fn relative_difference(delta: f64, reference: f64) -> f64 {
    if reference == 0.0 || !reference.is_finite() {
        return 0.0;
    }
    delta.abs() / reference.abs() * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Better,
    Worse,
    /// Within the significance threshold of the league average.
    Level,
    /// The metric carries no better/worse judgement.
    Neutral,
}

/// One team's value against the league average.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueDelta {
    pub metric_id: String,
    pub team_value: f64,
    pub league_average: f64,
    /// `team_value - league_average`.
    pub difference: f64,
    pub percent_difference: f64,
    pub is_significant: bool,
    pub verdict: Verdict,
}

pub fn compare_to_league(
    definition: &MetricDefinition,
    team_value: f64,
    league_average: f64,
    threshold_percent: f64,
) -> LeagueDelta {
    let difference = team_value - league_average;
    let percent_difference = relative_difference(difference, league_average);
    let is_significant = percent_difference > threshold_percent;

    let verdict = match (definition.direction, is_significant) {
        (Direction::Neutral, _) => Verdict::Neutral,
        (_, false) => Verdict::Level,
        (Direction::HigherIsBetter, true) if difference > 0.0 => Verdict::Better,
        (Direction::LowerIsBetter, true) if difference < 0.0 => Verdict::Better,
        (_, true) => Verdict::Worse,
    };

    LeagueDelta {
        metric_id: definition.id.clone(),
        team_value,
        league_average,
        difference,
        percent_difference,
        is_significant,
        verdict,
    }
}
