use crate::catalog::{Direction, MetricDefinition};
use crate::data::store::{ResultBucket, TeamValue};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTeam {
    pub team_id: String,
    pub value: f64,
    /// 1-based. Tied values still get distinct consecutive ranks.
    pub rank: usize,
    /// 0 (worst) to 100 (best), by position rather than distribution.
    pub percentile: u8,
}

/// League-wide view of one metric in one result bucket.
///
/// `summary` is `None` and `ranked_teams` is empty when no team holds a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMetricSnapshot {
    pub metric_id: String,
    pub bucket: ResultBucket,
    pub summary: Option<LeagueSummary>,
    pub ranked_teams: Vec<RankedTeam>,
    pub percentile_by_team: BTreeMap<String, u8>,
}

impl LeagueMetricSnapshot {
    pub fn average(&self) -> Option<f64> {
        self.summary.map(|s| s.average)
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_teams.is_empty()
    }

    /// More than one data point. A single team is trivially at percentile 100.
    pub fn has_sufficient_data(&self) -> bool {
        self.ranked_teams.len() > 1
    }

    pub fn rank_of(&self, team_id: &str) -> Option<usize> {
        self.ranked_teams
            .iter()
            .find(|t| t.team_id == team_id)
            .map(|t| t.rank)
    }

    pub fn percentile_of(&self, team_id: &str) -> Option<u8> {
        self.percentile_by_team.get(team_id).copied()
    }

    pub fn leader(&self) -> Option<&RankedTeam> {
        self.ranked_teams.first()
    }
}

/// Percentile for the team at zero-based sorted position `index` of `count`.
///
/// Positions past the end are treated as last place.
pub fn rank_percentile(index: usize, count: usize) -> u8 {
    if count <= 1 {
        return 100;
    }
    let remaining = (count - index.min(count - 1) - 1) as f64;
    ((remaining / (count - 1) as f64) * 100.0).round() as u8
}

/// Ranks every team holding a finite value for the metric.
///
/// Best first: descending for higher-is-better and neutral metrics, ascending
/// for lower-is-better. Ties are ordered by team id so the output does not
/// depend on input order. A team listed more than once keeps its last finite
/// value, so every team appears in the ranking exactly once.
pub fn compute_league_snapshot<I>(
    definition: &MetricDefinition,
    bucket: ResultBucket,
    values: I,
) -> LeagueMetricSnapshot
where
    I: IntoIterator<Item = TeamValue>,
{
    let mut by_team: BTreeMap<String, f64> = BTreeMap::new();
    for v in values.into_iter().filter(|v| v.value.is_finite()) {
        if let Some(previous) = by_team.insert(v.team_id.clone(), v.value) {
            warn!(metric = %definition.id, team = %v.team_id, previous, "duplicate team value replaced");
        }
    }

    let mut teams: Vec<TeamValue> = by_team
        .into_iter()
        .map(|(team_id, value)| TeamValue { team_id, value })
        .collect();

    teams.sort_by(|a, b| {
        let by_value = match definition.direction {
            Direction::LowerIsBetter => a.value.partial_cmp(&b.value),
            Direction::HigherIsBetter | Direction::Neutral => b.value.partial_cmp(&a.value),
        };
        by_value
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.team_id.cmp(&b.team_id))
    });

    let count = teams.len();
    let summary = summarize(&teams);

    let ranked_teams: Vec<RankedTeam> = teams
        .into_iter()
        .enumerate()
        .map(|(index, team)| RankedTeam {
            team_id: team.team_id,
            value: team.value,
            rank: index + 1,
            percentile: rank_percentile(index, count),
        })
        .collect();

    let percentile_by_team = ranked_teams
        .iter()
        .map(|t| (t.team_id.clone(), t.percentile))
        .collect();

    debug!(metric = %definition.id, %bucket, teams = count, "league snapshot computed");

    LeagueMetricSnapshot {
        metric_id: definition.id.clone(),
        bucket,
        summary,
        ranked_teams,
        percentile_by_team,
    }
}

fn summarize(teams: &[TeamValue]) -> Option<LeagueSummary> {
    if teams.is_empty() {
        return None;
    }

    let sum: f64 = teams.iter().map(|t| t.value).sum();
    let min = teams.iter().map(|t| t.value).fold(f64::INFINITY, f64::min);
    let max = teams.iter().map(|t| t.value).fold(f64::NEG_INFINITY, f64::max);

    Some(LeagueSummary {
        average: sum / teams.len() as f64,
        min,
        max,
        count: teams.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::metric;
    use proptest::prelude::*;

    fn values(pairs: &[(&str, f64)]) -> Vec<TeamValue> {
        pairs.iter().map(|(id, v)| TeamValue::new(id, *v)).collect()
    }

    fn order(snapshot: &LeagueMetricSnapshot) -> Vec<(&str, usize, u8)> {
        snapshot
            .ranked_teams
            .iter()
            .map(|t| (t.team_id.as_str(), t.rank, t.percentile))
            .collect()
    }

    #[test]
    fn tied_values_get_distinct_ranks_ordered_by_team_id() {
        let possession = metric("possession_percentage", Direction::HigherIsBetter, 0.0, 100.0);
        let snapshot = compute_league_snapshot(
            &possession,
            ResultBucket::All,
            values(&[("C", 50.0), ("A", 70.0), ("B", 50.0)]),
        );

        assert_eq!(order(&snapshot), vec![("A", 1, 100), ("B", 2, 50), ("C", 3, 0)]);
        let summary = snapshot.summary.unwrap();
        assert!((summary.average - 170.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.min, 50.0);
        assert_eq!(summary.max, 70.0);
    }

    #[test]
    fn lower_is_better_sorts_ascending() {
        let ppda = metric("ppda", Direction::LowerIsBetter, 0.0, 20.0);
        let snapshot = compute_league_snapshot(
            &ppda,
            ResultBucket::All,
            values(&[("high_press", 7.5), ("low_block", 15.2), ("mid", 10.0)]),
        );

        assert_eq!(
            order(&snapshot),
            vec![("high_press", 1, 100), ("mid", 2, 50), ("low_block", 3, 0)]
        );
    }

    #[test]
    fn neutral_metrics_display_highest_first() {
        let style = metric("pass_style_index", Direction::Neutral, 0.0, 100.0);
        let snapshot = compute_league_snapshot(
            &style,
            ResultBucket::All,
            values(&[("a", 20.0), ("b", 80.0)]),
        );

        assert_eq!(snapshot.leader().map(|t| t.team_id.as_str()), Some("b"));
    }

    #[test]
    fn single_team_is_top_percentile() {
        let goals = metric("goals_per_match", Direction::HigherIsBetter, 0.0, 4.0);
        let snapshot = compute_league_snapshot(&goals, ResultBucket::Win, values(&[("solo", 1.2)]));

        assert_eq!(order(&snapshot), vec![("solo", 1, 100)]);
        assert!(!snapshot.has_sufficient_data());
        assert_eq!(snapshot.average(), Some(1.2));
    }

    #[test]
    fn empty_input_is_no_data_not_zero() {
        let goals = metric("goals_per_match", Direction::HigherIsBetter, 0.0, 4.0);
        let snapshot = compute_league_snapshot(&goals, ResultBucket::Draw, Vec::new());

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.summary, None);
        assert_eq!(snapshot.average(), None);
        assert!(snapshot.percentile_by_team.is_empty());
    }

    #[test]
    fn non_finite_values_are_excluded() {
        let goals = metric("goals_per_match", Direction::HigherIsBetter, 0.0, 4.0);
        let snapshot = compute_league_snapshot(
            &goals,
            ResultBucket::All,
            values(&[("a", f64::NAN), ("b", 2.0), ("c", f64::INFINITY), ("d", 1.0)]),
        );

        assert_eq!(order(&snapshot), vec![("b", 1, 100), ("d", 2, 0)]);
        assert_eq!(snapshot.summary.map(|s| s.count), Some(2));
        assert_eq!(snapshot.percentile_of("a"), None);
    }

    #[test]
    fn identical_input_yields_identical_output_in_any_order() {
        let goals = metric("goals_per_match", Direction::HigherIsBetter, 0.0, 4.0);
        let input = values(&[("x", 1.0), ("y", 1.0), ("z", 2.5), ("w", 0.4)]);
        let mut reversed = input.clone();
        reversed.reverse();

        let first = compute_league_snapshot(&goals, ResultBucket::All, input.clone());
        let second = compute_league_snapshot(&goals, ResultBucket::All, input);
        let third = compute_league_snapshot(&goals, ResultBucket::All, reversed);

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn percentile_rounds_to_nearest() {
        assert_eq!(rank_percentile(0, 4), 100);
        assert_eq!(rank_percentile(1, 4), 67);
        assert_eq!(rank_percentile(2, 4), 33);
        assert_eq!(rank_percentile(3, 4), 0);
        assert_eq!(rank_percentile(0, 1), 100);
    }

    #[test]
    fn percentile_past_the_end_is_last_place() {
        assert_eq!(rank_percentile(4, 4), 0);
        assert_eq!(rank_percentile(usize::MAX, 3), 0);
        assert_eq!(rank_percentile(7, 0), 100);
    }

    #[test]
    fn repeated_team_is_ranked_once_with_its_last_value() {
        let goals = metric("goals_per_match", Direction::HigherIsBetter, 0.0, 4.0);
        let snapshot = compute_league_snapshot(
            &goals,
            ResultBucket::All,
            values(&[("a", 1.0), ("b", 2.0), ("a", 3.0), ("b", f64::NAN)]),
        );

        assert_eq!(order(&snapshot), vec![("a", 1, 100), ("b", 2, 0)]);
        assert_eq!(snapshot.ranked_teams.len(), snapshot.percentile_by_team.len());
        assert_eq!(snapshot.summary.map(|s| s.count), Some(2));
        assert_eq!(snapshot.average(), Some(2.5));
    }

    proptest! {
        #[test]
        fn percentiles_stay_in_bounds(raw in prop::collection::vec(0.0f64..100.0, 1..40)) {
            let def = metric("m", Direction::HigherIsBetter, 0.0, 100.0);
            let input: Vec<TeamValue> = raw
                .iter()
                .enumerate()
                .map(|(i, v)| TeamValue::new(&format!("team{:02}", i), *v))
                .collect();
            let snapshot = compute_league_snapshot(&def, ResultBucket::All, input);

            prop_assert!(snapshot.ranked_teams.iter().all(|t| t.percentile <= 100));
            prop_assert_eq!(snapshot.ranked_teams.first().map(|t| t.percentile), Some(100));
            if raw.len() > 1 {
                prop_assert_eq!(snapshot.ranked_teams.last().map(|t| t.percentile), Some(0));
            }
        }

        #[test]
        fn better_value_means_smaller_rank(raw in prop::collection::vec(-50.0f64..50.0, 2..30)) {
            let def = metric("m", Direction::HigherIsBetter, -50.0, 50.0);
            let input: Vec<TeamValue> = raw
                .iter()
                .enumerate()
                .map(|(i, v)| TeamValue::new(&format!("team{:02}", i), *v))
                .collect();
            let snapshot = compute_league_snapshot(&def, ResultBucket::All, input);

            for a in &snapshot.ranked_teams {
                for b in &snapshot.ranked_teams {
                    if a.value > b.value {
                        prop_assert!(a.rank < b.rank);
                    }
                }
            }
        }
    }
}
