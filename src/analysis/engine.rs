use super::comparison::{
    compare_to_league, compute_comparison, ComparisonRecord, LeagueDelta, Side,
    DEFAULT_SIGNIFICANCE_THRESHOLD,
};
use super::normalize::normalize;
use super::snapshot::{compute_league_snapshot, LeagueMetricSnapshot};
use crate::cache::SnapshotCache;
use crate::catalog::{Category, MetricCatalog};
use crate::data::store::{MetricValueStore, ResultBucket};
use crate::error::AppError;
use serde::Serialize;
use tracing::warn;

/// Two named teams compared on one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamComparison {
    pub team_a: String,
    pub team_b: String,
    pub bucket: ResultBucket,
    pub record: ComparisonRecord,
}

impl TeamComparison {
    pub fn better_team_id(&self) -> Option<&str> {
        self.record.better_team.map(|side| match side {
            Side::A => self.team_a.as_str(),
            Side::B => self.team_b.as_str(),
        })
    }
}

/// One radar axis for a team.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePoint {
    pub metric_id: String,
    pub name: String,
    pub value: Option<f64>,
    pub normalized: Option<f64>,
    pub percentile: Option<u8>,
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub team_id: String,
    pub category: Category,
    pub bucket: ResultBucket,
    pub points: Vec<ProfilePoint>,
}

impl TeamProfile {
    /// Mean normalized score over the axes the team has data for.
    pub fn overall_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.points.iter().filter_map(|p| p.normalized).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketEntry {
    pub bucket: ResultBucket,
    pub value: Option<f64>,
    pub percentile: Option<u8>,
}

/// A team's value for one metric across every result bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSplit {
    pub team_id: String,
    pub metric_id: String,
    pub entries: Vec<BucketEntry>,
}

impl BucketSplit {
    pub fn value(&self, bucket: ResultBucket) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.bucket == bucket)
            .and_then(|e| e.value)
    }

    /// Win value minus loss value, when both exist.
    pub fn win_loss_delta(&self) -> Option<f64> {
        Some(self.value(ResultBucket::Win)? - self.value(ResultBucket::Loss)?)
    }
}

/// Binds a catalog and a read-only value store.
///
/// Unknown metric ids are reported as `AppError::UnknownMetric`. Missing data is
/// never an error: it shows up as empty snapshots or `None` results.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    catalog: &'a MetricCatalog,
    store: &'a MetricValueStore,
    threshold: f64,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(catalog: &'a MetricCatalog, store: &'a MetricValueStore) -> Self {
        AggregationEngine {
            catalog,
            store,
            threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold = threshold_percent;
        self
    }

    pub fn catalog(&self) -> &'a MetricCatalog {
        self.catalog
    }

    pub fn store(&self) -> &'a MetricValueStore {
        self.store
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn league_snapshot(
        &self,
        metric_id: &str,
        bucket: ResultBucket,
    ) -> Result<LeagueMetricSnapshot, AppError> {
        let definition = self.catalog.definition(metric_id)?;
        Ok(compute_league_snapshot(
            definition,
            bucket,
            self.store.values_for(metric_id, bucket),
        ))
    }

    pub fn cached_snapshot<'c>(
        &self,
        cache: &'c mut SnapshotCache,
        metric_id: &str,
        bucket: ResultBucket,
    ) -> Result<&'c LeagueMetricSnapshot, AppError> {
        cache.get_or_compute(self.store.version(), metric_id, bucket, || {
            self.league_snapshot(metric_id, bucket)
        })
    }

    pub fn normalize(&self, metric_id: &str, value: f64) -> Result<f64, AppError> {
        Ok(normalize(self.catalog.definition(metric_id)?, value))
    }

    pub fn compare_values(
        &self,
        metric_id: &str,
        value_a: f64,
        value_b: f64,
    ) -> Result<ComparisonRecord, AppError> {
        let definition = self.catalog.definition(metric_id)?;
        Ok(compute_comparison(definition, value_a, value_b, self.threshold))
    }

    /// `Ok(None)` when either team has no value for the metric in that bucket.
    pub fn compare_teams(
        &self,
        metric_id: &str,
        bucket: ResultBucket,
        team_a: &str,
        team_b: &str,
    ) -> Result<Option<TeamComparison>, AppError> {
        let definition = self.catalog.definition(metric_id)?;
        let (Some(value_a), Some(value_b)) = (
            self.store.get(team_a, metric_id, bucket),
            self.store.get(team_b, metric_id, bucket),
        ) else {
            return Ok(None);
        };

        Ok(Some(TeamComparison {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            bucket,
            record: compute_comparison(definition, value_a, value_b, self.threshold),
        }))
    }

    /// `Ok(None)` when the team has no value or the league has no data.
    pub fn compare_to_league(
        &self,
        metric_id: &str,
        bucket: ResultBucket,
        team_id: &str,
    ) -> Result<Option<LeagueDelta>, AppError> {
        let definition = self.catalog.definition(metric_id)?;
        let snapshot = self.league_snapshot(metric_id, bucket)?;

        let delta = self
            .store
            .get(team_id, metric_id, bucket)
            .filter(|v| v.is_finite())
            .zip(snapshot.average())
            .map(|(value, average)| compare_to_league(definition, value, average, self.threshold));
        Ok(delta)
    }

    pub fn category_snapshots(
        &self,
        category: Category,
        bucket: ResultBucket,
    ) -> Vec<LeagueMetricSnapshot> {
        self.catalog
            .metrics_in_category(category)
            .into_iter()
            .map(|definition| {
                compute_league_snapshot(
                    definition,
                    bucket,
                    self.store.values_for(&definition.id, bucket),
                )
            })
            .collect()
    }

    /// Radar data: one point per catalog metric in the category.
    pub fn team_profile(
        &self,
        team_id: &str,
        category: Category,
        bucket: ResultBucket,
    ) -> TeamProfile {
        let points = self
            .catalog
            .metrics_in_category(category)
            .into_iter()
            .map(|definition| {
                let snapshot = compute_league_snapshot(
                    definition,
                    bucket,
                    self.store.values_for(&definition.id, bucket),
                );
                let value = self
                    .store
                    .get(team_id, &definition.id, bucket)
                    .filter(|v| v.is_finite());

                ProfilePoint {
                    metric_id: definition.id.clone(),
                    name: definition.name.clone(),
                    value,
                    normalized: value.map(|v| normalize(definition, v)),
                    percentile: snapshot.percentile_of(team_id),
                    rank: snapshot.rank_of(team_id),
                }
            })
            .collect();

        TeamProfile {
            team_id: team_id.to_string(),
            category,
            bucket,
            points,
        }
    }

    pub fn bucket_split(&self, team_id: &str, metric_id: &str) -> Result<BucketSplit, AppError> {
        let entries = ResultBucket::ALL
            .into_iter()
            .map(|bucket| {
                let snapshot = self.league_snapshot(metric_id, bucket)?;
                Ok(BucketEntry {
                    bucket,
                    value: self.store.get(team_id, metric_id, bucket),
                    percentile: snapshot.percentile_of(team_id),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(BucketSplit {
            team_id: team_id.to_string(),
            metric_id: metric_id.to_string(),
            entries,
        })
    }

    /// Metric ids present in the store that the catalog cannot describe.
    pub fn uncatalogued_metrics(&self) -> Vec<&'a str> {
        let unknown: Vec<&'a str> = self
            .store
            .metric_ids()
            .into_iter()
            .filter(|id| !self.catalog.contains(id))
            .collect();

        if !unknown.is_empty() {
            warn!(metrics = ?unknown, "dataset holds metrics missing from the catalog");
        }
        unknown
    }
}
