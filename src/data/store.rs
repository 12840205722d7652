use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Partition of a team's matches by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultBucket {
    #[default]
    All,
    Win,
    Draw,
    Loss,
}

impl ResultBucket {
    pub const ALL: [ResultBucket; 4] = [
        ResultBucket::All,
        ResultBucket::Win,
        ResultBucket::Draw,
        ResultBucket::Loss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultBucket::All => "all",
            ResultBucket::Win => "win",
            ResultBucket::Draw => "draw",
            ResultBucket::Loss => "loss",
        }
    }
}

impl fmt::Display for ResultBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ResultBucket::All),
            "win" | "wins" => Ok(ResultBucket::Win),
            "draw" | "draws" => Ok(ResultBucket::Draw),
            "loss" | "losses" => Ok(ResultBucket::Loss),
            _ => Err(AppError::InvalidBucket(s.to_string())),
        }
    }
}

/// One team's raw observation for one metric in one result bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMetricValue {
    pub team_id: String,
    pub metric_id: String,
    #[serde(default, alias = "resultBucket")]
    pub bucket: ResultBucket,
    pub value: f64,
}

impl TeamMetricValue {
    pub fn new(team_id: &str, metric_id: &str, bucket: ResultBucket, value: f64) -> Self {
        TeamMetricValue {
            team_id: team_id.to_string(),
            metric_id: metric_id.to_string(),
            bucket,
            value,
        }
    }
}

/// A `(team, value)` pair for a single metric and bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamValue {
    pub team_id: String,
    pub value: f64,
}

impl TeamValue {
    pub fn new(team_id: &str, value: f64) -> Self {
        TeamValue {
            team_id: team_id.to_string(),
            value,
        }
    }
}

type BucketTable = HashMap<ResultBucket, BTreeMap<String, f64>>;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Process-wide, so no two stores or loads ever share a version.
fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Per-team, per-metric, per-bucket value matrix.
///
/// Reads borrow the store immutably, so a store handed to the engine cannot be
/// reloaded while a computation is iterating it. `load` replaces the whole
/// dataset and takes a fresh `version`, unique across every store in the process.
#[derive(Debug, Clone)]
pub struct MetricValueStore {
    values: HashMap<String, BucketTable>,
    team_names: BTreeMap<String, String>,
    version: u64,
    loaded_at: DateTime<Utc>,
}

impl Default for MetricValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricValueStore {
    pub fn new() -> Self {
        MetricValueStore {
            values: HashMap::new(),
            team_names: BTreeMap::new(),
            version: next_version(),
            loaded_at: Utc::now(),
        }
    }

    pub fn from_records<I>(records: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = TeamMetricValue>,
    {
        let mut store = Self::new();
        store.load(records)?;
        Ok(store)
    }

    /// Replaces the entire dataset. On error the previous dataset is kept.
    pub fn load<I>(&mut self, records: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = TeamMetricValue>,
    {
        let mut values: HashMap<String, BucketTable> = HashMap::new();
        let mut count = 0usize;

        for record in records {
            let teams = values
                .entry(record.metric_id.clone())
                .or_default()
                .entry(record.bucket)
                .or_default();

            if teams.contains_key(&record.team_id) {
                return Err(AppError::DuplicateValue {
                    team_id: record.team_id,
                    metric_id: record.metric_id,
                    bucket: record.bucket,
                });
            }
            teams.insert(record.team_id, record.value);
            count += 1;
        }

        self.values = values;
        self.version = next_version();
        self.loaded_at = Utc::now();
        debug!(version = self.version, records = count, "metric value store loaded");
        Ok(())
    }

    pub fn set_team_names(&mut self, names: BTreeMap<String, String>) {
        self.team_names = names;
    }

    /// Display name for a team, falling back to its id.
    pub fn team_name<'a>(&'a self, team_id: &'a str) -> &'a str {
        self.team_names
            .get(team_id)
            .map(String::as_str)
            .unwrap_or(team_id)
    }

    pub fn get(&self, team_id: &str, metric_id: &str, bucket: ResultBucket) -> Option<f64> {
        self.values
            .get(metric_id)
            .and_then(|buckets| buckets.get(&bucket))
            .and_then(|teams| teams.get(team_id))
            .copied()
    }

    /// All values held for a metric and bucket, ordered by team id.
    pub fn values_for(&self, metric_id: &str, bucket: ResultBucket) -> Vec<TeamValue> {
        self.values
            .get(metric_id)
            .and_then(|buckets| buckets.get(&bucket))
            .map(|teams| {
                teams
                    .iter()
                    .map(|(team_id, &value)| TeamValue::new(team_id, value))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn team_ids(&self) -> Vec<&str> {
        let ids: BTreeSet<&str> = self
            .values
            .values()
            .flat_map(|buckets| buckets.values())
            .flat_map(|teams| teams.keys().map(String::as_str))
            .collect();
        ids.into_iter().collect()
    }

    pub fn metric_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.values.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn has_team(&self, team_id: &str) -> bool {
        self.values
            .values()
            .flat_map(|buckets| buckets.values())
            .any(|teams| teams.contains_key(team_id))
    }

    pub fn len(&self) -> usize {
        self.values
            .values()
            .flat_map(|buckets| buckets.values())
            .map(|teams| teams.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_store() -> MetricValueStore {
        MetricValueStore::from_records(vec![
            TeamMetricValue::new("ars", "ppda", ResultBucket::All, 9.1),
            TeamMetricValue::new("che", "ppda", ResultBucket::All, 11.4),
            TeamMetricValue::new("ars", "ppda", ResultBucket::Win, 8.2),
            TeamMetricValue::new("liv", "goals_per_match", ResultBucket::All, 2.3),
        ])
        .unwrap()
    }

    #[rstest]
    #[case("all", ResultBucket::All)]
    #[case("WIN", ResultBucket::Win)]
    #[case(" draws ", ResultBucket::Draw)]
    #[case("loss", ResultBucket::Loss)]
    fn parses_buckets(#[case] raw: &str, #[case] expected: ResultBucket) {
        assert_eq!(raw.parse::<ResultBucket>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_bucket() {
        assert_eq!(
            "home".parse::<ResultBucket>(),
            Err(AppError::InvalidBucket("home".to_string()))
        );
    }

    #[test]
    fn point_lookup_is_scoped_by_bucket() {
        let store = sample_store();
        assert_eq!(store.get("ars", "ppda", ResultBucket::All), Some(9.1));
        assert_eq!(store.get("ars", "ppda", ResultBucket::Win), Some(8.2));
        assert_eq!(store.get("che", "ppda", ResultBucket::Win), None);
        assert_eq!(store.get("ars", "goals_per_match", ResultBucket::All), None);
    }

    #[test]
    fn values_for_is_ordered_by_team_id() {
        let store = sample_store();
        let values = store.values_for("ppda", ResultBucket::All);
        let teams: Vec<&str> = values.iter().map(|v| v.team_id.as_str()).collect();
        assert_eq!(teams, vec!["ars", "che"]);
        assert!(store.values_for("unknown", ResultBucket::All).is_empty());
    }

    #[test]
    fn duplicate_tuple_is_rejected_and_previous_data_kept() {
        let mut store = sample_store();
        let version = store.version();

        let result = store.load(vec![
            TeamMetricValue::new("ars", "ppda", ResultBucket::All, 9.1),
            TeamMetricValue::new("ars", "ppda", ResultBucket::All, 9.9),
        ]);

        assert!(matches!(result, Err(AppError::DuplicateValue { .. })));
        assert_eq!(store.version(), version);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn bulk_load_replaces_dataset_and_bumps_version() {
        let mut store = sample_store();
        let before = store.version();

        store
            .load(vec![TeamMetricValue::new("tot", "ppda", ResultBucket::All, 10.0)])
            .unwrap();

        assert!(store.version() > before);
        assert_eq!(store.team_ids(), vec!["tot"]);
        assert_eq!(store.metric_ids(), vec!["ppda"]);
        assert!(!store.has_team("ars"));
    }

    #[test]
    fn independent_stores_never_share_a_version() {
        let first = sample_store();
        let second = sample_store();
        let empty = MetricValueStore::new();

        assert_ne!(first.version(), second.version());
        assert_ne!(empty.version(), first.version());
        assert_ne!(empty.version(), second.version());
    }

    #[test]
    fn team_name_falls_back_to_id() {
        let mut store = sample_store();
        store.set_team_names(BTreeMap::from([("ars".to_string(), "Arsenal".to_string())]));
        assert_eq!(store.team_name("ars"), "Arsenal");
        assert_eq!(store.team_name("che"), "che");
    }

    #[test]
    fn record_deserializes_with_bucket_alias_and_default() {
        let with_alias: TeamMetricValue = serde_json::from_str(
            r#"{"teamId": "ars", "metricId": "ppda", "resultBucket": "loss", "value": 12.0}"#,
        )
        .unwrap();
        assert_eq!(with_alias.bucket, ResultBucket::Loss);

        let without: TeamMetricValue =
            serde_json::from_str(r#"{"teamId": "ars", "metricId": "ppda", "value": 12.0}"#).unwrap();
        assert_eq!(without.bucket, ResultBucket::All);
    }
}
