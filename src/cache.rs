use crate::analysis::snapshot::LeagueMetricSnapshot;
use crate::data::store::ResultBucket;
use crate::error::AppError;
use std::collections::HashMap;
use tracing::debug;

/// Memoizes league snapshots per (metric, bucket) for one dataset version.
///
/// Any change of version drops every entry, so a reloaded store never serves
/// stale rankings.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    version: Option<u64>,
    entries: HashMap<(String, ResultBucket), LeagueMetricSnapshot>,
    hits: u64,
    misses: u64,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(
        &mut self,
        version: u64,
        metric_id: &str,
        bucket: ResultBucket,
        compute: F,
    ) -> Result<&LeagueMetricSnapshot, AppError>
    where
        F: FnOnce() -> Result<LeagueMetricSnapshot, AppError>,
    {
        if self.version != Some(version) {
            if !self.entries.is_empty() {
                debug!(from = ?self.version, to = version, dropped = self.entries.len(), "snapshot cache invalidated");
            }
            self.entries.clear();
            self.version = Some(version);
        }

        let key = (metric_id.to_string(), bucket);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!(metric = metric_id, %bucket, "snapshot cache hit");
        } else {
            self.misses += 1;
            let snapshot = compute()?;
            self.entries.insert(key.clone(), snapshot);
        }

        Ok(&self.entries[&key])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.version = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn empty_snapshot(metric_id: &str) -> LeagueMetricSnapshot {
        LeagueMetricSnapshot {
            metric_id: metric_id.to_string(),
            bucket: ResultBucket::All,
            summary: None,
            ranked_teams: Vec::new(),
            percentile_by_team: BTreeMap::new(),
        }
    }

    #[test]
    fn computes_once_per_key_and_version() {
        let mut cache = SnapshotCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            cache
                .get_or_compute(1, "ppda", ResultBucket::All, || {
                    calls += 1;
                    Ok(empty_snapshot("ppda"))
                })
                .unwrap();
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn buckets_are_separate_keys() {
        let mut cache = SnapshotCache::new();
        cache
            .get_or_compute(1, "ppda", ResultBucket::All, || Ok(empty_snapshot("ppda")))
            .unwrap();
        cache
            .get_or_compute(1, "ppda", ResultBucket::Win, || Ok(empty_snapshot("ppda")))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn version_change_invalidates_everything() {
        let mut cache = SnapshotCache::new();
        cache
            .get_or_compute(1, "ppda", ResultBucket::All, || Ok(empty_snapshot("ppda")))
            .unwrap();
        cache
            .get_or_compute(1, "shots_per_match", ResultBucket::All, || {
                Ok(empty_snapshot("shots_per_match"))
            })
            .unwrap();

        let mut recomputed = false;
        cache
            .get_or_compute(2, "ppda", ResultBucket::All, || {
                recomputed = true;
                Ok(empty_snapshot("ppda"))
            })
            .unwrap();

        assert!(recomputed);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = SnapshotCache::new();
        let result = cache.get_or_compute(1, "nope", ResultBucket::All, || {
            Err(AppError::UnknownMetric("nope".to_string()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
