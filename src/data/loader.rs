use crate::catalog::{MetricCatalog, MetricDefinition};
use crate::data::store::{MetricValueStore, ResultBucket, TeamMetricValue};
use crate::error::AppError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    team_id: String,
    metric_id: String,
    #[serde(default, alias = "resultBucket")]
    bucket: ResultBucket,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Records(Vec<RawRecord>),
    Document {
        #[serde(default)]
        teams: Vec<TeamEntry>,
        values: Vec<RawRecord>,
    },
}

/// Parses a dataset, either a bare record array or `{ "teams": [...], "values": [...] }`.
///
/// Records with a null value are missing data and are skipped, never read as zero.
pub fn parse_dataset(json: &str) -> Result<MetricValueStore, AppError> {
    let file: DatasetFile = serde_json::from_str(json)
        .map_err(|e| AppError::Json(format!("Failed to parse dataset: {}", e)))?;

    let (teams, raw) = match file {
        DatasetFile::Records(values) => (Vec::new(), values),
        DatasetFile::Document { teams, values } => (teams, values),
    };

    let total = raw.len();
    let records: Vec<TeamMetricValue> = raw
        .into_iter()
        .filter_map(|r| match r.value {
            Some(value) if value.is_finite() => Some(TeamMetricValue {
                team_id: r.team_id,
                metric_id: r.metric_id,
                bucket: r.bucket,
                value,
            }),
            _ => {
                debug!(team = %r.team_id, metric = %r.metric_id, bucket = %r.bucket, "skipping record without a value");
                None
            }
        })
        .collect();
    let kept = records.len();

    let mut store = MetricValueStore::from_records(records)?;
    store.set_team_names(
        teams
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect::<BTreeMap<_, _>>(),
    );

    info!(records = kept, skipped = total - kept, teams = store.team_ids().len(), "dataset loaded");
    Ok(store)
}

pub fn load_dataset(path: &Path) -> Result<MetricValueStore, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Io(format!("Failed to read dataset {}: {}", path.display(), e))
    })?;
    parse_dataset(&content)
}

/// Parses a JSON array of metric definitions. Invalid definitions fail the whole catalog.
pub fn parse_catalog(json: &str) -> Result<MetricCatalog, AppError> {
    let definitions: Vec<MetricDefinition> = serde_json::from_str(json)
        .map_err(|e| AppError::Json(format!("Failed to parse catalog: {}", e)))?;
    let catalog = MetricCatalog::new(definitions)?;
    info!(metrics = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> Result<MetricCatalog, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Io(format!("Failed to read catalog {}: {}", path.display(), e))
    })?;
    parse_catalog(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_record_array() {
        let store = parse_dataset(
            r#"[
                {"teamId": "ars", "metricId": "ppda", "bucket": "all", "value": 9.1},
                {"teamId": "che", "metricId": "ppda", "value": 11.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("che", "ppda", ResultBucket::All), Some(11.0));
    }

    #[test]
    fn parses_document_with_team_names() {
        let store = parse_dataset(
            r#"{
                "teams": [{"id": "ars", "name": "Arsenal"}],
                "values": [{"teamId": "ars", "metricId": "ppda", "bucket": "win", "value": 8.0}]
            }"#,
        )
        .unwrap();

        assert_eq!(store.team_name("ars"), "Arsenal");
        assert_eq!(store.get("ars", "ppda", ResultBucket::Win), Some(8.0));
    }

    #[test]
    fn null_values_are_missing_not_zero() {
        let store = parse_dataset(
            r#"[
                {"teamId": "ars", "metricId": "ppda", "value": null},
                {"teamId": "che", "metricId": "ppda", "value": 11.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(store.get("ars", "ppda", ResultBucket::All), None);
        assert_eq!(store.values_for("ppda", ResultBucket::All).len(), 1);
    }

    #[test]
    fn duplicate_records_fail_the_load() {
        let result = parse_dataset(
            r#"[
                {"teamId": "ars", "metricId": "ppda", "value": 9.0},
                {"teamId": "ars", "metricId": "ppda", "value": 10.0}
            ]"#,
        );
        assert!(matches!(result, Err(AppError::DuplicateValue { .. })));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_dataset("{not json"), Err(AppError::Json(_))));
        assert!(matches!(parse_catalog("[{}]"), Err(AppError::Json(_))));
    }

    #[test]
    fn catalog_with_inverted_range_is_rejected() {
        let result = parse_catalog(
            r#"[{"id": "ppda", "name": "PPDA", "category": "defensive", "unit": "ratio",
                 "range": {"min": 20, "max": 0}, "higherIsBetter": false}]"#,
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_dataset(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
