use crate::analysis::comparison::DEFAULT_SIGNIFICANCE_THRESHOLD;
use crate::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_FILE: &str = "data/sample_league.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub catalog_file: Option<PathBuf>,
    pub significance_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            catalog_file: None,
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl Config {
    /// Reads `PLAYSTYLE_*` variables, loading `.env` first. An explicit
    /// `threshold` wins and `PLAYSTYLE_SIGNIFICANCE_THRESHOLD` is then not parsed.
    pub fn from_env(threshold: Option<f64>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_vars(
            env::var("PLAYSTYLE_DATA_FILE").ok(),
            env::var("PLAYSTYLE_CATALOG_FILE").ok(),
            env::var("PLAYSTYLE_SIGNIFICANCE_THRESHOLD").ok(),
            threshold,
        )
    }

    fn from_vars(
        data_file: Option<String>,
        catalog_file: Option<String>,
        threshold_var: Option<String>,
        threshold_override: Option<f64>,
    ) -> Result<Self, AppError> {
        let significance_threshold = match (threshold_override, threshold_var) {
            (Some(threshold), _) => threshold,
            (None, Some(raw)) => parse_threshold(&raw)?,
            (None, None) => DEFAULT_SIGNIFICANCE_THRESHOLD,
        };

        Ok(Config {
            data_file: data_file
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            catalog_file: catalog_file
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            significance_threshold,
        })
    }
}

/// Parses a significance threshold in percent. Must be finite and non-negative.
pub fn parse_threshold(raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "PLAYSTYLE_SIGNIFICANCE_THRESHOLD must be a number, got '{}'",
            raw
        ))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Config(format!(
            "significance threshold must be a non-negative number, got {}",
            value
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_vars(None, None, None, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.significance_threshold, 20.0);
    }

    #[test]
    fn blank_paths_fall_back_to_defaults() {
        let config = Config::from_vars(Some("  ".into()), Some(String::new()), None, None).unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn reads_explicit_values() {
        let config = Config::from_vars(
            Some("fixtures/league.json".into()),
            Some("fixtures/catalog.json".into()),
            Some("12.5".into()),
            None,
        )
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("fixtures/league.json"));
        assert_eq!(config.catalog_file, Some(PathBuf::from("fixtures/catalog.json")));
        assert_eq!(config.significance_threshold, 12.5);
    }

    #[test]
    fn explicit_threshold_skips_a_malformed_variable() {
        let config = Config::from_vars(None, None, Some("lots".into()), Some(35.0)).unwrap();
        assert_eq!(config.significance_threshold, 35.0);

        let result = Config::from_vars(None, None, Some("lots".into()), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(matches!(parse_threshold("abc"), Err(AppError::Config(_))));
        assert!(matches!(parse_threshold("-1"), Err(AppError::Config(_))));
        assert!(matches!(parse_threshold("inf"), Err(AppError::Config(_))));
        assert_eq!(parse_threshold(" 0 ").unwrap(), 0.0);
    }
}
