mod standard;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

const MAX_DECIMALS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Possession,
    Attacking,
    Defensive,
    Tempo,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Possession,
        Category::Attacking,
        Category::Defensive,
        Category::Tempo,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Possession => "possession",
            Category::Attacking => "attacking",
            Category::Defensive => "defensive",
            Category::Tempo => "tempo",
            Category::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Possession => "Possession",
            Category::Attacking => "Attacking",
            Category::Defensive => "Defensive",
            Category::Tempo => "Tempo",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Percentage,
    Count,
    PerMatch,
    Seconds,
    Meters,
    Ratio,
    Index,
}

/// Whether a larger raw value is a better performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
    /// No better/worse judgement, e.g. a pass style index.
    Neutral,
}

impl Direction {
    pub fn higher_is_better(&self) -> Option<bool> {
        match self {
            Direction::HigherIsBetter => Some(true),
            Direction::LowerIsBetter => Some(false),
            Direction::Neutral => None,
        }
    }
}

impl From<Option<bool>> for Direction {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Direction::HigherIsBetter,
            Some(false) => Direction::LowerIsBetter,
            None => Direction::Neutral,
        }
    }
}

impl From<Direction> for Option<bool> {
    fn from(direction: Direction) -> Self {
        direction.higher_is_better()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricFormat {
    pub decimals: u8,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl MetricFormat {
    pub fn apply(&self, value: f64) -> String {
        format!(
            "{}{:.*}{}",
            self.prefix.as_deref().unwrap_or(""),
            self.decimals as usize,
            value,
            self.suffix.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    pub range: MetricRange,
    #[serde(rename = "higherIsBetter", default = "neutral")]
    pub direction: Direction,
    #[serde(default)]
    pub format: MetricFormat,
}

fn neutral() -> Direction {
    Direction::Neutral
}

impl MetricDefinition {
    fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::Configuration("metric id must not be empty".to_string()));
        }
        if !self.range.min.is_finite() || !self.range.max.is_finite() {
            return Err(AppError::Configuration(format!(
                "{}: range bounds must be finite",
                self.id
            )));
        }
        if self.range.min >= self.range.max {
            return Err(AppError::Configuration(format!(
                "{}: range.min ({}) must be below range.max ({})",
                self.id, self.range.min, self.range.max
            )));
        }
        if self.format.decimals > MAX_DECIMALS {
            return Err(AppError::Configuration(format!(
                "{}: at most {} decimals are supported",
                self.id, MAX_DECIMALS
            )));
        }
        Ok(())
    }
}

/// Immutable registry of metric definitions, validated on construction.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    definitions: Vec<MetricDefinition>,
    index: HashMap<String, usize>,
    by_category: BTreeMap<Category, Vec<usize>>,
}

impl MetricCatalog {
    pub fn new(definitions: Vec<MetricDefinition>) -> Result<Self, AppError> {
        let mut index = HashMap::with_capacity(definitions.len());
        let mut by_category: BTreeMap<Category, Vec<usize>> = BTreeMap::new();

        for (position, definition) in definitions.iter().enumerate() {
            definition.validate()?;
            if index.insert(definition.id.clone(), position).is_some() {
                return Err(AppError::Configuration(format!(
                    "duplicate metric id '{}'",
                    definition.id
                )));
            }
            by_category
                .entry(definition.category)
                .or_default()
                .push(position);
        }

        Ok(MetricCatalog {
            definitions,
            index,
            by_category,
        })
    }

    /// The built-in soccer play-style catalog.
    pub fn standard() -> Result<Self, AppError> {
        Self::new(standard::definitions())
    }

    pub fn get(&self, metric_id: &str) -> Option<&MetricDefinition> {
        self.index.get(metric_id).map(|&i| &self.definitions[i])
    }

    pub fn definition(&self, metric_id: &str) -> Result<&MetricDefinition, AppError> {
        self.get(metric_id)
            .ok_or_else(|| AppError::UnknownMetric(metric_id.to_string()))
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.index.contains_key(metric_id)
    }

    /// Formats with the metric's decimals and affixes; unknown ids get the plain value.
    pub fn format_value(&self, metric_id: &str, value: f64) -> String {
        match self.get(metric_id) {
            Some(definition) => definition.format.apply(value),
            None => value.to_string(),
        }
    }

    /// `Ok(None)` means the metric is neutral. Unknown ids are an error, not `None`.
    pub fn is_higher_better(&self, metric_id: &str) -> Result<Option<bool>, AppError> {
        self.definition(metric_id)
            .map(|definition| definition.direction.higher_is_better())
    }

    pub fn metrics_in_category(&self, category: Category) -> Vec<&MetricDefinition> {
        self.by_category
            .get(&category)
            .map(|positions| positions.iter().map(|&i| &self.definitions[i]).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
