use super::{Category, Direction, MetricDefinition, MetricFormat, MetricRange, Unit};

struct Entry {
    id: &'static str,
    name: &'static str,
    category: Category,
    unit: Unit,
    min: f64,
    max: f64,
    direction: Direction,
    decimals: u8,
}

use super::Category::*;
use super::Direction::*;

const ENTRIES: &[Entry] = &[
    // Possession
    Entry { id: "possession_percentage", name: "Possession", category: Possession, unit: Unit::Percentage, min: 0.0, max: 100.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "pass_accuracy", name: "Pass Accuracy", category: Possession, unit: Unit::Percentage, min: 50.0, max: 100.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "passes_per_match", name: "Passes per Match", category: Possession, unit: Unit::PerMatch, min: 200.0, max: 800.0, direction: HigherIsBetter, decimals: 0 },
    Entry { id: "final_third_entries", name: "Final Third Entries", category: Possession, unit: Unit::PerMatch, min: 10.0, max: 80.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "pass_style_index", name: "Pass Style Index", category: Possession, unit: Unit::Index, min: 0.0, max: 100.0, direction: Neutral, decimals: 0 },
    // Attacking
    Entry { id: "goals_per_match", name: "Goals per Match", category: Attacking, unit: Unit::PerMatch, min: 0.0, max: 4.0, direction: HigherIsBetter, decimals: 2 },
    Entry { id: "xg_per_match", name: "xG per Match", category: Attacking, unit: Unit::PerMatch, min: 0.0, max: 3.5, direction: HigherIsBetter, decimals: 2 },
    Entry { id: "shots_per_match", name: "Shots per Match", category: Attacking, unit: Unit::PerMatch, min: 0.0, max: 25.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "shot_conversion", name: "Shot Conversion", category: Attacking, unit: Unit::Percentage, min: 0.0, max: 40.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "crosses_per_match", name: "Crosses per Match", category: Attacking, unit: Unit::PerMatch, min: 0.0, max: 30.0, direction: Neutral, decimals: 1 },
    // Defensive
    Entry { id: "ppda", name: "PPDA", category: Defensive, unit: Unit::Ratio, min: 0.0, max: 20.0, direction: LowerIsBetter, decimals: 1 },
    Entry { id: "goals_conceded_per_match", name: "Goals Conceded per Match", category: Defensive, unit: Unit::PerMatch, min: 0.0, max: 4.0, direction: LowerIsBetter, decimals: 2 },
    Entry { id: "tackles_per_match", name: "Tackles per Match", category: Defensive, unit: Unit::PerMatch, min: 5.0, max: 30.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "interceptions_per_match", name: "Interceptions per Match", category: Defensive, unit: Unit::PerMatch, min: 0.0, max: 20.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "clean_sheet_percentage", name: "Clean Sheets", category: Defensive, unit: Unit::Percentage, min: 0.0, max: 100.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "defensive_line_height", name: "Defensive Line Height", category: Defensive, unit: Unit::Meters, min: 25.0, max: 55.0, direction: Neutral, decimals: 1 },
    // Tempo
    Entry { id: "avg_possession_duration", name: "Avg Possession Duration", category: Tempo, unit: Unit::Seconds, min: 5.0, max: 30.0, direction: Neutral, decimals: 1 },
    Entry { id: "passes_per_possession", name: "Passes per Possession", category: Tempo, unit: Unit::Count, min: 1.0, max: 8.0, direction: Neutral, decimals: 1 },
    Entry { id: "directness_index", name: "Directness Index", category: Tempo, unit: Unit::Index, min: 0.0, max: 100.0, direction: Neutral, decimals: 0 },
    Entry { id: "counter_attacks_per_match", name: "Counter Attacks per Match", category: Tempo, unit: Unit::PerMatch, min: 0.0, max: 10.0, direction: HigherIsBetter, decimals: 1 },
    Entry { id: "time_to_shot", name: "Time to Shot", category: Tempo, unit: Unit::Seconds, min: 5.0, max: 40.0, direction: LowerIsBetter, decimals: 1 },
    // General
    Entry { id: "points_per_match", name: "Points per Match", category: General, unit: Unit::PerMatch, min: 0.0, max: 3.0, direction: HigherIsBetter, decimals: 2 },
    Entry { id: "fouls_per_match", name: "Fouls per Match", category: General, unit: Unit::PerMatch, min: 0.0, max: 25.0, direction: LowerIsBetter, decimals: 1 },
    Entry { id: "yellow_cards_per_match", name: "Yellow Cards per Match", category: General, unit: Unit::PerMatch, min: 0.0, max: 5.0, direction: LowerIsBetter, decimals: 2 },
];

fn suffix_for(unit: Unit) -> Option<String> {
    match unit {
        Unit::Percentage => Some("%".to_string()),
        Unit::Seconds => Some("s".to_string()),
        Unit::Meters => Some("m".to_string()),
        Unit::Count | Unit::PerMatch | Unit::Ratio | Unit::Index => None,
    }
}

pub(super) fn definitions() -> Vec<MetricDefinition> {
    ENTRIES
        .iter()
        .map(|entry| MetricDefinition {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            category: entry.category,
            unit: entry.unit,
            range: MetricRange {
                min: entry.min,
                max: entry.max,
            },
            direction: entry.direction,
            format: MetricFormat {
                decimals: entry.decimals,
                prefix: None,
                suffix: suffix_for(entry.unit),
            },
        })
        .collect()
}
