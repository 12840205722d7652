pub mod comparison;
pub mod engine;
pub mod normalize;
pub mod snapshot;

pub use comparison::{ComparisonRecord, LeagueDelta, Side, Verdict, DEFAULT_SIGNIFICANCE_THRESHOLD};
pub use engine::{AggregationEngine, BucketSplit, ProfilePoint, TeamComparison, TeamProfile};
pub use snapshot::{LeagueMetricSnapshot, LeagueSummary, RankedTeam};
