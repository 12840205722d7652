use crate::catalog::{Direction, MetricDefinition};

pub const SCALE_MAX: f64 = 100.0;

/// Rescales a raw value into `[0, 100]` over the metric's range.
///
/// Out-of-range values are clamped first. Lower-is-better metrics are inverted
/// so a better value always sits higher on a radar axis. NaN maps to 0.
pub fn normalize(definition: &MetricDefinition, value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }

    let range = definition.range;
    let clamped = range.clamp(value);
    let scaled = ((clamped - range.min) / range.span() * SCALE_MAX).clamp(0.0, SCALE_MAX);

    match definition.direction {
        Direction::LowerIsBetter => SCALE_MAX - scaled,
        Direction::HigherIsBetter | Direction::Neutral => scaled,
    }
}

/// Maps a normalized score onto a chart axis with a different domain.
pub fn scale_to_axis(normalized: f64, axis_min: f64, axis_max: f64) -> f64 {
    let fraction = normalized.clamp(0.0, SCALE_MAX) / SCALE_MAX;
    axis_min + fraction * (axis_max - axis_min)
}
