use crate::types::RiskLevel;

/// Upper bounds (exclusive) of each tier, ascending. Anything at or above the
/// last bound is `VeryLow`.
const THRESHOLDS: [(f64, RiskLevel); 3] = [
    (50.0, RiskLevel::High),
    (500.0, RiskLevel::Medium),
    (5000.0, RiskLevel::Low),
];

/// Classify an LD50 value (mg/kg) into a risk tier.
///
/// Intervals are half-open with the lower bound inclusive, so exactly 50 is
/// `Medium`. A missing or NaN value is `Unknown`.
pub fn classify_risk(value: Option<f64>) -> RiskLevel {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return RiskLevel::Unknown,
    };

    THRESHOLDS
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::VeryLow)
}
