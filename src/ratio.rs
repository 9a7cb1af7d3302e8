/// Marker printed wherever a ratio has no denominator.
pub const NO_DATA: &str = "—";

pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// One-decimal percentage, or the no-data marker when the denominator is
/// zero. Every user-facing ratio goes through here so an empty subset
/// never turns into a division by zero.
pub fn safe_pct(numerator: f64, denominator: f64) -> String {
    match safe_div(100.0 * numerator, denominator) {
        Some(v) => format!("{v:.1}%"),
        None => NO_DATA.to_string(),
    }
}
