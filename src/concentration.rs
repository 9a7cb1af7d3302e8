/// Gini coefficient of a nonnegative distribution. Negative entries are
/// invalid and discarded rather than counted as negative contributions.
/// An empty or all-zero distribution has nothing to concentrate: 0.0.
pub fn gini(values: &[f64]) -> f64 {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| *x >= 0.0).collect();
    if v.is_empty() || v.iter().all(|x| *x == 0.0) {
        return 0.0;
    }
    v.sort_by(f64::total_cmp);

    let n = v.len() as f64;
    let total: f64 = v.iter().sum();
    let mut cum = 0.0;
    let mut cum_share_sum = 0.0;
    for x in &v {
        cum += x;
        cum_share_sum += cum / total;
    }
    1.0 + 1.0 / n - 2.0 * cum_share_sum / n
}

/// Herfindahl–Hirschman index: sum of squared shares of the raw total.
/// 1/N for N equal participants, 1.0 for total concentration, 0.0 when
/// the total is not positive.
pub fn herfindahl(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    values.iter().map(|v| (v / total).powi(2)).sum()
}
