/// Published listener-preference regression model. The coefficients are an
/// external specification and must not be re-derived.
pub const PREFERENCE_INTERCEPT: f64 = 114.39;
pub const SD_WEIGHT: f64 = 0.6;
pub const SLOPE_WEIGHT: f64 = 26.3;

/// Preference score in [0, 100] for a rig-compensated curve against its
/// target.
///
/// error = adjusted − target, with its mean removed so absolute level between
/// rigs cannot move the score. Penalties: Bessel-corrected standard deviation
/// of the error, and the absolute least-squares slope of the error against
/// log10(frequency). Any numeric failure scores 0 so the ranking stays total
/// over all ingested items.
pub fn preference_score(adjusted: &[f64], target: &[f64], grid: &[f64]) -> f64 {
    try_score(adjusted, target, grid).unwrap_or(0.0)
}

fn try_score(adjusted: &[f64], target: &[f64], grid: &[f64]) -> Option<f64> {
    let n = adjusted.len();
    if n < 2 || target.len() != n || grid.len() != n {
        return None;
    }

    let mut error = Vec::with_capacity(n);
    for (a, t) in adjusted.iter().zip(target.iter()) {
        let e = a - t;
        if !e.is_finite() {
            return None;
        }
        error.push(e);
    }

    // DC removal: only the shape of the deviation matters.
    let mean = error.iter().sum::<f64>() / n as f64;
    for e in &mut error {
        *e -= mean;
    }

    let sum_sq = error.iter().map(|e| e * e).sum::<f64>();
    let sd = (sum_sq / (n as f64 - 1.0)).sqrt();

    let xs: Vec<f64> = grid.iter().map(|f| f.log10()).collect();
    if xs.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let x_mean = xs.iter().sum::<f64>() / n as f64;
    let sxx = xs.iter().map(|x| (x - x_mean) * (x - x_mean)).sum::<f64>();
    if !(sxx > 0.0) {
        return None;
    }
    let sxy = xs
        .iter()
        .zip(error.iter())
        .map(|(x, e)| (x - x_mean) * e)
        .sum::<f64>();
    let slope = sxy / sxx;

    let raw = PREFERENCE_INTERCEPT - SD_WEIGHT * sd - SLOPE_WEIGHT * slope.abs();
    if !raw.is_finite() {
        return None;
    }
    Some((raw.clamp(0.0, 100.0) * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::log_grid;

    #[test]
    fn test_identical_curves_hit_ceiling() {
        let grid = log_grid(500);
        let curve: Vec<f64> = grid.iter().map(|f| f.log10() * 2.0).collect();
        // Zero error everywhere: raw 114.39, clamped to 100.
        assert_eq!(preference_score(&curve, &curve, &grid), 100.0);
    }

    #[test]
    fn test_two_point_exact_value() {
        // grid [20, 20000]: log10 spans exactly 3 decades.
        // error [0, 3] → sd = sqrt(4.5), slope = 1.0
        // 114.39 − 0.6·2.1213203 − 26.3·1 = 86.8172 → 86.82
        let grid = log_grid(2);
        let adjusted = vec![0.0, 3.0];
        let target = vec![0.0, 0.0];
        let score = preference_score(&adjusted, &target, &grid);
        assert!((score - 86.82).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_slope_sign_is_irrelevant() {
        let grid = log_grid(100);
        let target = vec![0.0; 100];
        let rising: Vec<f64> = grid.iter().map(|f| f.log10() * 1.5).collect();
        let falling: Vec<f64> = rising.iter().map(|v| -v).collect();
        assert_eq!(
            preference_score(&rising, &target, &grid),
            preference_score(&falling, &target, &grid)
        );
    }

    #[test]
    fn test_degenerate_inputs_score_zero() {
        let grid = log_grid(10);
        // Length mismatch
        assert_eq!(preference_score(&[0.0; 9], &[0.0; 10], &grid), 0.0);
        // Too few points
        assert_eq!(preference_score(&[0.0], &[0.0], &[100.0]), 0.0);
        // Non-finite error
        let mut bad = vec![0.0; 10];
        bad[3] = f64::NAN;
        assert_eq!(preference_score(&bad, &[0.0; 10], &grid), 0.0);
        // Zero frequency variance
        assert_eq!(
            preference_score(&[0.0, 1.0], &[0.0, 0.0], &[1000.0, 1000.0]),
            0.0
        );
    }
}
