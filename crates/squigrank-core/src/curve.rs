use crate::error::Error;

pub const GRID_MIN_HZ: f64 = 20.0;
pub const GRID_MAX_HZ: f64 = 20_000.0;

/// Canonical logarithmically spaced frequency grid over 20 Hz–20 kHz.
///
/// Every standardized curve is sampled on this grid, so curves from any two
/// sources compare element-wise.
pub fn log_grid(points: usize) -> Vec<f64> {
    if points < 2 {
        return vec![GRID_MIN_HZ];
    }
    let ratio = GRID_MAX_HZ / GRID_MIN_HZ;
    (0..points)
        .map(|i| GRID_MIN_HZ * ratio.powf(i as f64 / (points - 1) as f64))
        .collect()
}

/// Parse raw measurement text: two numeric columns (frequency, amplitude),
/// tab/space/comma/semicolon delimited, no header. Comment lines and lines
/// that fail to parse are skipped; zero usable samples is malformed.
pub fn parse_measurement(text: &str) -> Result<Vec<(f64, f64)>, Error> {
    let mut points = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') || line.starts_with('#') {
            continue;
        }
        let mut fields = line
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|t| !t.is_empty());
        let (Some(freq), Some(amp)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(freq), Ok(amp)) = (freq.parse::<f64>(), amp.parse::<f64>()) else {
            continue;
        };
        if freq.is_finite() && freq > 0.0 && amp.is_finite() {
            points.push((freq, amp));
        }
    }

    if points.is_empty() {
        return Err(Error::MalformedMeasurement(
            "no numeric samples in measurement text".to_string(),
        ));
    }
    Ok(points)
}

/// Resample raw (frequency, amplitude) points onto `grid`.
///
/// Linear interpolation in linear-frequency/linear-amplitude space. Grid
/// points outside the observed range are extrapolated from the nearest
/// segment, so the output always has exactly `grid.len()` values.
pub fn standardize(raw: &[(f64, f64)], grid: &[f64]) -> Result<Vec<f64>, Error> {
    let mut points: Vec<(f64, f64)> = raw
        .iter()
        .copied()
        .filter(|(f, a)| f.is_finite() && *f > 0.0 && a.is_finite())
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    // Duplicate frequencies collapse to the first-seen amplitude.
    points.dedup_by(|next, prev| next.0 == prev.0);

    if points.len() < 2 {
        return Err(Error::MalformedMeasurement(
            "fewer than two distinct frequencies".to_string(),
        ));
    }

    let curve = grid
        .iter()
        .map(|&g| {
            let idx = points.partition_point(|p| p.0 < g).clamp(1, points.len() - 1);
            let (x0, y0) = points[idx - 1];
            let (x1, y1) = points[idx];
            let t = (g - x0) / (x1 - x0);
            y0 + t * (y1 - y0)
        })
        .collect();

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_grid_endpoints() {
        let grid = log_grid(500);
        assert_eq!(grid.len(), 500);
        assert!((grid[0] - 20.0).abs() < 1e-9);
        assert!((grid[499] - 20_000.0).abs() < 1e-6);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_log_grid_constant_ratio() {
        let grid = log_grid(4);
        let r1 = grid[1] / grid[0];
        let r2 = grid[2] / grid[1];
        let r3 = grid[3] / grid[2];
        assert!((r1 - r2).abs() < 1e-9);
        assert!((r2 - r3).abs() < 1e-9);
    }

    #[test]
    fn test_parse_delimiters() {
        let tabbed = parse_measurement("20\t1.5\n100\t2.5").unwrap();
        let spaced = parse_measurement("20 1.5\n100 2.5").unwrap();
        let comma = parse_measurement("20,1.5\n100,2.5").unwrap();
        assert_eq!(tabbed, spaced);
        assert_eq!(spaced, comma);
        assert_eq!(tabbed, vec![(20.0, 1.5), (100.0, 2.5)]);
    }

    #[test]
    fn test_parse_skips_comments_and_junk() {
        let text = "* REW export\n# header\n20 1.0\nnot numbers\n100 2.0\n";
        let points = parse_measurement(text).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_parse_empty_is_malformed() {
        assert!(matches!(
            parse_measurement(""),
            Err(Error::MalformedMeasurement(_))
        ));
        assert!(matches!(
            parse_measurement("no data here\n"),
            Err(Error::MalformedMeasurement(_))
        ));
    }

    #[test]
    fn test_standardize_extrapolates() {
        let raw = vec![(100.0, 0.0), (200.0, 10.0)];
        let grid = vec![50.0, 100.0, 150.0, 200.0, 400.0];
        let curve = standardize(&raw, &grid).unwrap();
        let expected = [-5.0, 0.0, 5.0, 10.0, 30.0];
        for (got, want) in curve.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_standardize_single_point_is_malformed() {
        let raw = vec![(100.0, 3.0), (100.0, 4.0)];
        assert!(matches!(
            standardize(&raw, &[50.0, 100.0]),
            Err(Error::MalformedMeasurement(_))
        ));
    }
}
