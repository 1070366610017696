use squigrank_core::curve::{log_grid, parse_measurement, standardize};
use squigrank_core::score::preference_score;
use squigrank_core::Error;

#[test]
fn test_round_trip_on_canonical_grid() {
    // Points already sampled exactly on the grid come back unchanged.
    let grid = log_grid(500);
    let amplitudes: Vec<f64> = (0..500).map(|i| ((i % 13) as f64) * 0.7 - 3.0).collect();
    let raw: Vec<(f64, f64)> = grid.iter().copied().zip(amplitudes.iter().copied()).collect();

    let curve = standardize(&raw, &grid).unwrap();
    assert_eq!(curve.len(), grid.len());
    for (got, want) in curve.iter().zip(amplitudes.iter()) {
        assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
    }
}

#[test]
fn test_unsorted_input_is_sorted_first() {
    let raw = vec![(200.0, 10.0), (20.0, 0.0), (100.0, 5.0)];
    let grid = vec![20.0, 100.0, 200.0];
    let curve = standardize(&raw, &grid).unwrap();
    assert!((curve[0] - 0.0).abs() < 1e-9);
    assert!((curve[1] - 5.0).abs() < 1e-9);
    assert!((curve[2] - 10.0).abs() < 1e-9);
}

#[test]
fn test_zero_error_clamps_to_ceiling() {
    let grid = log_grid(500);
    let target: Vec<f64> = (0..500).map(|i| (i as f64 * 0.01).sin() * 4.0).collect();
    // raw 114.39 exceeds the scale; documented ceiling applies.
    assert_eq!(preference_score(&target, &target, &grid), 100.0);
}

#[test]
fn test_flat_error_penalized_only_by_sd() {
    // Mirror-symmetric error: zero regression slope against log-frequency,
    // nonzero spread. Only the 0.6·sd term moves the score.
    //
    // n = 11, error = [80, 0, ..., 0, 80]:
    //   sd = 80·sqrt(198/121/10) = 32.3616…
    //   score = 114.39 − 0.6·32.3616… = 94.973… → 94.97
    let grid = log_grid(11);
    let mut adjusted = vec![0.0; 11];
    adjusted[0] = 80.0;
    adjusted[10] = 80.0;
    let target = vec![0.0; 11];

    let score = preference_score(&adjusted, &target, &grid);
    assert!((score - 94.97).abs() < 1e-9, "got {score}");
}

#[test]
fn test_dc_offset_does_not_change_score() {
    // Absolute level differences between rigs are normalized away.
    let grid = log_grid(200);
    let target: Vec<f64> = grid.iter().map(|f| (f.log10() - 2.0).powi(2)).collect();
    let adjusted: Vec<f64> = target.iter().map(|v| v + 1.0).collect();
    let shifted: Vec<f64> = target.iter().map(|v| v + 37.5).collect();

    assert_eq!(
        preference_score(&adjusted, &target, &grid),
        preference_score(&shifted, &target, &grid)
    );
}

#[test]
fn test_empty_measurement_is_malformed_not_zero() {
    // An unparseable measurement is a skip condition for the caller; it must
    // not silently become a 0-score row.
    let result = parse_measurement("");
    assert!(matches!(result, Err(Error::MalformedMeasurement(_))));
}

#[test]
fn test_arbitrary_resolution_resamples_to_grid_length() {
    let raw: Vec<(f64, f64)> = vec![
        (18.2, 4.1),
        (95.0, 2.0),
        (440.0, -0.5),
        (3100.0, 7.9),
        (19950.0, -6.0),
    ];
    let grid = log_grid(500);
    let curve = standardize(&raw, &grid).unwrap();
    assert_eq!(curve.len(), 500);
    assert!(curve.iter().all(|v| v.is_finite()));
}
