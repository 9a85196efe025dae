use std::collections::HashSet;

use geo_grid_regions::{
    fast_smooth, smooth, truncate_mean, ExcludePolicy, Grid, GridData, SmoothConfig, TraverseState,
    WindowMean, WindowOutcome, WindowStatistic, WindowTraverse,
};
use proptest::prelude::*;

/// Walk the whole grid and collect the visited cells in order
fn serpentine(nx: usize, ny: usize, sx: usize, sy: usize) -> Vec<(usize, usize)> {
    let grid = Grid::filled(nx, ny, 1.0, -1.0);
    let mut mean = WindowMean::plain();
    let mut traverse = WindowTraverse::new(nx, ny, sx, sy);
    let mut visited = Vec::new();
    while traverse.increment(&grid, &mut mean) {
        visited.push(traverse.position());
    }
    assert_eq!(traverse.state(), TraverseState::Done);
    assert!(!traverse.increment(&grid, &mut mean));
    visited
}

#[test]
fn test_serpentine_order_4x3() {
    let visited = serpentine(4, 3, 1, 1);
    assert_eq!(
        visited,
        vec![
            (0, 0), (0, 1), (0, 2),
            (1, 2), (1, 1), (1, 0),
            (2, 0), (2, 1), (2, 2),
            (3, 2), (3, 1), (3, 0),
        ]
    );
}

#[test]
fn test_window_sample_counts() {
    // 5x5 grid of ones, 3x3 window: corners see 4 cells, edges 6, interior 9
    let grid = Grid::filled(5, 5, 1.0, -1.0);
    let mut mean = WindowMean::plain();
    let mut traverse = WindowTraverse::new(5, 5, 1, 1);
    while traverse.increment(&grid, &mut mean) {
        let (x, y) = traverse.position();
        let edge_x = x == 0 || x == 4;
        let edge_y = y == 0 || y == 4;
        let expected = match (edge_x, edge_y) {
            (true, true) => 4,
            (true, false) | (false, true) => 6,
            (false, false) => 9,
        };
        assert_eq!(mean.count(), expected, "window at ({x}, {y})");
    }
}

#[test]
fn test_rounding_stability() {
    let grid = Grid::from_values(2, 1, vec![0.1, 0.2], -1.0).unwrap();
    let mut mean = WindowMean::plain();
    mean.increment(0, 0, &grid);
    mean.increment(1, 0, &grid);
    let expected = ((0.1 + 0.2) / 2.0 * 1e6_f64).round() / 1e6;
    assert_eq!(mean.result(0, &grid, 0, 0), WindowOutcome::Present(expected));
    assert_eq!(truncate_mean(0.1 + 0.2), 0.3);
}

#[test]
fn test_rounding_stability_decimal_means() {
    // means of three consecutive tenths, none exact in binary
    for k in 0..500 {
        let values = vec![k as f64 * 0.1 + 0.07, (k + 1) as f64 * 0.1 + 0.07, (k + 2) as f64 * 0.1 + 0.07];
        let grid = Grid::from_values(3, 1, values, -1.0).unwrap();
        let mut mean = WindowMean::plain();
        for x in 0..3 {
            mean.increment(x, 0, &grid);
        }
        let exact = (k + 1) as f64 * 0.1 + 0.07;
        let result = mean.result(0, &grid, 1, 0).value().unwrap();

        let rounded = (exact * 1e6).round() / 1e6;
        assert!((result - rounded).abs() <= 1e-6 + 1e-9, "k={k}: {result} vs {rounded}");
        // always on a 1e-6 step
        let steps = result * 1e6;
        assert!((steps - steps.round()).abs() < 1e-6, "k={k}: {result}");
    }
}

#[test]
fn test_sliding_and_fresh_means_agree_within_truncation() {
    let values: Vec<f64> = (0..36).map(|k| k as f64 * 0.1 + 0.07).collect();
    let mut fast = Grid::from_values(6, 6, values, -1.0).unwrap();
    let mut slow = fast.clone();
    let config = SmoothConfig { half_width_x: 2, half_width_y: 2, ..SmoothConfig::default() };
    fast_smooth(&mut fast, &config);
    smooth(&mut slow, &config);
    for (a, b) in fast.values().iter().zip(slow.values()) {
        assert!((a - b).abs() <= 1e-6 + 1e-9, "{a} vs {b}");
    }
}

#[test]
fn test_exclude_fallback_when_too_few_samples() {
    #[rustfmt::skip]
    let values = vec![
        0.0, 0.0, 0.0,
        0.0, 0.0, 0.0,
        0.0, 0.0, 4.0,
    ];
    let mut grid = Grid::from_values(3, 3, values, -1.0).unwrap();
    let config = SmoothConfig {
        exclude: ExcludePolicy {
            value: Some(0.0),
            reject_center: false,
        },
        min_good: 1,
        ..SmoothConfig::default()
    };
    fast_smooth(&mut grid, &config);
    // one included sample is not more than min_good, so the excluded value wins
    assert_eq!(grid.value(1, 1), Some(0.0));
    assert_eq!(grid.value(0, 0), Some(0.0));
}

#[test]
fn test_large_window_is_global_mean() {
    let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let mut grid = Grid::from_values(4, 3, values, -1.0).unwrap();
    let config = SmoothConfig {
        half_width_x: 10,
        half_width_y: 10,
        ..SmoothConfig::default()
    };
    fast_smooth(&mut grid, &config);
    assert!(grid.values().iter().all(|v| *v == 5.5));
}

proptest! {
    #[test]
    fn prop_traverse_covers_grid_once(nx in 1usize..12, ny in 1usize..12, sx in 0usize..3, sy in 0usize..3) {
        let visited = serpentine(nx, ny, sx, sy);
        prop_assert_eq!(visited.len(), nx * ny);
        let distinct: HashSet<_> = visited.iter().copied().collect();
        prop_assert_eq!(distinct.len(), nx * ny);
        prop_assert_eq!(visited[0], (0, 0));
        for pair in visited.windows(2) {
            let dx = pair[0].0.abs_diff(pair[1].0);
            let dy = pair[0].1.abs_diff(pair[1].1);
            prop_assert_eq!(dx + dy, 1, "step {:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn prop_increment_decrement_inverse(
        (values, order) in prop::collection::vec(-50i32..50, 1..40).prop_flat_map(|v| {
            let n = v.len();
            (Just(v), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        }),
        exclude in -3i32..3,
    ) {
        let n = values.len();
        let grid = Grid::from_values(n, 1, values.iter().map(|v| *v as f64).collect(), -999.0).unwrap();
        let mut mean = WindowMean::new(ExcludePolicy { value: Some(exclude as f64), reject_center: false });

        // some starting state that must be restored
        mean.increment(0, 0, &grid);
        let before = (mean.sum(), mean.count(), mean.num_excluded());

        for x in 0..n {
            mean.increment(x, 0, &grid);
        }
        for &x in &order {
            mean.decrement(x, 0, &grid);
        }
        prop_assert_eq!((mean.sum(), mean.count(), mean.num_excluded()), before);
    }

    #[test]
    fn prop_fast_smooth_matches_brute_force(
        nx in 1usize..9,
        ny in 1usize..9,
        sx in 0usize..3,
        sy in 0usize..3,
        cents in prop::collection::vec(prop::option::weighted(0.9, -5000i32..5000), 64),
    ) {
        let values: Vec<f64> = cents[..nx * ny]
            .iter()
            .map(|c| c.map_or(-999.0, |c| c as f64 * 0.01))
            .collect();
        let mut fast = Grid::from_values(nx, ny, values, -999.0).unwrap();
        let mut slow = fast.clone();
        let config = SmoothConfig { half_width_x: sx, half_width_y: sy, ..SmoothConfig::default() };
        fast_smooth(&mut fast, &config);
        smooth(&mut slow, &config);

        for (i, (a, b)) in fast.values().iter().zip(slow.values()).enumerate() {
            if *a == -999.0 || *b == -999.0 {
                prop_assert_eq!(a, b, "cell {}", i);
            } else {
                prop_assert!((a - b).abs() <= 1e-6 + 1e-9, "cell {}: {} vs {}", i, a, b);
            }
        }
    }
}
