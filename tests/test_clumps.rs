use geo_grid_regions::{
    ClumpBuilder, ClumpConfig, ClumpRecord, FuzzyFunction, Grid, GridData, Label, RegionLabeler,
};
use proptest::prelude::*;

/// Storm-like field: two blobs above 30 and one isolated speck
fn create_test_grid() -> Grid {
    #[rustfmt::skip]
    let values = vec![
        35.0, 40.0,  0.0,  0.0,  0.0,  0.0,
        32.0, 45.0,  0.0,  0.0, 31.0,  0.0,
         0.0,  0.0,  0.0,  0.0,  0.0,  0.0,
         0.0,  0.0, 50.0, 55.0, 52.0,  0.0,
         0.0,  0.0, 51.0, -1.0, 60.0,  0.0,
    ];
    Grid::from_values(6, 5, values, -1.0).unwrap()
}

fn config(min_clump_points: usize) -> ClumpConfig {
    ClumpConfig {
        threshold: Some(30.0),
        max_clump_points: None,
        min_clump_points,
    }
}

#[test]
fn test_storm_clumps() {
    let data = create_test_grid();
    let mut builder = ClumpBuilder::new(6, 5, config(0));
    assert_eq!(builder.build(&data).unwrap(), 3);

    let sizes: Vec<usize> = builder.clumps().iter().map(ClumpRecord::npt).collect();
    assert_eq!(sizes, vec![4, 1, 5]);

    let minima: Vec<Option<f64>> = builder
        .clumps()
        .iter()
        .map(ClumpRecord::min_clump_data_value)
        .collect();
    assert_eq!(minima, vec![Some(32.0), Some(31.0), Some(50.0)]);

    // the missing cell in the middle of the lower blob is rejected, not clumped
    assert_eq!(builder.labeler().label(3, 4), Label::Rejected);
}

#[test]
fn test_every_member_carries_its_clump_id() {
    let data = create_test_grid();
    let mut builder = ClumpBuilder::new(6, 5, config(0));
    builder.build(&data).unwrap();
    let labels = builder.clump_grid(-99.0);
    for clump in builder.clumps() {
        for &index in clump.indices() {
            assert_eq!(labels.value_at_index(index), Some(clump.id() as f64));
        }
    }
}

#[test]
fn test_remove_and_rescale_small_clumps() {
    let mut data = create_test_grid();
    let mut builder = ClumpBuilder::new(6, 5, config(2));
    builder.build(&data).unwrap();
    assert_eq!(builder.flagged().count(), 1);

    let f = FuzzyFunction::new(vec![(30.0, 0.0), (40.0, 1.0)]);
    let mut scale = Grid::new(6, 5, -1.0);
    builder.rescale(&f, &mut scale).unwrap();
    assert_eq!(scale.value(4, 1), Some(0.1));
    assert_eq!(scale.value(0, 0), Some(1.0));

    builder.remove_small(&mut data);
    assert_eq!(data.value(4, 1), None);
    assert_eq!(data.value(0, 0), Some(35.0));
    assert_eq!(builder.labeler().label(4, 1), Label::Bad);
}

#[test]
fn test_rebuild_replaces_previous_pass() {
    let data = create_test_grid();
    let mut builder = ClumpBuilder::new(6, 5, config(0));
    builder.build(&data).unwrap();
    let empty = Grid::filled(6, 5, 0.0, -1.0);
    assert_eq!(builder.build(&empty).unwrap(), 0);
    assert_eq!(builder.labeler().num_clumps(), 0);
}

#[test]
fn test_labeler_driven_by_hand() {
    // a driver that grows two clumps and then finds they touch
    let mut labeler = RegionLabeler::new(4, 1);
    assert!(labeler.mark_point(0, 0));
    assert!(labeler.mark_point(1, 0));
    assert_eq!(labeler.current_area(), 2);
    labeler.start_next_clump();
    assert!(labeler.mark_point(2, 0));
    labeler.mark_point_not_wanted(3, 0);
    labeler.start_next_clump();

    assert_eq!(labeler.num_clumps(), 2);
    assert_eq!(labeler.to_grid(-9.0).values(), &[1.0, 1.0, 2.0, 0.0]);
}

proptest! {
    #[test]
    fn prop_clump_min_is_order_independent(values in Just(vec![5.0, 2.0, 8.0, 1.0, 9.0]).prop_shuffle()) {
        let mut clump = ClumpRecord::new(1);
        for (i, v) in values.iter().enumerate() {
            clump.add_point(i, *v);
        }
        prop_assert_eq!(clump.min_clump_data_value(), Some(1.0));
        prop_assert_eq!(clump.npt(), 5);
    }

    #[test]
    fn prop_clumps_partition_accepted_cells(
        nx in 1usize..10,
        ny in 1usize..10,
        cells in prop::collection::vec(0u8..3, 100),
    ) {
        let values: Vec<f64> = cells.iter().take(nx * ny).map(|c| *c as f64).collect();
        let data = Grid::from_values(nx, ny, values, -1.0).unwrap();
        let mut builder = ClumpBuilder::new(nx, ny, ClumpConfig { threshold: Some(1.0), ..ClumpConfig::default() });
        builder.build(&data).unwrap();

        let accepted = (0..nx * ny).filter(|i| data.value_at_index(*i).is_some_and(|v| v >= 1.0)).count();
        let clumped: usize = builder.clumps().iter().map(ClumpRecord::npt).sum();
        prop_assert_eq!(clumped, accepted);

        // 8-adjacent accepted cells always share an id
        let labels = builder.clump_grid(-1.0);
        for y in 0..ny {
            for x in 0..nx.saturating_sub(1) {
                let a = labels.value(x, y).unwrap_or(0.0);
                let b = labels.value(x + 1, y).unwrap_or(0.0);
                if a > 0.0 && b > 0.0 {
                    prop_assert_eq!(a, b);
                }
            }
        }
    }
}
