use approx::assert_relative_eq;
use simfov::games::{map, Conversion, GameProfile, GameTable};
use simfov::geometry::{solve, AspectRatio, Axis, Layout, ScreenSpec, Surface, ViewerPosition};
use simfov::units::{ScreenInput, ViewerInput, DEFAULT_MIN_CURVE_RADIUS_MM};
use simfov::InvalidGeometry;

fn flat_single(diagonal_in: f64) -> ScreenSpec {
    ScreenSpec {
        diagonal_in,
        ratio: AspectRatio::new(16.0, 9.0),
        surface: Surface::Flat,
        layout: Layout::Single,
    }
}

fn at(distance_cm: f64) -> ViewerPosition {
    ViewerPosition { distance_cm }
}

#[test]
fn horizontal_grows_with_size_and_shrinks_with_distance() {
    let mut previous = 0.0;
    for size in (20..=60).map(f64::from) {
        let h = solve(&flat_single(size), &at(80.0)).unwrap().horizontal_deg();
        assert!(h > previous, "{}\" gave {}° after {}°", size, h, previous);
        previous = h;
    }

    let mut previous = f64::MAX;
    for distance in (40..=150).step_by(5).map(f64::from) {
        let h = solve(&flat_single(32.0), &at(distance)).unwrap().horizontal_deg();
        assert!(h < previous, "{} cm gave {}° after {}°", distance, h, previous);
        previous = h;
    }
}

#[test]
fn curved_converges_to_flat() {
    let flat = solve(&flat_single(32.0), &at(80.0)).unwrap();
    let mut last_gap = f64::MAX;
    for radius_cm in [100.0, 1_000.0, 10_000.0, 1.0e6] {
        let spec = ScreenSpec {
            surface: Surface::Curved { radius_cm },
            ..flat_single(32.0)
        };
        let gap = solve(&spec, &at(80.0)).unwrap().horizontal_deg() - flat.horizontal_deg();
        assert!(gap >= 0.0 && gap <= last_gap);
        last_gap = gap;
    }
    assert!(last_gap <= 0.01);
}

#[test]
fn scenario_single_flat_32in() {
    let result = solve(&flat_single(32.0), &at(80.0)).unwrap();
    assert_relative_eq!(result.width_cm(), 70.84, epsilon = 0.01);
    assert_relative_eq!(result.horizontal_deg(), 47.8, epsilon = 0.05);
    assert_relative_eq!(result.vertical_deg(), 28.0, epsilon = 0.05);
}

#[test]
fn scenario_curve_100cm_is_wider() {
    let flat = solve(&flat_single(32.0), &at(80.0)).unwrap();
    let curved = ScreenSpec {
        surface: Surface::Curved { radius_cm: 100.0 },
        ..flat_single(32.0)
    };
    assert!(solve(&curved, &at(80.0)).unwrap().horizontal_deg() > flat.horizontal_deg());
}

#[test]
fn radius_equal_to_half_width_fails() {
    let half_width = solve(&flat_single(32.0), &at(80.0)).unwrap().width_cm() / 2.0;
    let spec = ScreenSpec {
        surface: Surface::Curved {
            radius_cm: half_width,
        },
        ..flat_single(32.0)
    };
    assert!(matches!(
        solve(&spec, &at(80.0)),
        Err(InvalidGeometry::RadiusTooSmall { .. })
    ));
}

#[test]
fn triple_regimes() {
    let spec = ScreenSpec {
        layout: Layout::Triple { bezel_cm: 2.0 },
        ..flat_single(27.0)
    };
    let effective_width = solve(&flat_single(27.0), &at(60.0)).unwrap().width_cm() + 4.0;
    let distance_for = |deg: f64| (effective_width / 2.0) / (deg.to_radians() / 2.0).tan();

    let narrow = solve(&spec, &at(distance_for(60.0))).unwrap();
    assert_relative_eq!(narrow.triple_screen_deg().unwrap(), 180.0, epsilon = 0.02);

    let wide = solve(&spec, &at(distance_for(100.0))).unwrap();
    let total = wide.triple_screen_deg().unwrap();
    assert!((total - 300.0).abs() > 1.0, "wrap total {} looks like a plain sum", total);
    assert!(total > 0.0 && total <= 360.0);
}

#[test]
fn f1_mapping_from_vertical() {
    // Find a distance where the vertical FOV is 87°
    let spec = flat_single(32.0);
    let height = solve(&spec, &at(80.0)).unwrap().height_cm();
    let distance = (height / 2.0) / 43.5_f64.to_radians().tan();
    let result = solve(&spec, &at(distance)).unwrap();
    assert_relative_eq!(result.vertical_deg(), 87.0, epsilon = 0.01);

    let profile = GameProfile::new(
        "F1",
        Axis::Vertical,
        Conversion::F1 { pivot_deg: 77.0 },
        1.0,
        1,
        "",
    );
    assert_eq!(map(&profile, &result, "n/a"), "5.0");
}

#[test]
fn raw_input_through_to_games() {
    let screen = ScreenInput {
        ratio: "21:9".parse().unwrap(),
        diagonal_in: 34.0,
        curve_radius_mm: 1800.0,
        ..ScreenInput::default()
    };
    let viewer = ViewerInput::default();

    let spec = screen.to_spec(DEFAULT_MIN_CURVE_RADIUS_MM).unwrap();
    let result = solve(&spec, &viewer.to_position().unwrap()).unwrap();
    let values = GameTable::default().map_all(&result);

    assert_eq!(values.len(), 26);
    assert!(values.iter().all(|v| v.value != "n/a"));
}
