use std::f64::consts::{FRAC_PI_2, PI, TAU};
use thiserror::Error;
use tracing::debug;

use super::screen::{Axis, Layout, ScreenSpec, Surface, ViewerPosition};
use super::{angular_size_arc, angular_size_flat, INCH_TO_CM};

/// Rejected screen/viewer configuration. No partial result is ever produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidGeometry {
    #[error("Invalid geometry: {field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Invalid geometry: bezel must be zero or more, got {0} cm")]
    NegativeBezel(f64),

    #[error(
        "Invalid geometry: curve radius {radius_cm:.1} cm must exceed half the screen width ({half_width_cm:.1} cm)"
    )]
    RadiusTooSmall { radius_cm: f64, half_width_cm: f64 },

    #[error("Invalid geometry: curved screen chord is undefined")]
    UndefinedChord,

    #[error("Invalid geometry: screen spans less than 0.01° ({horizontal_deg}° x {vertical_deg}°)")]
    Imperceptible { horizontal_deg: f64, vertical_deg: f64 },
}

/// Horizontal coverage of the whole arrangement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    Single,
    Triple { total_deg: f64 },
}

/// Solved field of view. Angles are in degrees rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct FovResult {
    width_cm: f64,
    height_cm: f64,
    horizontal_deg: f64,
    vertical_deg: f64,
    span: Span,
    side_angle_deg: f64,
    spec: ScreenSpec,
    viewer: ViewerPosition,
}

impl FovResult {
    /// Width of a single panel without bezels
    pub fn width_cm(&self) -> f64 {
        self.width_cm
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    /// Horizontal FOV of one panel (bezels included for triple layouts)
    pub fn horizontal_deg(&self) -> f64 {
        self.horizontal_deg
    }

    pub fn vertical_deg(&self) -> f64 {
        self.vertical_deg
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Combined horizontal FOV of a triple layout
    pub fn triple_screen_deg(&self) -> Option<f64> {
        match self.span {
            Span::Single => None,
            Span::Triple { total_deg } => Some(total_deg),
        }
    }

    /// Angle of the side panels relative to the center panel
    pub fn side_angle_deg(&self) -> f64 {
        self.side_angle_deg
    }

    pub fn spec(&self) -> &ScreenSpec {
        &self.spec
    }

    pub fn viewer(&self) -> &ViewerPosition {
        &self.viewer
    }

    pub fn axis_deg(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal_deg,
            Axis::Vertical => self.vertical_deg,
        }
    }

    /// Build a result with arbitrary axis values, bypassing the solver.
    #[cfg(test)]
    pub(crate) fn with_axes(horizontal_deg: f64, vertical_deg: f64) -> Self {
        use super::screen::AspectRatio;

        Self {
            width_cm: 70.84,
            height_cm: 39.85,
            horizontal_deg,
            vertical_deg,
            span: Span::Single,
            side_angle_deg: horizontal_deg.min(90.0),
            spec: ScreenSpec {
                diagonal_in: 32.0,
                ratio: AspectRatio::new(16.0, 9.0),
                surface: Surface::Flat,
                layout: Layout::Single,
            },
            viewer: ViewerPosition { distance_cm: 80.0 },
        }
    }
}

/// Solve the field of view for a screen arrangement seen from `viewer`.
///
/// Vertical FOV always comes from the bare panel: bezels and curvature only
/// change how wide the arrangement appears.
///
/// For triple layouts whose panels each span more than 90°, the total is
/// estimated by measuring the panel again from an inverted distance
/// (`width - distance`) and taking the remainder of a full turn. This is an
/// approximation of the wrap-around behind the viewer, not a projection.
pub fn solve(spec: &ScreenSpec, viewer: &ViewerPosition) -> Result<FovResult, InvalidGeometry> {
    validate(spec, viewer)?;

    let ratio = spec.ratio;
    let distance = viewer.distance_cm;

    let diagonal_cm = spec.diagonal_in * INCH_TO_CM;
    let scale = diagonal_cm / ratio.diagonal();
    let actual_width = ratio.h * scale;
    let actual_height = ratio.v * scale;
    let true_angle = angular_size_flat(actual_width, distance);

    let effective_width = match spec.layout {
        Layout::Single => actual_width,
        Layout::Triple { bezel_cm } => actual_width + bezel_cm * 2.0,
    };

    let panel = panel_angle(spec.surface, effective_width, distance)?.min(PI);
    let vertical = 2.0 * ((true_angle / 2.0).tan() * ratio.v / ratio.h).atan2(1.0);

    let span = match spec.layout {
        Layout::Single => Span::Single,
        Layout::Triple { .. } => {
            let total = if panel <= FRAC_PI_2 {
                panel * 3.0
            } else {
                let inverted_distance = actual_width - distance;
                TAU - panel_angle(spec.surface, effective_width, inverted_distance)?
            };
            Span::Triple {
                total_deg: round_degrees(total).clamp(0.0, 360.0),
            }
        }
    };

    let horizontal_deg = round_degrees(panel).clamp(0.0, 180.0);
    let vertical_deg = round_degrees(vertical).clamp(0.0, 180.0);
    if horizontal_deg <= 0.0 || vertical_deg <= 0.0 {
        return Err(InvalidGeometry::Imperceptible {
            horizontal_deg,
            vertical_deg,
        });
    }

    let result = FovResult {
        width_cm: actual_width,
        height_cm: actual_height,
        horizontal_deg,
        vertical_deg,
        span,
        side_angle_deg: round_degrees(panel.min(FRAC_PI_2)).clamp(0.0, 90.0),
        spec: *spec,
        viewer: *viewer,
    };

    debug!(
        "Solved {}\" {} at {} cm: h={}° v={}° span={:?}",
        spec.diagonal_in, ratio, distance, result.horizontal_deg, result.vertical_deg, result.span
    );

    Ok(result)
}

fn validate(spec: &ScreenSpec, viewer: &ViewerPosition) -> Result<(), InvalidGeometry> {
    positive("ratio.h", spec.ratio.h)?;
    positive("ratio.v", spec.ratio.v)?;
    positive("diagonal", spec.diagonal_in)?;
    positive("distance", viewer.distance_cm)?;

    if let Surface::Curved { radius_cm } = spec.surface {
        positive("curve radius", radius_cm)?;
    }
    if let Layout::Triple { bezel_cm } = spec.layout {
        if !(bezel_cm >= 0.0 && bezel_cm.is_finite()) {
            return Err(InvalidGeometry::NegativeBezel(bezel_cm));
        }
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), InvalidGeometry> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(InvalidGeometry::NotPositive { field, value })
    }
}

/// Angle subtended by one panel of `width` (arc length when curved)
fn panel_angle(surface: Surface, width: f64, distance: f64) -> Result<f64, InvalidGeometry> {
    match surface {
        Surface::Flat => Ok(angular_size_flat(width, distance)),
        Surface::Curved { radius_cm } => {
            let half_width_cm = width / 2.0;
            if radius_cm <= half_width_cm {
                return Err(InvalidGeometry::RadiusTooSmall {
                    radius_cm,
                    half_width_cm,
                });
            }
            angular_size_arc(width, radius_cm, distance).ok_or(InvalidGeometry::UndefinedChord)
        }
    }
}

fn round_degrees(radians: f64) -> f64 {
    (radians.to_degrees() * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AspectRatio;
    use approx::assert_relative_eq;

    fn spec(diagonal_in: f64, surface: Surface, layout: Layout) -> ScreenSpec {
        ScreenSpec {
            diagonal_in,
            ratio: AspectRatio::new(16.0, 9.0),
            surface,
            layout,
        }
    }

    fn at(distance_cm: f64) -> ViewerPosition {
        ViewerPosition { distance_cm }
    }

    /// Distance at which one 27" 16:9 panel plus bezels spans `panel_deg`
    fn distance_for_panel(panel_deg: f64, bezel_cm: f64) -> f64 {
        let width = 27.0 * INCH_TO_CM * 16.0 / AspectRatio::new(16.0, 9.0).diagonal();
        (width / 2.0 + bezel_cm) / (panel_deg.to_radians() / 2.0).tan()
    }

    #[test]
    fn test_single_flat_32in() {
        let result = solve(&spec(32.0, Surface::Flat, Layout::Single), &at(80.0)).unwrap();

        assert_relative_eq!(result.width_cm(), 70.84, epsilon = 0.01);
        assert_relative_eq!(result.height_cm(), 39.85, epsilon = 0.01);
        assert_relative_eq!(result.horizontal_deg(), 47.76, epsilon = 0.01);
        assert_relative_eq!(result.vertical_deg(), 27.97, epsilon = 0.01);
        assert_relative_eq!(result.side_angle_deg(), 47.76, epsilon = 0.01);
        assert_eq!(result.triple_screen_deg(), None);
    }

    #[test]
    fn test_curve_widens_horizontal() {
        let flat = solve(&spec(32.0, Surface::Flat, Layout::Single), &at(80.0)).unwrap();
        let curved = solve(
            &spec(32.0, Surface::Curved { radius_cm: 100.0 }, Layout::Single),
            &at(80.0),
        )
        .unwrap();

        assert!(curved.horizontal_deg() > flat.horizontal_deg());
        // Vertical framing belongs to the panel, not the curve
        assert_eq!(curved.vertical_deg(), flat.vertical_deg());
    }

    #[test]
    fn test_large_radius_matches_flat() {
        let flat = solve(&spec(32.0, Surface::Flat, Layout::Single), &at(80.0)).unwrap();
        let curved = solve(
            &spec(32.0, Surface::Curved { radius_cm: 1.0e8 }, Layout::Single),
            &at(80.0),
        )
        .unwrap();
        assert_relative_eq!(curved.horizontal_deg(), flat.horizontal_deg(), epsilon = 0.011);
    }

    #[test]
    fn test_radius_at_half_width_rejected() {
        let flat = solve(&spec(32.0, Surface::Flat, Layout::Single), &at(80.0)).unwrap();
        let radius_cm = flat.width_cm() / 2.0;

        let err = solve(&spec(32.0, Surface::Curved { radius_cm }, Layout::Single), &at(80.0))
            .unwrap_err();
        assert!(matches!(err, InvalidGeometry::RadiusTooSmall { .. }));
    }

    #[test]
    fn test_radius_checked_against_bezeled_width() {
        let bare = solve(&spec(27.0, Surface::Flat, Layout::Single), &at(60.0)).unwrap();
        // Wide enough for the bare panel, too tight once both bezels are added
        let radius_cm = bare.width_cm() / 2.0 + 1.0;
        let layout = Layout::Triple { bezel_cm: 2.0 };

        assert!(solve(&spec(27.0, Surface::Curved { radius_cm }, Layout::Single), &at(60.0)).is_ok());
        assert!(solve(&spec(27.0, Surface::Curved { radius_cm }, layout), &at(60.0)).is_err());
    }

    #[test]
    fn test_triple_simple_sum() {
        let distance = distance_for_panel(60.0, 2.0);
        let result = solve(
            &spec(27.0, Surface::Flat, Layout::Triple { bezel_cm: 2.0 }),
            &at(distance),
        )
        .unwrap();

        assert_relative_eq!(result.horizontal_deg(), 60.0, epsilon = 0.01);
        assert_relative_eq!(result.triple_screen_deg().unwrap(), 180.0, epsilon = 0.01);
        assert_relative_eq!(result.side_angle_deg(), 60.0, epsilon = 0.01);
    }

    #[test]
    fn test_triple_wraps_past_perpendicular() {
        let distance = distance_for_panel(100.0, 2.0);
        let result = solve(
            &spec(27.0, Surface::Flat, Layout::Triple { bezel_cm: 2.0 }),
            &at(distance),
        )
        .unwrap();

        let total = result.triple_screen_deg().unwrap();
        assert_relative_eq!(result.horizontal_deg(), 100.0, epsilon = 0.01);
        assert_relative_eq!(total, 272.0, epsilon = 0.01);
        assert!((total - 300.0).abs() > 1.0);
        assert_eq!(result.side_angle_deg(), 90.0);
    }

    #[test]
    fn test_bezel_widens_triple_only() {
        let result = solve(&spec(27.0, Surface::Flat, Layout::Single), &at(60.0)).unwrap();
        let with_bezel = solve(
            &spec(27.0, Surface::Flat, Layout::Triple { bezel_cm: 3.0 }),
            &at(60.0),
        )
        .unwrap();

        assert!(with_bezel.horizontal_deg() > result.horizontal_deg());
        assert_eq!(with_bezel.vertical_deg(), result.vertical_deg());
        assert_eq!(with_bezel.width_cm(), result.width_cm());
    }

    #[test]
    fn test_panel_clamped_to_half_turn() {
        // Eye closer to the panel than its sagitta: the arc wraps around the viewer
        let result = solve(
            &spec(49.0, Surface::Curved { radius_cm: 70.0 }, Layout::Single),
            &at(5.0),
        )
        .unwrap();
        assert!(result.horizontal_deg() <= 180.0);
        assert_eq!(result.side_angle_deg(), 90.0);
    }

    #[test]
    fn test_rejects_non_positive_and_nan() {
        let flat = Surface::Flat;
        assert!(solve(&spec(0.0, flat, Layout::Single), &at(80.0)).is_err());
        assert!(solve(&spec(-27.0, flat, Layout::Single), &at(80.0)).is_err());
        assert!(solve(&spec(f64::NAN, flat, Layout::Single), &at(80.0)).is_err());
        assert!(solve(&spec(27.0, flat, Layout::Single), &at(0.0)).is_err());
        assert!(solve(&spec(27.0, flat, Layout::Single), &at(f64::INFINITY)).is_err());
        assert!(solve(&spec(27.0, Surface::Curved { radius_cm: f64::NAN }, Layout::Single), &at(80.0)).is_err());
        assert_eq!(
            solve(&spec(27.0, flat, Layout::Triple { bezel_cm: -1.0 }), &at(80.0)),
            Err(InvalidGeometry::NegativeBezel(-1.0))
        );

        let mut bad_ratio = spec(27.0, flat, Layout::Single);
        bad_ratio.ratio = AspectRatio::new(16.0, 0.0);
        assert_eq!(
            solve(&bad_ratio, &at(80.0)),
            Err(InvalidGeometry::NotPositive { field: "ratio.v", value: 0.0 })
        );
    }

    #[test]
    fn test_vanishing_angle_rejected() {
        // 1" panel seen from 10 km rounds to 0.00°
        let err = solve(&spec(1.0, Surface::Flat, Layout::Single), &at(1.0e6)).unwrap_err();
        assert!(matches!(err, InvalidGeometry::Imperceptible { .. }));

        let tall = ScreenSpec {
            ratio: AspectRatio::new(1.0, 1.0e-6),
            ..spec(27.0, Surface::Flat, Layout::Single)
        };
        match solve(&tall, &at(80.0)) {
            Err(InvalidGeometry::Imperceptible {
                horizontal_deg,
                vertical_deg,
            }) => {
                assert!(horizontal_deg > 0.0);
                assert_eq!(vertical_deg, 0.0);
            }
            other => panic!("expected Imperceptible, got {:?}", other),
        }
    }

    #[test]
    fn test_curved_triple_wraps_past_perpendicular() {
        let screen = spec(27.0, Surface::Curved { radius_cm: 80.0 }, Layout::Triple { bezel_cm: 1.0 });
        let result = solve(&screen, &at(20.0)).unwrap();

        let panel = result.horizontal_deg();
        let total = result.triple_screen_deg().unwrap();
        assert!(panel > 90.0, "panel spans {}°", panel);
        assert!(total > 0.0 && total <= 360.0, "total {}°", total);
        assert!((total - 3.0 * panel).abs() > 1.0, "total {}° is a plain sum", total);
        assert_eq!(result.side_angle_deg(), 90.0);
    }

    #[test]
    fn test_echoes_inputs() {
        let screen = spec(34.0, Surface::Curved { radius_cm: 180.0 }, Layout::Single);
        let viewer = at(70.0);
        let result = solve(&screen, &viewer).unwrap();

        assert_eq!(result.spec(), &screen);
        assert_eq!(result.viewer(), &viewer);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let screen = spec(27.0, Surface::Curved { radius_cm: 150.0 }, Layout::Triple { bezel_cm: 1.5 });
        let a = solve(&screen, &at(65.0)).unwrap();
        let b = solve(&screen, &at(65.0)).unwrap();
        assert_eq!(a, b);
    }
}
