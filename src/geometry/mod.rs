//! Angular geometry for flat and cylindrically curved screens.
//!
//! [`solve`] turns a [`ScreenSpec`] and a [`ViewerPosition`] into an immutable
//! [`FovResult`]. The two primitives below are shared with the per-game
//! conversions in [`crate::games`].

mod screen;
mod solver;

pub use screen::{AspectRatio, Axis, Layout, ScreenSpec, Surface, ViewerPosition};
pub use solver::{solve, FovResult, InvalidGeometry, Span};

/// Centimeters per inch
pub const INCH_TO_CM: f64 = 2.54;

/// Angle in radians subtended by a flat segment of width `base`, centered on
/// the line of sight at `distance`.
#[inline]
pub fn angular_size_flat(base: f64, distance: f64) -> f64 {
    2.0 * (base / 2.0).atan2(distance)
}

/// Angle in radians subtended by an arc of length `arc_length` on a circle of
/// `radius`, with the viewer on the circle's axis at `distance` from the arc's
/// midpoint.
///
/// Returns `None` when the half chord is not a real number.
pub fn angular_size_arc(arc_length: f64, radius: f64, distance: f64) -> Option<f64> {
    let central_angle = arc_length / radius;
    // 1 - cos(x) == 2 sin^2(x / 2), without the cancellation for large radii
    let sagitta = 2.0 * radius * (central_angle / 4.0).sin().powi(2);
    let half_chord = (2.0 * radius * sagitta - sagitta * sagitta).sqrt();
    if !half_chord.is_finite() {
        return None;
    }
    Some(2.0 * half_chord.atan2(distance - sagitta))
}
