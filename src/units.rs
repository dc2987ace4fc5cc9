//! Raw calculator input and its normalization into solver types.
//!
//! Users think in inches for panel size, millimeters for bezels and curve
//! ratings (a "1800R" monitor has an 1800 mm radius), and either unit for
//! distance. Everything handed to the solver is in centimeters.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::geometry::{AspectRatio, Layout, ScreenSpec, Surface, ViewerPosition, INCH_TO_CM};

/// Curve ratings below this are treated as a flat panel
pub const DEFAULT_MIN_CURVE_RADIUS_MM: f64 = 500.0;

const MM_PER_CM: f64 = 10.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid aspect ratio '{0}': expected H:V with two positive numbers, e.g. 16:9")]
    Ratio(String),

    #[error("Unsupported screen count {0}: expected 1 or 3")]
    ScreenCount(u8),

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Unit the viewing distance is entered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Cm,
    Inch,
}

impl DistanceUnit {
    pub fn to_cm(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Cm => value,
            DistanceUnit::Inch => value * INCH_TO_CM,
        }
    }

    pub fn from_cm(self, cm: f64) -> f64 {
        match self {
            DistanceUnit::Cm => cm,
            DistanceUnit::Inch => cm / INCH_TO_CM,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            DistanceUnit::Cm => DistanceUnit::Inch,
            DistanceUnit::Inch => DistanceUnit::Cm,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Cm => write!(f, "cm"),
            DistanceUnit::Inch => write!(f, "in"),
        }
    }
}

/// Screen settings as entered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenInput {
    pub ratio: AspectRatio,
    pub diagonal_in: f64,
    pub screens: u8,
    /// Frame width per joined edge, only used with three screens
    pub bezel_mm: f64,
    /// Curve rating in millimeters, 0 for flat
    pub curve_radius_mm: f64,
}

impl Default for ScreenInput {
    fn default() -> Self {
        Self {
            ratio: AspectRatio::default(),
            diagonal_in: 27.0,
            screens: 1,
            bezel_mm: 0.0,
            curve_radius_mm: 0.0,
        }
    }
}

impl ScreenInput {
    pub fn to_spec(&self, min_curve_radius_mm: f64) -> Result<ScreenSpec, InputError> {
        finite("diagonal", self.diagonal_in)?;
        finite("bezel", self.bezel_mm)?;
        finite("curve radius", self.curve_radius_mm)?;

        let surface = if self.curve_radius_mm >= min_curve_radius_mm && self.curve_radius_mm > 0.0 {
            Surface::Curved {
                radius_cm: self.curve_radius_mm / MM_PER_CM,
            }
        } else {
            Surface::Flat
        };

        let layout = match self.screens {
            1 => Layout::Single,
            3 => Layout::Triple {
                bezel_cm: self.bezel_mm / MM_PER_CM,
            },
            other => return Err(InputError::ScreenCount(other)),
        };

        Ok(ScreenSpec {
            diagonal_in: self.diagonal_in,
            ratio: self.ratio,
            surface,
            layout,
        })
    }
}

/// Viewer settings as entered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerInput {
    pub distance: f64,
    pub unit: DistanceUnit,
}

impl Default for ViewerInput {
    fn default() -> Self {
        Self {
            distance: 60.0,
            unit: DistanceUnit::Cm,
        }
    }
}

impl ViewerInput {
    pub fn distance_cm(&self) -> f64 {
        self.unit.to_cm(self.distance)
    }

    pub fn to_position(&self) -> Result<ViewerPosition, InputError> {
        finite("distance", self.distance)?;
        Ok(ViewerPosition {
            distance_cm: self.distance_cm(),
        })
    }

    /// Switch units, keeping the same physical distance rounded to a whole number
    pub fn toggle_unit(&mut self) {
        let cm = self.distance_cm();
        self.unit = self.unit.toggle();
        self.distance = self.unit.from_cm(cm).round();
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field, value })
    }
}
