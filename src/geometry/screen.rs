use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::units::InputError;

/// Screen aspect ratio, e.g. 16:9. Only the proportion matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub h: f64,
    pub v: f64,
}

impl AspectRatio {
    pub const fn new(h: f64, v: f64) -> Self {
        Self { h, v }
    }

    /// Length of the diagonal in ratio units
    pub fn diagonal(&self) -> f64 {
        self.h.hypot(self.v)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::new(16.0, 9.0)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.h, self.v)
    }
}

impl FromStr for AspectRatio {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::Ratio(s.to_string());
        let (h, v) = s.trim().split_once(':').ok_or_else(invalid)?;
        let h: f64 = h.trim().parse().map_err(|_| invalid())?;
        let v: f64 = v.trim().parse().map_err(|_| invalid())?;
        if !(h.is_finite() && v.is_finite() && h > 0.0 && v > 0.0) {
            return Err(invalid());
        }
        Ok(AspectRatio::new(h, v))
    }
}

impl Serialize for AspectRatio {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AspectRatio::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Panel surface shape
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Surface {
    #[default]
    Flat,
    /// Cylindrical curve around a vertical axis
    Curved { radius_cm: f64 },
}

/// How many panels are joined side by side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Layout {
    #[default]
    Single,
    /// Center panel plus two angled side panels. `bezel_cm` is the frame
    /// width on each joined edge.
    Triple { bezel_cm: f64 },
}

impl Layout {
    pub fn screen_count(&self) -> u8 {
        match self {
            Layout::Single => 1,
            Layout::Triple { .. } => 3,
        }
    }
}

/// Physical display configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSpec {
    pub diagonal_in: f64,
    pub ratio: AspectRatio,
    pub surface: Surface,
    pub layout: Layout,
}

/// Eye position relative to the screen center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPosition {
    pub distance_cm: f64,
}

/// FOV axis a game's setting is expressed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}
