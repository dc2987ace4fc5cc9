//! Per-title FOV settings.
//!
//! Each [`GameProfile`] says which FOV axis a title expects and how to turn
//! a value in degrees into what its settings screen shows.

use serde::{Deserialize, Serialize};

use crate::geometry::{angular_size_flat, Axis, FovResult};

/// Shown in place of a number when a conversion has no finite result
pub const DEFAULT_UNDEFINED: &str = "n/a";

/// How a title's native value is derived from an FOV angle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Conversion {
    /// Degrees as-is
    #[default]
    Identity,
    /// `fov * factor`
    Multiplier,
    /// `fov / factor`
    Divider,
    /// Codemasters/EA F1 slider, linear around a neutral angle:
    /// `(fov - pivot) / 2 * factor`
    F1 {
        #[serde(default = "default_f1_pivot")]
        pivot_deg: f64,
    },
    /// Stepped slider: `ceil((fov - base) / step * factor)`
    Dirt {
        #[serde(default = "default_dirt_base")]
        base_deg: f64,
        #[serde(default = "default_dirt_step")]
        step_deg: f64,
    },
    /// Richard Burns Rally: vertical angle in radians of a 4:3 frame as tall
    /// as the panel. Ignores the solved axis value.
    Rbr,
}

fn default_f1_pivot() -> f64 {
    77.0
}

fn default_dirt_base() -> f64 {
    30.0
}

fn default_dirt_step() -> f64 {
    5.0
}

fn default_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameProfile {
    pub name: String,
    pub axis: Axis,
    #[serde(default)]
    pub conversion: Conversion,
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// Decimal places shown
    #[serde(default)]
    pub digits: u8,
    #[serde(default)]
    pub unit: String,
}

impl GameProfile {
    pub fn new(
        name: &str,
        axis: Axis,
        conversion: Conversion,
        factor: f64,
        digits: u8,
        unit: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            axis,
            conversion,
            factor,
            digits,
            unit: unit.to_string(),
        }
    }

    /// Native value for this title, unformatted. May be NaN or infinite.
    pub fn native_value(&self, result: &FovResult) -> f64 {
        let fov = result.axis_deg(self.axis);
        match self.conversion {
            Conversion::Identity => fov,
            Conversion::Multiplier => fov * self.factor,
            Conversion::Divider => fov / self.factor,
            Conversion::F1 { pivot_deg } => (fov - pivot_deg) / 2.0 * self.factor,
            Conversion::Dirt { base_deg, step_deg } => {
                ((fov - base_deg) / step_deg * self.factor).ceil()
            }
            Conversion::Rbr => {
                let ratio = result.spec().ratio;
                let height_4_3 = result.width_cm() / ratio.h * ratio.v * 4.0 / 3.0;
                angular_size_flat(height_4_3, result.viewer().distance_cm)
            }
        }
    }
}

/// Format `profile`'s value for `result`, or `undefined` when it is not a
/// finite number.
pub fn map(profile: &GameProfile, result: &FovResult, undefined: &str) -> String {
    let value = profile.native_value(result);
    if !value.is_finite() {
        return undefined.to_string();
    }
    format!("{}{}", format_fixed(value, profile.digits), profile.unit)
}

fn format_fixed(value: f64, digits: u8) -> String {
    let text = format!("{:.*}", usize::from(digits), value);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// One title's formatted setting
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MappedValue {
    pub name: String,
    pub axis: Axis,
    pub value: String,
}

/// Ordered set of profiles plus the token shown for undefined values
#[derive(Debug, Clone, PartialEq)]
pub struct GameTable {
    profiles: Vec<GameProfile>,
    undefined: String,
}

impl Default for GameTable {
    fn default() -> Self {
        Self::new(builtin_profiles(), DEFAULT_UNDEFINED)
    }
}

impl GameTable {
    pub fn new(profiles: Vec<GameProfile>, undefined: &str) -> Self {
        Self {
            profiles,
            undefined: undefined.to_string(),
        }
    }

    pub fn profiles(&self) -> &[GameProfile] {
        &self.profiles
    }

    pub fn undefined(&self) -> &str {
        &self.undefined
    }

    pub fn for_axis(&self, axis: Axis) -> impl Iterator<Item = &GameProfile> {
        self.profiles.iter().filter(move |p| p.axis == axis)
    }

    /// Keep profiles on `axis` whose name contains `name` (case-insensitive)
    pub fn filtered(&self, axis: Option<Axis>, name: Option<&str>) -> Self {
        let needle = name.map(str::to_lowercase);
        let profiles = self
            .profiles
            .iter()
            .filter(|p| axis.map_or(true, |a| p.axis == a))
            .filter(|p| {
                needle
                    .as_deref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        Self {
            profiles,
            undefined: self.undefined.clone(),
        }
    }

    pub fn map_all(&self, result: &FovResult) -> Vec<MappedValue> {
        self.profiles
            .iter()
            .map(|p| MappedValue {
                name: p.name.clone(),
                axis: p.axis,
                value: map(p, result, &self.undefined),
            })
            .collect()
    }
}

/// Titles known out of the box
pub fn builtin_profiles() -> Vec<GameProfile> {
    use Axis::{Horizontal as H, Vertical as V};
    use Conversion::*;

    let f1 = F1 {
        pivot_deg: default_f1_pivot(),
    };
    let dirt = Dirt {
        base_deg: default_dirt_base(),
        step_deg: default_dirt_step(),
    };

    vec![
        GameProfile::new("iRacing", H, Identity, 1.0, 0, "°"),
        GameProfile::new("Automobilista 2", H, Identity, 1.0, 0, "°"),
        GameProfile::new("RaceRoom Racing Experience", H, Identity, 1.0, 1, "°"),
        GameProfile::new("BeamNG.drive", H, Identity, 1.0, 1, "°"),
        GameProfile::new("Project CARS 1/2/3", H, Identity, 1.0, 0, "°"),
        GameProfile::new("Euro Truck Simulator", H, Identity, 1.0, 0, "°"),
        GameProfile::new("American Truck Simulator", H, Identity, 1.0, 0, "°"),
        GameProfile::new("F1 2016~2018", H, f1, 0.05, 2, ""),
        GameProfile::new("F1 2019~2020", H, f1, 0.1, 1, ""),
        GameProfile::new("F1 2021+", H, f1, 1.0, 0, ""),
        GameProfile::new("Assetto Corsa", V, Identity, 1.0, 1, "°"),
        GameProfile::new("Assetto Corsa Competizione", V, Identity, 1.0, 1, "°"),
        GameProfile::new("Assetto Corsa EVO", V, Identity, 1.0, 1, "°"),
        GameProfile::new("Automobilista", V, Identity, 1.0, 0, "°"),
        GameProfile::new("Game Stock Car", V, Identity, 1.0, 0, "°"),
        GameProfile::new("Game Stock Car Extreme", V, Identity, 1.0, 0, "°"),
        GameProfile::new("Stock Car Extreme", V, Identity, 1.0, 0, "°"),
        GameProfile::new("rFactor 1/2", V, Identity, 1.0, 0, "°"),
        GameProfile::new("Live for Speed", V, Multiplier, 2.0, 0, "°"),
        GameProfile::new("GRID Autosport", V, Multiplier, 2.0, 0, "°"),
        GameProfile::new("DiRT Rally 1/2", V, dirt, 1.0, 0, ""),
        GameProfile::new("Le Mans Ultimate", V, Identity, 1.0, 0, "°"),
        GameProfile::new("WRC", V, Identity, 1.0, 0, "°"),
        GameProfile::new("GTR 2", V, Divider, 58.0, 1, "x"),
        GameProfile::new("Race07", V, Divider, 58.0, 1, "x"),
        GameProfile::new("Richard Burns Rally", V, Rbr, 1.0, 6, "rad"),
    ]
}
