use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use simfov::games::{builtin_profiles, GameProfile, GameTable, DEFAULT_UNDEFINED};
use simfov::geometry::{Axis, ScreenSpec, ViewerPosition};
use simfov::units::{ScreenInput, ViewerInput, DEFAULT_MIN_CURVE_RADIUS_MM};

use crate::display::DisplayMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub screen: ScreenInput,
    #[serde(default)]
    pub viewer: ViewerInput,
    #[serde(default)]
    pub output: OutputConfig,
    /// Replaces the built-in title list when non-empty
    #[serde(default)]
    pub games: Vec<GameProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: DisplayMode,
    /// Shown instead of a value that cannot be computed
    pub undefined: String,
    pub min_curve_radius_mm: f64,
    /// Only list titles on this axis
    pub axis: Option<Axis>,
    /// Only list titles whose name contains this text
    pub game: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Plain,
            undefined: DEFAULT_UNDEFINED.to_string(),
            min_curve_radius_mm: DEFAULT_MIN_CURVE_RADIUS_MM,
            axis: None,
            game: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/simfov/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("simfov").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{:#}. Using defaults.", e);
                None
            }
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Screen and viewer in solver units
    pub fn geometry(&self) -> Result<(ScreenSpec, ViewerPosition)> {
        let spec = self
            .screen
            .to_spec(self.output.min_curve_radius_mm)
            .context("Invalid screen settings")?;
        let viewer = self.viewer.to_position().context("Invalid viewer settings")?;
        Ok((spec, viewer))
    }

    /// Configured titles, narrowed by the output filters
    pub fn game_table(&self) -> GameTable {
        let profiles = if self.games.is_empty() {
            builtin_profiles()
        } else {
            self.games.clone()
        };
        GameTable::new(profiles, &self.output.undefined)
            .filtered(self.output.axis, self.output.game.as_deref())
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# simfov Configuration
# This file is auto-generated. Edit as needed.

[screen]
# Aspect ratio as "H:V"
ratio = "16:9"
# Diagonal size of one panel in inches
diagonal_in = 27.0
# Number of panels: 1 or 3
screens = 1
# Bezel width per joined edge in millimeters (three screens only)
bezel_mm = 0.0
# Curve rating in millimeters, e.g. 1800 for an 1800R monitor. 0 = flat
curve_radius_mm = 0.0

[viewer]
# Distance from eye to the center of the screen
distance = 60.0
# Unit of the distance: "cm" or "inch"
unit = "cm"

[output]
# Output mode: "plain", "toml" or "terminal"
mode = "plain"
# Text shown when a value cannot be computed
undefined = "n/a"
# Curve ratings below this many millimeters are treated as flat
min_curve_radius_mm = 500.0
# Only list titles on one axis: "horizontal" or "vertical"
# axis = "vertical"
# Only list titles whose name contains this text
# game = "assetto"

# Custom title list. When at least one [[games]] entry is present it
# replaces the built-in list.
# Conversion types: identity, multiplier, divider, f1, dirt, rbr
#
# [[games]]
# name = "iRacing"
# axis = "horizontal"
# digits = 0
# unit = "°"
#
# [[games]]
# name = "F1 2021+"
# axis = "horizontal"
# conversion = { type = "f1", pivot_deg = 77.0 }
# factor = 1.0
#
# [[games]]
# name = "DiRT Rally 1/2"
# axis = "vertical"
# conversion = { type = "dirt", base_deg = 30.0, step_deg = 5.0 }
#
# [[games]]
# name = "GTR 2"
# axis = "vertical"
# conversion = { type = "divider" }
# factor = 58.0
# digits = 1
# unit = "x"
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(mode) = args.mode {
            self.output.mode = mode;
        }

        // Screen settings
        if let Some(ratio) = args.ratio {
            self.screen.ratio = ratio;
        }
        if let Some(size) = args.size {
            self.screen.diagonal_in = size;
        }
        if let Some(screens) = args.screens {
            self.screen.screens = screens;
        }
        if let Some(bezel) = args.bezel {
            self.screen.bezel_mm = bezel;
        }
        if let Some(curve) = args.curve {
            self.screen.curve_radius_mm = curve;
        }

        // Viewer settings
        if let Some(distance) = args.distance {
            self.viewer.distance = distance;
        }
        if let Some(unit) = args.unit {
            self.viewer.unit = unit;
        }

        // Output filters
        if let Some(axis) = args.axis {
            self.output.axis = Some(axis);
        }
        if let Some(ref game) = args.game {
            self.output.game = Some(game.clone());
        }
    }
}
