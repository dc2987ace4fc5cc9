//! One-shot output: solve once, print, exit.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

use simfov::games::{GameTable, MappedValue};
use simfov::geometry::{solve, Axis, FovResult};

use crate::config::Config;

/// Everything printed for one calculation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub ratio: String,
    pub diagonal_in: f64,
    pub screens: u8,
    pub distance_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub horizontal_deg: f64,
    pub vertical_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triple_screen_deg: Option<f64>,
    pub side_angle_deg: f64,
    pub games: Vec<MappedValue>,
}

impl Report {
    pub fn new(result: &FovResult, table: &GameTable) -> Self {
        let spec = result.spec();
        Self {
            ratio: spec.ratio.to_string(),
            diagonal_in: spec.diagonal_in,
            screens: spec.layout.screen_count(),
            distance_cm: round2(result.viewer().distance_cm),
            width_cm: round2(result.width_cm()),
            height_cm: round2(result.height_cm()),
            horizontal_deg: result.horizontal_deg(),
            vertical_deg: result.vertical_deg(),
            triple_screen_deg: result.triple_screen_deg(),
            side_angle_deg: result.side_angle_deg(),
            games: table.map_all(result),
        }
    }

    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Screen:      {}\" {} x{} ({:.2} x {:.2} cm) at {:.1} cm",
            self.diagonal_in, self.ratio, self.screens, self.width_cm, self.height_cm, self.distance_cm
        );
        let _ = writeln!(out, "Horizontal:  {:.2}°", self.horizontal_deg);
        let _ = writeln!(out, "Vertical:    {:.2}°", self.vertical_deg);
        if let Some(total) = self.triple_screen_deg {
            let _ = writeln!(out, "Triple:      {:.2}°", total);
            let _ = writeln!(out, "Side angle:  {:.2}°", self.side_angle_deg);
        }

        let name_width = self.games.iter().map(|g| g.name.chars().count()).max().unwrap_or(0);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let mut games = self.games.iter().filter(|g| g.axis == axis).peekable();
            if games.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "\n{} FOV titles:", capitalize(&axis.to_string()));
            for game in games {
                let _ = writeln!(out, "  {:<width$}  {}", game.name, game.value, width = name_width);
            }
        }
        out
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize report")
    }
}

/// Solve the configured geometry into a report
pub fn build(config: &Config) -> Result<Report> {
    let (spec, viewer) = config.geometry()?;
    let result = solve(&spec, &viewer).context("Cannot compute field of view")?;
    Ok(Report::new(&result, &config.game_table()))
}

pub fn print_plain(config: &Config) -> Result<()> {
    print!("{}", build(config)?.to_plain());
    Ok(())
}

pub fn print_toml(config: &Config) -> Result<()> {
    print!("{}", build(config)?.to_toml()?);
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
