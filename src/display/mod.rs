pub mod report;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Human-readable report on stdout
    #[default]
    Plain,
    /// Report serialized as TOML on stdout
    Toml,
    /// Interactive form that re-solves on every key press
    Terminal,
}
