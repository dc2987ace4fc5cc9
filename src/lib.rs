//! Sim racing field-of-view calculator.
//!
//! Converts monitor geometry (aspect ratio, diagonal, viewing distance,
//! curvature, single or triple layout) into horizontal and vertical FOV, then
//! into the setting each racing title expects.
//!
//! ```
//! use simfov::games::GameTable;
//! use simfov::geometry::{solve, AspectRatio, Layout, ScreenSpec, Surface, ViewerPosition};
//!
//! let spec = ScreenSpec {
//!     diagonal_in: 32.0,
//!     ratio: AspectRatio::new(16.0, 9.0),
//!     surface: Surface::Flat,
//!     layout: Layout::Single,
//! };
//! let result = solve(&spec, &ViewerPosition { distance_cm: 80.0 }).unwrap();
//! assert!((result.vertical_deg() - 27.97).abs() < 0.01);
//!
//! for game in GameTable::default().map_all(&result) {
//!     println!("{}: {}", game.name, game.value);
//! }
//! ```

pub mod games;
pub mod geometry;
pub mod units;

pub use games::{map, GameProfile, GameTable};
pub use geometry::{solve, FovResult, InvalidGeometry};
