// lib.rs - Procedural lock-and-key maze generation
//
// A generation request carves a perfect maze around a fixed center
// template, then threads a chain of gated doors through it: every door
// type appears on the main path with its required items placed strictly
// closer to the entry, side branches get optional doors with energy
// rewards, and inverse toggle doors are scattered clear of the lever
// routes. The output is a single grid of cell codes.

pub mod cell;
pub mod error;
pub mod generator;
pub mod grid;
pub mod inverse_toggle;
pub mod main_path;
pub mod sets;
pub mod side_paths;
pub mod template;
pub mod tree;
pub mod walls;

pub use cell::{Cell, DoorRequirement, ALL_MAIN_DOORS};
pub use error::{GeneratorError, Result};
pub use generator::MazeGenerator;
pub use grid::Grid;
pub use template::Template;
