//! Core types and utilities

pub mod profile;
pub mod units;

pub use profile::{LayerProfile, LevelProfile};
pub use units::*;
