//! Grey Radiative Column Core Library
//!
//! A one-dimensional radiative-equilibrium model of a grey atmosphere over a
//! black surface. Longwave radiation is treated with a two-stream scheme and a
//! single wavelength-independent optical depth; the column is stepped forward
//! in time with explicit Euler until it relaxes toward radiative equilibrium.
//!
//! ## Layout
//!
//! - [`core_types`]: unit newtypes and level/layer profiles
//! - [`physics`]: optical depth, hydrostatic heights, fluxes, heating rate,
//!   time stepping, and the heating profile of a fixed absorbing-gas column
//! - [`simulation`]: the run state machine, snapshots and parallel ensembles
//! - [`config`]: run parameters, presets and JSON loading
//!
//! ```
//! use grey_column_core::{ModelConfig, RadiativeColumnModel};
//!
//! let cfg = ModelConfig::equilibrium_run().with_num_layers(20).with_num_steps(10);
//! let history = RadiativeColumnModel::new(cfg)?.run()?;
//! assert_eq!(history.len(), 10);
//! # Ok::<(), grey_column_core::ModelError>(())
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Physics and time loop
pub mod physics;
pub mod simulation;

pub mod config;

// Re-export core types
pub use core_types::{Kelvin, LayerProfile, LevelProfile, Pascals, Seconds, WattsPerSquareMeter};

pub use config::ModelConfig;
pub use error::{ModelError, ModelResult};
pub use physics::{static_heating_profile, AbsorberColumnSetup, StaticHeatingProfile};
pub use simulation::ensemble::{run_ensemble, transmission_sweep};
pub use simulation::{AtmosphericState, RadiativeColumnModel, RunHistory, RunPhase, StepSnapshot};
