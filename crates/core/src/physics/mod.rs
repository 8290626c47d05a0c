//! Radiative column physics.
//!
//! Each module is a pure function of its inputs; the time loop in
//! [`crate::simulation`] owns the state and threads it through them in order:
//! densities → heights → fluxes → heating rate → Euler step → surface balance.
//! [`absorber_column`] chains the same pieces once over a fixed lapse-rate
//! column instead.

pub mod absorber_column;
pub mod constants;
pub mod fluxes;
pub mod heating;
pub mod hydrostatic;
pub mod optical_depth;
pub mod time_step;

pub use absorber_column::{static_heating_profile, AbsorberColumnSetup, StaticHeatingProfile};
pub use constants::{
    blackbody_flux, DIFFUSIVITY_FACTOR, GAS_CONSTANT_DRY_AIR, GRAVITY, SECONDS_PER_DAY,
    SPECIFIC_HEAT_DRY_AIR,
    STEFAN_BOLTZMANN,
};
pub use fluxes::{compute_fluxes, compute_fluxes_isothermal, LevelFluxes};
pub use heating::{heating_rate, to_kelvin_per_day};
pub use hydrostatic::{
    build_heights, hydrostatic_column, layer_densities, pressure_levels, HydrostaticColumn,
};
pub use optical_depth::{build_optical_depth, optical_depth_from_absorber};
pub use time_step::{step_temperature, step_temperature_in_place, update_surface_temperature};
