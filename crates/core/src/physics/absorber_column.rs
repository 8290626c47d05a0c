//! Heating-rate profile of a fixed column holding a well-mixed absorbing gas.
//!
//! No time stepping: a lapse-rate atmosphere is built once, the gas sets its
//! optical depth, and the flux divergence gives the instantaneous radiative
//! heating of every layer.
//!
//! ```text
//! hydrostatic_column → optical_depth_from_absorber → compute_fluxes
//!                    → heating_rate → K/day
//! ```

use serde::{Deserialize, Serialize};

use super::fluxes::{compute_fluxes, LevelFluxes};
use super::heating::{heating_rate, to_kelvin_per_day};
use super::hydrostatic::{hydrostatic_column, HydrostaticColumn};
use super::optical_depth::optical_depth_from_absorber;
use crate::core_types::{Kelvin, LayerProfile, LevelProfile, Meters, Pascals};
use crate::error::ModelResult;

/// Surface state, lapse rate, resolution and absorber of a fixed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsorberColumnSetup {
    /// Air temperature at the surface; the surface radiates at this temperature
    pub surface_temperature: Kelvin,
    /// Pressure at the surface
    pub surface_pressure: Pascals,
    /// Temperature change with height (K/m, negative for cooling aloft)
    pub lapse_rate: f64,
    /// Spacing between levels
    pub layer_thickness: Meters,
    /// Number of levels, surface included
    pub num_levels: usize,
    /// Absorber mass mixing ratio (kg/kg)
    pub mixing_ratio: f64,
    /// Mass absorption coefficient (m²/kg)
    pub mass_absorption_coeff: f64,
}

impl Default for AbsorberColumnSetup {
    /// 15 km at 1 m resolution, 300 K and 100 kPa at the surface, 7 K/km
    /// lapse rate, 1% absorber by mass with k = 0.01 m²/kg.
    fn default() -> Self {
        Self {
            surface_temperature: Kelvin::new(300.0),
            surface_pressure: Pascals::STANDARD_SURFACE,
            lapse_rate: -7.0e-3,
            layer_thickness: Meters::new(1.0),
            num_levels: 15_000,
            mixing_ratio: 0.01,
            mass_absorption_coeff: 0.01,
        }
    }
}

/// Everything computed for one fixed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticHeatingProfile {
    /// Level temperature, pressure, density and height
    pub column: HydrostaticColumn,
    /// Optical depth at each level
    pub optical_depth: LevelProfile,
    /// Longwave fluxes at each level
    pub fluxes: LevelFluxes,
    /// Heating rate of each layer (K/day)
    pub heating_rate_per_day: LayerProfile,
}

impl StaticHeatingProfile {
    /// Height of each layer midpoint (m).
    pub fn layer_heights(&self) -> LayerProfile {
        self.column.height.midpoints()
    }

    /// Height (m) where the profile first changes from cooling to warming,
    /// interpolated between layer midpoints.
    pub fn cooling_to_warming_height(&self) -> Option<f64> {
        let z = self.layer_heights();
        let rate = &self.heating_rate_per_day;
        (1..rate.len())
            .find(|&i| rate[i - 1] < 0.0 && rate[i] >= 0.0)
            .map(|i| {
                let frac = -rate[i - 1] / (rate[i] - rate[i - 1]);
                z[i - 1] + frac * (z[i] - z[i - 1])
            })
    }
}

/// Instantaneous radiative heating of the column described by `setup`.
///
/// Layers take the mean of their bounding levels for temperature and density.
///
/// # Errors
/// Whatever the underlying steps reject: a column that cannot be built
/// (`Configuration`/`Domain` from [`hydrostatic_column`]), a negative
/// absorber, or non-physical temperatures for the flux calculation.
pub fn static_heating_profile(setup: &AbsorberColumnSetup) -> ModelResult<StaticHeatingProfile> {
    let column = hydrostatic_column(
        *setup.surface_temperature,
        *setup.surface_pressure,
        setup.lapse_rate,
        *setup.layer_thickness,
        setup.num_levels,
    )?;
    let optical_depth = optical_depth_from_absorber(
        setup.mixing_ratio,
        setup.mass_absorption_coeff,
        &column.density,
        &column.height,
    )?;
    let fluxes = compute_fluxes(
        &optical_depth,
        &column.layer_temperatures(),
        *setup.surface_temperature,
    )?;
    let rate = heating_rate(
        &fluxes.up,
        &fluxes.down,
        &column.height,
        &column.layer_densities(),
    )?;

    Ok(StaticHeatingProfile {
        heating_rate_per_day: to_kelvin_per_day(&rate),
        column,
        optical_depth,
        fluxes,
    })
}
