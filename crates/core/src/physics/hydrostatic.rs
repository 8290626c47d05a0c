//! Hydrostatic layer geometry.
//!
//! Layer thickness follows from the hydrostatic equation and the ideal gas law:
//! ```text
//! ρ = p / (Rd · T)          Δz = -Δp / (ρ · g)
//! ```
//! Because `ρ · Δz = -Δp / g`, the mass of each layer depends only on its
//! pressure bounds; temperature changes stretch or squeeze the column without
//! moving mass between layers.

use serde::{Deserialize, Serialize};

use super::constants::{GAS_CONSTANT_DRY_AIR, GRAVITY};
use crate::core_types::{LayerProfile, LevelProfile};
use crate::error::{ensure_len, ModelError, ModelResult};

/// Evenly spaced pressure levels from the surface (index 0) to the model top
/// (index `num_layers`), in Pa.
///
/// # Errors
/// `ModelError::Configuration` if `num_layers` is 0, the top pressure is
/// negative, or the surface pressure does not exceed the top pressure.
pub fn pressure_levels(
    surface_pressure: f64,
    top_pressure: f64,
    num_layers: usize,
) -> ModelResult<LevelProfile> {
    if num_layers < 1 {
        return Err(ModelError::configuration("num_layers must be at least 1"));
    }
    if !top_pressure.is_finite() || top_pressure < 0.0 {
        return Err(ModelError::configuration(format!(
            "top pressure must be a non-negative number of Pa, got {top_pressure}"
        )));
    }
    if !surface_pressure.is_finite() || surface_pressure <= top_pressure {
        return Err(ModelError::configuration(format!(
            "surface pressure ({surface_pressure} Pa) must exceed top pressure ({top_pressure} Pa)"
        )));
    }

    let spacing = (surface_pressure - top_pressure) / num_layers as f64;
    Ok((0..=num_layers)
        .map(|i| {
            if i == num_layers {
                top_pressure
            } else {
                surface_pressure - spacing * i as f64
            }
        })
        .collect())
}

/// Air density of each layer from its mean pressure and temperature.
///
/// # Errors
/// `ModelError::Domain` if any pressure level or layer temperature is
/// non-positive; `ModelError::ShapeMismatch` if the profiles don't line up.
pub fn layer_densities(
    pressure_levels: &LevelProfile,
    layer_temperatures: &LayerProfile,
) -> ModelResult<LayerProfile> {
    const OP: &str = "layer_densities";

    ensure_len(OP, pressure_levels.num_layers(), layer_temperatures.len())?;
    if let Some(i) = pressure_levels.iter().position(|p| !is_positive(*p)) {
        return Err(ModelError::domain(
            OP,
            format!("pressure at level {i} is {} Pa", pressure_levels[i]),
        ));
    }
    if let Some(i) = layer_temperatures.iter().position(|t| !is_positive(*t)) {
        return Err(ModelError::domain(
            OP,
            format!("temperature of layer {i} is {} K", layer_temperatures[i]),
        ));
    }

    Ok(pressure_levels
        .midpoints()
        .iter()
        .zip(layer_temperatures.iter())
        .map(|(p, t)| p / (GAS_CONSTANT_DRY_AIR * t))
        .collect())
}

/// Height of each pressure level above the surface (m), integrating the
/// hydrostatic equation layer by layer from 0 at level 0.
///
/// # Errors
/// Same conditions as [`layer_densities`].
pub fn build_heights(
    pressure_levels: &LevelProfile,
    layer_temperatures: &LayerProfile,
) -> ModelResult<LevelProfile> {
    let densities = layer_densities(pressure_levels, layer_temperatures)?;
    Ok(heights_from_densities(pressure_levels, &densities))
}

/// Level heights for already-computed layer densities. Callers guarantee the
/// densities are positive and line up with the pressure levels.
pub(crate) fn heights_from_densities(
    pressure_levels: &LevelProfile,
    densities: &LayerProfile,
) -> LevelProfile {
    let del_z: Vec<f64> = pressure_levels
        .diff()
        .iter()
        .zip(densities.iter())
        .map(|(del_p, rho)| -del_p / (rho * GRAVITY))
        .collect();
    LevelProfile::cumulative_from_zero(&del_z)
}

/// Level-based column built by marching a constant lapse rate upward from the
/// surface in fixed height increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrostaticColumn {
    /// Temperature at each level (K)
    pub temperature: LevelProfile,
    /// Pressure at each level (Pa)
    pub pressure: LevelProfile,
    /// Air density at each level (kg/m³)
    pub density: LevelProfile,
    /// Height of each level (m)
    pub height: LevelProfile,
}

impl HydrostaticColumn {
    /// Number of layers between the levels.
    pub fn num_layers(&self) -> usize {
        self.height.num_layers()
    }

    /// Temperature of each layer, the mean of its bounding levels (K).
    pub fn layer_temperatures(&self) -> LayerProfile {
        self.temperature.midpoints()
    }

    /// Density of each layer, the mean of its bounding levels (kg/m³).
    pub fn layer_densities(&self) -> LayerProfile {
        self.density.midpoints()
    }
}

/// Build a hydrostatic atmosphere of `num_levels` levels spaced
/// `layer_thickness` meters apart, with temperature changing by `lapse_rate`
/// K/m (negative for cooling with height).
///
/// Each step uses the density at the lower level: `Δp = -ρ[i] · g · Δz`.
///
/// # Errors
/// `ModelError::Configuration` for fewer than 2 levels or a non-positive
/// thickness; `ModelError::Domain` if the surface state is non-physical or
/// the march drives temperature, pressure or density to zero or below.
pub fn hydrostatic_column(
    surface_temperature: f64,
    surface_pressure: f64,
    lapse_rate: f64,
    layer_thickness: f64,
    num_levels: usize,
) -> ModelResult<HydrostaticColumn> {
    const OP: &str = "hydrostatic_column";

    if num_levels < 2 {
        return Err(ModelError::configuration(format!(
            "a column needs at least 2 levels, got {num_levels}"
        )));
    }
    if !is_positive(layer_thickness) {
        return Err(ModelError::configuration(format!(
            "layer thickness must be positive, got {layer_thickness} m"
        )));
    }
    if !is_positive(surface_temperature) || !is_positive(surface_pressure) {
        return Err(ModelError::domain(
            OP,
            format!(
                "surface state must be positive, got T = {surface_temperature} K, p = {surface_pressure} Pa"
            ),
        ));
    }
    if !lapse_rate.is_finite() {
        return Err(ModelError::domain(OP, "lapse rate is not finite"));
    }

    let mut temperature = vec![0.0; num_levels];
    let mut pressure = vec![0.0; num_levels];
    let mut density = vec![0.0; num_levels];
    let mut height = vec![0.0; num_levels];

    temperature[0] = surface_temperature;
    pressure[0] = surface_pressure;
    density[0] = surface_pressure / (GAS_CONSTANT_DRY_AIR * surface_temperature);

    for i in 0..num_levels - 1 {
        let del_p = -density[i] * GRAVITY * layer_thickness;
        height[i + 1] = height[i] + layer_thickness;
        temperature[i + 1] = temperature[i] + lapse_rate * layer_thickness;
        pressure[i + 1] = pressure[i] + del_p;

        if !is_positive(temperature[i + 1]) || !is_positive(pressure[i + 1]) {
            return Err(ModelError::domain(
                OP,
                format!(
                    "level {} reached T = {:.3} K, p = {:.3} Pa",
                    i + 1,
                    temperature[i + 1],
                    pressure[i + 1]
                ),
            ));
        }
        density[i + 1] = pressure[i + 1] / (GAS_CONSTANT_DRY_AIR * temperature[i + 1]);
    }

    Ok(HydrostaticColumn {
        temperature: temperature.into(),
        pressure: pressure.into(),
        density: density.into(),
        height: height.into(),
    })
}

/// Finite and strictly greater than zero.
pub(crate) fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}
