//! Grey, non-scattering two-stream longwave fluxes.
//!
//! Each layer transmits `tr = exp(-D·Δτ)` of the beam entering it and emits
//! `σT⁴·(1 - tr)` in each direction (Kirchhoff: emissivity = absorptivity).
//!
//! ```text
//! up[0]   = σ·T_sfc⁴                       (black surface)
//! up[i]   = tr·up[i-1]   + σ·T[i-1]⁴·(1-tr)   i = 1..=N
//! down[N] = 0                              (no longwave from space)
//! down[i] = tr·down[i+1] + σ·T[i]⁴·(1-tr)     i = N-1..=0
//! ```
//!
//! Both recurrences are order-dependent: every level needs the result of the
//! level before it in its pass.

use serde::{Deserialize, Serialize};

use super::constants::{blackbody_flux, DIFFUSIVITY_FACTOR};
use crate::core_types::{LayerProfile, LevelProfile};
use crate::error::{ensure_len, ModelError, ModelResult};

/// Upward and downward longwave flux at every level (W/m²).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFluxes {
    /// Upward flux, surface to top
    pub up: LevelProfile,
    /// Downward flux, surface to top
    pub down: LevelProfile,
}

impl LevelFluxes {
    /// Net upward flux `up - down` at each level.
    pub fn net_up(&self) -> LevelProfile {
        self.up
            .iter()
            .zip(self.down.iter())
            .map(|(u, d)| u - d)
            .collect()
    }

    /// Outgoing longwave radiation at the top of the atmosphere.
    pub fn outgoing_longwave(&self) -> f64 {
        self.up.top().unwrap_or(0.0)
    }

    /// Downwelling longwave at the surface.
    pub fn surface_downwelling(&self) -> f64 {
        self.down.surface().unwrap_or(0.0)
    }
}

/// Transmission and emissivity of a layer of optical thickness `del_tau`.
#[inline]
fn layer_optics(del_tau: f64) -> (f64, f64) {
    let trans = (-DIFFUSIVITY_FACTOR * del_tau).exp();
    (trans, 1.0 - trans)
}

/// Two-stream fluxes for a column with per-layer temperatures and a black
/// surface at `surface_temperature`.
///
/// # Errors
/// `ModelError::Domain` if the optical depth decreases upward or any
/// temperature is negative or not finite; `ModelError::ShapeMismatch` if the
/// layer count doesn't match the optical depth profile.
pub fn compute_fluxes(
    optical_depth: &LevelProfile,
    layer_temperatures: &LayerProfile,
    surface_temperature: f64,
) -> ModelResult<LevelFluxes> {
    const OP: &str = "compute_fluxes";

    let num_layers = optical_depth.num_layers();
    if optical_depth.is_empty() {
        return Err(ModelError::domain(OP, "optical depth profile is empty"));
    }
    ensure_len(OP, num_layers, layer_temperatures.len())?;
    if !optical_depth.is_non_decreasing() || optical_depth.iter().any(|t| !t.is_finite()) {
        return Err(ModelError::domain(
            OP,
            "optical depth must be finite and non-decreasing with height",
        ));
    }
    if !is_valid_temperature(surface_temperature) {
        return Err(ModelError::domain(
            OP,
            format!("surface temperature is {surface_temperature} K"),
        ));
    }
    if let Some(i) = layer_temperatures
        .iter()
        .position(|t| !is_valid_temperature(*t))
    {
        return Err(ModelError::domain(
            OP,
            format!("temperature of layer {i} is {} K", layer_temperatures[i]),
        ));
    }

    let layer_emission: Vec<f64> = layer_temperatures.iter().map(|t| blackbody_flux(*t)).collect();

    let mut up = vec![0.0; num_layers + 1];
    let mut down = vec![0.0; num_layers + 1];

    up[0] = blackbody_flux(surface_temperature);
    for upper_lev in 1..=num_layers {
        let lower_lev = upper_lev - 1;
        let layer_num = lower_lev;
        let (trans, emiss) = layer_optics(optical_depth[upper_lev] - optical_depth[lower_lev]);
        up[upper_lev] = trans * up[lower_lev] + layer_emission[layer_num] * emiss;
    }

    down[num_layers] = 0.0;
    for lower_lev in (0..num_layers).rev() {
        let upper_lev = lower_lev + 1;
        let layer_num = lower_lev;
        let (trans, emiss) = layer_optics(optical_depth[upper_lev] - optical_depth[lower_lev]);
        down[lower_lev] = trans * down[upper_lev] + layer_emission[layer_num] * emiss;
    }

    Ok(LevelFluxes {
        up: up.into(),
        down: down.into(),
    })
}

/// Single-slab variant: surface and every layer share one temperature.
///
/// Identical to [`compute_fluxes`] with a uniform layer profile.
///
/// # Errors
/// Same conditions as [`compute_fluxes`].
pub fn compute_fluxes_isothermal(
    optical_depth: &LevelProfile,
    temperature: f64,
) -> ModelResult<LevelFluxes> {
    let layers = LayerProfile::uniform(optical_depth.num_layers(), temperature);
    compute_fluxes(optical_depth, &layers, temperature)
}

/// Zero is allowed: a surface with no forcing radiates nothing.
fn is_valid_temperature(t: f64) -> bool {
    t.is_finite() && t >= 0.0
}
