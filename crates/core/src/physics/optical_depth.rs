//! Vertical optical depth profiles.
//!
//! Two ways to build τ on levels, counted upward from 0 at the surface:
//!
//! 1. **Uniform grey column**: split a total transmission evenly across
//!    `N` layers.
//!    ```text
//!    t_layer = T_total^(1/N)      τ_layer = -ln(t_layer)
//!    ```
//! 2. **Absorbing gas** with mixing ratio `r` and mass absorption
//!    coefficient `k` (Wallace & Hobbs eq. 4.32):
//!    ```text
//!    Δτ = r · ρ · k · Δz
//!    ```

use crate::core_types::LevelProfile;
use crate::error::{ensure_len, ModelError, ModelResult};

/// Optical depth at each level for a column of `num_layers` equal layers whose
/// combined transmission is `total_transmission`.
///
/// Returns `num_layers + 1` values starting at 0 and ending at
/// `-ln(total_transmission)`.
///
/// # Errors
/// `ModelError::Domain` if the transmission is not in (0, 1] or
/// `num_layers` is 0.
pub fn build_optical_depth(total_transmission: f64, num_layers: usize) -> ModelResult<LevelProfile> {
    const OP: &str = "build_optical_depth";

    if num_layers < 1 {
        return Err(ModelError::domain(OP, "num_layers must be at least 1"));
    }
    if !total_transmission.is_finite() || total_transmission <= 0.0 {
        return Err(ModelError::domain(
            OP,
            format!("total transmission must be positive, got {total_transmission}"),
        ));
    }
    if total_transmission > 1.0 {
        return Err(ModelError::domain(
            OP,
            format!("total transmission cannot exceed 1, got {total_transmission}"),
        ));
    }

    let trans_layer = total_transmission.powf(1.0 / num_layers as f64);
    // -ln(1) is -0.0; keep the profile free of negative zeros
    let tau_layer = (-trans_layer.ln()).max(0.0);
    let increments = vec![tau_layer; num_layers];
    Ok(LevelProfile::cumulative_from_zero(&increments))
}

/// Optical depth of a well-mixed absorbing gas on a column with the given
/// level densities and heights.
///
/// The density at the lower level of each layer is used for the whole layer.
///
/// # Errors
/// `ModelError::Domain` on negative mixing ratio, absorption coefficient or
/// density, or heights that decrease upward; `ModelError::ShapeMismatch` if
/// density and heights differ in length.
pub fn optical_depth_from_absorber(
    mixing_ratio: f64,
    mass_absorption_coeff: f64,
    density: &LevelProfile,
    heights: &LevelProfile,
) -> ModelResult<LevelProfile> {
    const OP: &str = "optical_depth_from_absorber";

    ensure_len(OP, heights.len(), density.len())?;
    if !is_non_negative(mixing_ratio) || !is_non_negative(mass_absorption_coeff) {
        return Err(ModelError::domain(
            OP,
            format!(
                "mixing ratio ({mixing_ratio}) and absorption coefficient ({mass_absorption_coeff}) must be non-negative"
            ),
        ));
    }
    if let Some(i) = density.iter().position(|rho| !is_non_negative(*rho)) {
        return Err(ModelError::domain(
            OP,
            format!("density at level {i} is {}", density[i]),
        ));
    }

    let dz = heights.diff();
    if let Some(i) = dz.iter().position(|d| !is_non_negative(*d)) {
        return Err(ModelError::domain(
            OP,
            format!("heights decrease across layer {i} (Δz = {})", dz[i]),
        ));
    }

    let increments: Vec<f64> = dz
        .iter()
        .zip(density.iter())
        .map(|(delta_z, rho)| mixing_ratio * rho * mass_absorption_coeff * delta_z)
        .collect();
    Ok(LevelProfile::cumulative_from_zero(&increments))
}

/// Finite and at least zero.
fn is_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}
