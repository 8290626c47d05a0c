//! Radiative heating rate from net flux divergence.
//!
//! ```text
//! dT/dt = -(1 / (ρ · c_p)) · ∂F_net/∂z        F_net = F↑ - F↓
//! ```
//! More net upward flux leaving the top of a layer than entering its bottom
//! cools the layer.

use super::constants::{SECONDS_PER_DAY, SPECIFIC_HEAT_DRY_AIR};
use super::hydrostatic::is_positive;
use crate::core_types::{LayerProfile, LevelProfile};
use crate::error::{ensure_len, ModelError, ModelResult};

/// Heating rate of each layer (K/s).
///
/// # Errors
/// `ModelError::Domain` if a layer has zero (or non-finite) thickness or a
/// non-positive density; `ModelError::ShapeMismatch` if the level and layer
/// profiles don't line up.
pub fn heating_rate(
    up_flux: &LevelProfile,
    down_flux: &LevelProfile,
    heights: &LevelProfile,
    layer_density: &LayerProfile,
) -> ModelResult<LayerProfile> {
    const OP: &str = "heating_rate";

    ensure_len(OP, heights.len(), up_flux.len())?;
    ensure_len(OP, heights.len(), down_flux.len())?;
    ensure_len(OP, heights.num_layers(), layer_density.len())?;

    let del_z = heights.diff();
    if let Some(i) = del_z.iter().position(|dz| *dz == 0.0 || !dz.is_finite()) {
        return Err(ModelError::domain(
            OP,
            format!("layer {i} has degenerate thickness {} m", del_z[i]),
        ));
    }
    if let Some(i) = layer_density.iter().position(|rho| !is_positive(*rho)) {
        return Err(ModelError::domain(
            OP,
            format!("density of layer {i} is {} kg/m³", layer_density[i]),
        ));
    }

    let net_up: LevelProfile = up_flux
        .iter()
        .zip(down_flux.iter())
        .map(|(u, d)| u - d)
        .collect();
    let del_f = net_up.diff();

    Ok(del_f
        .iter()
        .zip(del_z.iter())
        .zip(layer_density.iter())
        .map(|((df, dz), rho)| -(df / dz) / (rho * SPECIFIC_HEAT_DRY_AIR))
        .collect())
}

/// Convert a heating rate from K/s to K/day.
pub fn to_kelvin_per_day(rate: &LayerProfile) -> LayerProfile {
    rate.iter().map(|r| r * SECONDS_PER_DAY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column() -> (LevelProfile, LayerProfile) {
        let heights = LevelProfile::new(vec![0.0, 1000.0, 2500.0, 4500.0]);
        let density = LayerProfile::new(vec![1.1, 0.95, 0.8]);
        (heights, density)
    }

    #[test]
    fn test_constant_net_flux_gives_zero_heating() {
        let (heights, density) = column();
        let up = LevelProfile::new(vec![400.0; 4]);
        let down = LevelProfile::new(vec![150.0; 4]);
        let rate = heating_rate(&up, &down, &heights, &density).unwrap();
        assert!(rate.iter().all(|r| *r == 0.0));
    }

    #[test]
    fn test_divergence_cools_convergence_warms() {
        let (heights, density) = column();
        // Net flux rises through layer 0 (divergence), falls through layer 2 (convergence)
        let up = LevelProfile::new(vec![300.0, 310.0, 310.0, 300.0]);
        let down = LevelProfile::new(vec![0.0; 4]);
        let rate = heating_rate(&up, &down, &heights, &density).unwrap();
        assert!(rate[0] < 0.0);
        assert_eq!(rate[1], 0.0);
        assert!(rate[2] > 0.0);
        assert_relative_eq!(rate[0], -10.0 / 1000.0 / (1.1 * 1004.0), epsilon = 1e-15);
    }

    #[test]
    fn test_zero_thickness_layer_is_domain_error() {
        let heights = LevelProfile::new(vec![0.0, 1000.0, 1000.0]);
        let density = LayerProfile::new(vec![1.0, 1.0]);
        let f = LevelProfile::new(vec![1.0; 3]);
        let err = heating_rate(&f, &f, &heights, &density).unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("layer 1"));
    }

    #[test]
    fn test_kelvin_per_day() {
        let rate = LayerProfile::new(vec![1.0e-5, -2.0e-5]);
        let per_day = to_kelvin_per_day(&rate);
        assert_relative_eq!(per_day[0], 0.864, epsilon = 1e-12);
        assert_relative_eq!(per_day[1], -1.728, epsilon = 1e-12);
    }
}
