//! Explicit (forward) Euler temperature update and quasi-equilibrium surface.
//!
//! The Euler step is only conditionally stable. Nothing here checks the step
//! size; a `dt` much longer than the radiative relaxation time of a layer
//! makes the run oscillate or diverge.

use super::constants::STEFAN_BOLTZMANN;
use super::hydrostatic::is_positive;
use crate::core_types::LayerProfile;
use crate::error::{ensure_len, ModelError, ModelResult};

/// Advance layer temperatures in place by `rate · dt`.
///
/// # Errors
/// `ModelError::Domain` if `dt` is not a positive finite number;
/// `ModelError::ShapeMismatch` if the profiles differ in length.
pub fn step_temperature_in_place(
    layer_temperatures: &mut LayerProfile,
    heating_rate: &LayerProfile,
    dt: f64,
) -> ModelResult<()> {
    const OP: &str = "step_temperature";

    ensure_len(OP, layer_temperatures.len(), heating_rate.len())?;
    if !is_positive(dt) {
        return Err(ModelError::domain(OP, format!("time step must be positive, got {dt} s")));
    }

    for (temp, rate) in layer_temperatures.iter_mut().zip(heating_rate.iter()) {
        *temp += rate * dt;
    }
    Ok(())
}

/// Return the layer temperatures advanced by one explicit Euler step.
///
/// # Errors
/// Same conditions as [`step_temperature_in_place`].
pub fn step_temperature(
    layer_temperatures: &LayerProfile,
    heating_rate: &LayerProfile,
    dt: f64,
) -> ModelResult<LayerProfile> {
    let mut next = layer_temperatures.clone();
    step_temperature_in_place(&mut next, heating_rate, dt)?;
    Ok(next)
}

/// Temperature of a black surface in radiative balance with the absorbed
/// shortwave and the downwelling longwave:
/// ```text
/// T_sfc = ((S + L↓) / σ)^(1/4)
/// ```
/// The surface has no heat capacity: it jumps to balance every step.
///
/// # Errors
/// `ModelError::Domain` if the combined forcing is negative or not finite.
pub fn update_surface_temperature(
    incoming_shortwave: f64,
    downward_longwave_at_surface: f64,
) -> ModelResult<f64> {
    let forcing = incoming_shortwave + downward_longwave_at_surface;
    if !forcing.is_finite() || forcing < 0.0 {
        return Err(ModelError::domain(
            "update_surface_temperature",
            format!("surface forcing must be non-negative, got {forcing} W/m²"),
        ));
    }
    Ok((forcing / STEFAN_BOLTZMANN).powf(0.25))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euler_step() {
        let t = LayerProfile::new(vec![300.0, 280.0]);
        let rate = LayerProfile::new(vec![1.0e-5, -2.0e-5]);
        let next = step_temperature(&t, &rate, 3600.0).unwrap();
        assert_relative_eq!(next[0], 300.036, epsilon = 1e-9);
        assert_relative_eq!(next[1], 279.928, epsilon = 1e-9);
        // Input untouched
        assert_eq!(t[0], 300.0);
    }

    #[test]
    fn test_constant_rate_two_half_steps_equal_one_full_step() {
        let t = LayerProfile::new(vec![250.0, 260.0, 270.0]);
        let rate = LayerProfile::new(vec![2.0e-5, 0.0, -3.0e-5]);
        let two_halves = step_temperature(&step_temperature(&t, &rate, 1800.0).unwrap(), &rate, 1800.0)
            .unwrap();
        let one_full = step_temperature(&t, &rate, 3600.0).unwrap();
        for (a, b) in two_halves.iter().zip(one_full.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rejects_non_positive_dt() {
        let t = LayerProfile::new(vec![300.0]);
        let rate = LayerProfile::new(vec![0.0]);
        assert!(step_temperature(&t, &rate, 0.0).unwrap_err().is_domain());
        assert!(step_temperature(&t, &rate, -1.0).unwrap_err().is_domain());
    }

    #[test]
    fn test_surface_balance() {
        let t = update_surface_temperature(241.0, 0.0).unwrap();
        assert_relative_eq!(STEFAN_BOLTZMANN * t.powi(4), 241.0, epsilon = 1e-9);
        assert_eq!(update_surface_temperature(0.0, 0.0).unwrap(), 0.0);
        assert!(update_surface_temperature(-10.0, 0.0).unwrap_err().is_domain());
    }
}
