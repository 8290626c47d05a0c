//! Physical constants used by the column model.

/// Stefan-Boltzmann constant (W/m²K⁴)
///
/// Universal physical constant for blackbody radiation.
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Gas constant for dry air (J/(kg·K))
pub const GAS_CONSTANT_DRY_AIR: f64 = 287.0;

/// Gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.8;

/// Specific heat of dry air at constant pressure (J/(kg·K))
pub const SPECIFIC_HEAT_DRY_AIR: f64 = 1004.0;

/// Diffusivity factor of the two-stream approximation.
///
/// Replaces the angular integral of the transmission with a single
/// exponential: `exp(-D·Δτ)`.
pub const DIFFUSIVITY_FACTOR: f64 = 5.0 / 3.0;

/// Seconds per day, for K/s → K/day conversions
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Blackbody emission σT⁴ (W/m²)
#[inline]
pub fn blackbody_flux(temperature_k: f64) -> f64 {
    STEFAN_BOLTZMANN * temperature_k.powi(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_blackbody_flux_t4_scaling() {
        let ratio = blackbody_flux(600.0) / blackbody_flux(300.0);
        assert_relative_eq!(ratio, 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_blackbody_flux_at_300k() {
        // 5.67e-8 × 8.1e9
        assert_relative_eq!(blackbody_flux(300.0), 459.27, epsilon = 1e-9);
    }
}
