//! Model configuration.
//!
//! All parameters of a run live in [`ModelConfig`]; nothing is read from
//! global state. Configurations come from a preset, from JSON (missing keys
//! take the [`Default`] values), or from the `with_*` builder methods.
//!
//! ```
//! use grey_column_core::config::ModelConfig;
//! use grey_column_core::core_types::Seconds;
//!
//! let cfg = ModelConfig::equilibrium_run()
//!     .with_num_layers(50)
//!     .with_time_step(Seconds::from_hours(6.0));
//! assert!(cfg.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core_types::{Kelvin, Pascals, Seconds, WattsPerSquareMeter};
use crate::error::{ModelError, ModelResult};

/// Parameters of one radiative-equilibrium run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Total longwave transmission of the column, in (0, 1]
    pub total_transmission: f64,
    /// Vertical resolution (number of layers)
    pub num_layers: usize,
    /// Initial temperature of the surface and every layer
    pub surface_temperature_init: Kelvin,
    /// Pressure at level 0
    pub surface_pressure: Pascals,
    /// Pressure at the model top
    pub top_pressure: Pascals,
    /// Explicit Euler step
    pub time_step: Seconds,
    /// Number of steps to run; there is no convergence-based early exit
    pub num_steps: usize,
    /// Absorbed shortwave at the surface, applied every step
    pub incoming_shortwave: WattsPerSquareMeter,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::equilibrium_run()
    }
}

impl ModelConfig {
    /// Reference radiative-equilibrium run: 100 layers between 100 and 10 kPa,
    /// total transmission 0.2, isothermal start at 300 K, 241 W/m² of absorbed
    /// sunlight, 30-hour steps for 600 days.
    pub fn equilibrium_run() -> Self {
        Self {
            total_transmission: 0.2,
            num_layers: 100,
            surface_temperature_init: Kelvin::new(300.0),
            surface_pressure: Pascals::STANDARD_SURFACE,
            top_pressure: Pascals::from_kilopascals(10.0),
            time_step: Seconds::from_hours(30.0),
            num_steps: 480,
            incoming_shortwave: WattsPerSquareMeter::ABSORBED_SOLAR_GLOBAL_MEAN,
        }
    }

    /// Two transparent layers with no sunlight: the surface has nothing to
    /// balance against and collapses to 0 K after the first step.
    pub fn transparent_column() -> Self {
        Self {
            total_transmission: 1.0,
            num_layers: 2,
            num_steps: 1,
            incoming_shortwave: WattsPerSquareMeter::new(0.0),
            ..Self::equilibrium_run()
        }
    }

    /// Look up a preset by name (`equilibrium`, `transparent`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "equilibrium" | "equilibrium-run" | "default" => Some(Self::equilibrium_run()),
            "transparent" | "transparent-column" => Some(Self::transparent_column()),
            _ => None,
        }
    }

    /// Set the total transmission.
    pub fn with_total_transmission(mut self, total_transmission: f64) -> Self {
        self.total_transmission = total_transmission;
        self
    }

    /// Set the number of layers.
    pub fn with_num_layers(mut self, num_layers: usize) -> Self {
        self.num_layers = num_layers;
        self
    }

    /// Set the initial surface and air temperature.
    pub fn with_surface_temperature_init(mut self, temperature: Kelvin) -> Self {
        self.surface_temperature_init = temperature;
        self
    }

    /// Set surface and top pressure.
    pub fn with_pressure_bounds(mut self, surface: Pascals, top: Pascals) -> Self {
        self.surface_pressure = surface;
        self.top_pressure = top;
        self
    }

    /// Set the Euler time step.
    pub fn with_time_step(mut self, time_step: Seconds) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the number of steps.
    pub fn with_num_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Set the absorbed shortwave forcing.
    pub fn with_incoming_shortwave(mut self, shortwave: WattsPerSquareMeter) -> Self {
        self.incoming_shortwave = shortwave;
        self
    }

    /// Simulated time covered by the full run.
    pub fn total_duration(&self) -> Seconds {
        self.time_step * self.num_steps as f64
    }

    /// Check the configuration for structural consistency.
    ///
    /// Physically invalid values that the physics itself rejects (a
    /// non-positive transmission or temperature) surface as
    /// `ModelError::Domain` when the model is built.
    pub fn validate(&self) -> ModelResult<()> {
        if self.num_layers < 1 {
            return Err(ModelError::configuration("num_layers must be at least 1"));
        }
        if !self.total_transmission.is_finite() || self.total_transmission > 1.0 {
            return Err(ModelError::configuration(format!(
                "total_transmission must be at most 1, got {}",
                self.total_transmission
            )));
        }
        if !self.surface_temperature_init.is_finite() {
            return Err(ModelError::configuration(
                "surface_temperature_init is not finite",
            ));
        }
        if !self.top_pressure.is_finite() || *self.top_pressure < 0.0 {
            return Err(ModelError::configuration(format!(
                "top_pressure must be non-negative, got {}",
                *self.top_pressure
            )));
        }
        if !self.surface_pressure.is_finite() || self.surface_pressure <= self.top_pressure {
            return Err(ModelError::configuration(format!(
                "surface_pressure ({} Pa) must exceed top_pressure ({} Pa)",
                *self.surface_pressure, *self.top_pressure
            )));
        }
        if !self.time_step.is_finite() || *self.time_step <= 0.0 {
            return Err(ModelError::configuration(format!(
                "time_step must be positive, got {} s",
                *self.time_step
            )));
        }
        if !self.incoming_shortwave.is_finite() || *self.incoming_shortwave < 0.0 {
            return Err(ModelError::configuration(format!(
                "incoming_shortwave must be non-negative, got {} W/m²",
                *self.incoming_shortwave
            )));
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing keys take default values.
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::ConfigParse(e.to_string()))
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ModelError::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::ConfigParse(e.to_string()))
    }
}
