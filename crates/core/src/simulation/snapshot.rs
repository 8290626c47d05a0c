//! Per-step records and the completed run.

use serde::{Deserialize, Serialize};

use super::AtmosphericState;
use crate::config::ModelConfig;
use crate::core_types::{Kelvin, KelvinDelta, LayerProfile, LevelProfile, Meters, Pascals, Seconds};
use crate::physics::heating::to_kelvin_per_day;

/// Everything the model knew about the column when it started step `step`.
///
/// Temperatures are the ones the step's fluxes were computed from, so every
/// field in a snapshot describes the same instant, `elapsed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// Zero-based step index
    pub step: usize,
    /// Simulated time at the start of the step
    pub elapsed: Seconds,
    /// Layer temperatures (K)
    pub layer_temperatures: LayerProfile,
    /// Surface temperature
    pub surface_temperature: Kelvin,
    /// Level heights (m)
    pub heights: LevelProfile,
    /// Upward longwave flux (W/m²)
    pub up_flux: LevelProfile,
    /// Downward longwave flux (W/m²)
    pub down_flux: LevelProfile,
    /// Radiative heating rate (K/s)
    pub heating_rate: LayerProfile,
}

impl StepSnapshot {
    /// Height of each layer midpoint (m).
    pub fn layer_heights(&self) -> LayerProfile {
        self.heights.midpoints()
    }

    /// Surface minus lowest-layer temperature.
    pub fn air_surface_difference(&self) -> KelvinDelta {
        KelvinDelta::new(*self.surface_temperature - self.layer_temperatures.lowest().unwrap_or(0.0))
    }

    /// Heating rate in K/day.
    pub fn heating_rate_per_day(&self) -> LayerProfile {
        to_kelvin_per_day(&self.heating_rate)
    }

    /// Outgoing longwave radiation at the model top (W/m²).
    pub fn outgoing_longwave(&self) -> f64 {
        self.up_flux.top().unwrap_or(0.0)
    }
}

/// A completed run: the fixed column geometry, one snapshot per step and the
/// state left after the last step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    /// Configuration the run was made with
    pub config: ModelConfig,
    /// Pressure at each level (Pa)
    pub pressure_levels: LevelProfile,
    /// Optical depth at each level
    pub optical_depth: LevelProfile,
    /// One entry per step, in step order
    pub snapshots: Vec<StepSnapshot>,
    /// State after the final step
    pub final_state: AtmosphericState,
}

impl RunHistory {
    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when the run had zero steps.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// State after the final step.
    pub fn final_state(&self) -> &AtmosphericState {
        &self.final_state
    }

    /// Simulated time at the start of each step.
    pub fn times(&self) -> Vec<Seconds> {
        self.snapshots.iter().map(|s| s.elapsed).collect()
    }

    /// Surface temperature at the start of each step.
    pub fn surface_temperatures(&self) -> Vec<Kelvin> {
        self.snapshots.iter().map(|s| s.surface_temperature).collect()
    }

    /// Surface minus lowest-layer temperature at the start of each step.
    pub fn air_surface_differences(&self) -> Vec<KelvinDelta> {
        self.snapshots
            .iter()
            .map(StepSnapshot::air_surface_difference)
            .collect()
    }

    /// Heights over time of the pressure level closest to `pressure`.
    ///
    /// Returns the chosen level index and one height per step. Level heights
    /// are integrated upward from 0, so a negative one means a corrupted
    /// snapshot and panics in [`Meters::new`].
    pub fn heights_at_pressure(&self, pressure: Pascals) -> Option<(usize, Vec<Meters>)> {
        let level = self.pressure_levels.nearest_index(*pressure)?;
        let heights = self
            .snapshots
            .iter()
            .map(|s| Meters::new(s.heights[level]))
            .collect();
        Some((level, heights))
    }

    /// Snapshot whose start time is closest to `days` after the run began.
    pub fn snapshot_at_day(&self, days: f64) -> Option<&StepSnapshot> {
        self.snapshots
            .iter()
            .min_by(|a, b| {
                (a.elapsed.to_days() - days)
                    .abs()
                    .total_cmp(&(b.elapsed.to_days() - days).abs())
            })
    }

    /// Change in surface temperature over the final step.
    pub fn final_surface_change(&self) -> Option<KelvinDelta> {
        self.snapshots
            .last()
            .map(|last| self.final_state.surface_temperature - last.surface_temperature)
    }
}
