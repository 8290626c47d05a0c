//! Radiative-equilibrium time loop.
//!
//! [`RadiativeColumnModel`] owns the only mutable [`AtmosphericState`] of a run
//! and moves it through a fixed number of explicit Euler steps:
//!
//! ```text
//! Initializing ──step()──▶ Stepping ──step()──▶ … ──▶ Finished
//! ```
//!
//! Each step:
//! 1. densities and level heights from the current layer temperatures
//! 2. two-stream fluxes
//! 3. heating rate from the net flux divergence
//! 4. Euler update of the layer temperatures
//! 5. surface temperature from shortwave plus the step's downwelling longwave
//! 6. snapshot of the step's diagnostics
//!
//! Step `n + 1` consumes the whole output of step `n`, so the loop is strictly
//! sequential. Independent runs can be spread across threads with
//! [`ensemble`].

pub mod ensemble;
pub mod profiler;
mod snapshot;

pub use snapshot::{RunHistory, StepSnapshot};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::core_types::{Kelvin, KelvinDelta, LayerProfile, LevelProfile, Seconds};
use crate::error::{ModelError, ModelResult};
use crate::physics::fluxes::compute_fluxes;
use crate::physics::heating::heating_rate;
use crate::physics::hydrostatic::{
    heights_from_densities, is_positive, layer_densities, pressure_levels,
};
use crate::physics::optical_depth::build_optical_depth;
use crate::physics::time_step::{step_temperature_in_place, update_surface_temperature};
use profiler::ProfilerScope;

/// Steps between progress messages.
const PROGRESS_INTERVAL: usize = 50;

/// Prognostic state of the column: layer temperatures and surface temperature.
///
/// Heights and fluxes are recomputed from this every step and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericState {
    /// Temperature of each layer (K)
    pub layer_temperatures: LayerProfile,
    /// Temperature of the black surface
    pub surface_temperature: Kelvin,
}

impl AtmosphericState {
    /// Column at one temperature throughout, surface included.
    pub fn isothermal(num_layers: usize, temperature: Kelvin) -> Self {
        Self {
            layer_temperatures: LayerProfile::uniform(num_layers, *temperature),
            surface_temperature: temperature,
        }
    }

    /// Surface minus lowest-layer temperature.
    pub fn air_surface_difference(&self) -> KelvinDelta {
        KelvinDelta::new(*self.surface_temperature - self.layer_temperatures.lowest().unwrap_or(0.0))
    }
}

/// Where a model is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Grid, optical depth and initial state are built; no step taken yet
    Initializing,
    /// Some steps done, more remain
    Stepping {
        /// Steps completed so far
        completed: usize,
    },
    /// All configured steps done
    Finished,
}

/// One-dimensional grey radiative-equilibrium column.
#[derive(Debug, Clone)]
pub struct RadiativeColumnModel {
    config: ModelConfig,
    pressure_levels: LevelProfile,
    optical_depth: LevelProfile,
    state: AtmosphericState,
    snapshots: Vec<StepSnapshot>,
}

impl RadiativeColumnModel {
    /// Validate `config` and build the fixed column: pressure levels, optical
    /// depth and an isothermal initial state.
    ///
    /// # Errors
    /// `ModelError::Configuration` for an inconsistent setup and
    /// `ModelError::Domain` for physically invalid values (non-positive
    /// transmission or initial temperature). No step can run after either.
    pub fn new(config: ModelConfig) -> ModelResult<Self> {
        config.validate()?;

        let pressure_levels = pressure_levels(
            *config.surface_pressure,
            *config.top_pressure,
            config.num_layers,
        )?;
        let optical_depth = build_optical_depth(config.total_transmission, config.num_layers)?;
        let state = AtmosphericState::isothermal(config.num_layers, config.surface_temperature_init);

        // Reject a non-physical start before any step runs
        layer_densities(&pressure_levels, &state.layer_temperatures)?;

        info!(
            "Radiative column initialized: {} layers, τ* = {:.3}, T0 = {}, {} steps of {:.1} h",
            config.num_layers,
            optical_depth.top().unwrap_or(0.0),
            config.surface_temperature_init,
            config.num_steps,
            config.time_step.to_hours()
        );

        Ok(Self {
            config,
            pressure_levels,
            optical_depth,
            state,
            snapshots: Vec::new(),
        })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Pressure at each level (Pa).
    pub fn pressure_levels(&self) -> &LevelProfile {
        &self.pressure_levels
    }

    /// Optical depth at each level.
    pub fn optical_depth(&self) -> &LevelProfile {
        &self.optical_depth
    }

    /// Current prognostic state.
    pub fn state(&self) -> &AtmosphericState {
        &self.state
    }

    /// Snapshots recorded so far.
    pub fn snapshots(&self) -> &[StepSnapshot] {
        &self.snapshots
    }

    /// Number of steps completed.
    pub fn steps_completed(&self) -> usize {
        self.snapshots.len()
    }

    /// Simulated time elapsed.
    pub fn elapsed(&self) -> Seconds {
        self.config.time_step * self.steps_completed() as f64
    }

    /// Current phase of the run.
    pub fn phase(&self) -> RunPhase {
        let completed = self.steps_completed();
        if completed >= self.config.num_steps {
            RunPhase::Finished
        } else if completed == 0 {
            RunPhase::Initializing
        } else {
            RunPhase::Stepping { completed }
        }
    }

    /// Advance the column by one time step.
    ///
    /// # Errors
    /// `ModelError::Finished` once every configured step has run; any error
    /// raised inside the step comes back as `ModelError::StepFailed` carrying
    /// the step index. The state is left as it was before the failed step.
    pub fn step(&mut self) -> ModelResult<&StepSnapshot> {
        let step = self.steps_completed();
        if self.phase() == RunPhase::Finished {
            return Err(ModelError::Finished(step));
        }

        let _scope = ProfilerScope::new("column_step");
        let (next_state, snapshot) = self.advance(step).map_err(|e| {
            warn!("Column step {} failed: {}", step, e);
            e.at_step(step)
        })?;

        debug!(
            "step {}: T_sfc {} → {}, OLR = {:.2} W/m²",
            step,
            snapshot.surface_temperature,
            next_state.surface_temperature,
            snapshot.outgoing_longwave()
        );
        if step.checked_rem(PROGRESS_INTERVAL) == Some(0) {
            info!(
                "percent complete: {}%",
                step * 100 / self.config.num_steps.max(1)
            );
        }

        self.state = next_state;
        self.snapshots.push(snapshot);
        Ok(&self.snapshots[step])
    }

    /// Run every remaining step and hand back the full history.
    ///
    /// # Errors
    /// The first step error, wrapped as `ModelError::StepFailed`. No partial
    /// history is returned.
    pub fn run(mut self) -> ModelResult<RunHistory> {
        let _scope = ProfilerScope::new("column_run");
        while self.phase() != RunPhase::Finished {
            self.step()?;
        }
        info!(
            "Radiative column finished after {} steps ({:.1} days): T_sfc = {}, air-surface difference {}",
            self.steps_completed(),
            self.elapsed().to_days(),
            self.state.surface_temperature,
            self.state.air_surface_difference()
        );
        Ok(self.into_history())
    }

    /// Consume the model, keeping whatever has been recorded.
    pub fn into_history(self) -> RunHistory {
        RunHistory {
            config: self.config,
            pressure_levels: self.pressure_levels,
            optical_depth: self.optical_depth,
            snapshots: self.snapshots,
            final_state: self.state,
        }
    }

    /// Compute the state after `step` without touching `self`.
    fn advance(&self, step: usize) -> ModelResult<(AtmosphericState, StepSnapshot)> {
        let temps = &self.state.layer_temperatures;
        let t_sfc = self.state.surface_temperature;

        let densities = layer_densities(&self.pressure_levels, temps)?;
        let heights = heights_from_densities(&self.pressure_levels, &densities);
        let fluxes = compute_fluxes(&self.optical_depth, temps, *t_sfc)?;
        let rate = heating_rate(&fluxes.up, &fluxes.down, &heights, &densities)?;

        let mut next_temps = temps.clone();
        step_temperature_in_place(&mut next_temps, &rate, *self.config.time_step)?;
        // The next step's densities reject this state; only flag it here
        if let Some(i) = next_temps.iter().position(|t| !is_positive(*t)) {
            warn!(
                "step {}: layer {} reached {:.2} K, time step {} is too long",
                step, i, next_temps[i], self.config.time_step
            );
        }

        let new_sfc =
            update_surface_temperature(*self.config.incoming_shortwave, fluxes.surface_downwelling())?;
        let new_sfc = Kelvin::checked(new_sfc).ok_or_else(|| {
            ModelError::domain(
                "update_surface_temperature",
                format!("surface temperature evaluated to {new_sfc}"),
            )
        })?;

        let snapshot = StepSnapshot {
            step,
            elapsed: self.config.time_step * step as f64,
            layer_temperatures: temps.clone(),
            surface_temperature: t_sfc,
            heights,
            up_flux: fluxes.up,
            down_flux: fluxes.down,
            heating_rate: rate,
        };
        let next_state = AtmosphericState {
            layer_temperatures: next_temps,
            surface_temperature: new_sfc,
        };
        Ok((next_state, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Pascals, WattsPerSquareMeter};

    fn small_config() -> ModelConfig {
        ModelConfig::equilibrium_run()
            .with_num_layers(10)
            .with_num_steps(5)
            .with_time_step(Seconds::from_hours(6.0))
    }

    #[test]
    fn test_phase_transitions() {
        let mut model = RadiativeColumnModel::new(small_config().with_num_steps(2)).unwrap();
        assert_eq!(model.phase(), RunPhase::Initializing);
        model.step().unwrap();
        assert_eq!(model.phase(), RunPhase::Stepping { completed: 1 });
        model.step().unwrap();
        assert_eq!(model.phase(), RunPhase::Finished);
        assert_eq!(model.step().unwrap_err(), ModelError::Finished(2));
    }

    #[test]
    fn test_zero_steps_is_finished_immediately() {
        let model = RadiativeColumnModel::new(small_config().with_num_steps(0)).unwrap();
        assert_eq!(model.phase(), RunPhase::Finished);
        let history = model.run().unwrap();
        assert!(history.is_empty());
        assert_eq!(
            history.final_state,
            AtmosphericState::isothermal(10, Kelvin::new(300.0))
        );
    }

    #[test]
    fn test_snapshot_records_entering_state() {
        let mut model = RadiativeColumnModel::new(small_config()).unwrap();
        let before = model.state().clone();
        let snap = model.step().unwrap().clone();
        assert_eq!(snap.step, 0);
        assert_eq!(snap.elapsed, Seconds::new(0.0));
        assert_eq!(snap.layer_temperatures, before.layer_temperatures);
        assert_eq!(snap.surface_temperature, before.surface_temperature);
        assert_eq!(snap.heights.len(), 11);
        assert_ne!(model.state(), &before);
        assert_eq!(model.elapsed(), Seconds::from_hours(6.0));
    }

    #[test]
    fn test_run_records_every_step() {
        let history = RadiativeColumnModel::new(small_config()).unwrap().run().unwrap();
        assert_eq!(history.len(), 5);
        for (i, s) in history.snapshots.iter().enumerate() {
            assert_eq!(s.step, i);
        }
    }

    #[test]
    fn test_configuration_error_prevents_model() {
        let cfg = small_config().with_pressure_bounds(Pascals::new(1000.0), Pascals::new(2000.0));
        assert!(matches!(
            RadiativeColumnModel::new(cfg),
            Err(ModelError::Configuration(_))
        ));
    }

    #[test]
    fn test_non_positive_transmission_is_domain_error() {
        let err = RadiativeColumnModel::new(small_config().with_total_transmission(0.0)).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.step(), None);
    }

    #[test]
    fn test_zero_initial_temperature_is_domain_error() {
        let cfg = small_config().with_surface_temperature_init(Kelvin::new(0.0));
        assert!(RadiativeColumnModel::new(cfg).unwrap_err().is_domain());
    }

    fn unstable_config() -> ModelConfig {
        // Opaque layers and a year-long step drive temperatures negative
        small_config()
            .with_pressure_bounds(Pascals::new(100_000.0), Pascals::new(1000.0))
            .with_total_transmission(1.0e-6)
            .with_incoming_shortwave(WattsPerSquareMeter::new(0.0))
            .with_time_step(Seconds::from_days(365.0))
    }

    #[test]
    fn test_unstable_time_step_fails_on_following_step() {
        let err = RadiativeColumnModel::new(unstable_config().with_num_steps(10))
            .unwrap()
            .run()
            .unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.step(), Some(1));
        assert!(err.to_string().contains("layer_densities"));
    }

    #[test]
    fn test_overshooting_last_step_still_completes() {
        let history = RadiativeColumnModel::new(unstable_config().with_num_steps(1))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.snapshots[0]
            .layer_temperatures
            .iter()
            .all(|t| *t > 0.0));
        assert!(history
            .final_state
            .layer_temperatures
            .iter()
            .any(|t| *t < 0.0));
    }
}
