//! Independent runs in parallel.
//!
//! A single column is strictly sequential, but separate configurations share
//! nothing, so a batch is spread across the rayon pool. Results come back in
//! input order.

use rayon::prelude::*;
use tracing::info;

use super::{RadiativeColumnModel, RunHistory};
use crate::config::ModelConfig;
use crate::error::ModelResult;

/// Run every configuration to completion. One result per input, in order.
pub fn run_ensemble(configs: &[ModelConfig]) -> Vec<ModelResult<RunHistory>> {
    info!("Running ensemble of {} columns", configs.len());
    configs
        .par_iter()
        .map(|cfg| RadiativeColumnModel::new(cfg.clone())?.run())
        .collect()
}

/// Run `base` once for each total transmission in `transmissions`.
pub fn transmission_sweep(
    base: &ModelConfig,
    transmissions: &[f64],
) -> Vec<ModelResult<RunHistory>> {
    let configs: Vec<ModelConfig> = transmissions
        .iter()
        .map(|&tr| base.clone().with_total_transmission(tr))
        .collect();
    run_ensemble(&configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Seconds;
    use crate::error::ModelError;

    fn base() -> ModelConfig {
        ModelConfig::equilibrium_run()
            .with_num_layers(8)
            .with_num_steps(20)
            .with_time_step(Seconds::from_hours(6.0))
    }

    #[test]
    fn test_ensemble_matches_sequential_runs() {
        let configs = vec![
            base(),
            base().with_total_transmission(0.5),
            base().with_num_layers(4),
        ];
        let parallel = run_ensemble(&configs);
        assert_eq!(parallel.len(), 3);
        for (cfg, result) in configs.into_iter().zip(parallel) {
            let sequential = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();
            assert_eq!(result.unwrap(), sequential);
        }
    }

    #[test]
    fn test_sweep_keeps_order_and_errors() {
        let results = transmission_sweep(&base(), &[0.9, 0.0, 0.1]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().config.total_transmission, 0.9);
        assert!(matches!(results[1], Err(ModelError::Domain { .. })));
        assert_eq!(results[2].as_ref().unwrap().config.total_transmission, 0.1);
    }

    #[test]
    fn test_more_absorbing_column_warms_surface() {
        let results = transmission_sweep(&base().with_num_steps(200), &[0.8, 0.2]);
        let thin = results[0].as_ref().unwrap().final_state.surface_temperature;
        let thick = results[1].as_ref().unwrap().final_state.surface_temperature;
        assert!(thick > thin, "{thick} should exceed {thin}");
    }
}
