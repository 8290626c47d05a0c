//! End-to-end runs of the radiative column.
//!
//! Covers the documented startup scenarios, relaxation toward equilibrium,
//! error propagation out of the time loop and the diagnostics a run exposes.
//!
//! Run tests with: cargo test --test `radiative_equilibrium`

use approx::assert_relative_eq;
use grey_column_core::core_types::{KelvinDelta, Meters};
use grey_column_core::physics::{blackbody_flux, SECONDS_PER_DAY};
use grey_column_core::{
    AtmosphericState, Kelvin, ModelConfig, ModelError, Pascals, RadiativeColumnModel, RunPhase,
    Seconds, WattsPerSquareMeter,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Startup scenarios
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_transparent_column_without_sunlight_collapses_surface() {
    let cfg = ModelConfig::transparent_column();
    assert_eq!(cfg.num_layers, 2);
    assert_eq!(*cfg.incoming_shortwave, 0.0);

    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();
    assert_eq!(history.len(), 1);

    let step = &history.snapshots[0];
    assert!(step.heating_rate.iter().all(|r| *r == 0.0));
    assert!(step.down_flux.iter().all(|d| *d == 0.0));
    assert_relative_eq!(step.outgoing_longwave(), blackbody_flux(300.0));

    // Nothing comes down to balance the surface
    assert_eq!(history.final_state.surface_temperature, Kelvin::new(0.0));
    assert_eq!(&*history.final_state.layer_temperatures, &[300.0, 300.0]);
}

#[test]
fn test_collapsed_surface_keeps_stepping() {
    let cfg = ModelConfig::transparent_column().with_num_steps(3);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();

    let t_sfc: Vec<f64> = history.surface_temperatures().iter().map(|t| **t).collect();
    assert_eq!(t_sfc, vec![300.0, 0.0, 0.0]);
    assert!(history.snapshots[1].up_flux.iter().all(|u| *u == 0.0));
}

#[test]
fn test_first_step_of_reference_run_warms_surface() {
    let mut model = RadiativeColumnModel::new(ModelConfig::equilibrium_run()).unwrap();
    model.step().unwrap();

    // 241 W/m² plus back radiation from a 300 K column with emissivity 1 - 0.2^(5/3)
    let back = blackbody_flux(300.0) * (1.0 - 0.2_f64.powf(5.0 / 3.0));
    let expected = ((241.0 + back) / 5.67e-8).powf(0.25);
    assert_relative_eq!(
        *model.state().surface_temperature,
        expected,
        max_relative = 1e-9
    );
    assert!(*model.state().surface_temperature > 320.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Relaxation toward equilibrium
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reference_column_converges_without_oscillating() {
    let cfg = ModelConfig::equilibrium_run()
        .with_time_step(Seconds::from_hours(6.0))
        .with_num_steps(4000);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();

    let change = history.final_surface_change().unwrap();
    assert!(
        change.abs() < KelvinDelta::new(0.01),
        "surface still changing by {change} per step"
    );

    // Late in the run the surface moves in one direction only
    let t_sfc = history.surface_temperatures();
    let diffs: Vec<f64> = t_sfc[t_sfc.len() / 2..]
        .windows(2)
        .map(|w| *w[1] - *w[0])
        .filter(|d| d.abs() > 1e-9)
        .collect();
    let rising = diffs.iter().filter(|d| **d > 0.0).count();
    assert!(
        rising == 0 || rising == diffs.len(),
        "{rising} of {} late steps rise",
        diffs.len()
    );

    // Greenhouse: surface above the bare radiative equilibrium of 241 W/m²
    let bare = (241.0 / 5.67e-8_f64).powf(0.25);
    assert!(*history.final_state.surface_temperature > bare);
    assert!(history.final_state.air_surface_difference() > KelvinDelta::new(0.0));
}

#[test]
fn test_relaxed_column_balances_top_of_atmosphere() {
    let cfg = ModelConfig::equilibrium_run()
        .with_num_layers(20)
        .with_time_step(Seconds::from_hours(6.0))
        .with_num_steps(6000);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();

    let last = history.snapshots.last().unwrap();
    assert_relative_eq!(last.outgoing_longwave(), 241.0, max_relative = 0.01);
    assert!(last.heating_rate_per_day().iter().all(|r| r.abs() < 0.05));
}

#[test]
fn test_split_step_differs_from_single_long_step() {
    let base = ModelConfig::equilibrium_run().with_num_layers(10);
    let two = RadiativeColumnModel::new(
        base.clone()
            .with_time_step(Seconds::from_hours(6.0))
            .with_num_steps(2),
    )
    .unwrap()
    .run()
    .unwrap();
    let one = RadiativeColumnModel::new(
        base.with_time_step(Seconds::from_hours(12.0))
            .with_num_steps(1),
    )
    .unwrap()
    .run()
    .unwrap();

    assert_ne!(
        two.final_state.layer_temperatures,
        one.final_state.layer_temperatures
    );
    for (a, b) in two
        .final_state
        .layer_temperatures
        .iter()
        .zip(one.final_state.layer_temperatures.iter())
    {
        assert!((a - b).abs() < 5.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_configuration_errors_prevent_stepping() {
    let base = ModelConfig::equilibrium_run();
    let bad = [
        base.clone().with_num_layers(0),
        base.clone()
            .with_pressure_bounds(Pascals::new(50_000.0), Pascals::new(60_000.0)),
        base.clone().with_time_step(Seconds::new(0.0)),
        // Unit constructors reject negatives, but JSON input is only checked by validation
        ModelConfig::from_json_str(r#"{"incoming_shortwave": -5.0}"#).unwrap(),
        ModelConfig::from_json_str(r#"{"time_step": -3600.0}"#).unwrap(),
    ];
    for cfg in bad {
        let err = RadiativeColumnModel::new(cfg).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)), "{err}");
    }
}

#[test]
fn test_domain_errors_at_startup_carry_no_step() {
    let err = RadiativeColumnModel::new(
        ModelConfig::equilibrium_run().with_total_transmission(-0.1),
    )
    .unwrap_err();
    assert!(err.is_domain());
    assert_eq!(err.step(), None);
}

#[test]
fn test_failed_step_reports_index_and_leaves_state() {
    let cfg = ModelConfig::equilibrium_run()
        .with_num_layers(10)
        .with_total_transmission(1.0e-6)
        .with_pressure_bounds(Pascals::new(100_000.0), Pascals::new(1000.0))
        .with_incoming_shortwave(WattsPerSquareMeter::new(0.0))
        .with_time_step(Seconds::from_days(365.0));
    let mut model = RadiativeColumnModel::new(cfg).unwrap();

    // The overshooting step itself completes; the next one cannot build heights
    model.step().unwrap();
    let before = model.state().clone();
    assert!(before.layer_temperatures.iter().any(|t| *t < 0.0));

    let err = model.step().unwrap_err();
    assert_eq!(err.step(), Some(1));
    assert!(err.is_domain());
    assert!(matches!(err, ModelError::StepFailed { .. }));
    assert!(err.to_string().starts_with("step 1 failed"));
    assert!(err.to_string().contains("layer_densities"));

    assert_eq!(model.state(), &before);
    assert_eq!(model.phase(), RunPhase::Stepping { completed: 1 });
    assert_eq!(model.step().unwrap_err(), err);
}

#[test]
fn test_overshooting_final_step_returns_full_history() {
    let cfg = ModelConfig::equilibrium_run()
        .with_num_layers(10)
        .with_total_transmission(1.0e-6)
        .with_pressure_bounds(Pascals::new(100_000.0), Pascals::new(1000.0))
        .with_incoming_shortwave(WattsPerSquareMeter::new(0.0))
        .with_time_step(Seconds::from_days(365.0))
        .with_num_steps(1);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.snapshots[0].step, 0);
    assert!(history.final_state.layer_temperatures.iter().any(|t| *t < 0.0));
}

#[test]
fn test_stepping_past_the_end_is_an_error() {
    let mut model =
        RadiativeColumnModel::new(ModelConfig::equilibrium_run().with_num_steps(1)).unwrap();
    model.step().unwrap();
    assert_eq!(model.phase(), RunPhase::Finished);
    assert!(matches!(model.step(), Err(ModelError::Finished(1))));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Diagnostics
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_history_exposes_pressure_level_heights() {
    let cfg = ModelConfig::equilibrium_run().with_num_steps(40);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();

    let (lev80, z80) = history.heights_at_pressure(Pascals::from_kilopascals(80.0)).unwrap();
    let (lev50, z50) = history.heights_at_pressure(Pascals::from_kilopascals(50.0)).unwrap();
    // Levels are 900 Pa apart; the nearest is at most half a spacing away
    assert!((history.pressure_levels[lev80] - 80_000.0).abs() <= 450.0);
    assert!((history.pressure_levels[lev50] - 50_000.0).abs() <= 450.0);
    assert_eq!(z80.len(), 40);
    assert!(z80.iter().zip(z50.iter()).all(|(a, b)| b > a));

    // A 300 K column puts 50 kPa near 6 km
    assert!(z50[0] > Meters::new(5500.0) && z50[0] < Meters::new(6500.0));
}

#[test]
fn test_snapshots_are_indexed_by_step_and_time() {
    let cfg = ModelConfig::equilibrium_run().with_num_steps(25);
    let dt = *cfg.time_step;
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();

    for (i, snap) in history.snapshots.iter().enumerate() {
        assert_eq!(snap.step, i);
        assert_relative_eq!(*snap.elapsed, dt * i as f64);
        assert_eq!(snap.heights.len(), 101);
        assert_eq!(snap.up_flux.len(), 101);
        assert_eq!(snap.heating_rate.len(), 100);
    }

    let day_10 = history.snapshot_at_day(10.0).unwrap();
    assert!((day_10.elapsed.to_days() - 10.0).abs() <= dt / SECONDS_PER_DAY / 2.0);
    assert_eq!(history.air_surface_differences().len(), 25);
}

#[test]
fn test_initial_state_is_isothermal() {
    let model = RadiativeColumnModel::new(ModelConfig::equilibrium_run()).unwrap();
    assert_eq!(
        model.state(),
        &AtmosphericState::isothermal(100, Kelvin::new(300.0))
    );
    assert_eq!(model.optical_depth().len(), 101);
    assert_eq!(model.pressure_levels().top(), Some(10_000.0));
    assert_eq!(model.steps_completed(), 0);
}

#[test]
fn test_run_history_exports_as_json() {
    let cfg = ModelConfig::equilibrium_run().with_num_layers(3).with_num_steps(2);
    let history = RadiativeColumnModel::new(cfg).unwrap().run().unwrap();
    let json = serde_json::to_string(&history).unwrap();
    let back: grey_column_core::RunHistory = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back.config, history.config);
}
