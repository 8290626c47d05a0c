use clap::Parser;
use grey_column_core::core_types::Meters;
use grey_column_core::{
    static_heating_profile, AbsorberColumnSetup, Kelvin, ModelConfig, ModelError, Pascals,
    RadiativeColumnModel, RunHistory, Seconds, WattsPerSquareMeter,
};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Grey radiative column demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "grey-column-demo")]
#[command(about = "Grey-atmosphere radiative equilibrium demo", long_about = None)]
struct Args {
    /// Named preset (equilibrium, transparent)
    #[arg(short = 'p', long, default_value = "equilibrium")]
    preset: String,

    /// JSON configuration file; replaces the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total longwave transmission of the column
    #[arg(short, long)]
    transmission: Option<f64>,

    /// Number of layers
    #[arg(short, long)]
    layers: Option<usize>,

    /// Initial surface and air temperature in K (surface air temperature for the
    /// absorber profile)
    #[arg(long)]
    initial_temperature: Option<f64>,

    /// Surface pressure in kPa (both modes)
    #[arg(long)]
    surface_pressure: Option<f64>,

    /// Top pressure in kPa
    #[arg(long)]
    top_pressure: Option<f64>,

    /// Time step in hours
    #[arg(long)]
    time_step: Option<f64>,

    /// Run length in days (rounded down to whole steps)
    #[arg(short, long)]
    days: Option<f64>,

    /// Absorbed shortwave at the surface in W/m²
    #[arg(short, long)]
    shortwave: Option<f64>,

    /// Print a time-series row every N steps
    #[arg(short, long, default_value_t = 4)]
    report_interval: usize,

    /// Only report the first N days of the time series
    #[arg(long, default_value_t = 100.0)]
    report_days: f64,

    /// Steps whose temperature profiles are printed
    #[arg(long, value_delimiter = ',', default_value = "0,2,8,30,40,50,60,70")]
    profile_steps: Vec<usize>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Heating-rate profile of a fixed lapse-rate column with an absorbing gas
    /// instead of a time-stepped run
    #[arg(long)]
    absorber_profile: bool,

    /// Absorber mass mixing ratio (kg/kg), absorber profile only
    #[arg(long)]
    mixing_ratio: Option<f64>,

    /// Mass absorption coefficient (m²/kg), absorber profile only
    #[arg(long)]
    absorption_coeff: Option<f64>,

    /// Lapse rate in K/km (negative cools with height), absorber profile only
    #[arg(long)]
    lapse_rate: Option<f64>,

    /// Level spacing in m, absorber profile only
    #[arg(long)]
    level_spacing: Option<f64>,

    /// Number of levels, absorber profile only
    #[arg(long)]
    levels: Option<usize>,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if args.absorber_profile {
        run_absorber_profile(&args);
        return;
    }

    let config = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    if args.dump_config {
        match config.to_json_string() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
        }
        return;
    }

    println!("=== Grey Radiative Column Demo ===\n");
    println!(
        "Column: {} layers, {:.1} → {:.1} kPa, total transmission {:.3}",
        config.num_layers,
        config.surface_pressure.to_kilopascals(),
        config.top_pressure.to_kilopascals(),
        config.total_transmission
    );
    println!(
        "Start: {} isothermal, shortwave {}, {} steps of {:.1} h ({:.1} days)\n",
        config.surface_temperature_init,
        config.incoming_shortwave,
        config.num_steps,
        config.time_step.to_hours(),
        config.total_duration().to_days()
    );

    let history = match RadiativeColumnModel::new(config).and_then(RadiativeColumnModel::run) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("Run failed: {e}");
            process::exit(1);
        }
    };

    print_time_series(&history, args.report_interval.max(1), args.report_days);
    print_profiles(&history, &args.profile_steps);
    print_summary(&history);
}

/// Start from a preset or JSON file and apply command-line overrides.
fn build_config(args: &Args) -> Result<ModelConfig, ModelError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ModelConfig::from_json_file(path)?
        }
        None => ModelConfig::preset(&args.preset).ok_or_else(|| {
            ModelError::configuration(format!(
                "unknown preset '{}' (expected equilibrium or transparent)",
                args.preset
            ))
        })?,
    };

    if let Some(tr) = args.transmission {
        config = config.with_total_transmission(tr);
    }
    if let Some(n) = args.layers {
        config = config.with_num_layers(n);
    }
    if let Some(t) = args.initial_temperature {
        let t = non_negative("initial temperature", t)?;
        config = config.with_surface_temperature_init(Kelvin::new(t));
    }
    if args.surface_pressure.is_some() || args.top_pressure.is_some() {
        let surface = match args.surface_pressure {
            Some(kpa) => Pascals::from_kilopascals(non_negative("surface pressure", kpa)?),
            None => config.surface_pressure,
        };
        let top = match args.top_pressure {
            Some(kpa) => Pascals::from_kilopascals(non_negative("top pressure", kpa)?),
            None => config.top_pressure,
        };
        config = config.with_pressure_bounds(surface, top);
    }
    if let Some(hours) = args.time_step {
        config = config.with_time_step(Seconds::from_hours(non_negative("time step", hours)?));
    }
    if let Some(days) = args.days {
        let run_length = Seconds::from_days(non_negative("run length", days)?);
        let steps = (run_length.value() / config.time_step.value()).floor();
        if !steps.is_finite() {
            return Err(ModelError::configuration(format!(
                "cannot run for {days} days with a {} step",
                config.time_step
            )));
        }
        config = config.with_num_steps(steps as usize);
    }
    if let Some(sw) = args.shortwave {
        config = config.with_incoming_shortwave(WattsPerSquareMeter::new(non_negative("shortwave", sw)?));
    }

    config.validate()?;
    Ok(config)
}

/// Default absorber column with command-line overrides.
fn build_absorber_setup(args: &Args) -> Result<AbsorberColumnSetup, ModelError> {
    let mut setup = AbsorberColumnSetup::default();
    if let Some(t) = args.initial_temperature {
        setup.surface_temperature = Kelvin::new(non_negative("surface temperature", t)?);
    }
    if let Some(kpa) = args.surface_pressure {
        setup.surface_pressure = Pascals::from_kilopascals(non_negative("surface pressure", kpa)?);
    }
    if let Some(r) = args.mixing_ratio {
        setup.mixing_ratio = r;
    }
    if let Some(k) = args.absorption_coeff {
        setup.mass_absorption_coeff = k;
    }
    if let Some(per_km) = args.lapse_rate {
        setup.lapse_rate = per_km / 1000.0;
    }
    if let Some(dz) = args.level_spacing {
        setup.layer_thickness = Meters::new(non_negative("level spacing", dz)?);
    }
    if let Some(n) = args.levels {
        setup.num_levels = n;
    }
    Ok(setup)
}

fn run_absorber_profile(args: &Args) {
    let setup = match build_absorber_setup(args) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    if args.dump_config {
        match serde_json::to_string_pretty(&setup) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
        }
        return;
    }

    println!("=== Absorbing-Gas Column Heating Profile ===\n");
    println!(
        "Column: {} levels every {}, surface {} at {:.1} kPa, lapse rate {:.2} K/km",
        setup.num_levels,
        setup.layer_thickness,
        setup.surface_temperature,
        setup.surface_pressure.to_kilopascals(),
        setup.lapse_rate * 1000.0
    );
    println!(
        "Absorber: mixing ratio {} kg/kg, k = {} m²/kg\n",
        setup.mixing_ratio, setup.mass_absorption_coeff
    );

    let profile = match static_heating_profile(&setup) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Profile failed: {e}");
            process::exit(1);
        }
    };
    info!(
        "Absorber column built: τ* = {:.3}, OLR = {:.1} W/m²",
        profile.optical_depth.top().unwrap_or(0.0),
        profile.fluxes.outgoing_longwave()
    );

    let heights = profile.layer_heights();
    let rate = &profile.heating_rate_per_day;
    let stride = (rate.len() / 15).max(1);
    println!("Height(km) | Heating(K/day)");
    println!("-----------|---------------");
    for (z, r) in heights.iter().zip(rate.iter()).step_by(stride) {
        println!("{:10.2} | {:14.3}", z / 1000.0, r);
    }
    if let (Some(z), Some(r)) = (heights.last(), rate.last()) {
        println!("{:10.2} | {:14.3}", z / 1000.0, r);
    }

    println!("\n=== Profile Summary ===");
    println!(
        "Total optical depth: {:.3}",
        profile.optical_depth.top().unwrap_or(0.0)
    );
    println!(
        "Outgoing longwave: {:.1} W/m²",
        profile.fluxes.outgoing_longwave()
    );
    println!(
        "Surface downwelling: {:.1} W/m²",
        profile.fluxes.surface_downwelling()
    );
    match profile.cooling_to_warming_height() {
        Some(z) => println!("Cooling turns to warming at {:.2} km", z / 1000.0),
        None => println!("No cooling-to-warming transition"),
    }
}

fn non_negative(name: &str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ModelError::configuration(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

fn print_time_series(history: &RunHistory, interval: usize, max_days: f64) {
    let z80 = history.heights_at_pressure(Pascals::from_kilopascals(80.0));
    let z50 = history.heights_at_pressure(Pascals::from_kilopascals(50.0));
    let height_km = |series: Option<&(usize, Vec<Meters>)>, i: usize| {
        series
            .and_then(|(_, z)| z.get(i))
            .map_or(f64::NAN, |z| z.to_kilometers())
    };

    println!("Day    | T_sfc(°C) | Air-Sfc(K) | z80(km) | z50(km) | OLR(W/m²)");
    println!("-------|-----------|------------|---------|---------|----------");
    for (i, snap) in history.snapshots.iter().enumerate().step_by(interval) {
        let day = snap.elapsed.to_days();
        if day > max_days {
            break;
        }
        println!(
            "{:6.1} | {:9.2} | {:10.2} | {:7.3} | {:7.3} | {:9.1}",
            day,
            snap.surface_temperature.to_celsius().value(),
            snap.air_surface_difference().value(),
            height_km(z80.as_ref(), i),
            height_km(z50.as_ref(), i),
            snap.outgoing_longwave()
        );
    }
}

fn print_profiles(history: &RunHistory, steps: &[usize]) {
    let snaps: Vec<_> = steps
        .iter()
        .filter_map(|&s| history.snapshots.get(s))
        .collect();
    if snaps.is_empty() {
        return;
    }

    println!("\n=== Temperature Profiles (°C at layer midpoint height) ===\n");
    for snap in snaps {
        println!("Day {:.1} (step {}):", snap.elapsed.to_days(), snap.step);
        let mid = snap.layer_heights();
        let stride = (snap.layer_temperatures.len() / 10).max(1);
        for (z, t) in mid
            .iter()
            .zip(snap.layer_temperatures.iter())
            .step_by(stride)
        {
            println!(
                "  {:6.2} km  {:7.2}",
                z / 1000.0,
                Kelvin::new(t.max(0.0)).to_celsius().value()
            );
        }
    }
}

fn print_summary(history: &RunHistory) {
    let last = history.final_state();
    println!("\n=== Run Complete ===");
    println!("Steps: {}", history.len());
    println!(
        "Final surface temperature: {} ({:.2}°C)",
        last.surface_temperature,
        last.surface_temperature.to_celsius().value()
    );
    println!("Air-surface difference: {}", last.air_surface_difference());
    if let Some(change) = history.final_surface_change() {
        println!("Surface change over last step: {change}");
    }
    if let Some(snap) = history.snapshots.last() {
        println!("Outgoing longwave: {:.1} W/m²", snap.outgoing_longwave());
    }
}
