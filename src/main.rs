//! Lift-truck fleet simulator entry point: CLI wiring and config-driven fleet construction.

use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lift_truck_sim::bootstrap::BootstrapState;
use lift_truck_sim::config::ScenarioConfig;
use lift_truck_sim::io::export::export_csv;
use lift_truck_sim::sim::clock::Clock;
use lift_truck_sim::sim::kpi::KpiReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    days_override: Option<usize>,
    telemetry_out: Option<String>,
    bootstrap_in: Option<String>,
    bootstrap_out: Option<String>,
}

fn print_help() {
    eprintln!("lift-truck-sim: battery and charging simulator for electric lift-truck fleets");
    eprintln!();
    eprintln!("Usage: lift-truck-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --days <n>               Override number of simulated days");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    eprintln!("  --bootstrap-in <path>    Resume from a saved fleet state (JSON)");
    eprintln!("  --bootstrap-out <path>   Save the final fleet state (JSON)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: lift_truck_sim=info).");
}

/// Returns the value following a flag, exiting with an error if it is missing.
fn flag_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        days_override: None,
        telemetry_out: None,
        bootstrap_in: None,
        bootstrap_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(flag_value(&args, i, "--scenario", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "name"));
            }
            "--seed" => {
                i += 1;
                let v = flag_value(&args, i, "--seed", "u64");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--days" => {
                i += 1;
                let v = flag_value(&args, i, "--days", "count");
                match v.parse::<usize>() {
                    Ok(d) if d > 0 => cli.days_override = Some(d),
                    _ => {
                        eprintln!("error: --days value \"{v}\" is not a positive integer");
                        process::exit(1);
                    }
                }
            }
            "--telemetry-out" => {
                i += 1;
                cli.telemetry_out = Some(flag_value(&args, i, "--telemetry-out", "path"));
            }
            "--bootstrap-in" => {
                i += 1;
                cli.bootstrap_in = Some(flag_value(&args, i, "--bootstrap-in", "path"));
            }
            "--bootstrap-out" => {
                i += 1;
                cli.bootstrap_out = Some(flag_value(&args, i, "--bootstrap-out", "path"));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lift_truck_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(days) = cli.days_override {
        scenario.simulation.days = days;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let sim_config = scenario.sim_config();
    let (mut fleet, start) = match cli.bootstrap_in {
        Some(ref path) => match BootstrapState::load(Path::new(path)) {
            Ok(saved) => {
                info!(path = %path, "resuming from bootstrap state");
                let fleet = saved.restore(
                    scenario.simulation.name.clone(),
                    scenario.fleet_params(),
                    sim_config.seed,
                );
                (fleet, saved.resume_at.unwrap_or(sim_config.start))
            }
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        },
        None => (scenario.build_fleet(sim_config.seed), sim_config.start),
    };

    let mut clock = Clock::new(start, sim_config.total_steps());
    let results = fleet.run(&mut clock, &scenario.tariff);
    let kpi = KpiReport::from_results(&results);

    for r in &results {
        println!("{r}");
    }
    println!("\n{kpi}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    if let Some(ref path) = cli.bootstrap_out {
        if let Err(e) = fleet.bootstrap_state().save(Path::new(path)) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        eprintln!("Bootstrap state written to {path}");
    }
}
