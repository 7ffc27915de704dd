//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::fleet::{FleetParams, FleetState, ScheduleGrid};
use crate::sim::LiftTruckFleet;
use crate::sim::clock::SlotTime;
use crate::sim::types::SimConfig;
use crate::tariff::{RateStructure, StaticTariff, Tariff};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Trucks, batteries and chargers.
    #[serde(default)]
    pub fleet: FleetConfig,
    /// Weekly shift declarations.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Tariff the fleet is billed under.
    #[serde(default)]
    pub tariff: StaticTariff,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fleet name used in logs.
    pub name: String,
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
    /// Day of week the run starts on (1 = Sunday .. 7 = Saturday).
    pub start_day: u8,
    /// Hour of day the run starts at (0-23).
    pub start_hour: u8,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: "fleet".to_string(),
            days: 7,
            seed: 42,
            start_day: 1,
            start_hour: 0,
        }
    }
}

/// Fleet parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    /// Mean hourly energy per working truck (kWh).
    pub truck_kw: f32,
    /// Standard deviation of hourly fleet usage (kWh).
    pub truck_std: f32,
    /// Capacity of one battery (kWh).
    pub battery_capacity: f32,
    pub n_batteries: u32,
    pub n_chargers: u32,
    /// Maximum charge rate per charger (kW).
    pub max_charge_kw: f32,
    /// Charge efficiency (0.0–1.0].
    pub charge_efficiency: f32,
    /// Hours projected past the current shift.
    pub planning_horizon: u32,
    /// State of charge of every battery at the start (0.0–1.0).
    pub initial_soc: f32,
}

impl Default for FleetConfig {
    fn default() -> Self {
        let p = FleetParams::default();
        Self {
            truck_kw: p.truck_kw,
            truck_std: p.truck_std,
            battery_capacity: p.battery_capacity,
            n_batteries: p.n_batteries,
            n_chargers: p.n_chargers,
            max_charge_kw: p.max_charge_kw,
            charge_efficiency: p.charge_efficiency,
            planning_horizon: p.planning_horizon,
            initial_soc: 0.7,
        }
    }
}

/// Weekly shift declarations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Whitespace-separated declaration tokens, e.g.
    /// `"block 1 2 3 4 5 shift 8 8 8 shift 16 8 6"`. Empty means the built-in
    /// default schedule.
    pub shifts: String,
}

impl ScheduleConfig {
    pub fn tokens(&self) -> Vec<&str> {
        self.shifts.split_whitespace().collect()
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"fleet.battery_capacity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: default schedule and fleet, flat tariff.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the time-of-use preset: cheap nights, expensive afternoons.
    pub fn time_of_use() -> Self {
        Self {
            tariff: StaticTariff::time_of_use(StaticTariff::day_night_profile()),
            ..Self::default()
        }
    }

    /// Returns the regulation preset: batteries offered as regulation capacity.
    pub fn regulation() -> Self {
        Self {
            tariff: StaticTariff::regulation(0.12, 0.04),
            ..Self::default()
        }
    }

    /// Returns the weekend-crew preset: the default week plus a Saturday day
    /// shift, starting the run on Friday afternoon.
    pub fn weekend_crew() -> Self {
        Self {
            simulation: SimulationConfig {
                name: "weekend".to_string(),
                days: 4,
                start_day: 6,
                start_hour: 12,
                ..SimulationConfig::default()
            },
            schedule: ScheduleConfig {
                shifts: "block 1 2 3 4 5 shift 8 8 8 shift 16 8 6 shift 0 8 3 \
                         block 7 shift 8 10 2"
                    .to_string(),
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "time_of_use", "regulation", "weekend_crew"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "time_of_use" => Ok(Self::time_of_use()),
            "regulation" => Ok(Self::regulation()),
            "weekend_crew" => Ok(Self::weekend_crew()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Shift declarations
    /// are not checked here: bad ones are logged and skipped when the
    /// schedule is built.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if !(1..=7).contains(&s.start_day) {
            errors.push(ConfigError::new("simulation.start_day", "must be in [1, 7]"));
        }
        if s.start_hour > 23 {
            errors.push(ConfigError::new("simulation.start_hour", "must be in [0, 23]"));
        }

        let f = &self.fleet;
        if f.truck_kw <= 0.0 {
            errors.push(ConfigError::new("fleet.truck_kw", "must be > 0"));
        }
        if f.truck_std < 0.0 {
            errors.push(ConfigError::new("fleet.truck_std", "must be >= 0"));
        }
        if f.battery_capacity <= 0.0 {
            errors.push(ConfigError::new("fleet.battery_capacity", "must be > 0"));
        }
        if f.max_charge_kw <= 0.0 {
            errors.push(ConfigError::new("fleet.max_charge_kw", "must be > 0"));
        }
        if !(f.charge_efficiency > 0.0 && f.charge_efficiency <= 1.0) {
            errors.push(ConfigError::new("fleet.charge_efficiency", "must be in (0.0, 1.0]"));
        }
        if f.planning_horizon == 0 {
            errors.push(ConfigError::new("fleet.planning_horizon", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&f.initial_soc) {
            errors.push(ConfigError::new("fleet.initial_soc", "must be in [0.0, 1.0]"));
        }

        let t = &self.tariff;
        if t.price < 0.0 {
            errors.push(ConfigError::new("tariff.price", "must be >= 0"));
        }
        if t.kind == RateStructure::TimeOfUse && t.hourly_prices.len() != 24 {
            errors.push(ConfigError::new(
                "tariff.hourly_prices",
                format!("must have 24 entries, got {}", t.hourly_prices.len()),
            ));
        }
        if t.hourly_prices.iter().any(|p| *p < 0.0) {
            errors.push(ConfigError::new("tariff.hourly_prices", "must all be >= 0"));
        }
        if t.regulation_rate() < 0.0 {
            errors.push(ConfigError::new("tariff.regulation_rate", "must be >= 0"));
        }

        errors
    }

    /// Fleet parameters before any sizing adjustment.
    pub fn fleet_params(&self) -> FleetParams {
        let f = &self.fleet;
        FleetParams {
            truck_kw: f.truck_kw,
            truck_std: f.truck_std,
            battery_capacity: f.battery_capacity,
            n_batteries: f.n_batteries,
            n_chargers: f.n_chargers,
            max_charge_kw: f.max_charge_kw,
            charge_efficiency: f.charge_efficiency,
            planning_horizon: f.planning_horizon,
        }
    }

    /// All configured batteries off the trucks at `initial_soc`.
    pub fn initial_state(&self) -> FleetState {
        FleetState::charged(self.fleet_params().total_capacity(), self.fleet.initial_soc)
    }

    /// Builds the schedule, logging and skipping bad declarations.
    pub fn grid(&self) -> ScheduleGrid {
        ScheduleGrid::configure(&self.schedule.tokens())
    }

    pub fn sim_config(&self) -> SimConfig {
        let s = &self.simulation;
        SimConfig::new(s.days, s.seed, SlotTime::new(s.start_day, s.start_hour))
    }

    /// Builds the fleet described by this scenario, seeded with `seed`.
    pub fn build_fleet(&self, seed: u64) -> LiftTruckFleet {
        LiftTruckFleet::new(
            self.simulation.name.clone(),
            self.fleet_params(),
            self.grid(),
            self.initial_state(),
            seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::grid::slot_index;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.err().map(|e| e.message).unwrap_or_default();
        assert!(e.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
name = "dock"
days = 2
seed = 99
start_day = 2
start_hour = 6

[fleet]
truck_kw = 5.0
truck_std = 1.0
battery_capacity = 40.0
n_batteries = 20
n_chargers = 10
max_charge_kw = 7.5
charge_efficiency = 0.85
planning_horizon = 48
initial_soc = 0.5

[schedule]
shifts = "block 2 3 4 shift 6 10 5"

[tariff]
kind = "regulation"
price = 0.1
regulation_rate = 0.03
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.fleet.n_batteries), Some(20));
        assert_eq!(cfg.as_ref().map(|c| c.tariff.kind), Some(RateStructure::Regulation));
        assert_eq!(cfg.as_ref().map(|c| c.schedule.tokens().len()), Some(8));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[fleet]
n_batteries = 10
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\nseed = 99\n").ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.fleet.n_chargers), Some(8));
        assert_eq!(cfg.as_ref().map(|c| c.tariff.kind), Some(RateStructure::Flat));
    }

    #[test]
    fn validation_catches_bad_fields() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        cfg.simulation.start_day = 0;
        cfg.fleet.charge_efficiency = 0.0;
        cfg.fleet.initial_soc = 1.5;
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        for f in [
            "simulation.days",
            "simulation.start_day",
            "fleet.charge_efficiency",
            "fleet.initial_soc",
        ] {
            assert!(fields.iter().any(|x| x == f), "missing {f} in {fields:?}");
        }
    }

    #[test]
    fn negative_regulation_rate_is_rejected() {
        let mut cfg = ScenarioConfig::regulation();
        cfg.tariff.regulation_rate = -0.01;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.regulation_rate"));
        assert!(ScenarioConfig::regulation().validate().is_empty());
    }

    #[test]
    fn time_of_use_needs_full_price_table() {
        let mut cfg = ScenarioConfig::time_of_use();
        cfg.tariff.hourly_prices.truncate(12);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.hourly_prices"));
    }

    #[test]
    fn empty_schedule_falls_back_to_default() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.grid().trucks_at(slot_index(2, 8)), 8);
    }

    #[test]
    fn weekend_crew_works_saturday() {
        let cfg = ScenarioConfig::weekend_crew();
        let grid = cfg.grid();
        assert_eq!(grid.trucks_at(slot_index(7, 9)), 2);
        assert_eq!(grid.trucks_at(slot_index(7, 18)), 0);
        assert_eq!(cfg.sim_config().start, SlotTime::new(6, 12));
    }

    #[test]
    fn initial_state_from_soc() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.initial_state().energy_charging, 750.0 * 0.7);
    }

    #[test]
    fn build_fleet_uses_scenario_name() {
        let fleet = ScenarioConfig::weekend_crew().build_fleet(1);
        assert_eq!(fleet.name(), "weekend");
        assert_eq!(fleet.params().n_batteries, 15);
    }
}
