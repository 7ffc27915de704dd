//! The lift-truck fleet model stepped once per simulated hour.

use tracing::{debug, info, warn};

use crate::bootstrap::BootstrapState;
use crate::fleet::{
    CapacityValidator, EnergyNeedsProjector, FleetParams, FleetState, PlanCache, ScheduleGrid,
    ShiftEnergy, ShiftId, TruckUsage,
};
use crate::fleet::grid::previous_index;
use crate::tariff::{RateStructure, Tariff};

use super::clock::{Clock, SlotTime};
use super::policy::{ChargeContext, ChargingPolicy, DeadlineCharging, EarlyCharging};
use super::types::StepResult;

/// Per-step inputs from the driver.
pub struct StepContext<'a> {
    /// Hour of the week being simulated.
    pub slot: SlotTime,
    /// The tariff the fleet is currently subscribed to.
    pub tariff: &'a dyn Tariff,
}

/// A fleet of battery-powered lift trucks working a weekly shift schedule.
///
/// Owns the pooled battery state and the cached energy plan. Flat tariffs
/// charge with [`EarlyCharging`]; time-of-use and regulation tariffs use the
/// plan-aware policy `P`.
pub struct LiftTruckFleet<P: ChargingPolicy = DeadlineCharging> {
    name: String,
    params: FleetParams,
    grid: ScheduleGrid,
    state: FleetState,
    usage: TruckUsage,
    current_shift: Option<ShiftId>,
    plan: PlanCache,
    early: EarlyCharging,
    shaped: P,
    steps: usize,
    last_slot: Option<SlotTime>,
    regulation_kwh: f32,
}

impl LiftTruckFleet {
    /// Creates a fleet, sizing batteries and chargers to the schedule.
    ///
    /// Battery and charger counts that cannot carry `grid` are raised (and
    /// logged). Any energy in `initial_state` marked as in trucks goes back to
    /// the charging pool; the first step deploys batteries for whatever shift
    /// is on.
    pub fn new(
        name: impl Into<String>,
        params: FleetParams,
        grid: ScheduleGrid,
        initial_state: FleetState,
        seed: u64,
    ) -> Self {
        let name = name.into();
        let mut params = params;
        let validator = CapacityValidator::new(&grid, params.truck_kw);
        params.n_batteries = validator.validate_batteries(params.battery_capacity, params.n_batteries);
        params.n_chargers = validator.validate_chargers(params.n_chargers, params.max_charge_kw);

        let mut state = initial_state;
        state.normalize();

        info!(
            fleet = %name,
            batteries = params.n_batteries,
            chargers = params.n_chargers,
            stored_kwh = state.energy_charging,
            "fleet initialized"
        );

        Self {
            name,
            usage: TruckUsage::new(params.truck_kw, params.truck_std, seed),
            params,
            grid,
            state,
            current_shift: None,
            plan: PlanCache::new(),
            early: EarlyCharging,
            shaped: DeadlineCharging,
            steps: 0,
            last_slot: None,
            regulation_kwh: 0.0,
        }
    }

    /// Puts back a saved battery state as-is, with the batteries deployed
    /// for the shift that was running just before `resume_at`.
    pub(crate) fn resume(mut self, state: FleetState, resume_at: SlotTime) -> Self {
        let last = SlotTime::from_index(previous_index(resume_at.index()));
        self.state = state;
        self.current_shift = self.grid.shift_id_at(last.index());
        self.last_slot = Some(last);
        self.plan.invalidate();
        info!(fleet = %self.name, resume_at = %resume_at, "fleet state restored");
        self
    }
}

impl<P: ChargingPolicy> LiftTruckFleet<P> {
    /// Replaces the policy used under time-of-use and regulation tariffs.
    pub fn with_policy<Q: ChargingPolicy>(self, policy: Q) -> LiftTruckFleet<Q> {
        LiftTruckFleet {
            name: self.name,
            params: self.params,
            grid: self.grid,
            state: self.state,
            usage: self.usage,
            current_shift: self.current_shift,
            plan: self.plan,
            early: self.early,
            shaped: policy,
            steps: self.steps,
            last_slot: self.last_slot,
            regulation_kwh: self.regulation_kwh,
        }
    }

    /// Records a curtailment or regulation request for the coming step.
    ///
    /// The request is kept for inspection only; it does not change how the
    /// fleet charges.
    pub fn regulate(&mut self, kwh: f32) {
        debug!(fleet = %self.name, kwh, "regulation request");
        self.regulation_kwh = kwh;
    }

    /// Simulates one hour and returns what happened.
    ///
    /// 1. Swaps batteries if the shift changed.
    /// 2. Lets the working trucks use energy, borrowing from the charging
    ///    pool if theirs runs out.
    /// 3. Charges according to the tariff's rate structure.
    pub fn step(&mut self, ctx: &StepContext<'_>) -> StepResult {
        let index = ctx.slot.index();
        let shift = self.grid.shift_id_at(index);

        // 1. Shift transition
        let shift_changed = shift != self.current_shift;
        if shift_changed {
            let trucks = shift.map(|id| self.grid.shift(id).trucks());
            self.state.change_shift(trucks, self.params.battery_capacity);
            self.current_shift = shift;
            debug!(
                fleet = %self.name,
                slot = %ctx.slot,
                shift = ?shift.map(|id| self.grid.shift(id).to_string()),
                in_use_kwh = self.state.energy_in_use,
                "shift change"
            );
        }

        // 2. Discharge
        let trucks = self.grid.trucks_of(shift);
        let usage_kwh = self.usage.sample(trucks);
        let borrowed_kwh = self.state.discharge(usage_kwh);
        if borrowed_kwh > 0.0 {
            warn!(
                fleet = %self.name,
                slot = %ctx.slot,
                borrowed_kwh,
                energy_charging = self.state.energy_charging,
                "trucks ran short of energy"
            );
        }

        // 3. Charge
        let rate_structure = ctx.tariff.rate_structure();
        if rate_structure == RateStructure::Regulation && self.regulation_kwh != 0.0 {
            debug!(
                fleet = %self.name,
                kwh = self.regulation_kwh,
                credit = self.regulation_kwh * ctx.tariff.regulation_rate(),
                "regulation request not acted on"
            );
        }
        let stored_kwh = match rate_structure {
            RateStructure::Flat => self.early.energy_to_store(&ChargeContext {
                slot: ctx.slot,
                params: &self.params,
                state: &self.state,
                plan: &[],
                tariff: ctx.tariff,
            }),
            RateStructure::TimeOfUse | RateStructure::Regulation => {
                let projector = EnergyNeedsProjector::new(&self.grid, &self.params);
                let plan = self.plan.ensure(
                    &projector,
                    index,
                    self.current_shift,
                    self.state.energy_charging,
                );
                self.shaped.energy_to_store(&ChargeContext {
                    slot: ctx.slot,
                    params: &self.params,
                    state: &self.state,
                    plan,
                    tariff: ctx.tariff,
                })
            }
        }
        .max(0.0);
        self.state.store(stored_kwh);

        let drawn_kwh = stored_kwh / self.params.charge_efficiency;
        let price = ctx.tariff.usage_price(ctx.slot);

        let result = StepResult {
            step: self.steps,
            slot: ctx.slot,
            trucks,
            shift_changed,
            usage_kwh,
            borrowed_kwh,
            capacity_in_use: self.state.capacity_in_use,
            energy_in_use: self.state.energy_in_use,
            energy_charging: self.state.energy_charging,
            stored_kwh,
            drawn_kwh,
            price,
            cost: drawn_kwh * price,
            rate_structure,
        };
        self.steps += 1;
        self.last_slot = Some(ctx.slot);
        result
    }

    /// Steps through every hour left on `clock`.
    pub fn run(&mut self, clock: &mut Clock, tariff: &dyn Tariff) -> Vec<StepResult> {
        let mut results = Vec::new();
        clock.run(|_, slot| results.push(self.step(&StepContext { slot, tariff })));
        results
    }

    /// State needed to resume this fleet later.
    pub fn bootstrap_state(&self) -> BootstrapState {
        BootstrapState {
            state: self.state,
            shift_data: self.grid.tokens().to_vec(),
            resume_at: self.last_slot.map(|slot| slot.next()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }

    /// Parameters in effect, including any sizing adjustments.
    pub fn params(&self) -> &FleetParams {
        &self.params
    }

    pub fn grid(&self) -> &ScheduleGrid {
        &self.grid
    }

    /// The shift the batteries are currently deployed for.
    pub fn current_shift(&self) -> Option<ShiftId> {
        self.current_shift
    }

    /// Last regulation request passed to [`regulate`](Self::regulate).
    pub fn regulation_kwh(&self) -> f32 {
        self.regulation_kwh
    }

    /// The policy used under time-of-use and regulation tariffs.
    pub fn policy(&self) -> &P {
        &self.shaped
    }

    /// The most recent energy plan (empty until a shaped policy has run).
    pub fn plan(&self) -> &[ShiftEnergy] {
        self.plan.plan()
    }
}
