//! Charging policies: how much energy to put into the batteries each hour.

use crate::fleet::{FleetParams, FleetState, ShiftEnergy};
use crate::sim::clock::SlotTime;
use crate::tariff::Tariff;

/// Everything a policy may look at when deciding one hour of charging.
pub struct ChargeContext<'a> {
    pub slot: SlotTime,
    pub params: &'a FleetParams,
    pub state: &'a FleetState,
    /// Projected energy needs, front segment first. Empty when not projected.
    pub plan: &'a [ShiftEnergy],
    pub tariff: &'a dyn Tariff,
}

impl ChargeContext<'_> {
    /// Most energy that can be stored this hour: all chargers at full rate,
    /// limited by the room left in the batteries off the trucks (kWh).
    pub fn max_store(&self) -> f32 {
        let room = self.state.charging_room(self.params.total_capacity());
        self.params.charger_capacity().min(room)
    }
}

/// Decides the energy stored per hour.
///
/// Implementations return kWh going into the batteries, never more than
/// [`ChargeContext::max_store`]. The grid draw is that amount divided by the
/// charge efficiency.
pub trait ChargingPolicy {
    fn energy_to_store(&self, ctx: &ChargeContext<'_>) -> f32;

    fn name(&self) -> &'static str;
}

/// Charges as fast as possible every hour, regardless of price.
#[derive(Debug, Default, Clone, Copy)]
pub struct EarlyCharging;

impl ChargingPolicy for EarlyCharging {
    fn energy_to_store(&self, ctx: &ChargeContext<'_>) -> f32 {
        ctx.max_store()
    }

    fn name(&self) -> &'static str {
        "early"
    }
}

/// Charges just enough to have the next shift's energy ready when it starts.
///
/// The target for the front plan segment is its required energy plus a
/// reserve of one hour at full charger output, which absorbs usage above the
/// mean. Whatever is still missing is spread evenly over the hours left in
/// the segment. It charges at the full rate instead when the plan projects a
/// shortage, when the working trucks are borrowing from the pool, or under a
/// time-of-use tariff when the current hour is the cheapest left in the
/// segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeadlineCharging;

impl DeadlineCharging {
    /// Energy kept in the pool on top of the plan's requirement (kWh).
    pub fn reserve(params: &FleetParams) -> f32 {
        params.charger_capacity()
    }

    fn trucks_borrowing(state: &FleetState) -> bool {
        state.capacity_in_use > 0.0 && state.energy_in_use <= 0.0
    }

    fn cheapest_hour(ctx: &ChargeContext<'_>, hours: u32) -> bool {
        let now = ctx.tariff.usage_price(ctx.slot);
        let mut slot = ctx.slot;
        (1..hours).all(|_| {
            slot = slot.next();
            now <= ctx.tariff.usage_price(slot)
        })
    }
}

impl ChargingPolicy for DeadlineCharging {
    fn energy_to_store(&self, ctx: &ChargeContext<'_>) -> f32 {
        let max = ctx.max_store();
        let Some(front) = ctx.plan.first() else {
            return max;
        };
        if front.max_surplus < 0.0 || Self::trucks_borrowing(ctx.state) {
            return max;
        }
        if ctx.tariff.is_time_of_use() && Self::cheapest_hour(ctx, front.duration) {
            return max;
        }

        let target = front.required + Self::reserve(ctx.params);
        let missing = (target - ctx.state.energy_charging).max(0.0);
        let hours = front.duration.max(1) as f32;
        (missing / hours).min(max)
    }

    fn name(&self) -> &'static str {
        "deadline"
    }
}
