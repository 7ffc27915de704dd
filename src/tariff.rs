//! Tariff interface seen by the fleet, plus a config-driven implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fleet::grid::HOURS_PER_DAY;
use crate::sim::clock::SlotTime;

/// How a tariff prices energy, which selects the charging policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStructure {
    /// One price at all times.
    #[default]
    Flat,
    /// Price varies with the hour of day.
    TimeOfUse,
    /// The supplier pays for regulation capacity.
    Regulation,
}

impl fmt::Display for RateStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Flat => "flat",
            Self::TimeOfUse => "time_of_use",
            Self::Regulation => "regulation",
        };
        f.write_str(s)
    }
}

/// The subscription a fleet is billed under.
pub trait Tariff {
    /// Whether prices depend on the time of day.
    fn is_time_of_use(&self) -> bool;

    /// Whether the tariff pays for regulation capacity.
    fn has_regulation_rate(&self) -> bool;

    /// Price of one kWh drawn during `slot`.
    fn usage_price(&self, slot: SlotTime) -> f32;

    /// Payment per kWh of regulation capacity offered ($).
    fn regulation_rate(&self) -> f32 {
        0.0
    }

    /// Classifies the tariff. Time-of-use wins over regulation.
    fn rate_structure(&self) -> RateStructure {
        if self.is_time_of_use() {
            RateStructure::TimeOfUse
        } else if self.has_regulation_rate() {
            RateStructure::Regulation
        } else {
            RateStructure::Flat
        }
    }
}

/// A fixed tariff read from scenario configuration.
///
/// Time-of-use prices come from `hourly_prices` (one per hour of day); every
/// other structure, or a missing table, bills `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticTariff {
    pub kind: RateStructure,
    /// Price per kWh ($).
    pub price: f32,
    /// Price per kWh for each hour of the day ($), time-of-use only.
    pub hourly_prices: Vec<f32>,
    /// Payment per kWh of regulation ($), regulation only.
    pub regulation_rate: f32,
}

impl Default for StaticTariff {
    fn default() -> Self {
        Self::flat(0.12)
    }
}

impl StaticTariff {
    pub fn flat(price: f32) -> Self {
        Self {
            kind: RateStructure::Flat,
            price,
            hourly_prices: Vec::new(),
            regulation_rate: 0.0,
        }
    }

    pub fn time_of_use(hourly_prices: Vec<f32>) -> Self {
        let price = hourly_prices.iter().copied().fold(0.0, f32::max);
        Self {
            kind: RateStructure::TimeOfUse,
            price,
            hourly_prices,
            regulation_rate: 0.0,
        }
    }

    pub fn regulation(price: f32, regulation_rate: f32) -> Self {
        Self {
            kind: RateStructure::Regulation,
            price,
            hourly_prices: Vec::new(),
            regulation_rate,
        }
    }

    /// Night-cheap, afternoon-peak profile used by the `time_of_use` preset.
    pub fn day_night_profile() -> Vec<f32> {
        (0..HOURS_PER_DAY)
            .map(|hour| match hour {
                0..=5 | 22..=23 => 0.06,
                14..=19 => 0.22,
                _ => 0.12,
            })
            .collect()
    }
}

impl Tariff for StaticTariff {
    fn is_time_of_use(&self) -> bool {
        self.kind == RateStructure::TimeOfUse
    }

    fn has_regulation_rate(&self) -> bool {
        self.kind == RateStructure::Regulation
    }

    fn usage_price(&self, slot: SlotTime) -> f32 {
        if self.is_time_of_use() {
            if let Some(&p) = self.hourly_prices.get(usize::from(slot.hour)) {
                return p;
            }
        }
        self.price
    }

    fn regulation_rate(&self) -> f32 {
        if self.has_regulation_rate() {
            self.regulation_rate
        } else {
            0.0
        }
    }
}
