use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fleet::grid::{HOURS_PER_DAY, WEEK_HOURS, slot_index};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// An hour of the week: day of week (Sunday = 1) and hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotTime {
    pub day_of_week: u8,
    pub hour: u8,
}

impl SlotTime {
    /// Creates a slot time, wrapping out-of-range hours into later days.
    pub fn new(day_of_week: u8, hour: u8) -> Self {
        Self::from_index(slot_index(day_of_week, hour))
    }

    /// Position in the weekly schedule grid.
    pub fn index(&self) -> usize {
        slot_index(self.day_of_week, self.hour)
    }

    pub fn from_index(index: usize) -> Self {
        let index = index % WEEK_HOURS;
        Self {
            day_of_week: (index / HOURS_PER_DAY + 1) as u8,
            hour: (index % HOURS_PER_DAY) as u8,
        }
    }

    /// The following hour.
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl Default for SlotTime {
    /// Sunday 00:00.
    fn default() -> Self {
        Self::from_index(0)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = DAY_NAMES
            .get(usize::from(self.day_of_week.saturating_sub(1)))
            .unwrap_or(&"???");
        write!(f, "{day} {:02}:00", self.hour)
    }
}

/// A simulation clock that steps hour by hour from a starting slot.
///
/// # Examples
///
/// ```
/// use lift_truck_sim::sim::clock::{Clock, SlotTime};
///
/// let mut clock = Clock::new(SlotTime::new(7, 22), 3);
/// let mut slots = Vec::new();
///
/// clock.run(|step, slot| slots.push((step, slot.index())));
/// assert_eq!(slots, vec![(0, 166), (1, 167), (2, 0)]);
/// ```
pub struct Clock {
    start: SlotTime,
    /// Current step of the simulation
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
}

impl Clock {
    /// Creates a clock that runs `total` hourly steps beginning at `start`.
    pub fn new(start: SlotTime, total: usize) -> Self {
        Self {
            start,
            current: 0,
            total,
        }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some((step, slot))` - The step number (starting from 0) and its slot
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<(usize, SlotTime)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, SlotTime::from_index(self.start.index() + step)))
        } else {
            None
        }
    }

    /// Runs a function for each remaining step in the clock.
    pub fn run(&mut self, mut f: impl FnMut(usize, SlotTime)) {
        while let Some((step, slot)) = self.tick() {
            f(step, slot);
        }
    }
}
