use std::fmt;

use thiserror::Error;

/// Handle to a [`Shift`] stored in a [`ScheduleGrid`](super::grid::ScheduleGrid).
///
/// Every grid cell covered by the same declaration holds the same id, so two
/// hours belong to the same shift exactly when their ids compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftId(pub(crate) usize);

/// Problems found while turning shift declarations into a schedule.
///
/// Each one causes a single declaration (or token) to be skipped; none of
/// them abort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("bad numeric token \"{0}\"")]
    BadToken(String),

    #[error("empty block for shift {0:?}")]
    EmptyBlock(Vec<i64>),

    #[error("bad shift definition {0:?}")]
    IncompleteShift(Vec<i64>),

    #[error("bad block data {0:?}")]
    BadBlock(Vec<i64>),

    #[error("bad shift start time {0}")]
    BadStart(i64),

    #[error("bad shift duration {0}")]
    BadDuration(i64),

    #[error("negative shift truck count {0}")]
    NegativeTrucks(i64),

    #[error("shift truck count {0} is too large")]
    TooManyTrucks(i64),
}

/// One recurring daily block of truck operation.
///
/// A shift starts at `start` (hour of day), runs for `duration` hours, possibly
/// past midnight, and keeps `trucks` trucks busy the whole time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    start: u8,
    duration: u8,
    trucks: u32,
}

impl Shift {
    /// Creates a shift, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns a `ScheduleError` if `start` is outside `0..=23`, `duration`
    /// outside `1..=24`, or `trucks` is negative or does not fit in a `u32`.
    pub fn new(start: i64, duration: i64, trucks: i64) -> Result<Self, ScheduleError> {
        let start = u8::try_from(start)
            .ok()
            .filter(|s| *s <= 23)
            .ok_or(ScheduleError::BadStart(start))?;
        let duration = u8::try_from(duration)
            .ok()
            .filter(|d| (1..=24).contains(d))
            .ok_or(ScheduleError::BadDuration(duration))?;
        let trucks = match u32::try_from(trucks) {
            Ok(t) => t,
            Err(_) if trucks < 0 => return Err(ScheduleError::NegativeTrucks(trucks)),
            Err(_) => return Err(ScheduleError::TooManyTrucks(trucks)),
        };

        Ok(Self {
            start,
            duration,
            trucks,
        })
    }

    /// Hour of day the shift begins.
    pub fn start(&self) -> usize {
        usize::from(self.start)
    }

    /// Length of the shift in hours.
    pub fn duration(&self) -> u32 {
        u32::from(self.duration)
    }

    /// Number of trucks working during the shift.
    pub fn trucks(&self) -> u32 {
        self.trucks
    }

    /// Truck-hours of work in one occurrence of the shift.
    pub fn truck_hours(&self) -> u64 {
        u64::from(self.trucks) * u64::from(self.duration)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shift({},{},{})", self.start, self.duration, self.trucks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_shift() {
        let s = Shift::new(8, 8, 6);
        assert_eq!(s.map(|s| (s.start(), s.duration(), s.trucks())), Ok((8, 8, 6)));
    }

    #[test]
    fn zero_trucks_is_allowed() {
        assert!(Shift::new(0, 24, 0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_start() {
        assert_eq!(Shift::new(24, 8, 1), Err(ScheduleError::BadStart(24)));
        assert_eq!(Shift::new(-1, 8, 1), Err(ScheduleError::BadStart(-1)));
    }

    #[test]
    fn rejects_out_of_range_duration() {
        assert_eq!(Shift::new(8, 0, 1), Err(ScheduleError::BadDuration(0)));
        assert_eq!(Shift::new(8, 25, 1), Err(ScheduleError::BadDuration(25)));
    }

    #[test]
    fn rejects_negative_trucks() {
        assert_eq!(Shift::new(8, 8, -2), Err(ScheduleError::NegativeTrucks(-2)));
    }

    #[test]
    fn rejects_trucks_beyond_u32() {
        assert_eq!(
            Shift::new(8, 8, 5_000_000_000),
            Err(ScheduleError::TooManyTrucks(5_000_000_000))
        );
        assert!(Shift::new(8, 8, i64::from(u32::MAX)).is_ok());
    }

    #[test]
    fn truck_hours_do_not_wrap() {
        let s = Shift::new(0, 24, i64::from(u32::MAX)).ok();
        assert_eq!(s.map(|s| s.truck_hours()), Some(u64::from(u32::MAX) * 24));
    }

    #[test]
    fn display_format() {
        let s = Shift::new(16, 8, 6).ok();
        assert_eq!(s.map(|s| s.to_string()).as_deref(), Some("Shift(16,8,6)"));
    }

    #[test]
    fn truck_hours() {
        let s = Shift::new(0, 8, 3).ok();
        assert_eq!(s.map(|s| s.truck_hours()), Some(24));
    }
}
