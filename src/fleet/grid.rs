//! Weekly shift schedule stored as a circular array of hour slots.

use tracing::{error, info};

use super::shift::{ScheduleError, Shift, ShiftId};

/// Hours in one day.
pub const HOURS_PER_DAY: usize = 24;
/// Days in one week.
pub const DAYS_PER_WEEK: usize = 7;
/// Number of hour slots in the weekly schedule.
pub const WEEK_HOURS: usize = HOURS_PER_DAY * DAYS_PER_WEEK;

/// Schedule used when configuration declares no shifts: days 1–5, three
/// eight-hour shifts of 8, 6 and 3 trucks starting at 08:00, 16:00 and 00:00.
pub const DEFAULT_SHIFT_DATA: &[&str] = &[
    "block", "1", "2", "3", "4", "5", //
    "shift", "8", "8", "8", //
    "shift", "16", "8", "6", //
    "shift", "0", "8", "3",
];

/// Returns the slot index for a day of week (Sunday = 1) and hour of day.
///
/// # Examples
///
/// ```
/// use lift_truck_sim::fleet::grid::slot_index;
///
/// assert_eq!(slot_index(1, 0), 0);
/// assert_eq!(slot_index(2, 8), 32);
/// assert_eq!(slot_index(7, 23), 167);
/// ```
pub fn slot_index(day_of_week: u8, hour: u8) -> usize {
    let day = usize::from(day_of_week.saturating_sub(1));
    (usize::from(hour) + day * HOURS_PER_DAY) % WEEK_HOURS
}

/// Slot following `index`, wrapping from the end of the week to its start.
pub fn next_index(index: usize) -> usize {
    (index % WEEK_HOURS + 1) % WEEK_HOURS
}

/// Slot preceding `index`, wrapping from the start of the week to its end.
pub fn previous_index(index: usize) -> usize {
    (index % WEEK_HOURS + WEEK_HOURS - 1) % WEEK_HOURS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collecting {
    Block,
    Shift,
}

/// The weekly work schedule: one cell per hour of the week, each either idle
/// or referring to the shift active in that hour.
///
/// The grid is filled once at configuration time and only queried afterwards.
#[derive(Debug, Clone)]
pub struct ScheduleGrid {
    shifts: Vec<Shift>,
    cells: [Option<ShiftId>; WEEK_HOURS],
    tokens: Vec<String>,
}

impl ScheduleGrid {
    /// Creates a grid with every hour idle.
    pub fn empty() -> Self {
        Self {
            shifts: Vec::new(),
            cells: [None; WEEK_HOURS],
            tokens: Vec::new(),
        }
    }

    /// Builds the grid from the built-in default declarations.
    pub fn default_schedule() -> Self {
        let (grid, _) = Self::from_tokens(DEFAULT_SHIFT_DATA);
        grid
    }

    /// Replays a token list of block and shift declarations.
    ///
    /// Tokens have the form `"block", d1, .., dn, "shift", start, duration,
    /// trucks, "shift", ...`, with days numbered 1–7. Later declarations
    /// overwrite earlier ones where they overlap. A malformed declaration is
    /// reported in the returned error list and skipped; processing carries on
    /// with the next one.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> (Self, Vec<ScheduleError>) {
        let mut grid = Self::empty();
        let mut errors = Vec::new();
        let mut state = Collecting::Shift;
        let mut block: Vec<i64> = Vec::new();
        let mut shift: Vec<i64> = Vec::new();

        for token in tokens {
            let token = token.as_ref().trim();
            match token {
                "block" => {
                    grid.finish_shift(&block, &mut shift, &mut errors);
                    block.clear();
                    state = Collecting::Block;
                }
                "shift" => {
                    grid.finish_shift(&block, &mut shift, &mut errors);
                    state = Collecting::Shift;
                }
                _ => match token.parse::<i64>() {
                    Ok(value) if state == Collecting::Block => block.push(value),
                    Ok(value) => shift.push(value),
                    Err(_) => errors.push(ScheduleError::BadToken(token.to_string())),
                },
            }
        }
        grid.finish_shift(&block, &mut shift, &mut errors);

        grid.tokens = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        (grid, errors)
    }

    /// Builds the grid from configuration, logging every rejected declaration.
    ///
    /// Falls back to [`DEFAULT_SHIFT_DATA`] when nothing ends up scheduled.
    pub fn configure<S: AsRef<str>>(tokens: &[S]) -> Self {
        let (grid, errors) = Self::from_tokens(tokens);
        for e in &errors {
            error!("shift schedule config error: {e}");
        }
        if grid.is_empty() {
            info!("no shifts scheduled, using the default schedule");
            return Self::default_schedule();
        }
        grid
    }

    fn finish_shift(&mut self, block: &[i64], shift: &mut Vec<i64>, errors: &mut Vec<ScheduleError>) {
        if shift.is_empty() {
            return;
        }
        let data = std::mem::take(shift);
        if block.is_empty() {
            errors.push(ScheduleError::EmptyBlock(data));
            return;
        }
        if let Err(e) = self.declare(block, &data) {
            errors.push(e);
        }
    }

    fn declare(&mut self, block: &[i64], data: &[i64]) -> Result<ShiftId, ScheduleError> {
        // Anything past the third number is ignored.
        let &[start, duration, trucks, ..] = data else {
            return Err(ScheduleError::IncompleteShift(data.to_vec()));
        };
        let days = parse_block(block)?;
        let shift = Shift::new(start, duration, trucks)?;
        Ok(self.add_shift(shift, &days))
    }

    /// Stores `shift` and points every hour it covers on each of `days` at it.
    ///
    /// Only meant for configuration time. Hours that run past the end of the
    /// week wrap to its start.
    pub fn add_shift(&mut self, shift: Shift, days: &[u8]) -> ShiftId {
        let id = ShiftId(self.shifts.len());
        self.shifts.push(shift);

        for &day in days {
            let base = usize::from(day.saturating_sub(1)) * HOURS_PER_DAY;
            for hour in shift.start()..shift.start() + shift.duration() as usize {
                self.cells[(base + hour) % WEEK_HOURS] = Some(id);
            }
        }
        id
    }

    /// Returns `true` when no hour of the week has a shift.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Id of the shift active in slot `index`, or `None` when idle.
    pub fn shift_id_at(&self, index: usize) -> Option<ShiftId> {
        self.cells[index % WEEK_HOURS]
    }

    /// The shift active in slot `index`, or `None` when idle.
    pub fn shift_at(&self, index: usize) -> Option<&Shift> {
        self.shift_id_at(index).map(|id| self.shift(id))
    }

    /// Trucks working in slot `index` (zero when idle).
    pub fn trucks_at(&self, index: usize) -> u32 {
        self.shift_at(index).map_or(0, Shift::trucks)
    }

    /// Looks up a shift by id.
    pub fn shift(&self, id: ShiftId) -> &Shift {
        &self.shifts[id.0]
    }

    /// Trucks working in a shift, zero for idle.
    pub fn trucks_of(&self, id: Option<ShiftId>) -> u32 {
        id.map_or(0, |id| self.shift(id).trucks())
    }

    /// The declaration tokens this grid was built from.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Default for ScheduleGrid {
    fn default() -> Self {
        Self::default_schedule()
    }
}

fn parse_block(block: &[i64]) -> Result<Vec<u8>, ScheduleError> {
    let days: Option<Vec<u8>> = block
        .iter()
        .map(|&d| u8::try_from(d).ok().filter(|d| (1..=7).contains(d)))
        .collect();
    match days {
        Some(days) if !days.is_empty() => Ok(days),
        _ => Err(ScheduleError::BadBlock(block.to_vec())),
    }
}
