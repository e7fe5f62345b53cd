use chrono::{Datelike, Local};

/// Offset between the Gregorian and the Thai Buddhist calendar.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Source of the reference year used for staleness and future-dating checks.
///
/// Years are always Buddhist-calendar years, the same calendar references
/// encode.
pub trait Calendar {
    fn current_year(&self) -> i32;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn current_year(&self) -> i32 {
        gregorian_to_buddhist(Local::now().year())
    }
}

/// Pinned reference year, for tests and for replaying historical slips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCalendar(pub i32);

impl Calendar for FixedCalendar {
    fn current_year(&self) -> i32 {
        self.0
    }
}

pub fn gregorian_to_buddhist(year: i32) -> i32 {
    year + BUDDHIST_ERA_OFFSET
}
