pub mod calendar;
pub mod error;

pub use calendar::{Calendar, FixedCalendar, SystemCalendar};
pub use error::{IdentifierError, SlipError};
