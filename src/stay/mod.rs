//! Stay planning: which dates, how many guests, what it costs.

pub mod calendar;
pub mod guests;
pub mod pricing;
pub mod selection;

pub use calendar::CalendarMonth;
pub use guests::GuestCounter;
pub use pricing::Quote;
pub use selection::{DateSelection, Selecting, SelectionError};
