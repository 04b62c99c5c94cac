//! Check-in / check-out selection.
//!
//! Two modes alternate: picking a check-in moves to choosing the check-out,
//! and a valid check-out moves back. A check-out that is not strictly after
//! the check-in is rejected and nothing changes.

use crate::models::stay_date;
use crate::stay::pricing::Quote;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selecting {
    #[default]
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSelection {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    selecting: Selecting,
}

impl DateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    pub fn selecting(&self) -> Selecting {
        self.selecting
    }

    /// Both ends of the stay, once chosen
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.check_in.zip(self.check_out)
    }

    fn accepts_check_out(&self, date: NaiveDate) -> Result<(), SelectionError> {
        match self.check_in {
            Some(check_in) if date > check_in => Ok(()),
            _ => Err(SelectionError::CheckOutNotAfterCheckIn),
        }
    }

    /// Calendar pick; meaning depends on the current mode
    pub fn pick(&mut self, date: NaiveDate) -> Result<(), SelectionError> {
        match self.selecting {
            Selecting::CheckIn => {
                self.check_in = Some(date);
                self.check_out = None;
                self.selecting = Selecting::CheckOut;
            }
            Selecting::CheckOut => {
                self.accepts_check_out(date)?;
                self.check_out = Some(date);
                self.selecting = Selecting::CheckIn;
            }
        }
        Ok(())
    }

    /// Direct click on the check-out grid, valid in either mode
    pub fn pick_check_out(&mut self, date: NaiveDate) -> Result<(), SelectionError> {
        self.accepts_check_out(date)?;
        self.check_out = Some(date);
        self.selecting = Selecting::CheckIn;
        Ok(())
    }

    /// Typed check-in; drops a check-out that would no longer be later
    pub fn set_check_in(&mut self, raw: &str) -> Result<(), SelectionError> {
        let date = parse_input(raw)?;
        if self.check_out.is_some_and(|check_out| check_out <= date) {
            self.check_out = None;
        }
        self.check_in = Some(date);
        Ok(())
    }

    /// Typed check-out, same rule as the grid
    pub fn set_check_out(&mut self, raw: &str) -> Result<(), SelectionError> {
        let date = parse_input(raw)?;
        self.accepts_check_out(date)?;
        self.check_out = Some(date);
        Ok(())
    }

    pub fn quote(&self, nightly_rate: f64) -> Option<Quote> {
        let (check_in, check_out) = self.range()?;
        Quote::for_stay(check_in, check_out, nightly_rate)
    }
}

fn parse_input(raw: &str) -> Result<NaiveDate, SelectionError> {
    stay_date::parse(raw).ok_or_else(|| SelectionError::InvalidDate(raw.trim().to_string()))
}
