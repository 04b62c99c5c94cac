use chrono::{Datelike, NaiveDate};
use std::fmt;

/// The month shown by the availability grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl Default for CalendarMonth {
    /// September 2025, the season the listings open for
    fn default() -> Self {
        Self { year: 2025, month: 9 }
    }
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Parse `YYYY-MM`
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    fn first(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days(&self) -> u32 {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|next| (next - self.first()).num_days() as u32)
            .unwrap_or(28)
    }

    /// Date of `day` in this month, `None` outside `1..=days()`
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Text grid, Monday first, with `[d]` on check-in and `(d)` on check-out
    pub fn render(&self, check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> String {
        let mut out = format!("{self}\n Mo   Tu   We   Th   Fr   Sa   Su\n");
        let offset = self.first().weekday().num_days_from_monday() as usize;
        out.push_str(&"     ".repeat(offset));

        for day in 1..=self.days() {
            let date = self.date(day);
            let cell = if date.is_some() && date == check_in {
                format!("[{day:>2}]")
            } else if date.is_some() && date == check_out {
                format!("({day:>2})")
            } else {
                format!(" {day:>2} ")
            };
            out.push_str(&cell);

            if (offset + day as usize) % 7 == 0 {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        out.trim_end().to_string()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first().format("%B %Y"))
    }
}
