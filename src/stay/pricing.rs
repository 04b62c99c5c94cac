use chrono::{Duration, NaiveDate};

/// Nights between two dates, partial days rounded up
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    let day = Duration::days(1).num_seconds();
    let span = check_out.signed_duration_since(check_in).num_seconds();
    (span + day - 1).div_euclid(day)
}

/// Price of a stay, derived from the dates every time it is asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub nights: i64,
    pub nightly_rate: f64,
    pub total: f64,
}

impl Quote {
    /// `None` unless check-out is strictly after check-in
    pub fn for_stay(check_in: NaiveDate, check_out: NaiveDate, nightly_rate: f64) -> Option<Self> {
        let nights = nights_between(check_in, check_out);
        (nights > 0).then(|| Self {
            nights,
            nightly_rate,
            total: nightly_rate * nights as f64,
        })
    }
}
