/// Guest count. The +/- steps stay within `1..=max`; a typed count is kept
/// as entered and checked when the booking is drafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestCounter {
    count: u32,
    max: u32,
}

impl GuestCounter {
    pub fn new(max: u32) -> Self {
        Self { count: 1.min(max), max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns whether the count changed
    pub fn increment(&mut self) -> bool {
        if self.count >= self.max {
            return false;
        }
        self.count += 1;
        true
    }

    pub fn decrement(&mut self) -> bool {
        if self.count <= 1 {
            return false;
        }
        self.count -= 1;
        true
    }

    /// Typed count, stored unclamped
    pub fn set(&mut self, count: u32) {
        self.count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_at_both_ends() {
        let mut guests = GuestCounter::new(2);
        assert_eq!(guests.count(), 1);
        assert!(!guests.decrement());
        assert_eq!(guests.count(), 1);

        assert!(guests.increment());
        assert!(!guests.increment());
        assert_eq!(guests.count(), 2);
    }

    #[test]
    fn typed_count_is_kept_as_entered() {
        let mut guests = GuestCounter::new(4);
        guests.set(9);
        assert_eq!(guests.count(), 9);
        assert!(!guests.increment());

        guests.set(0);
        assert_eq!(guests.count(), 0);
        assert!(!guests.decrement());
    }

    #[test]
    fn steps_pull_an_out_of_range_count_back() {
        let mut guests = GuestCounter::new(3);
        guests.set(9);
        assert!(guests.decrement());
        assert_eq!(guests.count(), 8);
    }
}
