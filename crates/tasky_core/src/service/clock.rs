//! Time sources for business rules.

use crate::model::timestamp::Timestamp;
use std::cell::Cell;

/// Supplies the current instant.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.set(self.now.get().plus_millis(millis));
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get().plus_days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use crate::model::timestamp::Timestamp;

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new(Timestamp::from_millis(0));
        assert_eq!(clock.now(), Timestamp::from_millis(0));
        clock.advance_days(1);
        clock.advance_millis(5);
        assert_eq!(clock.now(), Timestamp::from_millis(86_400_005));
        clock.set(Timestamp::from_millis(7));
        assert_eq!(clock.now(), Timestamp::from_millis(7));
    }
}
