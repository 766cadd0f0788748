//! Clock and identifier provider
//!
//! The store never reads wall-clock time directly. It asks an injected
//! [`Clock`] for the current date, creation instants and fresh identifiers,
//! so tests can pin "today" to a literal value.

use crate::planner::local_date_today;
use chrono::{NaiveDate, Utc};
use std::cell::Cell;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

pub trait Clock {
    /// Current calendar date
    fn today(&self) -> NaiveDate;

    /// Current instant in epoch milliseconds; strictly increasing between calls
    fn now(&self) -> i64;

    /// A fresh identifier, unique for the lifetime of the clock
    fn new_id(&self) -> u64;
}

/// Wall-clock provider
///
/// `today()` is the date in the local timezone. `now()` and `new_id()` start
/// from epoch milliseconds and are bumped forward whenever two calls land in
/// the same millisecond.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_instant: AtomicI64,
    last_id: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        local_date_today()
    }

    fn now(&self) -> i64 {
        let wall = Utc::now().timestamp_millis();
        let prev = self
            .last_instant
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or(wall);
        wall.max(prev + 1)
    }

    fn new_id(&self) -> u64 {
        let wall = Utc::now().timestamp_millis().max(0) as u64;
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or(wall);
        wall.max(prev + 1)
    }
}

/// Deterministic provider for tests and scripted hosts
///
/// Ids and instants count up by one from their starting values.
#[derive(Debug)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
    next_instant: Cell<i64>,
    next_id: Cell<u64>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self::starting_at(today, 1_700_000_000_000, 100)
    }

    pub fn starting_at(today: NaiveDate, first_instant: i64, first_id: u64) -> Self {
        Self {
            today: Cell::new(today),
            next_instant: Cell::new(first_instant),
            next_id: Cell::new(first_id),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }

    /// Rewind the instant counter, e.g. to simulate a coarse clock
    pub fn set_next_instant(&self, instant: i64) {
        self.next_instant.set(instant);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now(&self) -> i64 {
        let instant = self.next_instant.get();
        self.next_instant.set(instant + 1);
        instant
    }

    fn new_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_strictly_increasing() {
        let clock = SystemClock::new();
        let mut last_instant = clock.now();
        let mut last_id = clock.new_id();
        for _ in 0..1000 {
            let instant = clock.now();
            let id = clock.new_id();
            assert!(instant > last_instant);
            assert!(id > last_id);
            last_instant = instant;
            last_id = id;
        }
    }

    #[test]
    fn test_fixed_clock_counts_up() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let clock = FixedClock::starting_at(date, 50, 7);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), 50);
        assert_eq!(clock.now(), 51);
        assert_eq!(clock.new_id(), 7);
        assert_eq!(clock.new_id(), 8);

        let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        clock.set_today(later);
        assert_eq!(clock.today(), later);
    }
}
