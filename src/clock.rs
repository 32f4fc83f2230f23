//! Clock capability used to stamp node creation.

use crate::types::Timestamp;
use chrono::{Datelike, Local, Timelike};
use std::fmt;

/// Source of creation timestamps.
pub trait Clock: fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// Host local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Local::now();
        Timestamp {
            year: now.year().clamp(0, i32::from(u16::MAX)) as u16,
            month: now.month() as u8,
            day: now.day() as u8,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }
}

/// Always returns the same instant. Used by tests and benches.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
