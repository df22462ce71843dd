use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Minutes since 12:00. The simulation lives inside a single 12-hour
/// window, so there is no AM/PM distinction anywhere.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub u64);

impl Time {
    /// Parses an "H:MM" string. The hour is taken modulo 12, so "12:30"
    /// and "0:30" both land on minute 30.
    pub fn parse(s: &str) -> Option<Time> {
        let (hours, minutes) = s.split_once(':')?;
        let hours: u64 = hours.parse().ok()?;
        let minutes: u64 = minutes.parse().ok()?;
        Some(Time(hours % 12 * 60 + minutes))
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Hour 0 renders as 12, never as 0.
        let hours = (self.0 / 60 + 11) % 12 + 1;
        let minutes = self.0 % 60;
        write!(f, "{:02}:{:02}", hours, minutes)
    }
}

impl Add<u64> for Time {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Time(self.0 + rhs)
    }
}

impl AddAssign<u64> for Time {
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

/// Minutes a takeoff occupies the runway, derived from the passenger count.
/// The arithmetic is inherited unchanged from the tower's legacy model: one
/// minute covers anything up to 121 passengers, with another minute per 120
/// beyond that. The tests pin these values.
pub fn takeoff_duration(passengers: u64) -> u64 {
    let half = passengers / 2;
    half / 60 + (half % 60).div_ceil(60)
}
