//! Per-colour game clock with Fischer increment
//!
//! Each colour starts with the same base time and gains a fixed increment
//! after completing a move. Only the colour to move is charged for elapsed
//! time; a colour whose remaining time reaches zero has flagged.
//!
//! Example: 10+10 means 10 minutes base time with a 10 second increment.
//!
//! The clock lives beside the board rather than inside it, so the move
//! generator and executor stay free of wall-clock concerns.

use serde::{Deserialize, Serialize};

use crate::types::Colour;

/// Base time and increment agreed at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeControl {
    /// Starting time per colour, in minutes
    pub minutes: u32,
    /// Seconds added after each completed move
    pub increment: u32,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self {
            minutes: 10,
            increment: 10,
        }
    }
}

impl TimeControl {
    /// Base time in seconds
    pub fn base_seconds(&self) -> f32 {
        self.minutes as f32 * 60.0
    }
}

/// Remaining time for each colour, in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    remaining: [f32; 3],
    increment: f32,
}

impl Clock {
    pub fn new(control: TimeControl) -> Self {
        Self {
            remaining: [control.base_seconds(); 3],
            increment: control.increment as f32,
        }
    }

    /// Charge `seconds` of elapsed time to `colour`
    pub fn tick(&mut self, colour: Colour, seconds: f32) {
        self.remaining[colour] -= seconds;
    }

    /// Apply the increment to the colour that just moved
    pub fn add_increment(&mut self, colour: Colour) {
        if self.increment > 0.0 {
            self.remaining[colour] += self.increment;
        }
    }

    pub fn remaining(&self, colour: Colour) -> f32 {
        self.remaining[colour]
    }

    /// Overwrite a colour's remaining time, as reported by the server
    pub fn set(&mut self, colour: Colour, seconds: f32) {
        self.remaining[colour] = seconds;
    }

    pub fn is_flagged(&self, colour: Colour) -> bool {
        self.remaining[colour] <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(minutes: u32, increment: u32) -> Clock {
        Clock::new(TimeControl { minutes, increment })
    }

    #[test]
    fn test_clock_starts_with_base_time() {
        //! Every colour starts with the full base time
        let clock = clock(5, 3);
        for colour in Colour::ALL {
            assert_eq!(clock.remaining(colour), 300.0);
            assert!(!clock.is_flagged(colour));
        }
    }

    #[test]
    fn test_tick_charges_only_one_colour() {
        let mut clock = clock(1, 0);
        clock.tick(Colour::Gray, 0.5);
        assert_eq!(clock.remaining(Colour::Gray), 59.5);
        assert_eq!(clock.remaining(Colour::White), 60.0);
        assert_eq!(clock.remaining(Colour::Black), 60.0);
    }

    #[test]
    fn test_increment_after_move() {
        //! Increment can save a colour that is nearly out of time
        let mut clock = clock(1, 5);
        clock.tick(Colour::White, 59.0);
        clock.add_increment(Colour::White);
        assert_eq!(clock.remaining(Colour::White), 6.0);
    }

    #[test]
    fn test_zero_increment_changes_nothing() {
        let mut clock = clock(1, 0);
        clock.add_increment(Colour::Black);
        assert_eq!(clock.remaining(Colour::Black), 60.0);
    }

    #[test]
    fn test_flag_at_zero() {
        let mut clock = clock(1, 0);
        clock.tick(Colour::Black, 60.0);
        assert!(clock.is_flagged(Colour::Black));
        clock.set(Colour::Black, 12.0);
        assert!(!clock.is_flagged(Colour::Black));
    }
}
