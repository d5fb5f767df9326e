// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Converts an instruction rate into whole steps per 60Hz timer frame

use std::time::Duration;

/// Rate at which the delay and sound timers count down. Not configurable.
pub const TIMER_HZ: u32 = 60;

/// Spreads an instruction rate across 60Hz frames.
///
/// Rates that don't divide evenly by 60 carry the remainder into the next
/// frame, so every second runs exactly `rate` instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    rate: u32,
    carry: u32,
}

impl Clock {
    /// Constructs a clock running `rate` instructions per second
    pub fn new(rate: u32) -> Self {
        Clock { rate, carry: 0 }
    }

    /// Gets the instruction rate, in instructions per second
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Gets the number of instructions to run in the next frame
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut clock = Clock::new(90);
    /// // 1.5 instructions per frame
    /// assert_eq!(1, clock.next_frame());
    /// assert_eq!(2, clock.next_frame());
    /// let second: usize = (0..60).map(|_| clock.next_frame()).sum();
    /// assert_eq!(90, second);
    /// ```
    pub fn next_frame(&mut self) -> usize {
        let total = self.rate as u64 + self.carry as u64;
        self.carry = (total % TIMER_HZ as u64) as u32;
        (total / TIMER_HZ as u64) as usize
    }

    /// Gets the wall-clock length of one timer frame
    pub fn frame_time() -> Duration {
        Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64)
    }
}

impl Default for Clock {
    /// 600 instructions per second, or 10 per frame
    fn default() -> Self {
        Clock::new(600)
    }
}
