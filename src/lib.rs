// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 virtual machine as if it were a real CPU architecture.
//!
//! A [State] holds everything the machine remembers: memory, registers, stack,
//! timers, screen, and keys. A [CPU] drives it, one fetch-decode-execute [CPU::step]
//! at a time, while the host calls [CPU::tick_timers] at a steady 60Hz.
//!
//! ```rust
//! # use chipvm::*;
//! # fn main() -> Result<()> {
//! let (mut cpu, mut state) = (CPU::default(), State::new());
//! state.load_program(&[
//!     0x60, 0x0a, // mov #0a, v0
//!     0xf0, 0x29, // font v0, I
//!     0xd0, 0x05, // draw #5, v0, v0
//! ])?;
//! cpu.multistep(&mut state, 3)?;
//! // The glyph for `A` was drawn at (10, 10)
//! assert!(state.screen().get(10, 10)?);
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;

pub use cpu::{
    clock::{Clock, TIMER_HZ},
    flags::Flags,
    instruction::{Fields, Insn},
    quirks::Quirks,
    screen::Screen,
    state::State,
    CPU,
};
pub use error::{Error, Result};

/// One emulation session: an engine, and the machine it drives
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chip8 {
    pub cpu: CPU,
    pub state: State,
}

impl Chip8 {
    /// Resets both the machine and the engine's cycle count
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.state.reset();
    }
}
