// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod clock;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;
pub mod screen;
pub mod state;

use self::{clock::Clock, flags::Flags, instruction::Insn, quirks::Quirks, state::State};
use crate::error::{Bound, Error, Result};
use owo_colors::OwoColorize;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// The execution engine.
///
/// Holds no machine state of its own; every operation borrows a [State].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug, and pause.
    pub flags: Flags,
    // Execution data
    cycle: usize,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the provided [Flags]
    pub fn new(flags: Flags) -> Self {
        CPU { flags, cycle: 0 }
    }

    /// Gets the number of cycles the CPU has executed
    ///
    /// Cycles spent waiting for a key count. Cycles skipped while paused, or
    /// ending in a fault, don't.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x0, cpu.cycle());
    /// ```
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Resets the cycle count. Does not touch [Flags].
    pub fn reset(&mut self) {
        self.cycle = 0;
    }

    /// Fetches the instruction word at the program counter
    ///
    /// Returns [Error::MisalignedPc] if pc is odd, and [Error::OutOfBounds]
    /// if the word would extend past the end of memory.
    pub fn fetch(&self, state: &State) -> Result<u16> {
        let pc = state.pc;
        if pc % 2 != 0 {
            return Err(Error::MisalignedPc { pc });
        }
        match state.mem.get(pc as usize..pc as usize + 2) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(Error::OutOfBounds {
                kind: Bound::Memory,
                index: pc as usize + 1,
            }),
        }
    }

    /// Executes a single fetch-decode-execute cycle
    ///
    /// While an `Fx0A` is waiting for a key, each step only checks the keys,
    /// and finishes the instruction once one is held.
    ///
    /// If the cycle faults, the program counter is left on the faulting instruction.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// let mut state = State::new();
    /// state.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.step(&mut state)
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, state.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::UnknownOpcode] if the instruction is not recognized.
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// let mut state = State::new();
    /// state.load_program(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.step(&mut state)
    ///     .expect_err("Should return Error::UnknownOpcode { 0xffff }");
    /// assert_eq!(0x200, state.pc());
    /// ```
    pub fn step(&mut self, state: &mut State) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(self);
        }
        if let Some(x) = state.keywait {
            self.cycle += 1;
            self.resume_wait_for_key(state, x);
            return Ok(self);
        }
        let pc = state.pc;
        let insn = Insn::decode(self.fetch(state)?)?;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!("{:3} {:03x}: {:<36}", (self.cycle + 1).bright_black(), pc, insn);
        }

        state.pc = pc.wrapping_add(2);
        if let Err(e) = self.execute(state, insn) {
            state.pc = pc;
            return Err(match e {
                Error::StackOverflow { .. } => Error::StackOverflow { pc },
                Error::StackUnderflow { .. } => Error::StackUnderflow { pc },
                e => e,
            });
        }
        self.cycle += 1;
        Ok(self)
    }

    /// Executes `steps` cycles, without touching the timers
    ///
    /// Stops at the first fault.
    pub fn multistep(&mut self, state: &mut State, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.step(state)?;
        }
        Ok(self)
    }

    /// Counts the delay and sound timers down by one, stopping at zero.
    ///
    /// Call this at 60Hz, independent of the instruction rate.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// let mut state = State::new();
    /// state.set_delay(5);
    /// for _ in 0..10 {
    ///     cpu.tick_timers(&mut state);
    /// }
    /// assert_eq!(0, state.delay());
    /// ```
    pub fn tick_timers(&mut self, state: &mut State) -> &mut Self {
        state.delay = state.delay.saturating_sub(1);
        state.sound = state.sound.saturating_sub(1);
        self
    }

    /// Runs one 60Hz frame: as many steps as the [Clock] allots, then one timer tick
    ///
    /// Does nothing while paused.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut cpu = CPU::default();
    /// let mut state = State::new();
    /// state.load_program(&[0x12, 0x00]).unwrap(); // jump 0x200
    /// state.set_sound(2);
    /// cpu.frame(&mut state, &mut Clock::new(600)).unwrap();
    /// assert_eq!(10, cpu.cycle());
    /// assert_eq!(1, state.sound());
    /// ```
    pub fn frame(&mut self, state: &mut State, clock: &mut Clock) -> Result<&mut Self> {
        if self.flags.pause {
            return Ok(self);
        }
        self.multistep(state, clock.next_frame())?;
        self.tick_timers(state);
        Ok(self)
    }

    /// Unpauses the emulator for a single step,
    /// even if cpu.flags.pause is set.
    pub fn singlestep(&mut self, state: &mut State) -> Result<&mut Self> {
        let pause = std::mem::replace(&mut self.flags.pause, false);
        let result = self.step(state).map(|_| ());
        self.flags.pause = pause;
        result?;
        Ok(self)
    }
}

impl From<Quirks> for CPU {
    fn from(quirks: Quirks) -> Self {
        CPU::new(Flags {
            quirks,
            ..Default::default()
        })
    }
}
