// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Holds the entire mutable state of one Chip-8 machine
//!
//! The [State] does nothing on its own. It's driven by a [CPU](super::CPU),
//! which borrows it for every cycle.

use super::{
    mem::{FONT, FONT_ADDR, MEM_SIZE, PROGRAM_START},
    screen::Screen,
    Adr, Reg,
};
use crate::error::{Bound, Error, Result};

/// Maximum subroutine nesting depth
pub const STACK_DEPTH: usize = 16;

/// Represents the memory, registers, and I/O of a Chip-8
///
/// Save states are checked on the way in: a deserialized [State] upholds the
/// same bounds as one built by [State::new].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "SaveState", try_from = "SaveState")
)]
pub struct State {
    // memory
    pub(super) mem: Box<[u8; MEM_SIZE]>,
    pub(super) stack: [Adr; STACK_DEPTH],
    pub(super) sp: usize,
    // registers
    pub(super) pc: Adr,
    pub(super) i: Adr,
    pub(super) v: [u8; 16],
    pub(super) delay: u8,
    pub(super) sound: u8,
    // I/O
    pub(super) screen: Screen,
    pub(super) keys: [bool; 16],
    /// Register awaiting a keypress, if `Fx0A` is in progress
    pub(super) keywait: Option<Reg>,
}

impl State {
    /// Constructs a new, freshly [reset](State::reset) machine
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let state = State::new();
    /// assert_eq!(0x200, state.pc());
    /// assert_eq!(0, state.stack().len());
    /// ```
    pub fn new() -> Self {
        let mut state = State {
            mem: Box::new([0; MEM_SIZE]),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            screen: Screen::new(),
            keys: [false; 16],
            keywait: None,
        };
        state.reset();
        state
    }

    /// Restores the power-on state, and loads the font into low memory.
    ///
    /// Zeroes memory, registers, timers, and keys, empties the stack, clears the screen,
    /// cancels any pending key wait, and returns the program counter to `0x200`.
    pub fn reset(&mut self) {
        self.mem.fill(0);
        let font = FONT_ADDR as usize;
        self.mem[font..font + FONT.len()].copy_from_slice(&FONT);
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.pc = PROGRAM_START;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.screen.clear();
        self.keys = [false; 16];
        self.keywait = None;
    }

    /// Loads bytes into the program space at `0x200`, and points the program counter at them
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut state = State::new();
    /// state.load_program(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(0x00, state.read(0x200).unwrap());
    /// assert_eq!(0xe0, state.read(0x201).unwrap());
    /// // Programs must fit in 0x200..0x1000
    /// state.load_program(&[0; 0xe01]).expect_err("Program should be too large");
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.load_program_at(rom, PROGRAM_START)
    }

    /// Loads bytes into memory at `offset`, and points the program counter at them.
    ///
    /// Memory from `offset` to the end is cleared first. If the program doesn't fit,
    /// returns [Error::ProgramTooLarge] without touching memory.
    ///
    /// The interpreter area below `0x200` is off limits: an `offset` there, or past the
    /// end of memory, returns [Error::OutOfBounds].
    pub fn load_program_at(&mut self, rom: &[u8], offset: Adr) -> Result<&mut Self> {
        let start = offset as usize;
        if !(PROGRAM_START as usize..MEM_SIZE).contains(&start) {
            return Err(Error::OutOfBounds {
                kind: Bound::Memory,
                index: start,
            });
        }
        let max = MEM_SIZE - start;
        if rom.len() > max {
            return Err(Error::ProgramTooLarge {
                len: rom.len(),
                max,
            });
        }
        let program = &mut self.mem[start..];
        program.fill(0);
        program[..rom.len()].copy_from_slice(rom);
        self.pc = offset;
        Ok(self)
    }

    /// Gets a byte of memory.
    /// If the address is outside `0x000..=0xfff`, returns [Error::OutOfBounds]
    pub fn read(&self, addr: Adr) -> Result<u8> {
        self.mem.get(addr as usize).copied().ok_or(Error::OutOfBounds {
            kind: Bound::Memory,
            index: addr as usize,
        })
    }

    /// Sets a byte of memory.
    /// If the address is outside `0x000..=0xfff`, returns [Error::OutOfBounds]
    pub fn write(&mut self, addr: Adr, value: u8) -> Result<()> {
        match self.mem.get_mut(addr as usize) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => Err(Error::OutOfBounds {
                kind: Bound::Memory,
                index: addr as usize,
            }),
        }
    }

    /// Gets a read-only view of all 4096 bytes of memory
    pub fn memory(&self) -> &[u8] {
        self.mem.as_slice()
    }

    /// Gets a general purpose register.
    /// If the register doesn't exist, returns [Error::OutOfBounds]
    pub fn v(&self, reg: Reg) -> Result<u8> {
        self.v.get(reg).copied().ok_or(Error::OutOfBounds {
            kind: Bound::Register,
            index: reg,
        })
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::OutOfBounds]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut state = State::new();
    /// state.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, state.v(0x4).unwrap());
    /// state.set_v(0x10, 0x41).expect_err("There is no v10");
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                kind: Bound::Register,
                index: reg,
            })
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn registers(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Sets the program counter.
    /// If the address is outside memory, returns [Error::OutOfBounds]
    pub fn set_pc(&mut self, pc: Adr) -> Result<()> {
        self.pc = Self::check_addr(pc)?;
        Ok(())
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Sets the I register.
    /// If the address is outside memory, returns [Error::OutOfBounds]
    pub fn set_i(&mut self, i: Adr) -> Result<()> {
        self.i = Self::check_addr(i)?;
        Ok(())
    }

    /// Gets the live portion of the stack, oldest return address first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the stack pointer (the number of addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Pushes a return address.
    /// If the stack is full, returns [Error::StackOverflow]
    pub fn push(&mut self, addr: Adr) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Error::StackOverflow { pc: self.pc })?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops a return address.
    /// If the stack is empty, returns [Error::StackUnderflow]
    pub fn pop(&mut self) -> Result<Adr> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Sets the value in the Delay Timer register
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Sets the value in the Sound Timer register
    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Returns true while the tone should be playing
    pub fn sound_active(&self) -> bool {
        self.sound != 0
    }

    /// Gets the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the screen, mutably
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Gets the state of all 16 keys
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Gets the state of a key.
    /// If key is outside range `0..=0xF`, returns [Error::OutOfBounds]
    pub fn key(&self, key: usize) -> Result<bool> {
        self.keys.get(key).copied().ok_or(Error::OutOfBounds {
            kind: Bound::Key,
            index: key,
        })
    }

    /// Replaces the state of all 16 keys with a fresh snapshot from the host
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::OutOfBounds].
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut state = State::new();
    /// // press key `7`
    /// assert!(state.press(0x7).unwrap());
    /// // it was already pressed, so nothing's changed.
    /// assert!(!state.press(0x7).unwrap());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::OutOfBounds].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, false)
    }

    /// Gets the register an in-progress `Fx0A` will write, if the machine is waiting for a key
    pub fn awaiting_key(&self) -> Option<Reg> {
        self.keywait
    }

    /// Abandons an in-progress `Fx0A`, leaving the program counter on that instruction
    pub fn cancel_key_wait(&mut self) {
        self.keywait = None;
    }

    /// Dumps the current state of all registers
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// State::new().dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
        );
    }

    fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::OutOfBounds {
            kind: Bound::Key,
            index: key,
        })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    fn check_addr(addr: Adr) -> Result<Adr> {
        match addr as usize {
            a if a < MEM_SIZE => Ok(addr),
            index => Err(Error::OutOfBounds {
                kind: Bound::Memory,
                index,
            }),
        }
    }
}

/// The serialized form of a [State], validated before it becomes one
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(super) struct SaveState {
    pub(super) mem: Vec<u8>,
    pub(super) stack: [Adr; STACK_DEPTH],
    pub(super) sp: usize,
    pub(super) pc: Adr,
    pub(super) i: Adr,
    pub(super) v: [u8; 16],
    pub(super) delay: u8,
    pub(super) sound: u8,
    pub(super) screen: Screen,
    pub(super) keys: [bool; 16],
    pub(super) keywait: Option<Reg>,
}

#[cfg(feature = "serde")]
impl From<State> for SaveState {
    fn from(state: State) -> Self {
        SaveState {
            mem: state.mem.to_vec(),
            stack: state.stack,
            sp: state.sp,
            pc: state.pc,
            i: state.i,
            v: state.v,
            delay: state.delay,
            sound: state.sound,
            screen: state.screen,
            keys: state.keys,
            keywait: state.keywait,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<SaveState> for State {
    type Error = Error;

    /// Rejects a save whose memory isn't exactly 4096 bytes, whose stack pointer
    /// is past the stack, whose I is outside memory, or whose key wait names a
    /// register that doesn't exist.
    fn try_from(save: SaveState) -> Result<Self> {
        let mem: Box<[u8; MEM_SIZE]> = save
            .mem
            .into_boxed_slice()
            .try_into()
            .map_err(|mem: Box<[u8]>| Error::OutOfBounds {
                kind: Bound::Memory,
                index: mem.len(),
            })?;
        if save.sp > STACK_DEPTH {
            return Err(Error::OutOfBounds {
                kind: Bound::Stack,
                index: save.sp,
            });
        }
        if let Some(reg) = save.keywait.filter(|&reg| reg >= 16) {
            return Err(Error::OutOfBounds {
                kind: Bound::Register,
                index: reg,
            });
        }
        Ok(State {
            mem,
            stack: save.stack,
            sp: save.sp,
            pc: save.pc,
            i: Self::check_addr(save.i)?,
            v: save.v,
            delay: save.delay,
            sound: save.sound,
            screen: save.screen,
            keys: save.keys,
            keywait: save.keywait,
        })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
