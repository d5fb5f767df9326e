// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chipvm

use std::fmt::Display;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Names the thing an [Error::OutOfBounds] index was checked against
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// A memory address (`0x000..=0xfff`)
    Memory,
    /// A general purpose register (`v0..=vF`)
    Register,
    /// A key on the hex keypad (`0x0..=0xf`)
    Key,
    /// The stack pointer (`0..=16`)
    Stack,
    /// A pixel coordinate on the 64x32 screen
    Pixel,
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Bound::Memory => "address",
                Bound::Register => "register",
                Bound::Key => "key",
                Bound::Stack => "stack pointer",
                Bound::Pixel => "pixel",
            }
        )
    }
}

/// Error type for chipvm.
#[derive(Debug, Error)]
pub enum Error {
    /// An address, register, key, or pixel index outside its valid range
    #[error("{kind} {index:#x} is out of bounds")]
    OutOfBounds {
        /// What the index was checked against
        kind: Bound,
        /// The offending index
        index: usize,
    },
    /// Tried to fetch an instruction from an odd address
    #[error("program counter {pc:03x} is not aligned to an instruction")]
    MisalignedPc {
        /// The offending program counter
        pc: u16,
    },
    /// Represents an unknown operation
    #[error("opcode {word:04x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
    },
    /// `call` with all 16 stack slots in use
    #[error("stack overflow at {pc:03x}")]
    StackOverflow {
        /// Address of the faulting instruction
        pc: u16,
    },
    /// `ret` with an empty stack
    #[error("stack underflow at {pc:03x}")]
    StackUnderflow {
        /// Address of the faulting instruction
        pc: u16,
    },
    /// The program doesn't fit between its load address and the end of memory
    #[error("program of {len} bytes does not fit in {max} bytes of program space")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Bytes available at the requested load address
        max: usize,
    },
    /// Tried to convert string into [Quirks](crate::cpu::quirks::Quirks), but it did not match.
    #[error("no suitable conversion of \"{name}\" into Quirks")]
    InvalidQuirks {
        /// The string which failed to become a set of quirks
        name: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
