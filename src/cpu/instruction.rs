// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
//! Contains the definition of a Chip-8 [Insn], and the [Fields] it's decoded from

use super::{Adr, Nib, Reg};
use crate::error::{Error, Result};
use std::fmt::Display;

/// The fields of an instruction word, extracted by masking and shifting.
///
/// ```text
///  u    x    y    n
/// 1101 0001 0010 0011
///           |___kk___|
///      |_____nnn_____|
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fields {
    /// Opcode class (high nibble)
    pub u: Nib,
    /// Register selector (second nibble)
    pub x: Reg,
    /// Register selector (third nibble)
    pub y: Reg,
    /// Immediate nibble (low nibble)
    pub n: Nib,
    /// Immediate byte (low byte)
    pub kk: u8,
    /// Immediate address (low 12 bits)
    pub nnn: Adr,
}

impl Fields {
    /// Splits an instruction word into its fields
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let f = Fields::new(0xd123);
    /// assert_eq!((0xd, 0x1, 0x2, 0x3), (f.u, f.x, f.y, f.n));
    /// assert_eq!((0x23, 0x123), (f.kk, f.nnn));
    /// ```
    pub const fn new(word: u16) -> Self {
        Fields {
            u: (word >> 12) as Nib,
            x: (word >> 8 & 0xf) as Reg,
            y: (word >> 4 & 0xf) as Reg,
            n: (word & 0xf) as Nib,
            kk: word as u8,
            nnn: word & 0xfff,
        }
    }
}

impl From<u16> for Fields {
    fn from(word: u16) -> Self {
        Fields::new(word)
    }
}

#[allow(non_camel_case_types, non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// One decoded Chip-8 instruction
pub enum Insn {
    /// | 00e0 | Clear screen memory to 0s
    cls,
    /// | 00ee | Return from subroutine
    ret,
    /// | 0aaa | Call machine-language routine at a (ignored)
    sys { A: Adr },
    /// | 1aaa | Jumps to an absolute address
    jmp { A: Adr },
    /// | 2aaa | Pushes pc onto the stack, then jumps to a
    call { A: Adr },
    /// | 3xbb | Skips next instruction if register X == b
    seb { B: u8, x: Reg },
    /// | 4xbb | Skips next instruction if register X != b
    sneb { B: u8, x: Reg },
    /// | 5xy0 | Skip next instruction if vX == vY
    se { y: Reg, x: Reg },
    /// | 6xbb | Loads immediate byte b into register vX
    movb { B: u8, x: Reg },
    /// | 7xbb | Adds immediate byte b to register vX
    addb { B: u8, x: Reg },
    /// | 8xy0 | Loads the value of y into x
    mov { y: Reg, x: Reg },
    /// | 8xy1 | Performs bitwise or of vX and vY, and stores the result in vX
    or { y: Reg, x: Reg },
    /// | 8xy2 | Performs bitwise and of vX and vY, and stores the result in vX
    and { y: Reg, x: Reg },
    /// | 8xy3 | Performs bitwise xor of vX and vY, and stores the result in vX
    xor { y: Reg, x: Reg },
    /// | 8xy4 | Performs addition of vX and vY, and stores the result in vX
    add { y: Reg, x: Reg },
    /// | 8xy5 | Performs subtraction of vX and vY, and stores the result in vX
    sub { y: Reg, x: Reg },
    /// | 8xy6 | Performs bitwise right shift of vX
    shr { y: Reg, x: Reg },
    /// | 8xy7 | Performs subtraction of vY and vX, and stores the result in vX
    bsub { y: Reg, x: Reg },
    /// | 8xyE | Performs bitwise left shift of vX
    shl { y: Reg, x: Reg },
    /// | 9xy0 | Skip next instruction if vX != vY
    sne { y: Reg, x: Reg },
    /// | Aaaa | Load address #a into register I
    movI { A: Adr },
    /// | Baaa | Jump to &adr + v0
    jmpr { A: Adr },
    /// | Cxbb | Stores a random number & the provided byte into vX
    rand { B: u8, x: Reg },
    /// | Dxyn | Draws n-byte sprite to the screen at coordinates (vX, vY)
    draw { y: Reg, x: Reg, n: Nib },
    /// | eX9e | Skip next instruction if key vX is pressed
    sek { x: Reg },
    /// | eXa1 | Skip next instruction if key vX is not pressed
    snek { x: Reg },
    /// | fX07 | Set vX to value in delay timer
    getdt { x: Reg },
    /// | fX0a | Wait for input, store key in vX
    waitk { x: Reg },
    /// | fX15 | Set delay timer to the value in vX
    setdt { x: Reg },
    /// | fX18 | Set sound timer to the value in vX
    movst { x: Reg },
    /// | fX1e | Add vX to I
    addI { x: Reg },
    /// | fX29 | Load sprite for character x into I
    font { x: Reg },
    /// | fX33 | BCD convert X into I[0..3]
    bcd { x: Reg },
    /// | fX55 | DMA Stor from I to registers 0..=X
    dmao { x: Reg },
    /// | fX65 | DMA Load from I to registers 0..=X
    dmai { x: Reg },
}

impl Insn {
    /// Decodes an instruction word into an [Insn].
    ///
    /// Returns [Error::UnknownOpcode] if the word matches no instruction.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// assert_eq!(Insn::draw { x: 1, y: 2, n: 3 }, Insn::decode(0xd123).unwrap());
    /// // Anything in the 0 class that isn't cls or ret is a system call
    /// assert_eq!(Insn::sys { A: 0x420 }, Insn::decode(0x0420).unwrap());
    /// Insn::decode(0x800f).expect_err("8xyF is not an instruction");
    /// ```
    #[rustfmt::skip]
    pub fn decode(word: u16) -> Result<Self> {
        let Fields { u, x, y, n, kk, nnn } = Fields::new(word);
        Ok(match (u, n) {
            (0x0, _) => match nnn {
                0x0e0 => Insn::cls,
                0x0ee => Insn::ret,
                _     => Insn::sys   { A: nnn },
            },
            (0x1, _)   => Insn::jmp   { A: nnn },
            (0x2, _)   => Insn::call  { A: nnn },
            (0x3, _)   => Insn::seb   { x, B: kk },
            (0x4, _)   => Insn::sneb  { x, B: kk },
            (0x5, 0x0) => Insn::se    { x, y },
            (0x6, _)   => Insn::movb  { x, B: kk },
            (0x7, _)   => Insn::addb  { x, B: kk },
            (0x8, 0x0) => Insn::mov   { x, y },
            (0x8, 0x1) => Insn::or    { x, y },
            (0x8, 0x2) => Insn::and   { x, y },
            (0x8, 0x3) => Insn::xor   { x, y },
            (0x8, 0x4) => Insn::add   { x, y },
            (0x8, 0x5) => Insn::sub   { x, y },
            (0x8, 0x6) => Insn::shr   { x, y },
            (0x8, 0x7) => Insn::bsub  { x, y },
            (0x8, 0xe) => Insn::shl   { x, y },
            (0x9, 0x0) => Insn::sne   { x, y },
            (0xa, _)   => Insn::movI  { A: nnn },
            (0xb, _)   => Insn::jmpr  { A: nnn },
            (0xc, _)   => Insn::rand  { x, B: kk },
            (0xd, _)   => Insn::draw  { x, y, n },
            (0xe, _)   => match kk {
                0x9e => Insn::sek   { x },
                0xa1 => Insn::snek  { x },
                _    => return Err(Error::UnknownOpcode { word }),
            },
            (0xf, _)   => match kk {
                0x07 => Insn::getdt { x },
                0x0a => Insn::waitk { x },
                0x15 => Insn::setdt { x },
                0x18 => Insn::movst { x },
                0x1e => Insn::addI  { x },
                0x29 => Insn::font  { x },
                0x33 => Insn::bcd   { x },
                0x55 => Insn::dmao  { x },
                0x65 => Insn::dmai  { x },
                _    => return Err(Error::UnknownOpcode { word }),
            },
            _ => return Err(Error::UnknownOpcode { word }),
        })
    }
}

impl TryFrom<u16> for Insn {
    type Error = Error;

    fn try_from(word: u16) -> Result<Self> {
        Insn::decode(word)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::sys { A }         => write!(f, "sys    {A:03x}"),
            Insn::jmp { A }         => write!(f, "jmp    {A:03x}"),
            Insn::call { A }        => write!(f, "call   {A:03x}"),
            Insn::seb { B, x }      => write!(f, "se     #{B:02x}, v{x:X}"),
            Insn::sneb { B, x }     => write!(f, "sne    #{B:02x}, v{x:X}"),
            Insn::se { y, x }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { B, x }     => write!(f, "mov    #{B:02x}, v{x:X}"),
            Insn::addb { B, x }     => write!(f, "add    #{B:02x}, v{x:X}"),
            Insn::mov { y, x }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { y, x }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { y, x }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { y, x }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { y, x }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { y, x }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { y, x }      => write!(f, "shr    v{y:X}, v{x:X}"),
            Insn::bsub { y, x }     => write!(f, "bsub   v{y:X}, v{x:X}"),
            Insn::shl { y, x }      => write!(f, "shl    v{y:X}, v{x:X}"),
            Insn::sne { y, x }      => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movI { A }        => write!(f, "mov    ${A:03x}, I"),
            Insn::jmpr { A }        => write!(f, "jmp    ${A:03x}+v0"),
            Insn::rand { B, x }     => write!(f, "rand   #{B:02x}, v{x:X}"),
            Insn::draw { y, x, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::movst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addI { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
        }
    }
}
