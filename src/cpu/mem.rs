// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The memory map of the Chip-8, and the character ROM that lives in it
//!
//! ```text
//! 0x000 +----------------+
//!       | interpreter    |
//! 0x050 |   charset      |
//! 0x0a0 |                |
//! 0x200 +----------------+
//!       | program / data |
//! 0xfff +----------------+
//! ```

/// Total addressable memory, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Mask which wraps a derived address into memory
pub const ADDR_MASK: u16 = 0x0fff;
/// Where programs are loaded (and where execution begins) by default
pub const PROGRAM_START: u16 = 0x200;
/// Where the [FONT] is loaded into low memory
pub const FONT_ADDR: u16 = 0x050;
/// Bytes per glyph in the [FONT]
pub const GLYPH_LEN: u16 = 5;

/// The COSMAC VIP hex digit glyphs, `0` through `F`, 4x5 pixels each
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Gets the address of the glyph for the low nibble of `digit`
/// # Examples
/// ```rust
/// # use chipvm::cpu::mem::*;
/// assert_eq!(FONT_ADDR, glyph_addr(0x0));
/// assert_eq!(FONT_ADDR + 5 * 0xa, glyph_addr(0xa));
/// // only the low nibble selects a glyph
/// assert_eq!(glyph_addr(0x1), glyph_addr(0xf1));
/// ```
#[inline(always)]
pub fn glyph_addr(digit: u8) -> u16 {
    FONT_ADDR + GLYPH_LEN * (digit & 0xf) as u16
}
