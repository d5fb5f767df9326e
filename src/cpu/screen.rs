// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use crate::error::{Bound, Error, Result};
use std::fmt::{Display, Formatter};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome display buffer.
///
/// Each row is packed into a [u64], with the leftmost pixel in the most significant bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    rows: [u64; HEIGHT],
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.rows = [0; HEIGHT];
    }

    /// Gets the state of the pixel at (`x`, `y`)
    ///
    /// If the coordinate is off-screen, returns [Error::OutOfBounds]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let screen = Screen::new();
    /// assert!(!screen.get(63, 31).unwrap());
    /// screen.get(64, 0).expect_err("x = 64 is off the edge of the screen");
    /// ```
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        let (row, mask) = Self::locate(x, y)?;
        Ok(self.rows[row] & mask != 0)
    }

    /// Sets the state of the pixel at (`x`, `y`)
    pub fn set(&mut self, x: usize, y: usize, on: bool) -> Result<()> {
        let (row, mask) = Self::locate(x, y)?;
        match on {
            true => self.rows[row] |= mask,
            false => self.rows[row] &= !mask,
        }
        Ok(())
    }

    /// XORs one 8-pixel sprite row onto line `y`, starting at column `x`.
    ///
    /// Columns wrap around the right edge. Rows below the bottom edge are dropped.
    /// Returns true if any pixel was turned off.
    pub fn xor_row(&mut self, x: usize, y: usize, sprite: u8) -> bool {
        let Some(row) = self.rows.get_mut(y) else {
            return false;
        };
        // Place the sprite at the left edge, then rotate it into position
        let sprite = ((sprite as u64) << (WIDTH - 8)).rotate_right((x % WIDTH) as u32);
        let collided = *row & sprite != 0;
        *row ^= sprite;
        collided
    }

    /// Gets the packed rows of the screen, top to bottom
    pub fn rows(&self) -> &[u64; HEIGHT] {
        &self.rows
    }

    /// Gets a snapshot of the screen as a grid of pixels, indexed `[y][x]`
    pub fn pixels(&self) -> [[bool; WIDTH]; HEIGHT] {
        let mut grid = [[false; WIDTH]; HEIGHT];
        for (line, row) in grid.iter_mut().zip(self.rows.iter()) {
            for (x, pixel) in line.iter_mut().enumerate() {
                *pixel = row & (1 << (WIDTH - 1 - x)) != 0;
            }
        }
        grid
    }

    /// Returns true when no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    fn locate(x: usize, y: usize) -> Result<(usize, u64)> {
        if x >= WIDTH || y >= HEIGHT {
            return Err(Error::OutOfBounds {
                kind: Bound::Pixel,
                index: y.saturating_mul(WIDTH).saturating_add(x),
            });
        }
        Ok((y, 1 << (WIDTH - 1 - x)))
    }
}

impl Display for Screen {
    /// Prints the screen as block characters, one line per row
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows {
            for x in (0..WIDTH).rev() {
                write!(f, "{}", if row & (1 << x) != 0 { "██" } else { "  " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
