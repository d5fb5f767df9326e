//! Controls the [Quirks] behavior of the CPU on a granular level.

use crate::error::Error;
use std::str::FromStr;

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is the common modern behavior, `true` is Cosmac-VIP-like behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Shift ops in `8xy`(`6`, `E`) should source from vY instead of vX
    pub shift: bool,
    /// Binary ops in `8xy`(`1`, `2`, `3`) should set vF to 0
    pub vf_reset: bool,
    /// DMA instructions `Fx55`/`Fx65` should change I to I + x + 1
    pub dma_inc: bool,
}

impl From<bool> for Quirks {
    /// `true` enables every quirk, `false` disables them all
    fn from(value: bool) -> Self {
        Quirks {
            shift: value,
            vf_reset: value,
            dma_inc: value,
        }
    }
}

impl FromStr for Quirks {
    type Err = Error;

    /// Parses the name of a quirk preset
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// assert_eq!(Quirks::from(true), "cosmac".parse::<Quirks>().unwrap());
    /// assert_eq!(Quirks::default(), "Modern".parse::<Quirks>().unwrap());
    /// "schip".parse::<Quirks>().expect_err("Super Chip is not supported");
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modern" | "chip8" | "chip-8" => Ok(Quirks::from(false)),
            "cosmac" | "vip" | "cosmac-vip" => Ok(Quirks::from(true)),
            _ => Err(Error::InvalidQuirks {
                name: s.to_string(),
            }),
        }
    }
}
