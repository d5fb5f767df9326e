// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chipvm: runs a Chip-8 program headless, then prints the screen and registers

#[cfg(test)]
mod tests;

use chipvm::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{path::PathBuf, time::Instant};

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let mut session = Session::new(options)?;
    for result in &mut session {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    session.report();
    Ok(())
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

/// Parses a hexadecimal key number. [State::press] rejects keys past `f`.
fn parse_key(value: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    usize::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, Options)]
struct Arguments {
    #[options(help = "Load a ROM to run on chipvm.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Print each instruction as it runs.")]
    pub debug: bool,

    #[options(help = "Set the instructions-per-second rate.", default = "600", meta = "IPS")]
    pub speed: u32,
    #[options(help = "Stop after this many 60Hz frames.", default = "600", meta = "N")]
    pub frames: usize,
    #[options(help = "Run as fast as possible, instead of in realtime.")]
    pub fast: bool,

    #[options(
        help = "Load the program at this address instead of 200.",
        parse(try_from_str = "parse_hex"),
        meta = "ADR"
    )]
    pub offset: Option<u16>,

    #[options(help = "Start from a quirk preset (modern, cosmac).", meta = "PRESET")]
    pub quirks: Option<Quirks>,
    #[options(short = "z", help = "Toggle setting vF to 0 after a bitwise operation.")]
    pub vfreset: bool,
    #[options(short = "c", help = "Toggle incrementing I after a DMA instruction.")]
    pub memory: bool,
    #[options(short = "v", help = "Toggle bit-shifts sourcing from vY.")]
    pub shift: bool,

    #[options(
        long = "key",
        help = "Hold down a key (0-f) for the whole run.",
        parse(try_from_str = "parse_key"),
        meta = "K"
    )]
    pub keys: Vec<usize>,
}

#[derive(Debug)]
struct Session {
    pub ch8: Chip8,
    pub clock: Clock,
    pub frames: usize,
    pub fast: bool,
    pub ft: Instant,
    sounding: bool,
}

impl Session {
    fn new(options: Arguments) -> Result<Self> {
        let rom = std::fs::read(&options.file)?;
        let mut session = Session {
            ch8: Chip8 {
                cpu: CPU::new(Flags {
                    quirks: options.quirks.unwrap_or_default(),
                    debug: options.debug,
                    ..Default::default()
                }),
                state: State::new(),
            },
            clock: Clock::new(options.speed),
            frames: options.frames,
            fast: options.fast,
            ft: Instant::now(),
            sounding: false,
        };
        // Flip the state of the quirks
        session.ch8.cpu.flags.quirks.vf_reset ^= options.vfreset;
        session.ch8.cpu.flags.quirks.dma_inc ^= options.memory;
        session.ch8.cpu.flags.quirks.shift ^= options.shift;
        session
            .ch8
            .state
            .load_program_at(&rom, options.offset.unwrap_or(0x200))?;
        for key in options.keys {
            session.ch8.state.press(key)?;
        }
        Ok(session)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        let Chip8 { cpu, state } = &mut self.ch8;
        cpu.frame(state, &mut self.clock)?;
        // Report the sound timer's edges, since there's no speaker
        if state.sound_active() != self.sounding {
            self.sounding = state.sound_active();
            if cpu.flags.debug {
                eprintln!("{}", if self.sounding { "beep" } else { "silence" }.yellow());
            }
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        if self.fast {
            return;
        }
        let rate = Clock::frame_time();
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
    /// Prints the final screen and registers
    fn report(&self) {
        print!("{}", self.ch8.state.screen());
        if let Some(x) = self.ch8.state.awaiting_key() {
            println!("{} v{x:X}", "Waiting for a key into".bright_black());
        }
        println!("{} cycles", self.ch8.cpu.cycle());
        self.ch8.state.dump();
    }
}

impl Iterator for Session {
    type Item = Result<()>;

    /// Runs one frame, and yields its result
    fn next(&mut self) -> Option<Self::Item> {
        if self.frames == 0 {
            return None;
        }
        self.frames -= 1;
        self.wait_for_next_frame();
        Some(self.tick_cpu())
    }
}
