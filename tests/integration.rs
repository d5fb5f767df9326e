//! Testing methods on chipvm's public API
use chipvm::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

#[test]
fn chip8() {
    let ch8 = Chip8::default(); // Default
    let ch82 = ch8.clone(); // Clone
    assert_eq!(ch8, ch82); // PartialEq
    println!("{ch8:?}"); // Debug
}

#[test]
fn chip8_reset() {
    let mut ch8 = Chip8::default();
    ch8.state.load_program(&[0x60, 0x12, 0x12, 0x02]).unwrap();
    ch8.cpu.multistep(&mut ch8.state, 4).unwrap();
    ch8.reset();
    assert_eq!(0, ch8.cpu.cycle());
    assert_eq!(Chip8::default(), ch8);
}

mod state {
    use super::*;

    #[test]
    fn new() {
        let state = State::new();
        assert_eq!(0x200, state.pc());
        assert_eq!(0, state.i());
        assert_eq!(0, state.sp());
        assert_eq!((0, 0), (state.delay(), state.sound()));
        assert_eq!(&[0; 16], state.registers());
        assert_eq!(&[false; 16], state.keys());
        assert_eq!(None, state.awaiting_key());
        assert!(state.screen().is_blank());
        assert_eq!(4096, state.memory().len());
        // The glyph for `0` is in low memory
        assert_eq!(&[0xf0, 0x90, 0x90, 0x90, 0xf0], &state.memory()[0x50..0x55]);
    }

    #[test]
    fn reset() {
        let mut state = State::new();
        state.load_program(&[0xff; 0x40]).unwrap();
        state.set_v(3, 0x33).unwrap();
        state.set_delay(9);
        state.press(0xa).unwrap();
        state.push(0x222).unwrap();
        state.screen_mut().set(1, 1, true).unwrap();
        state.reset();
        assert_eq!(State::new(), state);
    }

    #[test]
    fn load_program_at() {
        let mut state = State::new();
        state.load_program_at(&[0xaa, 0xbb], 0x600).unwrap();
        assert_eq!(0x600, state.pc());
        assert_eq!(0xaa, state.read(0x600).unwrap());
        assert_eq!(0xbb, state.read(0x601).unwrap());
    }

    #[test]
    fn load_program_clears_program_space() {
        let mut state = State::new();
        state.load_program(&[0xff; 0x10]).unwrap();
        state.load_program(&[0x11]).unwrap();
        assert_eq!(&[0x11, 0, 0, 0], &state.memory()[0x200..0x204]);
    }

    #[test]
    fn load_program_into_interpreter_area() {
        let mut state = State::new();
        let state2 = state.clone();
        match state.load_program_at(&[0; 2], 0x1ff) {
            Err(Error::OutOfBounds { index, .. }) => assert_eq!(0x1ff, index),
            other => unreachable!("{other:?}"),
        }
        state
            .load_program_at(&[], 0x1000)
            .expect_err("0x1000 is past the end of memory");
        assert_eq!(state, state2);
    }

    #[test]
    fn program_too_large() {
        let mut state = State::new();
        state.load_program(&[0x12; 0x100]).unwrap();
        let state2 = state.clone();
        match state.load_program(&[0; 0xe01]) {
            Err(Error::ProgramTooLarge { len, max }) => assert_eq!((0xe01, 0xe00), (len, max)),
            other => unreachable!("{other:?}"),
        }
        // no change has been made, everything is safe.
        assert_eq!(state, state2);
        // Exactly full is fine
        state.load_program(&[0xab; 0xe00]).unwrap();
        assert_eq!(0xab, state.read(0xfff).unwrap());
    }

    #[test]
    fn read_write() {
        let mut state = State::new();
        state.write(0xfff, 0x5a).unwrap();
        assert_eq!(0x5a, state.read(0xfff).unwrap());
        state.write(0x1000, 0).expect_err("0x1000 is past the end of memory");
        state.read(0x1000).expect_err("0x1000 is past the end of memory");
    }

    #[test]
    fn press_invalid_key() {
        let mut state = State::new();
        let state2 = state.clone();
        state
            .press(0x21345134)
            .expect_err("This should produce an Error::OutOfBounds");
        // no change has been made, everything is safe.
        assert_eq!(state, state2);
    }

    #[test]
    fn release_invalid_key() {
        let mut state = State::new();
        let state2 = state.clone();
        state
            .release(0x21345134)
            .expect_err("This should produce an Error::OutOfBounds");
        // no change has been made, everything is safe.
        assert_eq!(state, state2);
    }

    #[test]
    fn press_release() {
        let mut state = State::new();
        assert!(state.press(0xf).unwrap());
        assert!(state.key(0xf).unwrap());
        assert!(state.release(0xf).unwrap());
        assert!(!state.release(0xf).unwrap());
        assert!(!state.key(0xf).unwrap());
        state.key(0x10).expect_err("There is no key 0x10");
    }

    #[test]
    fn set_keys() {
        let mut state = State::new();
        let mut keys = [false; 16];
        keys[0x4] = true;
        state.set_keys(keys);
        assert_eq!(&keys, state.keys());
    }

    #[test]
    fn set_invalid_reg() {
        let mut state = State::new();
        let state2 = state.clone();
        state
            .set_v(0x21345134, 0xff)
            .expect_err("This should produce an Error::OutOfBounds");
        state.v(0x10).expect_err("There is no v10");
        // no change has been made
        assert_eq!(state, state2);
    }

    #[test]
    fn set_invalid_addresses() {
        let mut state = State::new();
        let state2 = state.clone();
        state.set_pc(0x1000).expect_err("pc must point into memory");
        state.set_i(0xffff).expect_err("I must point into memory");
        assert_eq!(state, state2);
        state.set_pc(0x0fe).unwrap();
        state.set_i(0xfff).unwrap();
        assert_eq!((0x0fe, 0xfff), (state.pc(), state.i()));
    }

    #[test]
    fn stack() {
        let mut state = State::new();
        for addr in 0..16 {
            state.push(addr * 2).unwrap();
        }
        assert!(matches!(state.push(0), Err(Error::StackOverflow { .. })));
        assert_eq!(16, state.stack().len());
        for addr in (0..16).rev() {
            assert_eq!(addr * 2, state.pop().unwrap());
        }
        assert!(matches!(state.pop(), Err(Error::StackUnderflow { .. })));
    }

    #[test]
    fn sound_active() {
        let mut state = State::new();
        assert!(!state.sound_active());
        state.set_sound(1);
        assert!(state.sound_active());
    }

    #[test]
    fn debug() {
        println!("{:?}", State::new());
        State::new().dump();
    }
}

mod screen {
    use super::*;

    #[test]
    fn set_get() {
        let mut screen = Screen::new();
        screen.set(63, 31, true).unwrap();
        assert!(screen.get(63, 31).unwrap());
        assert_eq!(1, screen.rows()[31]);
        assert!(screen.pixels()[31][63]);
        screen.set(63, 31, false).unwrap();
        assert!(screen.is_blank());
        screen.set(0, 32, true).expect_err("y = 32 is off the bottom of the screen");
    }

    #[test]
    fn xor_row() {
        let mut screen = Screen::new();
        assert!(!screen.xor_row(62, 0, 0xf0));
        assert_eq!(0xc000_0000_0000_0003, screen.rows()[0]);
        assert!(screen.xor_row(0, 0, 0x80));
        assert_eq!(0x4000_0000_0000_0003, screen.rows()[0]);
        // Rows off the bottom are dropped
        assert!(!screen.xor_row(0, 32, 0xff));
    }

    #[test]
    fn far_off_screen() {
        let mut screen = Screen::new();
        match screen.get(0, usize::MAX / 32) {
            Err(Error::OutOfBounds { index, .. }) => assert_eq!(usize::MAX, index),
            other => unreachable!("{other:?}"),
        }
        screen
            .set(usize::MAX, usize::MAX, true)
            .expect_err("Nothing that far off is on screen");
        assert!(screen.is_blank());
    }

    #[test]
    fn display() {
        let mut screen = Screen::new();
        screen.set(0, 0, true).unwrap();
        let text = screen.to_string();
        assert_eq!(32, text.lines().count());
        assert!(text.starts_with("██  "));
    }

    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Screen::default().hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod cpu {
    use super::*;

    #[test]
    fn new() {
        let flags = Flags {
            debug: true,
            ..Default::default()
        };
        let cpu = CPU::new(flags);
        assert_eq!(flags, cpu.flags);
        assert_eq!(0, cpu.cycle());
    }

    #[test]
    fn from_quirks() {
        let cpu = CPU::from(Quirks::from(true));
        assert_eq!(Quirks::from(true), cpu.flags.quirks);
        assert!(!cpu.flags.debug);
    }

    #[test]
    fn fetch() {
        let cpu = CPU::default();
        let mut state = State::new();
        state.load_program(&[0xd1, 0x23]).unwrap();
        assert_eq!(0xd123, cpu.fetch(&state).unwrap());
    }

    mod flags {
        use super::*;
        //#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[test]
        #[allow(clippy::clone_on_copy)]
        fn clone() {
            let cf1 = Flags {
                debug: false,
                pause: false,
                ..Default::default()
            };
            let cf2 = cf1.clone();
            assert_eq!(cf1, cf2)
        }
        #[test]
        fn debug() {
            println!("{:?}", Flags::default());
        }
        #[test]
        fn default() {
            assert_eq!(
                Flags::default(),
                Flags {
                    debug: false,
                    pause: false,
                    quirks: Quirks::from(false),
                }
            )
        }
        #[test]
        fn eq() {
            let cf1 = Flags::default();
            let cf2 = Flags {
                debug: true,
                pause: true,
                ..Default::default()
            };
            assert_ne!(cf1, cf2);
        }
        #[test]
        fn ord() {
            let cf1 = Flags::default();
            let cf2 = Flags {
                debug: true,
                pause: true,
                ..Default::default()
            };
            assert!(cf1 < cf2);
            assert_eq!(Flags::default(), cf1.min(cf2));
        }
        #[test]
        fn hash() {
            let mut hasher = DefaultHasher::new();
            Flags::default().hash(&mut hasher);
            println!("{:?}", hasher);
        }
    }
}

mod insn {
    use super::*;

    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let opcode = Insn::decode(0xefa1).unwrap(); // random valid opcode
        let clone = opcode.clone();
        assert_eq!(opcode, clone);
    }
    #[test]
    fn debug() {
        println!("{:?}", Insn::decode(0x4141)) // "sneb #41, v1"
    }
    #[test]
    fn try_from() {
        assert_eq!(Insn::decode(0x8ab4).unwrap(), Insn::try_from(0x8ab4u16).unwrap());
        Insn::try_from(0x8ab8u16).expect_err("8xy8 is not an instruction");
    }
    #[test]
    fn display() {
        for word in 0..=0xffff {
            if let Ok(insn) = Insn::decode(word) {
                assert!(!insn.to_string().is_empty(), "{word:04x} has no mnemonic");
            }
        }
    }
    #[test]
    fn fields() {
        let fields = Fields::from(0xd123u16);
        assert_eq!((0xd, 0x1, 0x2, 0x3), (fields.u, fields.x, fields.y, fields.n));
        assert_eq!((0x23, 0x123), (fields.kk, fields.nnn));
    }
}

mod clock {
    use super::*;

    #[test]
    fn default() {
        let mut clock = Clock::default();
        assert_eq!(600, clock.rate());
        assert_eq!(10, clock.next_frame());
    }

    #[test]
    fn slow() {
        // Fewer instructions than frames
        let mut clock = Clock::new(20);
        let frames: Vec<usize> = (0..6).map(|_| clock.next_frame()).collect();
        assert_eq!(vec![0, 0, 1, 0, 0, 1], frames);
    }

    #[test]
    fn fastest() {
        let mut clock = Clock::new(u32::MAX);
        let second: usize = (0..60).map(|_| clock.next_frame()).sum();
        assert_eq!(u32::MAX as usize, second);
        assert_eq!(u32::MAX as usize / 60, clock.next_frame());
    }

    #[test]
    fn frame_time() {
        assert_eq!(16_666_666, Clock::frame_time().as_nanos());
        assert_eq!(60, TIMER_HZ);
    }
}

#[test]
fn error() {
    let error = Error::OutOfBounds {
        kind: chipvm::error::Bound::Memory,
        index: 0x1000,
    };
    // Print it with Display and Debug
    println!("{error} {error:?}");
    assert_eq!("address 0x1000 is out of bounds", error.to_string());
    let error = Error::UnknownOpcode { word: 0xffff };
    assert_eq!("opcode ffff not recognized", error.to_string());
}

mod quirks {
    use super::*;

    #[test]
    fn from_true() {
        let quirks_true = Quirks::from(true);
        assert_eq!(
            quirks_true,
            Quirks {
                shift: true,
                vf_reset: true,
                dma_inc: true,
            }
        )
    }

    #[test]
    fn from_false() {
        let quirks_false = Quirks::from(false);
        assert_eq!(
            quirks_false,
            Quirks {
                shift: false,
                vf_reset: false,
                dma_inc: false,
            }
        )
    }

    #[test]
    fn from_str() {
        for name in ["cosmac", "VIP", "cosmac-vip"] {
            assert_eq!(Quirks::from(true), name.parse::<Quirks>().unwrap());
        }
        for name in ["modern", "chip8", "CHIP-8"] {
            assert_eq!(Quirks::from(false), name.parse::<Quirks>().unwrap());
        }
        match "superchip".parse::<Quirks>() {
            Err(Error::InvalidQuirks { name }) => assert_eq!("superchip", name),
            other => unreachable!("{other:?}"),
        }
    }

    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let q1 = Quirks {
            shift: true,
            vf_reset: false,
            dma_inc: true,
        };
        let q2 = q1.clone();
        assert_eq!(q1, q2);
    }

    #[test]
    fn debug() {
        println!("{:?}", Quirks::from(true));
    }

    #[test]
    fn eq() {
        assert_ne!(Quirks::from(false), Quirks::from(true));
    }

    #[test]
    fn ord() {
        assert!(Quirks::from(false) < Quirks::from(true));
        assert!(Quirks::from(true) == Quirks::from(false).max(Quirks::from(true)));
    }

    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Quirks::from(true).hash(&mut hasher);
        println!("{hasher:?}");
    }
}
