// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

use super::*;
use std::path::Path;

/// A ROM file in the temp dir, removed when dropped
struct Rom {
    path: PathBuf,
}

impl Drop for Rom {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn rom(name: &str, program: &[u8]) -> Rom {
    let path = std::env::temp_dir().join(format!("chipvm-{}-{name}.ch8", std::process::id()));
    std::fs::write(&path, program).expect("Temp dir should be writable");
    Rom { path }
}

fn args(file: &Path, extra: &[&str]) -> Arguments {
    let mut argv = vec![file.to_str().expect("Temp path should be UTF-8")];
    argv.extend_from_slice(extra);
    Arguments::parse_args_default(&argv[..]).expect("Arguments should parse")
}

#[test]
fn parse_hex_and_keys() {
    assert_eq!(Ok(0x2a0), parse_hex("2a0"));
    assert!(parse_hex("xyz").is_err());
    assert_eq!(Ok(0xb), parse_key("b"));
    assert_eq!(Ok(0x11), parse_key("11"));
}

#[test]
fn key_out_of_range() {
    let file = rom("bad-key", &[0x12, 0x00]);
    match Session::new(args(&file.path, &["--key", "11"])) {
        Err(chipvm::error::Error::OutOfBounds { index, .. }) => assert_eq!(0x11, index),
        other => unreachable!("{:?}", other.map(|_| ())),
    }
}

#[test]
fn rom_is_removed() {
    let file = rom("removed", &[0x12, 0x00]);
    let path = file.path.clone();
    assert!(path.exists());
    drop(file);
    assert!(!path.exists());
}

#[test]
fn defaults() {
    let file = rom("defaults", &[0x12, 0x00]);
    let options = args(&file.path, &[]);
    assert_eq!(600, options.speed);
    assert_eq!(600, options.frames);
    assert_eq!(None, options.quirks);
    assert!(options.keys.is_empty());
}

#[test]
fn quirk_toggles() {
    let file = rom("quirks", &[0x12, 0x00]);
    let session = Session::new(args(&file.path, &["--quirks", "cosmac", "-z"])).unwrap();
    let quirks = session.ch8.cpu.flags.quirks;
    assert!(!quirks.vf_reset);
    assert!(quirks.shift && quirks.dma_inc);
}

#[test]
fn bad_preset() {
    let file = rom("bad-preset", &[0x12, 0x00]);
    let argv = [file.path.to_str().unwrap(), "--quirks", "xochip"];
    assert!(Arguments::parse_args_default(&argv[..]).is_err());
}

#[test]
fn runs_frames() {
    let file = rom("frames", &[
        0xf3, 0x0a, // waitk v3
        0x13, 0x02, // jmp 302
    ]);
    let mut session = Session::new(args(
        &file.path,
        &["--fast", "--frames", "3", "--key", "9", "--offset", "300"],
    ))
    .unwrap();
    assert_eq!(0x300, session.ch8.state.pc());
    assert_eq!(3, session.by_ref().filter(|result| result.is_ok()).count());
    assert_eq!(30, session.ch8.cpu.cycle());
    assert_eq!(9, session.ch8.state.v(3).unwrap());
    session.report();
}

#[test]
fn missing_rom() {
    let file = std::env::temp_dir().join("chipvm-this-file-does-not-exist.ch8");
    assert!(matches!(
        Session::new(args(&file, &[])),
        Err(chipvm::error::Error::IoError(_))
    ));
}
