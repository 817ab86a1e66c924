use std::sync::{Mutex, Once};

use chip8_vm::prelude::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Keeps every record so tests can inspect what the VM reported.
struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn captured() -> &'static CaptureLogger {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    &LOGGER
}

/// Warnings logged so far containing all of the given fragments.
fn warnings_with(fragments: &[&str]) -> Vec<String> {
    captured()
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, msg)| *level == Level::Warn && fragments.iter().all(|f| msg.contains(f)))
        .map(|(_, msg)| msg.clone())
        .collect()
}

#[test]
#[rustfmt::skip]
fn test_unknown_instruction_names_word_and_pc() {
    captured();

    let mut vm = Chip8Vm::new(Chip8Conf::default());
    vm.load_bytecode(&[
        0x61, 0x20, // LD v1, 0x20
        0x51, 0x20, // SE v1, v2 is unsupported
    ]);

    vm.step().unwrap();
    assert!(warnings_with(&["0x5120"]).is_empty());

    assert_eq!(vm.step().unwrap(), Flow::Unknown(0x5120));
    let warnings = warnings_with(&["0x5120", "0x0202"]);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
}

#[test]
fn test_oversized_program_warns() {
    captured();

    let mut vm = Chip8Vm::new(Chip8Conf::default());
    vm.load_bytecode(&vec![0x00; 4000]);

    let warnings = warnings_with(&["4000", "3584"]);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
}
