//! Entrypoint for CLI
use std::{env, error::Error, fs, time::Instant};

use chip8_vm::prelude::*;
use log::{error, info, warn};

/// Number of steps taken when none is given on the command line.
const DEFAULT_STEPS: usize = 100;

static USAGE: &str = r#"
usage: chip8 CMD FILE [STEPS]

commands:
    run     Run the target ROM file for a number of steps, then print the display
    dis     Disassemble the target ROM into readable assembly

examples:
    chip8 run maze.rom
    chip8 run maze.rom 5000
    chip8 dis maze.rom

Set RUST_LOG=warn to see unsupported instructions.
"#;

fn run_bytecode(filepath: impl AsRef<str>, step_count: usize) -> Chip8Result<()> {
    info!("running {} for {step_count} steps", filepath.as_ref());

    let bytecode = fs::read(filepath.as_ref())?;

    let mut vm = Chip8Vm::new(Chip8Conf::default());
    vm.load_bytecode(bytecode.as_slice());

    let start = Instant::now();
    let mut unknown_count = 0;
    let mut result = Ok(());

    for _ in 0..step_count {
        match vm.step() {
            Ok(Flow::Unknown(_)) => unknown_count += 1,
            Ok(_) => {}
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }
    let end = Instant::now();

    info!(
        "time taken: {}ms",
        end.duration_since(start).as_nanos() as f64 / 1000000.0
    ); // to millis
    if unknown_count > 0 {
        warn!("skipped {unknown_count} unsupported instructions");
    }
    println!("{}", vm.dump_display()?);

    result
}

fn run_disassembler(filepath: impl AsRef<str>) -> Chip8Result<()> {
    info!("disassembling {}", filepath.as_ref());

    let bytecode = fs::read(filepath.as_ref())?;

    let mut listing = String::new();
    Disassembler::new(bytecode.as_slice()).disassemble(&mut listing)?;
    print!("{listing}");

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let result = match parse_args() {
        Some(Cmd::Run { filepath, steps }) => run_bytecode(filepath, steps),
        Some(Cmd::Dis { filepath }) => run_disassembler(filepath),
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }

    Ok(())
}

fn parse_args() -> Option<Cmd> {
    let mut args = env::args().skip(1);
    match args.next() {
        Some(cmd) => {
            // don't format me T.T
            match cmd.as_str() {
                "run" => Some(Cmd::Run {
                    filepath: args.next()?,
                    steps: match args.next() {
                        Some(steps) => steps.parse().ok()?,
                        None => DEFAULT_STEPS,
                    },
                }),
                "dis" => Some(Cmd::Dis {
                    filepath: args.next()?,
                }),
                _ => None,
            }
        }
        None => None,
    }
}

fn print_usage() {
    println!("chip8 v{}", env!("CARGO_PKG_VERSION"));
    println!("{USAGE}");
}

enum Cmd {
    /// Run file
    Run { filepath: String, steps: usize },
    /// Disassemble
    Dis { filepath: String },
}
