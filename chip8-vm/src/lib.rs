//! Chip-8 virtual machine core.
//!
//! Interprets the minimal Chip-8 instruction set against a 4096 byte memory
//! image, and exposes a 64x32 byte-per-pixel display buffer for a host to
//! present. The host drives execution by calling [`prelude::Chip8Vm::step`]
//! at whatever rate it chooses; the delay timer keeps to wall clock time.
mod clock;
pub mod constants;
mod cpu;
mod disasm;
mod error;
mod opcode;
mod stack;
mod vm;

pub use self::opcode::{Instr, Op};

pub mod prelude {
    pub use super::{
        cpu::Chip8Cpu,
        disasm::Disassembler,
        error::{Chip8Error, Chip8Result},
        vm::{Chip8Conf, Chip8Vm, Flow},
    };
}
