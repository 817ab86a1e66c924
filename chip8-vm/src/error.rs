//! Result and errors.
use std::fmt::{self, Display, Formatter};

use crate::constants::Address;

pub type Chip8Result<T> = std::result::Result<T, Chip8Error>;

/// Fatal machine conditions, and failures of the host around it.
///
/// Unknown opcodes and oversized programs are not errors; they are
/// logged and execution carries on.
#[derive(Debug)]
pub enum Chip8Error {
    /// `CALL` executed while the call stack was full.
    StackOverflow { pc: Address },
    /// `RET` executed while the call stack was empty.
    StackUnderflow { pc: Address },
    /// Memory access outside of the 4096 byte address space.
    MemoryOutOfBounds { address: usize },
    Io(std::io::Error),
    Fmt(fmt::Error),
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow { pc } => write!(f, "call stack overflow at 0x{pc:04X}"),
            Self::StackUnderflow { pc } => write!(f, "call stack underflow at 0x{pc:04X}"),
            Self::MemoryOutOfBounds { address } => {
                write!(f, "memory access out of bounds: 0x{address:04X}")
            }
            Self::Io(err) => write!(f, "{err}"),
            Self::Fmt(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Fmt(err) => Some(err),
            _ => None,
        }
    }
}

impl From<fmt::Error> for Chip8Error {
    fn from(err: fmt::Error) -> Self {
        Chip8Error::Fmt(err)
    }
}

impl From<std::io::Error> for Chip8Error {
    fn from(err: std::io::Error) -> Self {
        Chip8Error::Io(err)
    }
}
