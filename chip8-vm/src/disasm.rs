//! Disassembler.
use std::fmt::{self, Write as FmtWrite};

use crate::{
    constants::*,
    opcode::Instr,
};

/// Produces a listing of a program image, as it would be laid out in memory.
pub struct Disassembler<'a> {
    bytecode: &'a [u8],
}

impl<'a> Disassembler<'a> {
    /// Bytes past [`PROGRAM_MAX_SIZE`] would not be loaded, and are left out.
    pub fn new(bytecode: &'a [u8]) -> Self {
        Self {
            bytecode: &bytecode[..bytecode.len().min(PROGRAM_MAX_SIZE)],
        }
    }

    /// Decoded instructions in program order.
    ///
    /// A trailing odd byte is not an instruction, and is skipped.
    pub fn instructions(&self) -> impl Iterator<Item = Instr> + 'a {
        self.bytecode
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| Instr::new(address_of(i * 2), [pair[0], pair[1]]))
    }

    /// Write the whole listing, one instruction per line.
    pub fn disassemble<W: FmtWrite>(&self, w: &mut W) -> fmt::Result {
        for instr in self.instructions() {
            writeln!(w, "0x{:04X} {:04X} {}", instr.addr, instr.bytecode(), instr)?;
        }

        if self.bytecode.len() % 2 == 1 {
            let index = self.bytecode.len() - 1;
            let b = self.bytecode[index];
            writeln!(w, "0x{:04X} {b:02X}   DB 0x{b:02X}", address_of(index))?;
        }

        Ok(())
    }
}

#[inline(always)]
fn address_of(index: usize) -> Address {
    (MEM_START + index) as Address
}
