//! Instruction decoding.
//!
//! Every 16-bit word decodes to exactly one [`Op`]. The opcode family is
//! the top nibble; families `0`, `8` and `F` are further split on their
//! low nibble or byte. Words outside the supported instruction set decode
//! to [`Op::Unknown`].
use std::fmt;

use crate::constants::Address;

/// Decoded instruction, with the location and raw bytes it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instr {
    /// Address in memory where the instruction is located.
    pub addr: Address,
    /// The original bytes that were read from memory.
    pub bytes: [u8; 2],
    pub op: Op,
}

impl Instr {
    pub fn new(addr: Address, bytes: [u8; 2]) -> Self {
        Self {
            addr,
            bytes,
            op: Op::decode(bytes),
        }
    }

    /// Original bytes encoded into a `u16`.
    #[inline(always)]
    pub fn bytecode(&self) -> u16 {
        u16::from_be_bytes(self.bytes)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op {
            Op::Unknown => write!(f, "0x{:04X}", self.bytecode()),
            op => write!(f, "{op}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Op {
    /// 00E0 (CLS)
    ///
    /// Clear the screen.
    ClearScreen,
    /// 00EE (RET)
    ///
    /// Return from the sub-routine.
    Return,
    /// 1nnn (JP addr)
    ///
    /// Jump to the address in `nnn`.
    Jump { address: Address },
    /// 2nnn (CALL addr)
    ///
    /// Call the sub-routine at address `nnn`.
    Call { address: Address },
    /// 3xnn (SE Vx, byte)
    ///
    /// Skip the next instruction if register `Vx` equals value `nn`
    Skip_Eq_Byte { vx: u8, nn: u8 },
    /// 4xnn (SNE Vx, byte)
    ///
    /// Skip the next instruction if register `Vx` does not equal value `nn`.
    Skip_NotEq_Byte { vx: u8, nn: u8 },
    /// 6xnn (LD Vx, byte)
    Load_Byte { vx: u8, nn: u8 },
    /// 7xnn (ADD Vx, byte)
    ///
    /// Add byte to the value in register `Vx`, store the result in `Vx`.
    /// Carry flag is not set.
    Add_Byte { vx: u8, nn: u8 },

    // ------------------------------------------------------------------------
    // Math
    /// 8xy0 (LD Vx, Vy)
    ///
    /// Store the value of register VY in register VX.
    Load_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy1 (OR Vx, Vy)
    Or_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy2 (AND Vx, Vy)
    And_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy3 (XOR Vx, Vy)
    Xor_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy4 (ADD Vx, Vy)
    ///
    /// ADDs VX to VY, and stores the result in VX.
    /// Overflow is wrapped. If overflowed, set VF to 1, else 0.
    Add_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy5 (SUB Vx, Vy)
    ///
    /// Subtracts VY from VX, and stores the result in VX.
    /// VF is set to 1 when VX is greater than VY, otherwise 0.
    Sub_Vx_Vy { vx: u8, vy: u8 },
    /// 8xy6 (SHR Vx)
    ///
    /// The least-significant bit of Vx is stored in VF.
    /// Shift VX right by 1. VY is unused.
    ShiftRight { vx: u8 },
    /// 8xy7 (SUBN Vx, Vy)
    ///
    /// Subtracts VX from VY, and stores the result in VX.
    /// VF is set to 1 when VY is greater than VX, otherwise 0.
    SubReverse_Vx_Vy { vx: u8, vy: u8 },
    /// 8xyE (SHL Vx)
    ///
    /// The most-significant bit of Vx is stored in VF.
    /// Shift VX left by 1. VY is unused.
    ShiftLeft { vx: u8 },

    /// Annn (LD I, addr)
    ///
    /// Load address into register `I`.
    Load_Address { address: Address },
    /// Cxnn (RND Vx, byte)
    ///
    /// Set `Vx` to a random byte masked by `nn`.
    Random { vx: u8, nn: u8 },
    /// Dxyn (DRW Vx, Vy, nibble)
    ///
    /// Draw an 8 pixel wide, `n` pixel high sprite to the display buffer.
    Draw { vx: u8, vy: u8, n: u8 },

    // ------------------------------------------------------------------------
    // Timers
    /// Fx07 (LD Vx, DT)
    Load_Vx_Delay { vx: u8 },
    /// Fx15 (LD DT, Vx)
    Load_Delay_Vx { vx: u8 },

    /// Not part of the supported instruction set.
    Unknown,
}

impl Op {
    #[inline]
    pub fn decode(bytecode: [u8; 2]) -> Op {
        let [a, b] = bytecode;
        let op = a >> 4; // 0xF000
        let vx = a & 0xF; // 0x0F00
        let vy = b >> 4; // 0x00F0
        let n = b & 0xF; // 0x000F
        let nn = b; // 0x00FF
        let nnn = (((a as u16) & 0xF) << 8) | b as u16; // 0x0FFF

        match op {
            // Only the two literal words are supported,
            // machine code routines (0nnn) are not.
            0x0 => match (vx, nn) {
                (0x0, 0xE0) => Op::ClearScreen,
                (0x0, 0xEE) => Op::Return,
                _ => Op::Unknown,
            },
            0x1 => Op::Jump { address: nnn },
            0x2 => Op::Call { address: nnn },
            0x3 => Op::Skip_Eq_Byte { vx, nn },
            0x4 => Op::Skip_NotEq_Byte { vx, nn },
            0x6 => Op::Load_Byte { vx, nn },
            0x7 => Op::Add_Byte { vx, nn },
            // Arithmetic identified by n
            0x8 => match n {
                0x0 => Op::Load_Vx_Vy { vx, vy },
                0x1 => Op::Or_Vx_Vy { vx, vy },
                0x2 => Op::And_Vx_Vy { vx, vy },
                0x3 => Op::Xor_Vx_Vy { vx, vy },
                0x4 => Op::Add_Vx_Vy { vx, vy },
                0x5 => Op::Sub_Vx_Vy { vx, vy },
                0x6 => Op::ShiftRight { vx },
                0x7 => Op::SubReverse_Vx_Vy { vx, vy },
                0xE => Op::ShiftLeft { vx },
                _ => Op::Unknown,
            },
            0xA => Op::Load_Address { address: nnn },
            0xC => Op::Random { vx, nn },
            0xD => Op::Draw { vx, vy, n },
            // Timer transfers identified by nn
            0xF => match nn {
                0x07 => Op::Load_Vx_Delay { vx },
                0x15 => Op::Load_Delay_Vx { vx },
                _ => Op::Unknown,
            },
            // 5xy0, 9xy0, Bnnn and Exnn
            _ => Op::Unknown,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Op::ClearScreen => write!(f, "CLS"),
            Op::Return => write!(f, "RET"),
            Op::Jump { address } => write!(f, "JP 0x{address:03X}"),
            Op::Call { address } => write!(f, "CALL 0x{address:03X}"),
            Op::Skip_Eq_Byte { vx, nn } => write!(f, "SE v{vx}, {nn}"),
            Op::Skip_NotEq_Byte { vx, nn } => write!(f, "SNE v{vx}, {nn}"),
            Op::Load_Byte { vx, nn } => write!(f, "LD v{vx}, {nn}"),
            Op::Add_Byte { vx, nn } => write!(f, "ADD v{vx}, {nn}"),
            // ------
            Op::Load_Vx_Vy { vx, vy } => write!(f, "LD v{vx}, v{vy}"),
            Op::Or_Vx_Vy { vx, vy } => write!(f, "OR v{vx}, v{vy}"),
            Op::And_Vx_Vy { vx, vy } => write!(f, "AND v{vx}, v{vy}"),
            Op::Xor_Vx_Vy { vx, vy } => write!(f, "XOR v{vx}, v{vy}"),
            Op::Add_Vx_Vy { vx, vy } => write!(f, "ADD v{vx}, v{vy}"),
            Op::Sub_Vx_Vy { vx, vy } => write!(f, "SUB v{vx}, v{vy}"),
            Op::ShiftRight { vx } => write!(f, "SHR v{vx}"),
            Op::SubReverse_Vx_Vy { vx, vy } => write!(f, "SUBN v{vx}, v{vy}"),
            Op::ShiftLeft { vx } => write!(f, "SHL v{vx}"),
            // ------
            Op::Load_Address { address } => write!(f, "LD I, 0x{address:03X}"),
            Op::Random { vx, nn } => write!(f, "RND v{vx}, {nn}"),
            Op::Draw { vx, vy, n } => write!(f, "DRW v{vx}, v{vy}, {n}"),
            Op::Load_Vx_Delay { vx } => write!(f, "LD v{vx}, DT"),
            Op::Load_Delay_Vx { vx } => write!(f, "LD DT, v{vx}"),
            Op::Unknown => write!(f, "???"),
        }
    }
}
