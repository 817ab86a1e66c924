//! CPU and memory state.
use crate::{constants::*, error::*, stack::CallStack};

/// Core state for a chip8 interpreter.
pub struct Chip8Cpu {
    // ------------------------------------------------------------------------
    // Registers
    /// Program counter pointing to the current instruction in memory.
    pub(crate) pc: Address,
    /// General purpose registers for temporary values.
    ///
    /// Register 16 (VF) is used for either the carry flag, borrow switch or
    /// draw collision depending on opcode.
    pub(crate) registers: [u8; REGISTER_COUNT],
    /// Pointer register used for temporarily storing an address. Since addresses are 12 bits, only the
    /// lowest (rightmost) bits are used.
    pub(crate) address: Address,
    /// (DT) Delay timer that counts down to 0.
    pub(crate) delay_timer: u8,

    // ------------------------------------------------------------------------
    // Memory
    /// Main memory storage space.
    pub(crate) ram: Box<[u8; MEM_SIZE]>,
    /// Return addresses used for jumping back when a routine call finishes.
    pub(crate) stack: CallStack,
    /// Screen buffer that is drawn to.
    pub(crate) display: Box<DisplayBuffer>,
}

impl Default for Chip8Cpu {
    fn default() -> Self {
        Self {
            pc: MEM_START as Address,
            registers: [0; REGISTER_COUNT],
            address: 0,
            delay_timer: 0,

            ram: Box::new([0; MEM_SIZE]),
            stack: CallStack::default(),
            display: Box::new([PIXEL_OFF; DISPLAY_BUFFER_SIZE]),
        }
    }
}

impl Chip8Cpu {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn clear_display(&mut self) {
        self.display.fill(PIXEL_OFF);
    }

    /// Value of register `Vx`.
    #[inline(always)]
    pub fn register(&self, vx: u8) -> u8 {
        self.registers[vx as usize]
    }

    #[inline(always)]
    pub(crate) fn set_register(&mut self, vx: u8, value: u8) {
        self.registers[vx as usize] = value;
    }

    /// Set the flag register VF.
    #[inline(always)]
    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.registers[FLAG_REGISTER] = flag as u8;
    }

    /// Count down the delay timer, stopping at zero.
    #[inline]
    pub(crate) fn tick_delay(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
    }

    /// Extract the instruction at the current program counter.
    #[inline]
    pub fn instr(&self) -> Chip8Result<[u8; 2]> {
        let bytes = self.read(self.pc, INSTR_SIZE as usize)?;
        Ok([bytes[0], bytes[1]])
    }

    /// Borrow `len` bytes of memory starting at `address`.
    ///
    /// The whole range must lie within memory; nothing wraps around.
    pub fn read(&self, address: Address, len: usize) -> Chip8Result<&[u8]> {
        let start = address as usize;
        let end = start + len;
        // Reports the first byte that falls outside of memory.
        self.ram.get(start..end).ok_or(Chip8Error::MemoryOutOfBounds {
            address: start.max(MEM_SIZE),
        })
    }
}
