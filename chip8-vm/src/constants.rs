//! Constant values of the Chip-8 architecture.
use std::time::Duration;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 0x10; // 16

/// Register VF doubles as the carry, borrow and collision flag.
pub const FLAG_REGISTER: usize = 0xF;

/// The lower memory space was historically used for the interpreter itself.
/// Programs are loaded after it, and the program counter starts here.
pub const MEM_START: usize = 0x200; // 512
pub const MEM_SIZE: usize = 0x1000; // 4096

/// Largest program image that fits in memory after the load offset.
pub const PROGRAM_MAX_SIZE: usize = MEM_SIZE - MEM_START; // 3584

/// Levels of nesting allowed in the call stack.
pub const STACK_SIZE: usize = 0x10; // 16

/// Every instruction is two bytes, most significant byte first.
pub const INSTR_SIZE: u16 = 2;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_SIZE: [usize; 2] = [DISPLAY_WIDTH, DISPLAY_HEIGHT];
pub const DISPLAY_BUFFER_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Display cell values. A cell is either all bits set or none.
pub const PIXEL_ON: u8 = 0xFF;
pub const PIXEL_OFF: u8 = 0x00;

/// Time between two decrements of the delay timer.
pub const DELAY_INTERVAL: Duration = Duration::from_millis(16);

/// Type for storing the 12-bit memory addresses.
pub type Address = u16;

/// Byte-per-pixel display buffer, row-major.
pub type DisplayBuffer = [u8; DISPLAY_BUFFER_SIZE];
