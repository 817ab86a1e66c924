//! Virtual machine.
use std::{
    fmt::Write,
    time::{Duration, Instant},
};

use log::{debug, warn};
use rand::prelude::*;

use crate::{
    clock::Clock,
    constants::*,
    cpu::Chip8Cpu,
    error::{Chip8Error, Chip8Result},
    opcode::{Instr, Op},
};

pub struct Chip8Vm {
    cpu: Chip8Cpu,
    /// Paces the delay timer countdown.
    timer: Clock,
    rng: StdRng,
    conf: Chip8Conf,
}

impl Chip8Vm {
    pub fn new(conf: Chip8Conf) -> Self {
        Self::new_at(conf, Instant::now())
    }

    /// Create a VM whose delay timer clock starts at `origin`.
    ///
    /// Hosts driving the VM with simulated time through [`Chip8Vm::step_at`]
    /// should pass their own starting instant here.
    pub fn new_at(conf: Chip8Conf, origin: Instant) -> Self {
        let rng = match conf.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Chip8Vm {
            cpu: Chip8Cpu::new(),
            timer: Clock::new(conf.delay_interval.unwrap_or(DELAY_INTERVAL), origin),
            rng,
            conf,
        }
    }

    /// Configuration that was used to instantiate the VM.
    pub fn config(&self) -> &Chip8Conf {
        &self.conf
    }

    /// Load a program image into memory at [`MEM_START`].
    ///
    /// The machine is reset first, so nothing of a previous program remains.
    /// Images larger than [`PROGRAM_MAX_SIZE`] are truncated with a warning.
    ///
    /// Returns the number of bytes copied into memory.
    pub fn load_bytecode(&mut self, bytecode: &[u8]) -> usize {
        if bytecode.len() > PROGRAM_MAX_SIZE {
            warn!(
                "program size {} exceeds max size {}, excess bytes are dropped",
                bytecode.len(),
                PROGRAM_MAX_SIZE
            );
        }

        let len = bytecode.len().min(PROGRAM_MAX_SIZE);

        // Start with clean state to avoid leaking the previous program.
        self.cpu = Chip8Cpu::new();
        self.cpu.ram[MEM_START..MEM_START + len].copy_from_slice(&bytecode[..len]);

        debug!("loaded {len} bytes at 0x{MEM_START:04X}");

        len
    }

    /// Read-only view of the display for the presentation layer.
    pub fn display_buffer(&self) -> &DisplayBuffer {
        &self.cpu.display
    }

    pub fn cpu(&self) -> &Chip8Cpu {
        &self.cpu
    }

    pub fn pc(&self) -> Address {
        self.cpu.pc
    }

    /// Value of general purpose register `Vx`.
    ///
    /// # Panics
    ///
    /// When `vx` is not a register index between 0x0 and 0xF.
    pub fn register(&self, vx: u8) -> u8 {
        self.cpu.register(vx)
    }

    /// Value of the address register `I`.
    pub fn address(&self) -> Address {
        self.cpu.address
    }

    pub fn delay_timer(&self) -> u8 {
        self.cpu.delay_timer
    }

    /// Number of return addresses on the call stack.
    pub fn stack_depth(&self) -> usize {
        self.cpu.stack.depth()
    }
}

/// Outcome of a single step, for the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Ok,
    /// Program counter has jumped to a new address.
    ///
    /// This is useful for the caller to avoid being
    /// blocked on infinite or long running loops.
    ///
    /// This is returned when the interpreter encounters:
    ///
    /// - 1nnn (`JP addr`)
    /// - 2nnn (`CALL addr`)
    /// - 00EE (`RET`)
    Jump,
    /// The display buffer was changed by `CLS` or `DRW`.
    Draw,
    /// The instruction is not supported and was skipped.
    Unknown(u16),
}

/// VM Configuration Parameters.
#[derive(Debug, Default, Clone)]
pub struct Chip8Conf {
    /// Time between delay timer decrements. Defaults to [`DELAY_INTERVAL`].
    pub delay_interval: Option<Duration>,
    /// Seed for the `RND` instruction. Seeded from entropy when not set.
    pub rng_seed: Option<u64>,
}

/// Interpreter
impl Chip8Vm {
    /// Execute the instruction at the program counter.
    pub fn step(&mut self) -> Chip8Result<Flow> {
        self.step_at(Instant::now())
    }

    /// Execute the instruction at the program counter, with `now` as the
    /// current reading of the monotonic clock.
    ///
    /// The delay clock only moves when the timer decrements. A timer set
    /// after a long idle period therefore counts down on the very next
    /// step, and then once per interval.
    ///
    /// Fatal errors leave the program counter on the offending instruction.
    pub fn step_at(&mut self, now: Instant) -> Chip8Result<Flow> {
        // Count down the delay timer. The clock only records the
        // tick when the timer actually decrements.
        if self.cpu.delay_timer > 0 && self.timer.tick(now) {
            self.cpu.tick_delay();
        }

        let instr = Instr::new(self.cpu.pc, self.cpu.instr()?);
        op_trace(&instr);

        let next_pc = self.execute(&instr)?;
        self.cpu.pc = next_pc.unwrap_or(instr.addr + INSTR_SIZE);

        let flow = match instr.op {
            Op::Jump { .. } | Op::Call { .. } | Op::Return => Flow::Jump,
            Op::ClearScreen | Op::Draw { .. } => Flow::Draw,
            Op::Unknown => Flow::Unknown(instr.bytecode()),
            _ => Flow::Ok,
        };

        Ok(flow)
    }

    /// Execute up to `step_count` instructions, stopping at the first error.
    pub fn run_steps(&mut self, step_count: usize) -> Chip8Result<()> {
        for _ in 0..step_count {
            self.step()?;
        }

        Ok(())
    }

    /// Apply the effect of a single instruction.
    ///
    /// Returns the explicit next program counter, or `None` to advance
    /// to the following instruction.
    fn execute(&mut self, instr: &Instr) -> Chip8Result<Option<Address>> {
        let pc = instr.addr;

        let next_pc = match instr.op {
            // 00E0 (CLS)
            //
            // Clear display
            Op::ClearScreen => {
                self.cpu.clear_display();
                None
            }
            // 00EE (RET)
            //
            // Return from a subroutine.
            // Set the program counter to the address at the top of the stack.
            Op::Return => {
                let address = self
                    .cpu
                    .stack
                    .pop()
                    .ok_or(Chip8Error::StackUnderflow { pc })?;
                Some(address)
            }
            // 1nnn (JP addr)
            //
            // Jump to address.
            Op::Jump { address } => Some(address),
            // 2nnn (CALL addr)
            //
            // Call subroutine at NNN.
            // The address of the next instruction is the return address.
            Op::Call { address } => {
                self.cpu
                    .stack
                    .push(pc + INSTR_SIZE)
                    .ok_or(Chip8Error::StackOverflow { pc })?;
                Some(address)
            }
            // 3xnn (SE Vx, byte)
            //
            // Skip the next instruction if register VX equals value NN.
            Op::Skip_Eq_Byte { vx, nn } => skip_if(pc, self.cpu.register(vx) == nn),
            // 4xnn (SNE Vx, byte)
            //
            // Skip the next instruction if register VX does not equal value NN.
            Op::Skip_NotEq_Byte { vx, nn } => skip_if(pc, self.cpu.register(vx) != nn),
            // 6xnn (LD Vx, byte)
            //
            // Set register VX to value NN.
            Op::Load_Byte { vx, nn } => {
                self.cpu.set_register(vx, nn);
                None
            }
            // 7xnn (ADD Vx, byte)
            //
            // Add value NN to register VX. Carry flag is not set.
            Op::Add_Byte { vx, nn } => {
                let x = self.cpu.register(vx);
                self.cpu.set_register(vx, x.wrapping_add(nn));
                None
            }
            // Arithmetic instructions
            Op::Load_Vx_Vy { .. }
            | Op::Or_Vx_Vy { .. }
            | Op::And_Vx_Vy { .. }
            | Op::Xor_Vx_Vy { .. }
            | Op::Add_Vx_Vy { .. }
            | Op::Sub_Vx_Vy { .. }
            | Op::ShiftRight { .. }
            | Op::SubReverse_Vx_Vy { .. }
            | Op::ShiftLeft { .. } => {
                self.exec_math(instr.op);
                None
            }
            // Annn (LD I, addr)
            //
            // Set address register I to value NNN.
            Op::Load_Address { address } => {
                self.cpu.address = address;
                None
            }
            // Cxnn (RND Vx, byte)
            //
            // Generate random number.
            // Set register VX to the result of bitwise AND between a random number and NN.
            Op::Random { vx, nn } => {
                self.cpu.set_register(vx, nn & self.rng.gen::<u8>());
                None
            }
            Op::Draw { vx, vy, n } => {
                self.exec_draw(vx, vy, n)?;
                None
            }
            // Fx07 (LD Vx, DT)
            //
            // Set Vx = delay timer value.
            Op::Load_Vx_Delay { vx } => {
                self.cpu.set_register(vx, self.cpu.delay_timer);
                None
            }
            // Fx15 (LD DT, Vx)
            //
            // Set delay timer = Vx.
            Op::Load_Delay_Vx { vx } => {
                self.cpu.delay_timer = self.cpu.register(vx);
                None
            }
            // Unsupported operation.
            Op::Unknown => {
                warn!(
                    "unknown instruction 0x{:04X} at 0x{:04X}",
                    instr.bytecode(),
                    pc
                );
                None
            }
        };

        Ok(next_pc)
    }

    /// Execute an arithmetic instruction.
    ///
    /// Flags are computed from the operands before anything is written,
    /// and the result is written after VF. When Vx is VF the result wins.
    #[inline]
    fn exec_math(&mut self, op: Op) {
        match op {
            // 8xy0 (LD Vx, Vy)
            //
            // Store the value of register VY in register VX.
            Op::Load_Vx_Vy { vx, vy } => {
                self.cpu.set_register(vx, self.cpu.register(vy));
            }
            // 8xy1 (OR Vx, Vy)
            Op::Or_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                self.cpu.set_register(vx, x | y);
            }
            // 8xy2 (AND Vx, Vy)
            Op::And_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                self.cpu.set_register(vx, x & y);
            }
            // 8xy3 (XOR Vx, Vy)
            Op::Xor_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                self.cpu.set_register(vx, x ^ y);
            }
            // 8xy4 (ADD Vx, Vy)
            //
            // If the sum overflows 8 bits, set VF to 1, else 0.
            Op::Add_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                let (result, carry) = x.overflowing_add(y);
                self.cpu.set_flag(carry);
                self.cpu.set_register(vx, result);
            }
            // 8xy5 (SUB Vx, Vy)
            //
            // VF is set to 1 when VX is strictly greater than VY.
            Op::Sub_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                self.cpu.set_flag(x > y);
                self.cpu.set_register(vx, x.wrapping_sub(y));
            }
            // 8xy6 (SHR Vx)
            Op::ShiftRight { vx } => {
                let x = self.cpu.register(vx);
                self.cpu.set_flag(x & 1 == 1);
                self.cpu.set_register(vx, x >> 1);
            }
            // 8xy7 (SUBN Vx, Vy)
            //
            // VF is set to 1 when VY is strictly greater than VX.
            Op::SubReverse_Vx_Vy { vx, vy } => {
                let (x, y) = (self.cpu.register(vx), self.cpu.register(vy));
                self.cpu.set_flag(y > x);
                self.cpu.set_register(vx, y.wrapping_sub(x));
            }
            // 8xyE (SHL Vx)
            Op::ShiftLeft { vx } => {
                let x = self.cpu.register(vx);
                self.cpu.set_flag(x & 0x80 != 0);
                self.cpu.set_register(vx, x << 1);
            }
            _ => unreachable!("not an arithmetic instruction: {op:?}"),
        }
    }

    /// Dxyn (DRW Vx, Vy, nibble)
    ///
    /// Draw sprite to the display buffer, at coordinate as per registers Vx and Vy.
    /// Sprite is encoded as 8 pixels wide, N pixels high, stored in bits located in
    /// memory pointed to by address register I.
    ///
    /// If the sprite is drawn outside of the display area, it is wrapped around to the other side.
    ///
    /// If the drawing operation erases existing pixels in the display buffer, register VF is set to
    /// 1, and set to 0 if no display bits are unset. This is used for collision detection.
    fn exec_draw(&mut self, vx: u8, vy: u8, n: u8) -> Chip8Result<()> {
        let (x, y) = (
            self.cpu.register(vx) as usize,
            self.cpu.register(vy) as usize,
        );

        // The whole sprite must be readable before the display is touched.
        let mut sprite = [0u8; 0x10];
        let rows = &mut sprite[..n as usize];
        rows.copy_from_slice(self.cpu.read(self.cpu.address, n as usize)?);

        let mut is_erased = false;

        for (r, row) in rows.iter().enumerate() {
            // Each row is 8 bits representing the 8 pixels of the sprite.
            for c in 0..8 {
                if (row >> (7 - c)) & 1 == 0 {
                    continue;
                }

                let d = (x + c) % DISPLAY_WIDTH + ((y + r) % DISPLAY_HEIGHT) * DISPLAY_WIDTH;
                let old_px = self.cpu.display[d];

                // XOR erases a pixel that was already on.
                is_erased |= old_px == PIXEL_ON;

                self.cpu.display[d] = old_px ^ PIXEL_ON;
            }
        }

        // If a pixel was erased, then a collision occurred.
        self.cpu.set_flag(is_erased);

        Ok(())
    }
}

/// Skip the next instruction when the condition holds.
#[inline(always)]
fn skip_if(pc: Address, condition: bool) -> Option<Address> {
    condition.then(|| pc + INSTR_SIZE * 2)
}

/// Troubleshooting
impl Chip8Vm {
    /// Returns the contents of program memory as a human readable string.
    pub fn dump_ram(&self, count: usize) -> Result<String, std::fmt::Error> {
        let end = MEM_START.saturating_add(count).min(MEM_SIZE);
        let mut buf = String::new();

        for (i, instr) in self.cpu.ram[MEM_START..end].chunks(2).enumerate() {
            let offset = MEM_START + i * 2;
            match instr {
                [a, b] => writeln!(buf, "{offset:04X}: {a:02X}{b:02X}")?,
                [a] => writeln!(buf, "{offset:04X}: {a:02X}")?,
                _ => {}
            }
        }

        Ok(buf)
    }

    pub fn dump_display(&self) -> Result<String, std::fmt::Error> {
        let mut buf = String::new();

        for row in self.cpu.display.chunks(DISPLAY_WIDTH) {
            for px in row {
                if *px != PIXEL_OFF {
                    write!(buf, "#")?;
                } else {
                    write!(buf, ".")?;
                }
            }
            writeln!(buf)?;
        }

        Ok(buf)
    }
}

#[cfg(feature = "op_trace")]
#[inline]
fn op_trace(instr: &Instr) {
    log::trace!("{:04X}: {:04X} {}", instr.addr, instr.bytecode(), instr);
}

#[cfg(not(feature = "op_trace"))]
#[inline]
fn op_trace(_: &Instr) {}
