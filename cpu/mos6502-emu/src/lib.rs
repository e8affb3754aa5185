//! Instruction-stepped MOS 6502 core
//!
//! Each call to [`Mos6502::step`] services a pending interrupt or executes exactly one documented
//! instruction, performing every bus access the instruction implies and returning the number of
//! cycles the instruction took on hardware.

pub mod addressing;
pub mod bus;
mod instructions;
mod num;
pub mod opcodes;
mod registers;


pub use instructions::{IRQ_VECTOR, InterruptKind, NMI_VECTOR, RESET_VECTOR};
pub use registers::{CpuRegisters, StatusFlags, StatusReadContext};

use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::opcodes::Opcode;
use bincode::{Decode, Encode};
use std::fmt::{Display, Formatter};
use thiserror::Error;

const INTERRUPT_CYCLES: u32 = 7;
const RESET_CYCLES: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum CpuVariant {
    /// Stock NMOS 6502 with binary-coded decimal arithmetic
    #[default]
    #[cfg_attr(feature = "clap", value(name = "nmos"))]
    Nmos6502,
    /// NES CPU: the D flag can be set and cleared but ADC/SBC ignore it
    #[cfg_attr(feature = "clap", value(name = "2a03"))]
    Ricoh2A03,
}

impl CpuVariant {
    #[must_use]
    pub fn supports_decimal_mode(self) -> bool {
        matches!(self, Self::Nmos6502)
    }
}

impl Display for CpuVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nmos6502 => write!(f, "NMOS 6502"),
            Self::Ricoh2A03 => write!(f, "Ricoh 2A03"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mos6502Config {
    pub variant: CpuVariant,
}

#[derive(Debug, Error)]
pub enum CpuError<E> {
    #[error("illegal opcode ${opcode:02X} at ${pc:04X}")]
    IllegalOpcode { opcode: u8, pc: u16 },
    #[error("bus error: {0}")]
    Bus(#[source] E),
}

impl<E> From<E> for CpuError<E> {
    fn from(value: E) -> Self {
        Self::Bus(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
struct HaltState {
    opcode: u8,
    pc: u16,
}

impl HaltState {
    fn error<E>(self) -> CpuError<E> {
        CpuError::IllegalOpcode { opcode: self.opcode, pc: self.pc }
    }
}

#[derive(Debug, Clone, Encode, Decode)]
pub struct Mos6502 {
    registers: CpuRegisters,
    config: Mos6502Config,
    halted: Option<HaltState>,
}

impl Mos6502 {
    /// Create a 6502 in its power-on register state. PC is 0 until [`reset`](Self::reset) loads
    /// it from the RESET vector.
    #[must_use]
    pub fn new(config: Mos6502Config) -> Self {
        Self { registers: CpuRegisters::new(), config, halted: None }
    }

    /// Run the reset sequence:
    /// * A, X, Y cleared, SP set to $FF
    /// * Status set to I=1 with every other flag cleared
    /// * PC loaded from the RESET vector at $FFFC
    /// * If the CPU was halted by an illegal opcode, un-halt it
    ///
    /// # Errors
    ///
    /// Returns [`CpuError::Bus`] if reading the vector fails, in which case the CPU state is left
    /// unchanged.
    pub fn reset<B: BusInterface>(&mut self, bus: &mut B) -> Result<u32, CpuError<B::Error>> {
        let reset_vector = bus.read_u16(RESET_VECTOR)?;

        self.registers = CpuRegisters { pc: reset_vector, ..CpuRegisters::new() };
        self.halted = None;

        log::debug!("Reset; PC loaded from vector: {reset_vector:04X}");

        Ok(RESET_CYCLES)
    }

    /// Service a pending NMI or unmasked IRQ, or execute one instruction if no interrupt is
    /// pending. Returns the number of cycles consumed.
    ///
    /// # Errors
    ///
    /// * [`CpuError::IllegalOpcode`] if the opcode at PC is not a documented instruction. The CPU
    ///   halts and every later step returns the same error until the next reset.
    /// * [`CpuError::Bus`] if any bus access fails. Registers are restored to their state before
    ///   the step; completed bus accesses are not undone.
    pub fn step<B: BusInterface>(&mut self, bus: &mut B) -> Result<u32, CpuError<B::Error>> {
        if let Some(halt_state) = self.halted {
            return Err(halt_state.error());
        }

        let registers = self.registers;
        let result = self.step_inner(bus);
        if result.is_err() {
            self.registers = registers;
        }

        result
    }

    fn step_inner<B: BusInterface>(&mut self, bus: &mut B) -> Result<u32, CpuError<B::Error>> {
        if let Some(interrupt) = self.pending_interrupt(bus) {
            self.executor(bus).interrupt_service_routine(interrupt)?;
            if interrupt == InterruptKind::Nmi {
                bus.acknowledge_nmi();
            }
            return Ok(INTERRUPT_CYCLES);
        }

        let pc = self.registers.pc;
        let opcode = bus.read(pc)?;
        let instruction = match opcodes::lookup(opcode) {
            Opcode::Documented(instruction) => instruction,
            Opcode::Illegal(opcode) => {
                log::error!("Illegal opcode {opcode:02X} at PC={pc:04X}; halting CPU");
                let halt_state = HaltState { opcode, pc };
                self.halted = Some(halt_state);
                return Err(halt_state.error());
            }
        };

        log::trace!("PC={pc:04X} opcode={opcode:02X} ({instruction}) {}", self.registers);

        self.registers.pc = pc.wrapping_add(1);

        let resolved = addressing::resolve(instruction.mode, &mut self.registers, bus)?;
        let page_cross_cycles =
            if instruction.mnemonic.pays_page_cross_penalty() { resolved.extra_cycles } else { 0 };

        let handler_cycles = self.executor(bus).execute(instruction.mnemonic, resolved.operand)?;

        Ok(u32::from(instruction.cycles) + page_cross_cycles + handler_cycles)
    }

    fn pending_interrupt<B: BusInterface>(&self, bus: &B) -> Option<InterruptKind> {
        if bus.nmi() {
            Some(InterruptKind::Nmi)
        } else if bus.irq() && !self.registers.status.interrupt_disable {
            Some(InterruptKind::Irq)
        } else {
            None
        }
    }

    fn executor<'a, B: BusInterface>(
        &'a mut self,
        bus: &'a mut B,
    ) -> InstructionExecutor<'a, 'a, B> {
        let decimal_mode_supported = self.config.variant.supports_decimal_mode();
        InstructionExecutor::new(&mut self.registers, bus, decimal_mode_supported)
    }

    #[must_use]
    pub fn registers(&self) -> &CpuRegisters {
        &self.registers
    }

    pub fn set_registers(&mut self, registers: CpuRegisters) {
        self.registers = registers;
    }

    #[inline]
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.registers.pc = pc;
    }

    #[must_use]
    pub fn accumulator(&self) -> u8 {
        self.registers.accumulator
    }

    pub fn set_accumulator(&mut self, value: u8) {
        self.registers.accumulator = value;
    }

    #[must_use]
    pub fn x(&self) -> u8 {
        self.registers.x
    }

    pub fn set_x(&mut self, value: u8) {
        self.registers.x = value;
    }

    #[must_use]
    pub fn y(&self) -> u8 {
        self.registers.y
    }

    pub fn set_y(&mut self, value: u8) {
        self.registers.y = value;
    }

    #[must_use]
    pub fn sp(&self) -> u8 {
        self.registers.sp
    }

    pub fn set_sp(&mut self, value: u8) {
        self.registers.sp = value;
    }

    /// The status register as a byte. Bit 5 always reads as 1 and bit 4 reports the stored B flag.
    #[must_use]
    pub fn status(&self) -> u8 {
        self.registers.status.to_byte(StatusReadContext::Register)
    }

    pub fn set_status(&mut self, status: u8) {
        self.registers.status = StatusFlags::from_byte(status);
    }

    #[must_use]
    pub fn flags(&self) -> StatusFlags {
        self.registers.status
    }

    #[must_use]
    pub fn config(&self) -> Mos6502Config {
        self.config
    }

    /// Whether an illegal opcode has halted the CPU. Only [`reset`](Self::reset) clears this.
    #[must_use]
    pub fn halted(&self) -> bool {
        self.halted.is_some()
    }
}

impl Display for Mos6502 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.registers)
    }
}
