use crate::num::GetBit;
use bincode::{Decode, Encode};
use std::fmt::{Display, Formatter};

/// Determines how the B flag (bit 4) appears when the status register is read out as a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum StatusReadContext {
    /// Host/debugger view of the register: B as last stored
    Register,
    /// PHP and BRK push the status with B set
    PushStack,
    /// IRQ and NMI push the status with B clear
    HardwareInterruptHandler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct StatusFlags {
    pub negative: bool,
    pub overflow: bool,
    pub break_command: bool,
    pub decimal: bool,
    pub interrupt_disable: bool,
    pub zero: bool,
    pub carry: bool,
}

impl StatusFlags {
    pub const CARRY: u8 = 1 << 0;
    pub const ZERO: u8 = 1 << 1;
    pub const INTERRUPT_DISABLE: u8 = 1 << 2;
    pub const DECIMAL: u8 = 1 << 3;
    pub const BREAK: u8 = 1 << 4;
    pub const UNUSED: u8 = 1 << 5;
    pub const OVERFLOW: u8 = 1 << 6;
    pub const NEGATIVE: u8 = 1 << 7;

    #[must_use]
    pub fn new() -> Self {
        // I flag defaults to 1, others default to 0
        Self {
            negative: false,
            overflow: false,
            break_command: false,
            decimal: false,
            interrupt_disable: true,
            zero: false,
            carry: false,
        }
    }

    pub fn set_negative(&mut self, negative: bool) -> &mut Self {
        self.negative = negative;
        self
    }

    pub fn set_overflow(&mut self, overflow: bool) -> &mut Self {
        self.overflow = overflow;
        self
    }

    pub fn set_zero(&mut self, zero: bool) -> &mut Self {
        self.zero = zero;
        self
    }

    pub fn set_carry(&mut self, carry: bool) -> &mut Self {
        self.carry = carry;
        self
    }

    /// Set N and Z from a result value, as every load/transfer/ALU operation does.
    pub fn set_nz(&mut self, value: u8) -> &mut Self {
        self.set_negative(value.bit(7)).set_zero(value == 0)
    }

    #[must_use]
    pub fn to_byte(self, read_ctx: StatusReadContext) -> u8 {
        let flag = |set: bool, mask: u8| if set { mask } else { 0 };

        let b_flag = match read_ctx {
            StatusReadContext::Register => flag(self.break_command, Self::BREAK),
            StatusReadContext::PushStack => Self::BREAK,
            StatusReadContext::HardwareInterruptHandler => 0,
        };

        // Bit 5 is unused, always reads as 1
        Self::UNUSED
            | b_flag
            | flag(self.negative, Self::NEGATIVE)
            | flag(self.overflow, Self::OVERFLOW)
            | flag(self.decimal, Self::DECIMAL)
            | flag(self.interrupt_disable, Self::INTERRUPT_DISABLE)
            | flag(self.zero, Self::ZERO)
            | flag(self.carry, Self::CARRY)
    }

    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            negative: byte & Self::NEGATIVE != 0,
            overflow: byte & Self::OVERFLOW != 0,
            break_command: byte & Self::BREAK != 0,
            decimal: byte & Self::DECIMAL != 0,
            interrupt_disable: byte & Self::INTERRUPT_DISABLE != 0,
            zero: byte & Self::ZERO != 0,
            carry: byte & Self::CARRY != 0,
        }
    }

    /// Load flags pulled from the stack (PLP/RTI). The B bit only exists in pushed copies of the
    /// register, so the pulled value's bit 4 is discarded and the current B is kept.
    #[must_use]
    pub fn pulled_from_stack(self, byte: u8) -> Self {
        Self { break_command: self.break_command, ..Self::from_byte(byte) }
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let flags = [
            (self.negative, 'N'),
            (self.overflow, 'V'),
            (true, '-'),
            (self.break_command, 'B'),
            (self.decimal, 'D'),
            (self.interrupt_disable, 'I'),
            (self.zero, 'Z'),
            (self.carry, 'C'),
        ];
        for (set, letter) in flags {
            let letter = if set { letter } else { letter.to_ascii_lowercase() };
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct CpuRegisters {
    pub accumulator: u8,
    pub x: u8,
    pub y: u8,
    pub status: StatusFlags,
    pub pc: u16,
    pub sp: u8,
}

impl CpuRegisters {
    /// Register state at power-on and immediately after the reset sequence, minus the PC load.
    #[must_use]
    pub fn new() -> Self {
        Self { accumulator: 0, x: 0, y: 0, status: StatusFlags::new(), pc: 0, sp: 0xFF }
    }

    #[inline]
    #[must_use]
    pub fn stack_address(&self) -> u16 {
        u16::from_be_bytes([0x01, self.sp])
    }
}

impl Default for CpuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CpuRegisters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X} PC={:04X} {}",
            self.accumulator,
            self.x,
            self.y,
            self.status.to_byte(StatusReadContext::Register),
            self.sp,
            self.pc,
            self.status
        )
    }
}
