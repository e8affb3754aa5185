//! Operand address resolution for the 13 addressing modes
//!
//! Resolution reads the operand bytes following the opcode, advances PC past them, and reports
//! whether indexing crossed a page. Nothing is stored in the CPU; the result lives only for the
//! current instruction.

use crate::bus::BusInterface;
use crate::num::U16Ext;
use crate::opcodes::AddressingMode;
use crate::registers::CpuRegisters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Operand is the accumulator (shift/rotate accumulator forms)
    Accumulator,
    /// No memory operand; reads as the accumulator for handlers that read uniformly
    Implied,
    /// Effective address of the operand in memory
    Address(u16),
    /// Branch displacement, sign-extended to 16 bits
    Relative(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOperand {
    pub operand: Operand,
    /// 1 if indexing carried into the high byte of the address (AbsoluteX/AbsoluteY/(zp),Y), else 0
    pub extra_cycles: u32,
}

impl ResolvedOperand {
    fn new(operand: Operand) -> Self {
        Self { operand, extra_cycles: 0 }
    }

    fn indexed(base: u16, address: u16) -> Self {
        Self { operand: Operand::Address(address), extra_cycles: base.crosses_page(address).into() }
    }
}

fn fetch_operand<B: BusInterface>(
    registers: &mut CpuRegisters,
    bus: &mut B,
) -> Result<u8, B::Error> {
    let operand = bus.read(registers.pc)?;
    registers.pc = registers.pc.wrapping_add(1);
    Ok(operand)
}

fn fetch_operand_u16<B: BusInterface>(
    registers: &mut CpuRegisters,
    bus: &mut B,
) -> Result<u16, B::Error> {
    let operand = bus.read_u16(registers.pc)?;
    registers.pc = registers.pc.wrapping_add(2);
    Ok(operand)
}

/// Read a 16-bit pointer from the zero page; the high byte wraps to $00 rather than carrying into
/// page 1.
fn read_zero_page_pointer<B: BusInterface>(bus: &mut B, address: u8) -> Result<u16, B::Error> {
    let lsb = bus.read(address.into())?;
    let msb = bus.read(address.wrapping_add(1).into())?;
    Ok(u16::from_le_bytes([lsb, msb]))
}

/// Compute the operand for `mode`, reading operand bytes at PC and advancing PC past them.
pub fn resolve<B: BusInterface>(
    mode: AddressingMode,
    registers: &mut CpuRegisters,
    bus: &mut B,
) -> Result<ResolvedOperand, B::Error> {
    let resolved = match mode {
        AddressingMode::Accumulator => ResolvedOperand::new(Operand::Accumulator),
        AddressingMode::Implied => ResolvedOperand::new(Operand::Implied),
        AddressingMode::Immediate => {
            let address = registers.pc;
            registers.pc = registers.pc.wrapping_add(1);
            ResolvedOperand::new(Operand::Address(address))
        }
        AddressingMode::Relative => {
            let offset = fetch_operand(registers, bus)? as i8;
            ResolvedOperand::new(Operand::Relative(i16::from(offset) as u16))
        }
        AddressingMode::Absolute => {
            let address = fetch_operand_u16(registers, bus)?;
            ResolvedOperand::new(Operand::Address(address))
        }
        AddressingMode::AbsoluteX => {
            let base = fetch_operand_u16(registers, bus)?;
            ResolvedOperand::indexed(base, base.wrapping_add(registers.x.into()))
        }
        AddressingMode::AbsoluteY => {
            let base = fetch_operand_u16(registers, bus)?;
            ResolvedOperand::indexed(base, base.wrapping_add(registers.y.into()))
        }
        AddressingMode::ZeroPage => {
            let address = fetch_operand(registers, bus)?;
            ResolvedOperand::new(Operand::Address(address.into()))
        }
        AddressingMode::ZeroPageX => {
            let address = fetch_operand(registers, bus)?.wrapping_add(registers.x);
            ResolvedOperand::new(Operand::Address(address.into()))
        }
        AddressingMode::ZeroPageY => {
            let address = fetch_operand(registers, bus)?.wrapping_add(registers.y);
            ResolvedOperand::new(Operand::Address(address.into()))
        }
        AddressingMode::IndexedIndirect => {
            let pointer = fetch_operand(registers, bus)?.wrapping_add(registers.x);
            let address = read_zero_page_pointer(bus, pointer)?;
            ResolvedOperand::new(Operand::Address(address))
        }
        AddressingMode::IndirectIndexed => {
            let pointer = fetch_operand(registers, bus)?;
            let base = read_zero_page_pointer(bus, pointer)?;
            ResolvedOperand::indexed(base, base.wrapping_add(registers.y.into()))
        }
        AddressingMode::Indirect => {
            let pointer = fetch_operand_u16(registers, bus)?;

            // The pointer's high byte is fetched without carrying out of the low byte, so a
            // pointer at $xxFF takes its high byte from $xx00
            let lsb = bus.read(pointer)?;
            let msb_address = u16::from_le_bytes([pointer.lsb().wrapping_add(1), pointer.msb()]);
            let msb = bus.read(msb_address)?;
            ResolvedOperand::new(Operand::Address(u16::from_le_bytes([lsb, msb])))
        }
    };

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusAccess, InMemoryBus};

    fn resolve_at(
        mode: AddressingMode,
        registers: &mut CpuRegisters,
        bus: &mut InMemoryBus,
    ) -> ResolvedOperand {
        bus.accesses.clear();
        resolve(mode, registers, bus).unwrap()
    }

    fn address_operand(address: u16, extra_cycles: u32) -> ResolvedOperand {
        ResolvedOperand { operand: Operand::Address(address), extra_cycles }
    }

    fn registers_at(pc: u16) -> CpuRegisters {
        CpuRegisters { pc, ..CpuRegisters::new() }
    }

    #[test]
    fn accumulator_and_implied_touch_nothing() {
        let mut bus = InMemoryBus::new();
        let mut registers = registers_at(0x0200);

        let resolved = resolve_at(AddressingMode::Accumulator, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Accumulator);
        let resolved = resolve_at(AddressingMode::Implied, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Implied);

        assert_eq!(registers.pc, 0x0200);
        assert!(bus.accesses.is_empty());
    }

    #[test]
    fn pc_advances_past_operand_bytes() {
        let mut bus = InMemoryBus::new();
        for mode in AddressingMode::ALL {
            let mut registers = registers_at(0x0200);
            resolve_at(mode, &mut registers, &mut bus);
            assert_eq!(registers.pc, 0x0200 + mode.operand_len(), "{mode}");
        }
    }

    #[test]
    fn immediate_points_at_pc() {
        let mut bus = InMemoryBus::new();
        let mut registers = registers_at(0x0200);

        let resolved = resolve_at(AddressingMode::Immediate, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Address(0x0200));
        assert_eq!(registers.pc, 0x0201);
        assert!(bus.accesses.is_empty());
    }

    #[test]
    fn relative_sign_extends() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xFE, 0x05]);
        let mut registers = registers_at(0x0200);

        let resolved = resolve_at(AddressingMode::Relative, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Relative(0xFFFE));
        let resolved = resolve_at(AddressingMode::Relative, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Relative(0x0005));
        assert_eq!(registers.pc, 0x0202);
    }

    #[test]
    fn absolute_reads_little_endian_operand() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0x34, 0x12]);
        let mut registers = registers_at(0x0200);

        let resolved = resolve_at(AddressingMode::Absolute, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x1234, 0));
        assert_eq!(registers.pc, 0x0202);
        assert_eq!(bus.accesses, vec![BusAccess::Read(0x0200), BusAccess::Read(0x0201)]);
    }

    #[test]
    fn absolute_indexed_page_cross() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xF0, 0x12, 0xF0, 0x12]);

        let mut registers = CpuRegisters { x: 0x0F, y: 0x10, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::AbsoluteX, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x12FF, 0));

        let resolved = resolve_at(AddressingMode::AbsoluteY, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x1300, 1));
        assert_eq!(registers.pc, 0x0204);
    }

    #[test]
    fn absolute_indexed_wraps_address_space() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xFF, 0xFF]);

        let mut registers = CpuRegisters { x: 0x02, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::AbsoluteX, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x0001, 1));
    }

    #[test]
    fn zero_page_indexed_wraps_without_penalty() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0x80, 0xF0, 0xF0]);

        let mut registers = CpuRegisters { x: 0x20, y: 0xFF, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::ZeroPage, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x0080, 0));

        let resolved = resolve_at(AddressingMode::ZeroPageX, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x0010, 0));

        let resolved = resolve_at(AddressingMode::ZeroPageY, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x00EF, 0));
        assert_eq!(registers.pc, 0x0203);
    }

    #[test]
    fn indexed_indirect_wraps_pointer_in_zero_page() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xFE]);
        bus.memory[0x00FF] = 0x34;
        bus.memory[0x0000] = 0x12;
        bus.memory[0x0100] = 0x56;

        let mut registers = CpuRegisters { x: 0x01, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::IndexedIndirect, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x1234, 0));
        assert_eq!(registers.pc, 0x0201);
        assert_eq!(
            bus.accesses,
            vec![BusAccess::Read(0x0200), BusAccess::Read(0x00FF), BusAccess::Read(0x0000)]
        );
    }

    #[test]
    fn indirect_indexed_page_cross() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0x40, 0x40]);
        bus.memory[0x0040] = 0x80;
        bus.memory[0x0041] = 0x12;

        let mut registers = CpuRegisters { y: 0x7F, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::IndirectIndexed, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x12FF, 0));

        registers.y = 0x80;
        let resolved = resolve_at(AddressingMode::IndirectIndexed, &mut registers, &mut bus);
        assert_eq!(resolved, address_operand(0x1300, 1));
    }

    #[test]
    fn indirect_indexed_pointer_wraps_in_zero_page() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xFF]);
        bus.memory[0x00FF] = 0x00;
        bus.memory[0x0000] = 0x30;

        let mut registers = CpuRegisters { y: 0x05, ..registers_at(0x0200) };
        let resolved = resolve_at(AddressingMode::IndirectIndexed, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Address(0x3005));
    }

    #[test]
    fn indirect_page_wrap_defect() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0xFF, 0x30]);
        bus.memory[0x30FF] = 0x80;
        bus.memory[0x3000] = 0x50;
        bus.memory[0x3100] = 0x40;

        let mut registers = registers_at(0x0200);
        let resolved = resolve_at(AddressingMode::Indirect, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Address(0x5080));
        assert_eq!(registers.pc, 0x0202);
    }

    #[test]
    fn indirect_without_wrap() {
        let mut bus = InMemoryBus::new();
        bus.load(0x0200, &[0x20, 0x30]);
        bus.memory[0x3020] = 0xCD;
        bus.memory[0x3021] = 0xAB;

        let mut registers = registers_at(0x0200);
        let resolved = resolve_at(AddressingMode::Indirect, &mut registers, &mut bus);
        assert_eq!(resolved.operand, Operand::Address(0xABCD));
    }
}
