use crate::addressing::Operand;
use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::num::GetBit;
use crate::registers::StatusFlags;

fn shift_left(value: u8, flags: &mut StatusFlags) -> u8 {
    let shifted = value << 1;
    flags.set_carry(value.bit(7)).set_nz(shifted);
    shifted
}

fn logical_shift_right(value: u8, flags: &mut StatusFlags) -> u8 {
    let shifted = value >> 1;
    flags.set_carry(value.bit(0)).set_nz(shifted);
    shifted
}

fn rotate_left(value: u8, flags: &mut StatusFlags) -> u8 {
    let rotated = (value << 1) | u8::from(flags.carry);
    flags.set_carry(value.bit(7)).set_nz(rotated);
    rotated
}

fn rotate_right(value: u8, flags: &mut StatusFlags) -> u8 {
    let rotated = (value >> 1) | (u8::from(flags.carry) << 7);
    flags.set_carry(value.bit(0)).set_nz(rotated);
    rotated
}

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    fn logical_op(&mut self, operand: Operand, op: fn(u8, u8) -> u8) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        let result = op(self.registers.accumulator, value);
        self.registers.accumulator = result;
        self.registers.status.set_nz(result);
        Ok(())
    }

    pub(super) fn and(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.logical_op(operand, |a, b| a & b)
    }

    pub(super) fn ora(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.logical_op(operand, |a, b| a | b)
    }

    pub(super) fn eor(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.logical_op(operand, |a, b| a ^ b)
    }

    pub(super) fn bit(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        self.registers
            .status
            .set_negative(value.bit(7))
            .set_overflow(value.bit(6))
            .set_zero(self.registers.accumulator & value == 0);
        Ok(())
    }

    pub(super) fn asl(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, shift_left)
    }

    pub(super) fn lsr(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, logical_shift_right)
    }

    pub(super) fn rol(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, rotate_left)
    }

    pub(super) fn ror(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, rotate_right)
    }
}
