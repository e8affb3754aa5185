use crate::addressing::Operand;
use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::num::GetBit;
use crate::registers::StatusFlags;

fn add(accumulator: u8, value: u8, flags: &mut StatusFlags) -> u8 {
    let existing_carry = flags.carry;

    let (result, carry1) = accumulator.overflowing_add(value);
    let (result, carry2) = result.overflowing_add(existing_carry.into());
    let new_carry = carry1 || carry2;

    let bit_6_carry = (accumulator & 0x7F) + (value & 0x7F) + u8::from(existing_carry) >= 0x80;
    let overflow = new_carry ^ bit_6_carry;

    flags
        .set_negative(result.bit(7))
        .set_overflow(overflow)
        .set_zero(result == 0)
        .set_carry(new_carry);

    result
}

// NMOS decimal add: Z comes from the binary sum, N and V from the sum after only the low digit
// has been adjusted, and C from the fully adjusted sum
fn add_decimal(accumulator: u8, value: u8, flags: &mut StatusFlags) -> u8 {
    let carry = u8::from(flags.carry);

    let mut low = (accumulator & 0x0F) + (value & 0x0F) + carry;
    if low > 0x09 {
        low = ((low + 0x06) & 0x0F) + 0x10;
    }

    let mut sum = u16::from(accumulator & 0xF0) + u16::from(value & 0xF0) + u16::from(low);
    let signed_sum = i16::from((accumulator & 0xF0) as i8)
        + i16::from((value & 0xF0) as i8)
        + i16::from(low);
    let negative = sum.bit(7);

    if sum >= 0xA0 {
        sum += 0x60;
    }

    flags
        .set_negative(negative)
        .set_overflow(!(-128..=127).contains(&signed_sum))
        .set_zero(accumulator.wrapping_add(value).wrapping_add(carry) == 0)
        .set_carry(sum >= 0x100);

    sum as u8
}

fn subtract(accumulator: u8, value: u8, flags: &mut StatusFlags) -> u8 {
    // Carry flag is inverted in subtraction
    let existing_borrow = u8::from(!flags.carry);

    let (result, borrowed1) = accumulator.overflowing_sub(value);
    let (result, borrowed2) = result.overflowing_sub(existing_borrow);
    let borrowed = borrowed1 || borrowed2;

    let bit_6_borrowed = accumulator & 0x7F < (value & 0x7F) + existing_borrow;
    let overflow = borrowed ^ bit_6_borrowed;

    flags
        .set_negative(result.bit(7))
        .set_overflow(overflow)
        .set_zero(result == 0)
        .set_carry(!borrowed);

    result
}

// NMOS decimal subtract: all flags match the binary subtraction
fn subtract_decimal(accumulator: u8, value: u8, flags: &mut StatusFlags) -> u8 {
    let borrow = i16::from(!flags.carry);
    subtract(accumulator, value, flags);

    let accumulator = i16::from(accumulator);
    let value = i16::from(value);

    let mut low = (accumulator & 0x0F) - (value & 0x0F) - borrow;
    if low < 0 {
        low = ((low - 0x06) & 0x0F) - 0x10;
    }

    let mut difference = (accumulator & 0xF0) - (value & 0xF0) + low;
    if difference < 0 {
        difference -= 0x60;
    }

    difference as u8
}

fn compare(register: u8, value: u8, flags: &mut StatusFlags) {
    flags
        .set_negative(register.wrapping_sub(value).bit(7))
        .set_zero(register == value)
        .set_carry(register >= value);
}

fn increment(value: u8, flags: &mut StatusFlags) -> u8 {
    let incremented = value.wrapping_add(1);
    flags.set_nz(incremented);
    incremented
}

fn decrement(value: u8, flags: &mut StatusFlags) -> u8 {
    let decremented = value.wrapping_sub(1);
    flags.set_nz(decremented);
    decremented
}

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    fn decimal_arithmetic(&self) -> bool {
        self.decimal_mode_supported && self.registers.status.decimal
    }

    pub(super) fn adc(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        let op = if self.decimal_arithmetic() { add_decimal } else { add };
        self.registers.accumulator =
            op(self.registers.accumulator, value, &mut self.registers.status);
        Ok(())
    }

    pub(super) fn sbc(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        let op = if self.decimal_arithmetic() { subtract_decimal } else { subtract };
        self.registers.accumulator =
            op(self.registers.accumulator, value, &mut self.registers.status);
        Ok(())
    }

    pub(super) fn cmp(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        compare(self.registers.accumulator, value, &mut self.registers.status);
        Ok(())
    }

    pub(super) fn cpx(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        compare(self.registers.x, value, &mut self.registers.status);
        Ok(())
    }

    pub(super) fn cpy(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        compare(self.registers.y, value, &mut self.registers.status);
        Ok(())
    }

    pub(super) fn inc(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, increment)
    }

    pub(super) fn dec(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.modify_operand(operand, decrement)
    }

    pub(super) fn inx(&mut self) {
        self.registers.x = increment(self.registers.x, &mut self.registers.status);
    }

    pub(super) fn iny(&mut self) {
        self.registers.y = increment(self.registers.y, &mut self.registers.status);
    }

    pub(super) fn dex(&mut self) {
        self.registers.x = decrement(self.registers.x, &mut self.registers.status);
    }

    pub(super) fn dey(&mut self) {
        self.registers.y = decrement(self.registers.y, &mut self.registers.status);
    }
}
