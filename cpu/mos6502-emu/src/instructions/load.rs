use crate::addressing::Operand;
use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::registers::StatusReadContext;

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    pub(super) fn lda(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        self.registers.accumulator = value;
        self.registers.status.set_nz(value);
        Ok(())
    }

    pub(super) fn ldx(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        self.registers.x = value;
        self.registers.status.set_nz(value);
        Ok(())
    }

    pub(super) fn ldy(&mut self, operand: Operand) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        self.registers.y = value;
        self.registers.status.set_nz(value);
        Ok(())
    }

    pub(super) fn sta(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.write_operand(operand, self.registers.accumulator)
    }

    pub(super) fn stx(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.write_operand(operand, self.registers.x)
    }

    pub(super) fn sty(&mut self, operand: Operand) -> Result<(), B::Error> {
        self.write_operand(operand, self.registers.y)
    }

    pub(super) fn tax(&mut self) {
        self.registers.x = self.registers.accumulator;
        self.registers.status.set_nz(self.registers.x);
    }

    pub(super) fn tay(&mut self) {
        self.registers.y = self.registers.accumulator;
        self.registers.status.set_nz(self.registers.y);
    }

    pub(super) fn tsx(&mut self) {
        self.registers.x = self.registers.sp;
        self.registers.status.set_nz(self.registers.x);
    }

    pub(super) fn txa(&mut self) {
        self.registers.accumulator = self.registers.x;
        self.registers.status.set_nz(self.registers.accumulator);
    }

    // TXS is the only transfer that does not touch N/Z
    pub(super) fn txs(&mut self) {
        self.registers.sp = self.registers.x;
    }

    pub(super) fn tya(&mut self) {
        self.registers.accumulator = self.registers.y;
        self.registers.status.set_nz(self.registers.accumulator);
    }

    pub(super) fn pha(&mut self) -> Result<(), B::Error> {
        self.push_stack(self.registers.accumulator)
    }

    pub(super) fn php(&mut self) -> Result<(), B::Error> {
        self.push_stack(self.registers.status.to_byte(StatusReadContext::PushStack))
    }

    pub(super) fn pla(&mut self) -> Result<(), B::Error> {
        let value = self.pull_stack()?;
        self.registers.accumulator = value;
        self.registers.status.set_nz(value);
        Ok(())
    }

    pub(super) fn plp(&mut self) -> Result<(), B::Error> {
        let value = self.pull_stack()?;
        self.registers.status = self.registers.status.pulled_from_stack(value);
        Ok(())
    }
}
