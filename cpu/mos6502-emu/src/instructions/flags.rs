use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    pub(super) fn clc(&mut self) {
        self.registers.status.carry = false;
    }

    pub(super) fn cld(&mut self) {
        self.registers.status.decimal = false;
    }

    pub(super) fn cli(&mut self) {
        self.registers.status.interrupt_disable = false;
    }

    pub(super) fn clv(&mut self) {
        self.registers.status.overflow = false;
    }

    pub(super) fn sec(&mut self) {
        self.registers.status.carry = true;
    }

    pub(super) fn sed(&mut self) {
        self.registers.status.decimal = true;
    }

    pub(super) fn sei(&mut self) {
        self.registers.status.interrupt_disable = true;
    }
}
