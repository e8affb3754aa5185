use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::registers::StatusReadContext;
use std::fmt::{Display, Formatter};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Hardware interrupt sources. BRK shares the IRQ vector but is handled as an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    Nmi,
    Irq,
}

impl InterruptKind {
    #[must_use]
    pub fn vector(self) -> u16 {
        match self {
            Self::Nmi => NMI_VECTOR,
            Self::Irq => IRQ_VECTOR,
        }
    }
}

impl Display for InterruptKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nmi => write!(f, "NMI"),
            Self::Irq => write!(f, "IRQ"),
        }
    }
}

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    fn enter_handler(
        &mut self,
        return_address: u16,
        read_ctx: StatusReadContext,
        vector: u16,
    ) -> Result<(), B::Error> {
        self.push_pc(return_address)?;
        self.push_stack(self.registers.status.to_byte(read_ctx))?;
        self.registers.status.interrupt_disable = true;
        self.registers.pc = self.bus.read_u16(vector)?;
        Ok(())
    }

    pub(crate) fn interrupt_service_routine(
        &mut self,
        kind: InterruptKind,
    ) -> Result<(), B::Error> {
        log::trace!("Handling {kind} at PC={:04X}", self.registers.pc);

        self.enter_handler(
            self.registers.pc,
            StatusReadContext::HardwareInterruptHandler,
            kind.vector(),
        )
    }

    // The byte following BRK is padding; the pushed return address skips over it
    pub(super) fn brk(&mut self) -> Result<(), B::Error> {
        self.enter_handler(
            self.registers.pc.wrapping_add(1),
            StatusReadContext::PushStack,
            IRQ_VECTOR,
        )
    }

    pub(super) fn rti(&mut self) -> Result<(), B::Error> {
        let status = self.pull_stack()?;
        self.registers.status = self.registers.status.pulled_from_stack(status);
        self.registers.pc = self.pull_pc()?;
        Ok(())
    }
}
