use crate::addressing::Operand;
use crate::bus::BusInterface;
use crate::instructions::InstructionExecutor;
use crate::num::U16Ext;

fn jump_target(operand: Operand) -> u16 {
    match operand {
        Operand::Address(address) => address,
        _ => unreachable!("jump instructions always decode to an address operand, was {operand:?}"),
    }
}

impl<B: BusInterface> InstructionExecutor<'_, '_, B> {
    /// Returns the extra cycles for the branch: 0 if not taken, 1 if taken within the same page,
    /// 2 if taken to a different page than the following instruction.
    pub(super) fn branch(&mut self, condition: bool, operand: Operand) -> u32 {
        let Operand::Relative(offset) = operand else {
            unreachable!(
                "branch instructions always decode with relative addressing, was {operand:?}"
            )
        };

        if !condition {
            return 0;
        }

        let pc = self.registers.pc;
        let target = pc.wrapping_add(offset);
        self.registers.pc = target;

        1 + u32::from(pc.crosses_page(target))
    }

    pub(super) fn jmp(&mut self, operand: Operand) {
        self.registers.pc = jump_target(operand);
    }

    // JSR pushes the address of its own last byte; RTS adds 1 after pulling
    pub(super) fn jsr(&mut self, operand: Operand) -> Result<(), B::Error> {
        let target = jump_target(operand);
        self.push_pc(self.registers.pc.wrapping_sub(1))?;
        self.registers.pc = target;
        Ok(())
    }

    pub(super) fn rts(&mut self) -> Result<(), B::Error> {
        let return_address = self.pull_pc()?;
        self.registers.pc = return_address.wrapping_add(1);
        Ok(())
    }
}
