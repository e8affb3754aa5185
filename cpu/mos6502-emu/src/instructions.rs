mod arithmetic;
mod bits;
mod flags;
mod interrupts;
mod jump;
mod load;

pub use interrupts::{IRQ_VECTOR, InterruptKind, NMI_VECTOR, RESET_VECTOR};

use crate::addressing::Operand;
use crate::bus::BusInterface;
use crate::opcodes::Mnemonic;
use crate::registers::{CpuRegisters, StatusFlags};

pub(crate) struct InstructionExecutor<'registers, 'bus, B> {
    registers: &'registers mut CpuRegisters,
    bus: &'bus mut B,
    decimal_mode_supported: bool,
}

impl<'registers, 'bus, B: BusInterface> InstructionExecutor<'registers, 'bus, B> {
    pub(crate) fn new(
        registers: &'registers mut CpuRegisters,
        bus: &'bus mut B,
        decimal_mode_supported: bool,
    ) -> Self {
        Self { registers, bus, decimal_mode_supported }
    }

    fn read_operand(&mut self, operand: Operand) -> Result<u8, B::Error> {
        match operand {
            Operand::Accumulator | Operand::Implied => Ok(self.registers.accumulator),
            Operand::Address(address) => self.bus.read(address),
            Operand::Relative(_) => unreachable!("branch displacement is not a data operand"),
        }
    }

    fn write_operand(&mut self, operand: Operand, value: u8) -> Result<(), B::Error> {
        match operand {
            Operand::Accumulator => {
                self.registers.accumulator = value;
                Ok(())
            }
            Operand::Address(address) => self.bus.write(address, value),
            Operand::Implied | Operand::Relative(_) => {
                unreachable!("instructions that write memory never decode as {operand:?}")
            }
        }
    }

    /// Read-modify-write: exactly one read of the operand followed by one write of the result.
    fn modify_operand(
        &mut self,
        operand: Operand,
        op: impl FnOnce(u8, &mut StatusFlags) -> u8,
    ) -> Result<(), B::Error> {
        let value = self.read_operand(operand)?;
        let modified = op(value, &mut self.registers.status);
        self.write_operand(operand, modified)
    }

    fn push_stack(&mut self, value: u8) -> Result<(), B::Error> {
        self.bus.write(self.registers.stack_address(), value)?;
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        Ok(())
    }

    fn pull_stack(&mut self) -> Result<u8, B::Error> {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        self.bus.read(self.registers.stack_address())
    }

    fn push_pc(&mut self, pc: u16) -> Result<(), B::Error> {
        let [lsb, msb] = pc.to_le_bytes();
        self.push_stack(msb)?;
        self.push_stack(lsb)
    }

    fn pull_pc(&mut self) -> Result<u16, B::Error> {
        let lsb = self.pull_stack()?;
        let msb = self.pull_stack()?;
        Ok(u16::from_le_bytes([lsb, msb]))
    }

    /// Execute one decoded instruction whose operand has already been resolved. Returns any
    /// handler-specific extra cycles (only taken branches have them).
    pub(crate) fn execute(
        &mut self,
        mnemonic: Mnemonic,
        operand: Operand,
    ) -> Result<u32, B::Error> {
        let status = self.registers.status;

        match mnemonic {
            Mnemonic::Bcc => return Ok(self.branch(!status.carry, operand)),
            Mnemonic::Bcs => return Ok(self.branch(status.carry, operand)),
            Mnemonic::Beq => return Ok(self.branch(status.zero, operand)),
            Mnemonic::Bmi => return Ok(self.branch(status.negative, operand)),
            Mnemonic::Bne => return Ok(self.branch(!status.zero, operand)),
            Mnemonic::Bpl => return Ok(self.branch(!status.negative, operand)),
            Mnemonic::Bvc => return Ok(self.branch(!status.overflow, operand)),
            Mnemonic::Bvs => return Ok(self.branch(status.overflow, operand)),

            Mnemonic::Adc => self.adc(operand)?,
            Mnemonic::Sbc => self.sbc(operand)?,
            Mnemonic::Cmp => self.cmp(operand)?,
            Mnemonic::Cpx => self.cpx(operand)?,
            Mnemonic::Cpy => self.cpy(operand)?,
            Mnemonic::Inc => self.inc(operand)?,
            Mnemonic::Dec => self.dec(operand)?,
            Mnemonic::Inx => self.inx(),
            Mnemonic::Iny => self.iny(),
            Mnemonic::Dex => self.dex(),
            Mnemonic::Dey => self.dey(),

            Mnemonic::And => self.and(operand)?,
            Mnemonic::Ora => self.ora(operand)?,
            Mnemonic::Eor => self.eor(operand)?,
            Mnemonic::Bit => self.bit(operand)?,
            Mnemonic::Asl => self.asl(operand)?,
            Mnemonic::Lsr => self.lsr(operand)?,
            Mnemonic::Rol => self.rol(operand)?,
            Mnemonic::Ror => self.ror(operand)?,

            Mnemonic::Lda => self.lda(operand)?,
            Mnemonic::Ldx => self.ldx(operand)?,
            Mnemonic::Ldy => self.ldy(operand)?,
            Mnemonic::Sta => self.sta(operand)?,
            Mnemonic::Stx => self.stx(operand)?,
            Mnemonic::Sty => self.sty(operand)?,
            Mnemonic::Tax => self.tax(),
            Mnemonic::Tay => self.tay(),
            Mnemonic::Tsx => self.tsx(),
            Mnemonic::Txa => self.txa(),
            Mnemonic::Txs => self.txs(),
            Mnemonic::Tya => self.tya(),
            Mnemonic::Pha => self.pha()?,
            Mnemonic::Php => self.php()?,
            Mnemonic::Pla => self.pla()?,
            Mnemonic::Plp => self.plp()?,

            Mnemonic::Jmp => self.jmp(operand),
            Mnemonic::Jsr => self.jsr(operand)?,
            Mnemonic::Rts => self.rts()?,
            Mnemonic::Brk => self.brk()?,
            Mnemonic::Rti => self.rti()?,

            Mnemonic::Clc => self.clc(),
            Mnemonic::Cld => self.cld(),
            Mnemonic::Cli => self.cli(),
            Mnemonic::Clv => self.clv(),
            Mnemonic::Sec => self.sec(),
            Mnemonic::Sed => self.sed(),
            Mnemonic::Sei => self.sei(),

            Mnemonic::Nop => {}
        }

        Ok(0)
    }
}
