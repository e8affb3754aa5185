use mos6502_emu::RESET_VECTOR;
use mos6502_emu::bus::BusInterface;
use std::convert::Infallible;

const RAM_LEN: usize = 64 * 1024;

/// Flat 64 KiB of RAM covering the whole address space, with no I/O and no interrupt sources.
pub struct MainBus {
    ram: Box<[u8; RAM_LEN]>,
}

impl MainBus {
    pub fn new() -> Self {
        Self { ram: Box::new([0; RAM_LEN]) }
    }

    pub fn reset(&mut self) {
        self.ram.fill(0);
    }

    /// Copy `data` into RAM starting at `address`. Fails if the image would run past $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) -> anyhow::Result<()> {
        let start = usize::from(address);
        let end = start + data.len();
        anyhow::ensure!(
            end <= RAM_LEN,
            "{} byte image does not fit at ${address:04X} (ends at ${end:X})",
            data.len()
        );

        self.ram[start..end].copy_from_slice(data);
        Ok(())
    }

    pub fn set_reset_vector(&mut self, reset_vector: u16) {
        let Ok(()) = self.write_u16(RESET_VECTOR, reset_vector);
    }
}

impl BusInterface for MainBus {
    type Error = Infallible;

    #[inline]
    fn read(&mut self, address: u16) -> Result<u8, Self::Error> {
        Ok(self.ram[usize::from(address)])
    }

    #[inline]
    fn write(&mut self, address: u16, value: u8) -> Result<(), Self::Error> {
        self.ram[usize::from(address)] = value;
        Ok(())
    }
}
