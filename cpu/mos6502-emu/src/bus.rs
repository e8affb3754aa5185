//! 6502 bus interface
//!
//! The CPU performs every memory access through this trait, in program order and exactly once per
//! access implied by the instruction. Implementations own the memory map and any side effects of
//! an access (e.g. a read that acknowledges a peripheral interrupt).

use std::error::Error;

pub trait BusInterface {
    /// Access fault reported by the bus. The CPU aborts the in-flight step and returns this error
    /// unmodified. Buses that cannot fail should use [`std::convert::Infallible`].
    type Error: Error + 'static;

    fn read(&mut self, address: u16) -> Result<u8, Self::Error>;

    fn write(&mut self, address: u16, value: u8) -> Result<(), Self::Error>;

    /// Little-endian read: low byte from `address`, then high byte from `address + 1`.
    fn read_u16(&mut self, address: u16) -> Result<u16, Self::Error> {
        let lsb = self.read(address)?;
        let msb = self.read(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lsb, msb]))
    }

    /// Little-endian write: high byte to `address + 1`, then low byte to `address`.
    fn write_u16(&mut self, address: u16, value: u16) -> Result<(), Self::Error> {
        let [lsb, msb] = value.to_le_bytes();
        self.write(address.wrapping_add(1), msb)?;
        self.write(address, lsb)
    }

    /// Whether an NMI is pending. NMI is edge-triggered, so the bus should latch the edge and keep
    /// reporting it until [`acknowledge_nmi`](Self::acknowledge_nmi) is called.
    fn nmi(&self) -> bool {
        false
    }

    fn acknowledge_nmi(&mut self) {}

    /// Current level of the IRQ line. IRQ is level-sensitive; while the I flag is set, an asserted
    /// line is simply not serviced until the flag is cleared.
    fn irq(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) use test_bus::{BusAccess, BusFault, InMemoryBus};
