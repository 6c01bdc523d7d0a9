//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! Chip-select is owned by the `SpiDevice` implementation, which asserts it
//! for the duration of each transaction and releases it afterwards.

use embedded_hal::spi::SpiDevice;

use super::Max30003Interface;
use crate::frame::FRAME_LEN;

/// SPI-based interface implementation for the MAX30003 driver.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Max30003Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> core::result::Result<(), Self::Error> {
        self.spi.transfer(rx, tx)
    }

    fn transmit(&mut self, tx: &[u8; FRAME_LEN]) -> core::result::Result<(), Self::Error> {
        self.spi.write(tx)
    }
}
