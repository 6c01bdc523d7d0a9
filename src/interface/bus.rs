//! SPI interface for a shared `SpiBus` with a driver-controlled chip-select pin.
//!
//! The select line is active low. It is asserted before each frame and
//! released after the bus has been flushed, and it is released even when the
//! transfer itself fails.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::Max30003Interface;
use crate::frame::FRAME_LEN;

/// Failure raised by [`SpiBusInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<SpiE, PinE> {
    /// The SPI transfer or flush failed.
    Spi(SpiE),
    /// The chip-select pin could not be driven.
    Select(PinE),
}

/// `SpiBus` + `OutputPin` interface implementation for the MAX30003 driver.
pub struct SpiBusInterface<BUS, CS> {
    bus: BUS,
    cs: CS,
}

impl<BUS, CS> SpiBusInterface<BUS, CS> {
    /// Creates a new interface from a bus and its chip-select pin.
    ///
    /// The pin is not touched here; call [`Max30003Interface::idle`] (or
    /// [`Max30003::init`](crate::Max30003::init)) to park it high.
    pub const fn new(bus: BUS, cs: CS) -> Self {
        Self { bus, cs }
    }

    /// Consumes the interface and returns the bus and the select pin.
    pub fn release(self) -> (BUS, CS) {
        (self.bus, self.cs)
    }
}

impl<BUS, CS> SpiBusInterface<BUS, CS>
where
    BUS: SpiBus,
    CS: OutputPin,
{
    fn selected<F>(&mut self, transfer: F) -> core::result::Result<(), BusError<BUS::Error, CS::Error>>
    where
        F: FnOnce(&mut BUS) -> core::result::Result<(), BUS::Error>,
    {
        self.cs.set_low().map_err(BusError::Select)?;
        let result = transfer(&mut self.bus).and_then(|()| self.bus.flush());
        let released = self.cs.set_high();

        result.map_err(BusError::Spi)?;
        released.map_err(BusError::Select)
    }
}

impl<BUS, CS> Max30003Interface for SpiBusInterface<BUS, CS>
where
    BUS: SpiBus,
    CS: OutputPin,
{
    type Error = BusError<BUS::Error, CS::Error>;

    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> core::result::Result<(), Self::Error> {
        self.selected(|bus| bus.transfer(rx, tx))
    }

    fn transmit(&mut self, tx: &[u8; FRAME_LEN]) -> core::result::Result<(), Self::Error> {
        self.selected(|bus| bus.write(tx))
    }

    fn idle(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_high().map_err(BusError::Select)
    }
}
