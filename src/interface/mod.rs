//! Bus interface abstraction for the MAX30003 driver.

pub mod bus;
pub mod spi;

use crate::frame::FRAME_LEN;

/// Abstraction over the low-level frame exchange required by the driver.
///
/// Each call is one chip-select bracketed transfer of exactly [`FRAME_LEN`]
/// bytes. Implementations must release the select line before returning,
/// whether or not the transfer succeeded.
pub trait Max30003Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Full-duplex exchange of one frame.
    fn exchange(
        &mut self,
        tx: &[u8; FRAME_LEN],
        rx: &mut [u8; FRAME_LEN],
    ) -> core::result::Result<(), Self::Error>;

    /// Transmit-only transfer of one frame.
    fn transmit(&mut self, tx: &[u8; FRAME_LEN]) -> core::result::Result<(), Self::Error>;

    /// Puts the bus into its idle state (select deasserted).
    fn idle(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}
