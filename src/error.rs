//! Error handling primitives for the MAX30003 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying bus exchange failed (timeout, bus fault, select pin fault).
    Transport(E),
    /// The transport or chip-select handle could not be brought to its idle state at setup.
    InvalidHandle,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Transport(err)
    }
}
