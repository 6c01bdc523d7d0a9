//! High-level MAX30003 device driver implementation.

use crate::config::{apply_writes, ConfigProfile, RegisterWrite};
use crate::error::{Error, Result};
use crate::fifo::{read_fifo_samples, read_fifo_words, EcgSample};
use crate::frame::{decode_read_frame, encode_read_frame, encode_write_frame, FRAME_LEN};
use crate::interface::bus::SpiBusInterface;
use crate::interface::spi::SpiInterface;
use crate::interface::Max30003Interface;
use crate::interrupt::{DispatchReport, Interrupt, InterruptFlags};
use crate::registers::{
    rtor_interval, Register, Status, COMMAND_PAYLOAD, FIFO_DEPTH, REG_EN_INT, REG_FIFO_RST,
    REG_INFO, REG_RTOR, REG_STATUS, REG_SW_RST, REG_SYNCH,
};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{SpiBus, SpiDevice};

/// High-level synchronous driver for the MAX30003 ECG front-end.
pub struct Max30003<IFACE> {
    interface: IFACE,
}

/// Decoded view of the `STATUS` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Active interrupt sources, regardless of whether they are enabled.
    pub active: InterruptFlags,
    /// STATUS[3] LDOFF_PH.
    pub ldoff_ph: bool,
    /// STATUS[2] LDOFF_PL.
    pub ldoff_pl: bool,
    /// STATUS[1] LDOFF_NH.
    pub ldoff_nh: bool,
    /// STATUS[0] LDOFF_NL.
    pub ldoff_nl: bool,
}

impl StatusSnapshot {
    /// Builds a snapshot from the `STATUS` bitfield.
    pub fn from_register(status: Status) -> Self {
        Self {
            active: InterruptFlags::from_bits(status.into()),
            ldoff_ph: status.ldoff_ph(),
            ldoff_pl: status.ldoff_pl(),
            ldoff_nh: status.ldoff_nh(),
            ldoff_nl: status.ldoff_nl(),
        }
    }

    /// Whether any DC lead-off comparator is tripped.
    pub fn lead_off(&self) -> bool {
        self.ldoff_ph || self.ldoff_pl || self.ldoff_nh || self.ldoff_nl
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StatusSnapshot {{\n    ACTIVE: {:#x},\n    LDOFF_PH: {},\n    LDOFF_PL: {},\n    LDOFF_NH: {},\n    LDOFF_NL: {}\n}}",
            self.active.bits(),
            self.ldoff_ph,
            self.ldoff_pl,
            self.ldoff_nh,
            self.ldoff_nl
        );
    }
}

impl<IFACE> Max30003<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE) -> Self {
        Self { interface }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<SPI> Max30003<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for `SpiDevice` transports.
    pub fn new_spi(spi: SPI) -> Self {
        Self::new(SpiInterface::new(spi))
    }

    /// Releases the driver, returning the SPI device.
    pub fn release_spi(self) -> SPI {
        self.release().release()
    }
}

impl<BUS, CS> Max30003<SpiBusInterface<BUS, CS>>
where
    BUS: SpiBus,
    CS: OutputPin,
{
    /// Convenience constructor for a shared bus with a driver-owned select pin.
    pub fn new_spi_bus(bus: BUS, cs: CS) -> Self {
        Self::new(SpiBusInterface::new(bus, cs))
    }

    /// Releases the driver, returning the bus and the select pin.
    pub fn release_spi_bus(self) -> (BUS, CS) {
        self.release().release()
    }
}

impl<IFACE, CommE> Max30003<IFACE>
where
    IFACE: Max30003Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Commands =====================================
    // ==================================================================
    /// Brings the interface to its idle state (select deasserted).
    ///
    /// Call once before any other operation.
    pub fn init(&mut self) -> Result<(), CommE> {
        self.interface.idle().map_err(|_| {
            warn!("interface could not be idled");
            Error::InvalidHandle
        })
    }

    /// Resets every register to its power-on value.
    pub fn software_reset(&mut self) -> Result<(), CommE> {
        self.write_register(REG_SW_RST, COMMAND_PAYLOAD)
    }

    /// Starts a new ECG recording by resetting the decimation filters and
    /// the FIFO. Required after configuring the channel.
    pub fn synchronize(&mut self) -> Result<(), CommE> {
        self.write_register(REG_SYNCH, COMMAND_PAYLOAD)
    }

    /// Empties the ECG FIFO and clears the overflow condition.
    pub fn reset_fifo(&mut self) -> Result<(), CommE> {
        self.write_register(REG_FIFO_RST, COMMAND_PAYLOAD)
    }

    // ==================================================================
    // == Register Access ===============================================
    // ==================================================================
    /// Reads the 24-bit value of `address`.
    pub fn read_register(&mut self, address: u8) -> Result<u32, CommE> {
        let mut rx = [0u8; FRAME_LEN];
        self.interface
            .exchange(&encode_read_frame(address), &mut rx)
            .map_err(Error::from)?;
        Ok(decode_read_frame(&rx))
    }

    /// Writes the low 24 bits of `value` to `address`.
    pub fn write_register(&mut self, address: u8, value: u32) -> Result<(), CommE> {
        self.interface
            .transmit(&encode_write_frame(address, value))
            .map_err(Error::from)
    }

    /// Reads a typed register.
    pub fn read<R: Register>(&mut self) -> Result<R, CommE> {
        self.read_register(R::ADDRESS).map(R::from)
    }

    /// Writes a typed register.
    pub fn write<R: Register>(&mut self, register: R) -> Result<(), CommE> {
        self.write_register(R::ADDRESS, register.into())
    }

    /// Read-modify-write of a typed register.
    pub fn update<R, F>(&mut self, mutate: F) -> Result<R, CommE>
    where
        R: Register,
        F: FnOnce(R) -> R,
    {
        let updated = mutate(self.read::<R>()?);
        self.write(updated)?;
        Ok(updated)
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Reads the raw `INFO` register (revision and part identification).
    pub fn read_info(&mut self) -> Result<u32, CommE> {
        self.read_register(REG_INFO)
    }

    /// Returns a snapshot of the `STATUS` register.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        self.read::<Status>().map(StatusSnapshot::from_register)
    }

    /// Reads the latest R-to-R interval in RTOR resolution units
    /// (about 7.8 ms at the 512 sps progression).
    pub fn read_rtor_interval(&mut self) -> Result<u16, CommE> {
        self.read_register(REG_RTOR).map(rtor_interval)
    }

    // ==================================================================
    // == Data Acquisition & FIFO =======================================
    // ==================================================================
    /// Reads `words.len()` raw FIFO words. On error the buffer must not be used.
    pub fn read_sample_words(&mut self, words: &mut [u32]) -> Result<(), CommE> {
        read_fifo_words(&mut self.interface, words)
    }

    /// Reads and decodes `samples.len()` FIFO samples. On error the buffer
    /// must not be used.
    pub fn read_samples(&mut self, samples: &mut [EcgSample]) -> Result<(), CommE> {
        read_fifo_samples(&mut self.interface, samples)
    }

    // ==================================================================
    // == Interrupts ====================================================
    // ==================================================================
    /// Returns the interrupt sources that are both active and enabled on INTB.
    pub fn interrupt_status(&mut self) -> Result<InterruptFlags, CommE> {
        let status = self.read_register(REG_STATUS)?;
        let enable = self.read_register(REG_EN_INT)?;
        Ok(InterruptFlags::from_registers(status, enable))
    }

    /// Handles each asserted source once, in [`Interrupt::ALL`] order.
    ///
    /// A FIFO threshold drains [`FIFO_DEPTH`] samples into `drain`; an
    /// overflow resets the FIFO. Other sources only appear in the report.
    /// The first transport failure stops the pass.
    pub fn dispatch(
        &mut self,
        flags: InterruptFlags,
        drain: &mut [EcgSample; FIFO_DEPTH],
    ) -> Result<DispatchReport, CommE> {
        let mut report = DispatchReport::new(flags);

        for interrupt in flags.iter() {
            match interrupt {
                Interrupt::Eint => {
                    debug!("EINT: draining FIFO");
                    self.read_samples(drain)?;
                    report.record_drain();
                }
                Interrupt::Eovf => {
                    warn!("EOVF: resetting FIFO");
                    self.reset_fifo()?;
                    report.fifo_reset = true;
                }
                Interrupt::Dcloffint => warn!("DCLOFFINT: DC lead-off"),
                Interrupt::Pllint => warn!("PLLINT: PLL unlocked"),
                Interrupt::Fstint => debug!("FSTINT: fast recovery"),
                Interrupt::Lonint => debug!("LONINT: lead-on"),
                Interrupt::Rrint => debug!("RRINT: R-to-R interval ready"),
                Interrupt::Samp => trace!("SAMP"),
            }
        }

        Ok(report)
    }

    /// Reads the interrupt state and dispatches it.
    pub fn service_interrupts(
        &mut self,
        drain: &mut [EcgSample; FIFO_DEPTH],
    ) -> Result<DispatchReport, CommE> {
        let flags = self.interrupt_status()?;
        self.dispatch(flags, drain)
    }

    // ==================================================================
    // == Configuration =================================================
    // ==================================================================
    /// Writes each entry in order and stops at the first failure. Earlier
    /// writes are not rolled back.
    pub fn apply_writes(&mut self, writes: &[RegisterWrite]) -> Result<(), CommE> {
        apply_writes(&mut self.interface, writes)
    }

    /// Applies every register of `profile`.
    pub fn apply_profile(&mut self, profile: &ConfigProfile) -> Result<(), CommE> {
        debug!("applying configuration profile");
        self.apply_writes(&profile.writes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fifo::Etag;
    use crate::registers::{EcgConfig, REG_CNFG_ECG, REG_ECG_FIFO_BURST, REG_MNGR_INT};
    use crate::params::EcgGain;
    use crate::test_support::{FakeInterface, Frame};

    fn driver(replies: &[u32]) -> Max30003<FakeInterface> {
        Max30003::new(FakeInterface::with_replies(replies))
    }

    #[test]
    fn init_idles_the_interface() {
        let mut dev = driver(&[]);
        dev.init().unwrap();
        assert_eq!(dev.release().idle_calls(), 1);
    }

    #[test]
    fn init_reports_invalid_handle() {
        let mut dev = Max30003::new(FakeInterface::with_replies(&[]).fail_idle());
        assert_eq!(dev.init(), Err(Error::InvalidHandle));
    }

    #[test]
    fn read_register_sends_read_command_and_decodes_payload() {
        let mut dev = driver(&[0x80_0001]);
        assert_eq!(dev.read_register(REG_STATUS).unwrap(), 0x80_0001);
        assert_eq!(dev.release().frames(), &[Frame::Exchange([0x03, 0, 0, 0])]);
    }

    #[test]
    fn write_register_drops_upper_byte() {
        let mut dev = driver(&[]);
        dev.write_register(REG_CNFG_ECG, 0xFF82_5000).unwrap();
        assert_eq!(dev.release().frames(), &[Frame::Transmit([0x2A, 0x82, 0x50, 0x00])]);
    }

    #[test]
    fn transport_failures_surface_unchanged() {
        let mut dev = Max30003::new(FakeInterface::with_replies(&[]).fail_on(0));
        assert!(matches!(dev.read_register(REG_INFO), Err(Error::Transport(_))));
    }

    #[test]
    fn command_registers_write_zero() {
        let mut dev = driver(&[]);
        dev.software_reset().unwrap();
        dev.synchronize().unwrap();
        dev.reset_fifo().unwrap();
        assert_eq!(
            dev.release().frames(),
            &[
                Frame::Transmit([0x10, 0, 0, 0]),
                Frame::Transmit([0x12, 0, 0, 0]),
                Frame::Transmit([0x14, 0, 0, 0]),
            ]
        );
    }

    #[test]
    fn update_reads_then_writes_back() {
        let mut dev = driver(&[0x80_5000]);
        let ecg = dev
            .update::<EcgConfig, _>(|ecg| ecg.with_gain(EcgGain::V160))
            .unwrap();
        assert_eq!(u32::from(ecg), 0x83_5000);
        assert_eq!(
            dev.release().frames(),
            &[
                Frame::Exchange([0x2B, 0, 0, 0]),
                Frame::Transmit([0x2A, 0x83, 0x50, 0x00]),
            ]
        );
    }

    #[test]
    fn status_snapshot_splits_flags_and_lead_off() {
        let mut dev = driver(&[0x10_0005]);
        let status = dev.read_status().unwrap();
        assert!(status.active.contains(Interrupt::Dcloffint));
        assert!(status.ldoff_nl);
        assert!(status.ldoff_pl);
        assert!(!status.ldoff_ph);
        assert!(status.lead_off());
    }

    #[test]
    fn rtor_interval_is_extracted() {
        let mut dev = driver(&[0x40 << 10]);
        assert_eq!(dev.read_rtor_interval().unwrap(), 0x40);
    }

    #[test]
    fn interrupt_status_masks_with_enable() {
        let mut dev = driver(&[0x00_0000, 0xFF_FFFF]);
        assert!(dev.interrupt_status().unwrap().is_empty());

        let mut dev = driver(&[0xFF_FFFF, 0x80_0000]);
        assert_eq!(dev.interrupt_status().unwrap().bits(), 0x80_0000);
        assert_eq!(
            dev.release().frames(),
            &[Frame::Exchange([0x03, 0, 0, 0]), Frame::Exchange([0x05, 0, 0, 0])]
        );
    }

    #[test]
    fn interrupt_status_skips_enable_read_after_failure() {
        let mut dev = Max30003::new(FakeInterface::with_replies(&[]).fail_on(0));
        assert!(dev.interrupt_status().is_err());
        assert_eq!(dev.release().frames().len(), 1);
    }

    #[test]
    fn overflow_resets_fifo() {
        let mut dev = driver(&[]);
        let mut drain = [EcgSample::default(); FIFO_DEPTH];

        let report = dev.dispatch(Interrupt::Eovf.into(), &mut drain).unwrap();

        assert!(report.fifo_reset);
        assert_eq!(report.drained, 0);
        assert_eq!(dev.release().frames(), &[Frame::Transmit([0x14, 0, 0, 0])]);
    }

    #[test]
    fn threshold_drains_whole_fifo() {
        let mut replies = [0u32; FIFO_DEPTH];
        replies[FIFO_DEPTH - 1] = 0x10; // ETAG = 2
        let mut dev = driver(&replies);
        let mut drain = [EcgSample::default(); FIFO_DEPTH];

        let report = dev.dispatch(Interrupt::Eint.into(), &mut drain).unwrap();

        assert_eq!(report.drained, FIFO_DEPTH);
        assert_eq!(drain[0].tag, Etag::Valid);
        assert!(drain[FIFO_DEPTH - 1].tag.is_end_of_frame());
        let frames = dev.release();
        assert_eq!(frames.frames().len(), FIFO_DEPTH);
        assert_eq!(
            frames.frames()[0],
            Frame::Exchange(encode_read_frame(REG_ECG_FIFO_BURST))
        );
    }

    #[test]
    fn sources_without_action_are_reported_only() {
        let mut dev = driver(&[]);
        let mut drain = [EcgSample::default(); FIFO_DEPTH];
        let flags = InterruptFlags::from(Interrupt::Pllint)
            .with(Interrupt::Samp)
            .with(Interrupt::Dcloffint);

        let report = dev.dispatch(flags, &mut drain).unwrap();

        assert_eq!(report.flags, flags);
        assert!(!report.fifo_reset);
        assert!(dev.release().frames().is_empty());
    }

    #[test]
    fn dispatch_stops_at_first_failure() {
        let mut dev = Max30003::new(FakeInterface::with_replies(&[]).fail_on(0));
        let mut drain = [EcgSample::default(); FIFO_DEPTH];
        let flags = InterruptFlags::from(Interrupt::Eint).with(Interrupt::Eovf);

        assert!(dev.dispatch(flags, &mut drain).is_err());
        // The FIFO_RST write for EOVF is never attempted.
        assert_eq!(dev.release().frames().len(), 1);
    }

    #[test]
    fn service_reads_status_then_dispatches() {
        let mut dev = driver(&[0x40_0000, 0xC0_0003]);
        let mut drain = [EcgSample::default(); FIFO_DEPTH];

        let report = dev.service_interrupts(&mut drain).unwrap();

        assert_eq!(report.flags, InterruptFlags::from(Interrupt::Eovf));
        assert!(report.fifo_reset);
        assert_eq!(dev.release().frames().len(), 3);
    }

    #[test]
    fn profile_failure_at_third_write_keeps_first_two() {
        let mut dev = Max30003::new(FakeInterface::with_replies(&[]).fail_on(2));

        let err = dev.apply_profile(&ConfigProfile::capture()).unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        let iface = dev.release();
        let frames = iface.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], Frame::Transmit([0x04, 0xC0, 0x00, 0x03]));
        assert_eq!(frames[1], Frame::Transmit([0x06, 0xC0, 0x00, 0x03]));
        assert_eq!(
            frames[2],
            Frame::Transmit(encode_write_frame(REG_MNGR_INT, 0xF8_0004))
        );
    }

    #[test]
    fn profile_applies_all_registers() {
        let mut dev = driver(&[]);
        dev.apply_profile(&ConfigProfile::baseline()).unwrap();
        assert_eq!(dev.release().frames().len(), 10);
    }
}
