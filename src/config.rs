//! Configuration profiles and the register write sequencer.

use crate::error::Result;
use crate::frame::encode_write_frame;
use crate::interface::Max30003Interface;
use crate::params::{CalibrationFrequency, EcgGain, EcgRate, FifoThreshold, InterruptPinType};
use crate::registers::{
    CalibrationConfig, DynamicManager, EcgConfig, GeneralConfig, InputMuxConfig, InterruptEnable,
    InterruptEnable2, InterruptManager, Register, RtorConfig1, RtorConfig2,
};

/// Number of registers covered by a [`ConfigProfile`].
pub const PROFILE_LEN: usize = 10;

/// A single register write: 7-bit address and 24-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    pub address: u8,
    pub value: u32,
}

impl RegisterWrite {
    /// Captures a typed register value together with its address.
    pub fn of<R: Register>(register: R) -> Self {
        Self {
            address: R::ADDRESS,
            value: register.into(),
        }
    }
}

/// Complete set of configuration register values applied as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigProfile {
    /// Interrupt sources routed to INTB.
    pub en_int: InterruptEnable,
    /// Interrupt sources routed to INT2B.
    pub en_int2: InterruptEnable2,
    /// FIFO threshold and interrupt clear behaviour.
    pub mngr_int: InterruptManager,
    /// Fast recovery.
    pub mngr_dyn: DynamicManager,
    /// Channel enable, clocking, bias and lead-off detection.
    pub cnfg_gen: GeneralConfig,
    /// Internal calibration source.
    pub cnfg_cal: CalibrationConfig,
    /// Input multiplexer.
    pub cnfg_emux: InputMuxConfig,
    /// Rate, gain and digital filters.
    pub cnfg_ecg: EcgConfig,
    /// R-to-R detector, first register.
    pub cnfg_rtor1: RtorConfig1,
    /// R-to-R detector, second register.
    pub cnfg_rtor2: RtorConfig2,
}

fn power_on<R: Register>() -> R {
    R::from(R::RESET_VALUE.unwrap_or(0))
}

impl ConfigProfile {
    /// Begins building a custom profile seeded with [`ConfigProfile::baseline`].
    pub fn builder() -> ConfigProfileBuilder {
        ConfigProfileBuilder::new()
    }

    /// Power-on values of every register. No interrupt sources are enabled
    /// and the ECG channel stays off.
    pub fn baseline() -> Self {
        Self {
            en_int: power_on(),
            en_int2: power_on(),
            mngr_int: power_on(),
            mngr_dyn: power_on(),
            cnfg_gen: power_on(),
            cnfg_cal: power_on(),
            cnfg_emux: power_on(),
            cnfg_ecg: power_on(),
            cnfg_rtor1: power_on(),
            cnfg_rtor2: power_on(),
        }
    }

    /// Continuous ECG capture.
    ///
    /// FIFO threshold and overflow interrupts on both pins, interrupt at 32
    /// unread samples, self-clearing SAMP, channel on with 100 MΩ bias,
    /// 512 sps at 80 V/V with 0.5 Hz high-pass and 40 Hz low-pass, and R-to-R
    /// detection running.
    pub fn capture() -> Self {
        let baseline = Self::baseline();
        let fifo_interrupts = InterruptEnable::new()
            .with_eint(true)
            .with_eovf(true)
            .with_pin_type(InterruptPinType::OpenDrainPullUp);

        Self {
            en_int: fifo_interrupts,
            en_int2: InterruptEnable2(fifo_interrupts),
            mngr_int: baseline
                .mngr_int
                .with_fifo_threshold(FifoThreshold::MAX)
                .with_clr_samp(true),
            cnfg_gen: baseline.cnfg_gen.with_en_ecg(true),
            cnfg_ecg: baseline
                .cnfg_ecg
                .with_rate(EcgRate::Sps512)
                .with_gain(EcgGain::V80)
                .with_dhpf(true),
            cnfg_rtor1: baseline.cnfg_rtor1.with_en_rtor(true),
            ..baseline
        }
    }

    /// Expands the profile into its register writes, in application order.
    pub fn writes(&self) -> [RegisterWrite; PROFILE_LEN] {
        [
            RegisterWrite::of(self.en_int),
            RegisterWrite::of(self.en_int2),
            RegisterWrite::of(self.mngr_int),
            RegisterWrite::of(self.mngr_dyn),
            RegisterWrite::of(self.cnfg_gen),
            RegisterWrite::of(self.cnfg_cal),
            RegisterWrite::of(self.cnfg_emux),
            RegisterWrite::of(self.cnfg_ecg),
            RegisterWrite::of(self.cnfg_rtor1),
            RegisterWrite::of(self.cnfg_rtor2),
        ]
    }
}

impl Default for ConfigProfile {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Builder for [`ConfigProfile`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigProfileBuilder {
    profile: ConfigProfile,
}

impl ConfigProfileBuilder {
    /// Creates a new builder seeded with [`ConfigProfile::baseline()`].
    pub fn new() -> Self {
        Self {
            profile: ConfigProfile::baseline(),
        }
    }

    /// Starts from an existing profile instead of the baseline.
    pub fn from_profile(profile: ConfigProfile) -> Self {
        Self { profile }
    }

    /// Replaces the INTB interrupt enables.
    pub fn interrupt_enable(mut self, value: InterruptEnable) -> Self {
        self.profile.en_int = value;
        self
    }

    /// Replaces the INT2B interrupt enables.
    pub fn interrupt_enable2(mut self, value: InterruptEnable) -> Self {
        self.profile.en_int2 = InterruptEnable2(value);
        self
    }

    pub fn interrupt_manager(mut self, value: InterruptManager) -> Self {
        self.profile.mngr_int = value;
        self
    }

    pub fn dynamic_manager(mut self, value: DynamicManager) -> Self {
        self.profile.mngr_dyn = value;
        self
    }

    pub fn general(mut self, value: GeneralConfig) -> Self {
        self.profile.cnfg_gen = value;
        self
    }

    pub fn calibration(mut self, value: CalibrationConfig) -> Self {
        self.profile.cnfg_cal = value;
        self
    }

    pub fn input_mux(mut self, value: InputMuxConfig) -> Self {
        self.profile.cnfg_emux = value;
        self
    }

    pub fn ecg(mut self, value: EcgConfig) -> Self {
        self.profile.cnfg_ecg = value;
        self
    }

    pub fn rtor1(mut self, value: RtorConfig1) -> Self {
        self.profile.cnfg_rtor1 = value;
        self
    }

    pub fn rtor2(mut self, value: RtorConfig2) -> Self {
        self.profile.cnfg_rtor2 = value;
        self
    }

    /// Sets the FIFO interrupt threshold in unread samples (`1..=32`).
    pub fn fifo_threshold(mut self, samples: u8) -> core::result::Result<Self, ConfigError> {
        let threshold = FifoThreshold::new(samples).ok_or(ConfigError::FifoThresholdOutOfRange)?;
        self.profile.mngr_int = self.profile.mngr_int.with_fifo_threshold(threshold);
        Ok(self)
    }

    /// Sets the automatic fast recovery threshold (`FAST_TH`, 6 bits).
    pub fn fast_recovery_threshold(mut self, threshold: u8) -> core::result::Result<Self, ConfigError> {
        if threshold > 0x3F {
            return Err(ConfigError::FastRecoveryThresholdOutOfRange);
        }
        self.profile.mngr_dyn = self.profile.mngr_dyn.with_fast_th(threshold);
        Ok(self)
    }

    /// Sets the calibration source frequency and high time (`THIGH`, 11 bits).
    pub fn calibration_pulse(
        mut self,
        frequency: CalibrationFrequency,
        high_time: u16,
    ) -> core::result::Result<Self, ConfigError> {
        if high_time > 0x7FF {
            return Err(ConfigError::CalibrationHighTimeOutOfRange);
        }
        self.profile.cnfg_cal = self
            .profile
            .cnfg_cal
            .with_fcal(frequency)
            .with_fifty(false)
            .with_thigh(high_time);
        Ok(self)
    }

    /// Finalizes the builder and returns the [`ConfigProfile`].
    pub fn build(self) -> ConfigProfile {
        self.profile
    }
}

impl Default for ConfigProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation errors raised while building a [`ConfigProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// FIFO threshold outside `1..=32` samples.
    FifoThresholdOutOfRange,
    /// Fast recovery threshold does not fit in 6 bits.
    FastRecoveryThresholdOutOfRange,
    /// Calibration high time does not fit in 11 bits.
    CalibrationHighTimeOutOfRange,
}

/// Writes each entry in order, stopping at the first failure.
///
/// Writes issued before the failure stay applied on the device.
pub fn apply_writes<IFACE>(interface: &mut IFACE, writes: &[RegisterWrite]) -> Result<(), IFACE::Error>
where
    IFACE: Max30003Interface,
{
    for write in writes {
        trace!("write reg {:#x} <- {:#x}", write.address, write.value);
        interface.transmit(&encode_write_frame(write.address, write.value))?;
    }

    Ok(())
}
