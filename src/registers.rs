//! Register map definitions for the MAX30003 ECG front-end.
//!
//! All registers are 24 bits wide. Bitfields are laid out LSB first, so the
//! first declared field starts at bit 0.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    AveragingWeight, BiasResistance, CalibrationFrequency, CalibrationInput, CalibrationMagnitude,
    CalibrationMode, EcgGain, EcgRate, Enable2, FastRecoveryMode, FifoThreshold, InterruptPinType,
    LeadOffCurrent, LeadOffPolarity, LeadOffThreshold, LowPassFilter, MasterClock, RrintClear,
    RtorGain, RtorWindow, SampleSyncRate,
};

/// Register address of `NO_OP`.
pub const REG_NO_OP: u8 = 0x00;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x01;
/// Register address of `EN_INT` (INTB pin).
pub const REG_EN_INT: u8 = 0x02;
/// Register address of `EN_INT2` (INT2B pin).
pub const REG_EN_INT2: u8 = 0x03;
/// Register address of `MNGR_INT`.
pub const REG_MNGR_INT: u8 = 0x04;
/// Register address of `MNGR_DYN`.
pub const REG_MNGR_DYN: u8 = 0x05;
/// Register address of `SW_RST`.
pub const REG_SW_RST: u8 = 0x08;
/// Register address of `SYNCH`.
pub const REG_SYNCH: u8 = 0x09;
/// Register address of `FIFO_RST`.
pub const REG_FIFO_RST: u8 = 0x0A;
/// Register address of `INFO`.
pub const REG_INFO: u8 = 0x0F;
/// Register address of `CNFG_GEN`.
pub const REG_CNFG_GEN: u8 = 0x10;
/// Register address of `CNFG_CAL`.
pub const REG_CNFG_CAL: u8 = 0x12;
/// Register address of `CNFG_EMUX`.
pub const REG_CNFG_EMUX: u8 = 0x14;
/// Register address of `CNFG_ECG`.
pub const REG_CNFG_ECG: u8 = 0x15;
/// Register address of `CNFG_RTOR1`.
pub const REG_CNFG_RTOR1: u8 = 0x1D;
/// Register address of `CNFG_RTOR2`.
pub const REG_CNFG_RTOR2: u8 = 0x1E;
/// Register address of `ECG_FIFO_BURST`.
pub const REG_ECG_FIFO_BURST: u8 = 0x20;
/// Register address of `ECG_FIFO`.
pub const REG_ECG_FIFO: u8 = 0x21;
/// Register address of `RTOR`.
pub const REG_RTOR: u8 = 0x25;
/// Register address of the trailing `NO_OP`.
pub const REG_NO_OP_END: u8 = 0x7F;

/// Payload written to the command registers (`SW_RST`, `SYNCH`, `FIFO_RST`).
pub const COMMAND_PAYLOAD: u32 = 0x00_0000;

/// Depth of the ECG sample FIFO in words.
pub const FIFO_DEPTH: usize = 32;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register: Copy + From<u32> + Into<u32> {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Power-on reset value defined by the datasheet.
    const RESET_VALUE: Option<u32>;
}

// Conversions between a 3-byte bitfield and the 24-bit register payload.
macro_rules! register24 {
    ($ty:ident, $addr:expr, $access:ident, $reset:expr) => {
        impl From<u32> for $ty {
            fn from(value: u32) -> Self {
                let [b0, b1, b2, _] = value.to_le_bytes();
                Self::from_bytes([b0, b1, b2])
            }
        }

        impl From<$ty> for u32 {
            fn from(value: $ty) -> Self {
                let [b0, b1, b2] = value.into_bytes();
                u32::from_le_bytes([b0, b1, b2, 0])
            }
        }

        impl Register for $ty {
            const ADDRESS: u8 = $addr;
            const ACCESS: RegisterAccess = RegisterAccess::$access;
            const RESET_VALUE: Option<u32> = $reset;
        }
    };
}

/// Bitfield representation of the `STATUS` register (address `0x01`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // DC lead-off, ECGN below threshold (bit 0).
    pub ldoff_nl: bool,
    // DC lead-off, ECGN above threshold (bit 1).
    pub ldoff_nh: bool,
    // DC lead-off, ECGP below threshold (bit 2).
    pub ldoff_pl: bool,
    // DC lead-off, ECGP above threshold (bit 3).
    pub ldoff_ph: bool,
    #[skip]
    __: B4,
    // PLL unlocked (bit 8).
    pub pllint: bool,
    // Sample synchronization pulse (bit 9).
    pub samp: bool,
    // R-to-R event (bit 10).
    pub rrint: bool,
    // ULP lead-on detected (bit 11).
    pub lonint: bool,
    #[skip]
    __: B8,
    // DC lead-off detected (bit 20).
    pub dcloffint: bool,
    // Fast recovery active (bit 21).
    pub fstint: bool,
    // ECG FIFO overflow (bit 22).
    pub eovf: bool,
    // ECG FIFO threshold reached (bit 23).
    pub eint: bool,
}

register24!(Status, REG_STATUS, ReadOnly, None);

/// Bitfield representation of `EN_INT` / `EN_INT2` (addresses `0x02`, `0x03`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptEnable {
    // INTB output driver (bits 1:0).
    pub pin_type: InterruptPinType,
    #[skip]
    __: B6,
    // PLLINT enable (bit 8).
    pub pllint: bool,
    // SAMP enable (bit 9).
    pub samp: bool,
    // RRINT enable (bit 10).
    pub rrint: bool,
    // LONINT enable (bit 11).
    pub lonint: bool,
    #[skip]
    __: B8,
    // DCLOFFINT enable (bit 20).
    pub dcloffint: bool,
    // FSTINT enable (bit 21).
    pub fstint: bool,
    // EOVF enable (bit 22).
    pub eovf: bool,
    // EINT enable (bit 23).
    pub eint: bool,
}

register24!(InterruptEnable, REG_EN_INT, ReadWrite, Some(0x00_0003));

/// `EN_INT2` shares the `EN_INT` layout but drives the INT2B pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptEnable2(pub InterruptEnable);

impl From<u32> for InterruptEnable2 {
    fn from(value: u32) -> Self {
        Self(InterruptEnable::from(value))
    }
}

impl From<InterruptEnable2> for u32 {
    fn from(value: InterruptEnable2) -> Self {
        value.0.into()
    }
}

impl Register for InterruptEnable2 {
    const ADDRESS: u8 = REG_EN_INT2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<u32> = Some(0x00_0003);
}

/// Bitfield representation of `MNGR_INT` (address `0x04`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptManager {
    // Sample synchronization pulse frequency (bits 1:0).
    pub samp_it: SampleSyncRate,
    // SAMP self-clears after ~1/4 data cycle when set (bit 2).
    pub clr_samp: bool,
    #[skip]
    __: B1,
    // RRINT clear behaviour (bits 5:4).
    pub clr_rrint: RrintClear,
    // FSTINT held until cleared on STATUS read when set (bit 6).
    pub clr_fast: bool,
    #[skip]
    __: B12,
    // FIFO interrupt threshold minus one (bits 23:19).
    efit: B5,
}

register24!(InterruptManager, REG_MNGR_INT, ReadWrite, Some(0x78_0004));

impl InterruptManager {
    /// Returns the FIFO interrupt threshold.
    pub fn fifo_threshold(&self) -> FifoThreshold {
        FifoThreshold::from_field(self.efit())
    }

    /// Returns a copy with the FIFO interrupt threshold replaced.
    pub fn with_fifo_threshold(self, threshold: FifoThreshold) -> Self {
        self.with_efit(threshold.field())
    }
}

/// Bitfield representation of `MNGR_DYN` (address `0x05`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicManager {
    #[skip]
    __: B16,
    // Automatic fast recovery threshold (bits 21:16).
    pub fast_th: B6,
    // Fast recovery mode (bits 23:22).
    pub fast: FastRecoveryMode,
}

register24!(DynamicManager, REG_MNGR_DYN, ReadWrite, Some(0x3F_0000));

/// Bitfield representation of `CNFG_GEN` (address `0x10`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralConfig {
    // ECGN resistive bias to VMID (bit 0).
    pub rbiasn: bool,
    // ECGP resistive bias to VMID (bit 1).
    pub rbiasp: bool,
    // Resistive bias value (bits 3:2).
    pub rbiasv: BiasResistance,
    // Resistive bias enable (bits 5:4).
    pub en_rbias: Enable2,
    // DC lead-off threshold (bits 7:6).
    pub dcloff_vth: LeadOffThreshold,
    // DC lead-off current magnitude (bits 10:8).
    pub dcloff_imag: LeadOffCurrent,
    // DC lead-off current polarity (bit 11).
    pub dcloff_ipol: LeadOffPolarity,
    // DC lead-off detection enable (bits 13:12).
    pub en_dcloff: Enable2,
    #[skip]
    __: B5,
    // ECG channel enable (bit 19).
    pub en_ecg: bool,
    // Master clock selection (bits 21:20).
    pub fmstr: MasterClock,
    // ULP lead-on detection enable (bits 23:22).
    pub en_ulp_lon: Enable2,
}

register24!(GeneralConfig, REG_CNFG_GEN, ReadWrite, Some(0x00_0004));

/// Bitfield representation of `CNFG_CAL` (address `0x12`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConfig {
    // Calibration time high in CAL_RES units (bits 10:0).
    pub thigh: B11,
    // 50% duty cycle, THIGH ignored (bit 11).
    pub fifty: bool,
    // Calibration source frequency (bits 14:12).
    pub fcal: CalibrationFrequency,
    #[skip]
    __: B5,
    // Calibration magnitude (bit 20).
    pub vmag: CalibrationMagnitude,
    // Calibration mode (bit 21).
    pub vmode: CalibrationMode,
    // Calibration sources enable (bit 22).
    pub en_vcal: bool,
    #[skip]
    __: B1,
}

register24!(CalibrationConfig, REG_CNFG_CAL, ReadWrite, Some(0x00_4800));

/// Bitfield representation of `CNFG_EMUX` (address `0x14`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMuxConfig {
    #[skip]
    __: B16,
    // ECGN calibration routing (bits 17:16).
    pub caln_sel: CalibrationInput,
    // ECGP calibration routing (bits 19:18).
    pub calp_sel: CalibrationInput,
    // ECGN isolated from the channel (bit 20).
    pub openn: bool,
    // ECGP isolated from the channel (bit 21).
    pub openp: bool,
    #[skip]
    __: B1,
    // Input polarity inverted (bit 23).
    pub pol: bool,
}

register24!(InputMuxConfig, REG_CNFG_EMUX, ReadWrite, Some(0x30_0000));

/// Bitfield representation of `CNFG_ECG` (address `0x15`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcgConfig {
    #[skip]
    __: B12,
    // Digital low-pass filter (bits 13:12).
    pub dlpf: LowPassFilter,
    // Digital high-pass filter at 0.5 Hz (bit 14).
    pub dhpf: bool,
    #[skip]
    __: B1,
    // Channel gain (bits 17:16).
    pub gain: EcgGain,
    #[skip]
    __: B4,
    // Data rate (bits 23:22).
    pub rate: EcgRate,
}

register24!(EcgConfig, REG_CNFG_ECG, ReadWrite, Some(0x80_5000));

/// Bitfield representation of `CNFG_RTOR1` (address `0x1D`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtorConfig1 {
    #[skip]
    __: B8,
    // Peak threshold scaling factor minus one, in 1/16 (bits 11:8).
    pub ptsf: B4,
    // Peak averaging weight (bits 13:12).
    pub pavg: AveragingWeight,
    #[skip]
    __: B1,
    // R-to-R detection enable (bit 15).
    pub en_rtor: bool,
    // R-to-R gain (bits 19:16).
    pub gain: RtorGain,
    // Averaging window width (bits 23:20).
    pub wndw: RtorWindow,
}

register24!(RtorConfig1, REG_CNFG_RTOR1, ReadWrite, Some(0x3F_2300));

/// Bitfield representation of `CNFG_RTOR2` (address `0x1E`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtorConfig2 {
    #[skip]
    __: B8,
    // Hold-off scaling factor in 1/8 (bits 10:8).
    pub rhsf: B3,
    #[skip]
    __: B1,
    // Interval averaging weight (bits 13:12).
    pub ravg: AveragingWeight,
    #[skip]
    __: B2,
    // Minimum hold-off in RTOR_RES units (bits 21:16).
    pub hoff: B6,
    #[skip]
    __: B2,
}

register24!(RtorConfig2, REG_CNFG_RTOR2, ReadWrite, Some(0x20_2400));

/// Extracts the 14-bit R-to-R interval (`RTOR[23:10]`) in RTOR resolution units.
pub const fn rtor_interval(raw: u32) -> u16 {
    ((raw >> 10) & 0x3FFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reset<R: Register>() -> R {
        R::from(R::RESET_VALUE.unwrap())
    }

    #[test]
    fn status_layout_matches_datasheet() {
        let status = Status::from(0x80_0000_u32 | 0x00_0100 | 0x00_0008);
        assert!(status.eint());
        assert!(!status.eovf());
        assert!(status.pllint());
        assert!(!status.samp());
        assert!(status.ldoff_ph());
        assert!(!status.ldoff_nl());
    }

    #[test]
    fn interrupt_enable_bits_sit_on_the_status_positions() {
        let enable = InterruptEnable::new()
            .with_eint(true)
            .with_eovf(true)
            .with_pin_type(InterruptPinType::OpenDrainPullUp);
        assert_eq!(u32::from(enable), 0xC0_0003);

        let pll = InterruptEnable::new().with_pllint(true).with_lonint(true);
        assert_eq!(u32::from(pll), 0x00_0900);
    }

    #[test]
    fn reset_values_decode_to_documented_fields() {
        let mngr: InterruptManager = reset();
        assert_eq!(mngr.fifo_threshold().samples(), 16);
        assert!(mngr.clr_samp());

        let ecg: EcgConfig = reset();
        assert_eq!(ecg.rate(), EcgRate::Sps128);
        assert_eq!(ecg.gain(), EcgGain::V20);
        assert!(ecg.dhpf());
        assert_eq!(ecg.dlpf(), LowPassFilter::Hz40);

        let rtor: RtorConfig1 = reset();
        assert_eq!(rtor.wndw(), RtorWindow::Width12);
        assert_eq!(rtor.gain(), RtorGain::Auto);
        assert_eq!(rtor.pavg(), AveragingWeight::W8);
        assert_eq!(rtor.ptsf(), 3);
        assert!(!rtor.en_rtor());

        let rtor2: RtorConfig2 = reset();
        assert_eq!(rtor2.hoff(), 0x20);
        assert_eq!(rtor2.ravg(), AveragingWeight::W8);
        assert_eq!(rtor2.rhsf(), 4);

        let cal: CalibrationConfig = reset();
        assert_eq!(cal.fcal(), CalibrationFrequency::Hz1);
        assert!(cal.fifty());

        let emux: InputMuxConfig = reset();
        assert!(emux.openp());
        assert!(emux.openn());

        let general: GeneralConfig = reset();
        assert_eq!(general.rbiasv(), BiasResistance::Mohm100);
        assert!(!general.en_ecg());

        let dynamic: DynamicManager = reset();
        assert_eq!(dynamic.fast_th(), 0x3F);
        assert_eq!(dynamic.fast(), FastRecoveryMode::Normal);
    }

    #[test]
    fn ecg_config_encodes_capture_settings() {
        let ecg = EcgConfig::new()
            .with_rate(EcgRate::Sps512)
            .with_gain(EcgGain::V80)
            .with_dhpf(true)
            .with_dlpf(LowPassFilter::Hz40);
        assert_eq!(u32::from(ecg), 0x02_5000);
    }

    #[test]
    fn fifo_threshold_is_stored_minus_one() {
        let mngr = InterruptManager::new().with_fifo_threshold(FifoThreshold::MAX);
        assert_eq!(u32::from(mngr), 0xF8_0000);
        assert_eq!(mngr.fifo_threshold(), FifoThreshold::MAX);
    }

    #[test]
    fn second_enable_register_targets_int2b() {
        assert_eq!(InterruptEnable2::ADDRESS, REG_EN_INT2);
        let raw = u32::from(InterruptEnable2(InterruptEnable::new().with_eint(true)));
        assert_eq!(raw, 0x80_0000);
    }

    #[test]
    fn upper_byte_is_ignored_on_decode() {
        let general = GeneralConfig::from(0xFF08_0004_u32);
        assert_eq!(u32::from(general), 0x08_0004);
        assert!(general.en_ecg());
    }

    #[test]
    fn rtor_interval_uses_top_fourteen_bits() {
        assert_eq!(rtor_interval(0xFF_FC00), 0x3FFF);
        assert_eq!(rtor_interval(0x00_0400), 1);
        assert_eq!(rtor_interval(0x00_03FF), 0);
    }
}
