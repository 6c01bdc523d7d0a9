//! Strongly typed parameter enumerations for the MAX30003 driver.
//!
//! These enums map directly to datasheet field encodings and are used by the
//! bitfield registers in [`registers`](crate::registers) and by
//! [`ConfigProfile`](crate::config::ConfigProfile). Prefer these types over
//! raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use max30003::params::{EcgGain, EcgRate, LowPassFilter};
//!
//! let rate = EcgRate::Sps512;
//! let gain = EcgGain::V80;
//! let dlpf = LowPassFilter::Hz40;
//! let _ = (rate, gain, dlpf);
//! ```

use modular_bitfield::prelude::Specifier;

/// INTB/INT2B output driver selection (`EN_INT[1:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum InterruptPinType {
    /// Output disabled (three-state).
    ThreeState = 0b00,
    /// CMOS driver.
    Cmos = 0b01,
    /// Open-drain NMOS driver.
    OpenDrain = 0b10,
    /// Open-drain NMOS driver with internal 125 kΩ pull-up.
    OpenDrainPullUp = 0b11,
}

/// Sample synchronization pulse frequency (`MNGR_INT.SAMP_IT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum SampleSyncRate {
    /// Pulse on every sample instant.
    EverySample = 0b00,
    /// Pulse on every 2nd sample instant.
    Every2nd = 0b01,
    /// Pulse on every 4th sample instant.
    Every4th = 0b10,
    /// Pulse on every 16th sample instant.
    Every16th = 0b11,
}

/// RRINT clear behaviour (`MNGR_INT.CLR_RRINT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum RrintClear {
    /// Cleared when STATUS is read back.
    OnStatusRead = 0b00,
    /// Cleared when the RTOR register is read back.
    OnRtorRead = 0b01,
    /// Self-clears after one ECG data rate cycle.
    SelfClear = 0b10,
}

/// Fast recovery mode selection (`MNGR_DYN.FAST`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum FastRecoveryMode {
    /// Fast recovery disabled.
    Normal = 0b00,
    /// Fast recovery held active until returned to normal.
    Manual = 0b01,
    /// Fast recovery engaged automatically on saturation.
    Automatic = 0b10,
}

/// Master clock frequency and resulting ECG rate progression (`CNFG_GEN.FMSTR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum MasterClock {
    /// 32768 Hz, 512/256/128 sps progression.
    Progression512 = 0b00,
    /// 32000 Hz, 500/250/125 sps progression.
    Progression500 = 0b01,
    /// 32000 Hz, 200 sps only.
    Progression200 = 0b10,
    /// 31968.78 Hz, 199.8 sps only.
    Progression199 = 0b11,
}

impl MasterClock {
    /// Returns the master clock frequency in hertz, truncated to an integer.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Progression512 => 32_768,
            Self::Progression500 | Self::Progression200 => 32_000,
            Self::Progression199 => 31_968,
        }
    }
}

/// Generic two-state enable used by multi-bit enable fields.
///
/// `EN_ULP_LON`, `EN_DCLOFF` and `EN_RBIAS` are two bits wide but only
/// define the `00` and `01` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum Enable2 {
    /// Feature disabled.
    Disabled = 0b00,
    /// Feature enabled.
    Enabled = 0b01,
}

/// DC lead-off current polarity (`CNFG_GEN.DCLOFF_IPOL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum LeadOffPolarity {
    /// ECGP pull-up, ECGN pull-down.
    EcgpPullUp = 0,
    /// ECGP pull-down, ECGN pull-up.
    EcgpPullDown = 1,
}

/// DC lead-off current magnitude (`CNFG_GEN.DCLOFF_IMAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum LeadOffCurrent {
    /// 0 nA (current sources disconnected).
    Na0 = 0b000,
    /// 5 nA.
    Na5 = 0b001,
    /// 10 nA.
    Na10 = 0b010,
    /// 20 nA.
    Na20 = 0b011,
    /// 50 nA.
    Na50 = 0b100,
    /// 100 nA.
    Na100 = 0b101,
}

/// DC lead-off comparator threshold (`CNFG_GEN.DCLOFF_VTH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum LeadOffThreshold {
    /// VMID ± 300 mV.
    Mv300 = 0b00,
    /// VMID ± 400 mV.
    Mv400 = 0b01,
    /// VMID ± 450 mV.
    Mv450 = 0b10,
    /// VMID ± 500 mV.
    Mv500 = 0b11,
}

/// Resistive bias value (`CNFG_GEN.RBIASV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum BiasResistance {
    /// 50 MΩ.
    Mohm50 = 0b00,
    /// 100 MΩ.
    Mohm100 = 0b01,
    /// 200 MΩ.
    Mohm200 = 0b10,
}

/// Calibration source frequency (`CNFG_CAL.FCAL`), nominal at FMSTR = 32768 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum CalibrationFrequency {
    /// FMSTR/128, about 256 Hz.
    Hz256 = 0b000,
    /// FMSTR/512, about 64 Hz.
    Hz64 = 0b001,
    /// FMSTR/2048, about 16 Hz.
    Hz16 = 0b010,
    /// FMSTR/8192, about 4 Hz.
    Hz4 = 0b011,
    /// FMSTR/2^15, about 1 Hz.
    Hz1 = 0b100,
    /// FMSTR/2^17, about 1/4 Hz.
    QuarterHz = 0b101,
    /// FMSTR/2^19, about 1/16 Hz.
    SixteenthHz = 0b110,
    /// FMSTR/2^21, about 1/64 Hz.
    SixtyFourthHz = 0b111,
}

/// Calibration source swing (`CNFG_CAL.VMODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum CalibrationMode {
    /// Swings between VMID ± VMAG and VMID.
    Unipolar = 0,
    /// Swings between VMID + VMAG and VMID − VMAG.
    Bipolar = 1,
}

/// Calibration source magnitude (`CNFG_CAL.VMAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum CalibrationMagnitude {
    /// 0.25 mV.
    Mv0_25 = 0,
    /// 0.50 mV.
    Mv0_50 = 1,
}

/// Calibration signal routing for one input (`CNFG_EMUX.CALP_SEL` / `CALN_SEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum CalibrationInput {
    /// No calibration signal applied.
    Disconnected = 0b00,
    /// Input connected to VMID.
    Vmid = 0b01,
    /// Input connected to VCALP.
    Vcalp = 0b10,
    /// Input connected to VCALN.
    Vcaln = 0b11,
}

/// ECG data rate (`CNFG_ECG.RATE`) under the 512 sps progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum EcgRate {
    /// 512 sps (500 sps with the 500 progression).
    Sps512 = 0b00,
    /// 256 sps (250 sps with the 500 progression).
    Sps256 = 0b01,
    /// 128 sps (125, 200 or 199.8 sps depending on FMSTR).
    Sps128 = 0b10,
}

/// ECG channel gain (`CNFG_ECG.GAIN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum EcgGain {
    /// 20 V/V.
    V20 = 0b00,
    /// 40 V/V.
    V40 = 0b01,
    /// 80 V/V.
    V80 = 0b10,
    /// 160 V/V.
    V160 = 0b11,
}

impl EcgGain {
    /// Returns the gain in volts per volt.
    pub const fn volts_per_volt(self) -> u32 {
        match self {
            Self::V20 => 20,
            Self::V40 => 40,
            Self::V80 => 80,
            Self::V160 => 160,
        }
    }
}

/// Digital low-pass filter cutoff (`CNFG_ECG.DLPF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum LowPassFilter {
    /// Filter bypassed.
    Bypass = 0b00,
    /// About 40 Hz.
    Hz40 = 0b01,
    /// About 100 Hz.
    Hz100 = 0b10,
    /// About 150 Hz.
    Hz150 = 0b11,
}

/// R-to-R averaging window width (`CNFG_RTOR1.WNDW`), in RTOR resolution units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum RtorWindow {
    /// 6 × RTOR_RES.
    Width6 = 0x0,
    /// 8 × RTOR_RES.
    Width8 = 0x1,
    /// 10 × RTOR_RES.
    Width10 = 0x2,
    /// 12 × RTOR_RES.
    Width12 = 0x3,
    /// 14 × RTOR_RES.
    Width14 = 0x4,
    /// 16 × RTOR_RES.
    Width16 = 0x5,
    /// 18 × RTOR_RES.
    Width18 = 0x6,
    /// 20 × RTOR_RES.
    Width20 = 0x7,
    /// 22 × RTOR_RES.
    Width22 = 0x8,
    /// 24 × RTOR_RES.
    Width24 = 0x9,
    /// 26 × RTOR_RES.
    Width26 = 0xA,
    /// 28 × RTOR_RES.
    Width28 = 0xB,
}

/// R-to-R detector gain (`CNFG_RTOR1.GAIN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum RtorGain {
    /// ×1.
    G1 = 0x0,
    /// ×2.
    G2 = 0x1,
    /// ×4.
    G4 = 0x2,
    /// ×8.
    G8 = 0x3,
    /// ×16.
    G16 = 0x4,
    /// ×32.
    G32 = 0x5,
    /// ×64.
    G64 = 0x6,
    /// ×128.
    G128 = 0x7,
    /// ×256.
    G256 = 0x8,
    /// ×512.
    G512 = 0x9,
    /// ×1024.
    G1024 = 0xA,
    /// ×2048.
    G2048 = 0xB,
    /// ×4096.
    G4096 = 0xC,
    /// ×8192.
    G8192 = 0xD,
    /// ×16384.
    G16384 = 0xE,
    /// Automatic gain.
    Auto = 0xF,
}

/// Weighting factor shared by the R-to-R peak (`PAVG`) and interval (`RAVG`) averagers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum AveragingWeight {
    /// Weight 2.
    W2 = 0b00,
    /// Weight 4.
    W4 = 0b01,
    /// Weight 8.
    W8 = 0b10,
    /// Weight 16.
    W16 = 0b11,
}

/// ECG FIFO interrupt threshold (`MNGR_INT.EFIT`), in unread samples.
///
/// Stored as `samples - 1` in the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoThreshold(u8);

impl FifoThreshold {
    /// Smallest accepted threshold.
    pub const MIN: Self = Self(1);
    /// Largest accepted threshold, equal to the FIFO depth.
    pub const MAX: Self = Self(32);

    /// Creates a threshold of `samples` unread words, `1..=32`.
    pub const fn new(samples: u8) -> Option<Self> {
        if samples >= 1 && samples <= 32 { Some(Self(samples)) } else { None }
    }

    /// Number of unread samples that raise EINT.
    pub const fn samples(self) -> u8 {
        self.0
    }

    pub(crate) const fn field(self) -> u8 {
        self.0 - 1
    }

    pub(crate) const fn from_field(field: u8) -> Self {
        Self((field & 0x1F) + 1)
    }
}
