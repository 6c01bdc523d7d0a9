//! ECG FIFO reading and sample decoding.
//!
//! Each FIFO word is 24 bits: the ECG voltage in bits 23:6 and the ETAG in
//! bits 5:3. Multi-sample reads use the burst command on the first frame and
//! all-zero continuation frames afterwards; the device advances its read
//! pointer on its own.

use crate::error::Result;
use crate::frame::{decode_read_frame, encode_read_frame, FRAME_LEN};
use crate::interface::Max30003Interface;
use crate::registers::{REG_ECG_FIFO, REG_ECG_FIFO_BURST};

const ETAG_SHIFT: u32 = 3;
const ETAG_MASK: u32 = 0x7;
const VOLTAGE_SHIFT: u32 = 6;
const VOLTAGE_MASK: u32 = 0x3_FFFF;

/// ECG sample tag (`ETAG`) carried in every FIFO word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Etag {
    /// Valid sample.
    Valid,
    /// Sample taken during fast recovery.
    FastRecovery,
    /// Valid sample, last one in the FIFO.
    ValidEof,
    /// Fast recovery sample, last one in the FIFO.
    FastRecoveryEof,
    /// FIFO was empty when read.
    Empty,
    /// FIFO overflowed; samples were lost.
    Overflow,
    /// Encoding not defined by the datasheet.
    Reserved(u8),
}

impl Etag {
    /// Decodes the 3-bit tag field.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & ETAG_MASK as u8 {
            0 => Self::Valid,
            1 => Self::FastRecovery,
            2 => Self::ValidEof,
            3 => Self::FastRecoveryEof,
            6 => Self::Empty,
            7 => Self::Overflow,
            other => Self::Reserved(other),
        }
    }

    /// Returns the raw 3-bit encoding.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Valid => 0,
            Self::FastRecovery => 1,
            Self::ValidEof => 2,
            Self::FastRecoveryEof => 3,
            Self::Empty => 6,
            Self::Overflow => 7,
            Self::Reserved(bits) => bits,
        }
    }

    /// Whether the tag marks the last sample currently held in the FIFO.
    pub const fn is_end_of_frame(self) -> bool {
        matches!(self, Self::ValidEof | Self::FastRecoveryEof)
    }

    /// How a consumer should treat the sample carrying this tag.
    pub const fn disposition(self) -> SampleDisposition {
        match self {
            Self::Valid | Self::ValidEof => SampleDisposition::Use,
            Self::FastRecovery | Self::FastRecoveryEof => SampleDisposition::Skip,
            Self::Overflow => SampleDisposition::Flag,
            Self::Empty | Self::Reserved(_) => SampleDisposition::Ignore,
        }
    }
}

/// Consumer action derived from a sample's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleDisposition {
    /// Sample carries a valid voltage.
    Use,
    /// Sample was taken during fast recovery and should be discarded.
    Skip,
    /// FIFO overflowed; data preceding this word was lost.
    Flag,
    /// Nothing to do (empty FIFO or reserved tag).
    Ignore,
}

/// A decoded ECG FIFO sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EcgSample {
    /// Sample tag.
    pub tag: Etag,
    /// Raw 18-bit voltage field; sign interpretation is left to the consumer.
    pub voltage: u32,
}

impl Default for EcgSample {
    fn default() -> Self {
        Self {
            tag: Etag::Empty,
            voltage: 0,
        }
    }
}

/// Splits a raw FIFO word into tag and voltage.
pub const fn decode_sample(word: u32) -> EcgSample {
    EcgSample {
        tag: Etag::from_bits(((word >> ETAG_SHIFT) & ETAG_MASK) as u8),
        voltage: (word >> VOLTAGE_SHIFT) & VOLTAGE_MASK,
    }
}

/// Reads `words.len()` raw FIFO words.
///
/// A single word uses the `ECG_FIFO` command; longer reads use
/// `ECG_FIFO_BURST` on the first frame only. Stops at the first transport
/// failure; on error the contents of `words` must not be used.
pub fn read_fifo_words<IFACE>(interface: &mut IFACE, words: &mut [u32]) -> Result<(), IFACE::Error>
where
    IFACE: Max30003Interface,
{
    read_fifo_into(interface, words, |word| word)
}

/// Reads and decodes `samples.len()` FIFO samples into the provided slice.
///
/// Same framing and failure behaviour as [`read_fifo_words`].
pub fn read_fifo_samples<IFACE>(
    interface: &mut IFACE,
    samples: &mut [EcgSample],
) -> Result<(), IFACE::Error>
where
    IFACE: Max30003Interface,
{
    read_fifo_into(interface, samples, decode_sample)
}

fn read_fifo_into<IFACE, T, F>(interface: &mut IFACE, out: &mut [T], convert: F) -> Result<(), IFACE::Error>
where
    IFACE: Max30003Interface,
    F: Fn(u32) -> T,
{
    let mut tx = match out.len() {
        0 => return Ok(()),
        1 => encode_read_frame(REG_ECG_FIFO),
        _ => encode_read_frame(REG_ECG_FIFO_BURST),
    };

    let mut rx = [0u8; FRAME_LEN];
    for slot in out.iter_mut() {
        interface.exchange(&tx, &mut rx)?;
        *slot = convert(decode_read_frame(&rx));
        tx = [0; FRAME_LEN];
    }

    Ok(())
}
