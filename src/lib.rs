#![no_std]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod fifo;
pub mod frame;
pub mod interface;
pub mod interrupt;
pub mod params;
pub mod registers;

#[cfg(test)]
mod test_support;

pub use crate::config::{ConfigProfile, ConfigProfileBuilder, RegisterWrite};
pub use crate::device::{Max30003, StatusSnapshot};
pub use crate::fifo::{EcgSample, Etag, SampleDisposition};
pub use crate::interrupt::{DispatchReport, Interrupt, InterruptFlags};
pub use crate::error::{Error, Result};
