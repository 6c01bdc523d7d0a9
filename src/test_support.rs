//! Scripted in-memory interface shared by driver tests.

extern crate std;

use std::vec::Vec;

use crate::frame::FRAME_LEN;
use crate::interface::Max30003Interface;

/// Error produced by [`FakeInterface`] on a scripted failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

/// One recorded call on the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Exchange([u8; FRAME_LEN]),
    Transmit([u8; FRAME_LEN]),
}

/// Replies to exchanges with scripted 24-bit words in order and records every
/// frame it is given. Unscripted exchanges read back zero.
pub struct FakeInterface {
    replies: Vec<u32>,
    next_reply: usize,
    frames: Vec<Frame>,
    fail_on: Option<usize>,
    fail_idle: bool,
    idle_calls: usize,
}

impl FakeInterface {
    pub fn with_replies(replies: &[u32]) -> Self {
        Self {
            replies: replies.to_vec(),
            next_reply: 0,
            frames: Vec::new(),
            fail_on: None,
            fail_idle: false,
            idle_calls: 0,
        }
    }

    /// Fails the call with the given zero-based index (exchanges and
    /// transmits share one counter). The failing frame is still recorded.
    pub fn fail_on(mut self, call: usize) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn fail_idle(mut self) -> Self {
        self.fail_idle = true;
        self
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn idle_calls(&self) -> usize {
        self.idle_calls
    }

    fn record(&mut self, frame: Frame) -> Result<(), FakeError> {
        let index = self.frames.len();
        self.frames.push(frame);
        if self.fail_on == Some(index) {
            Err(FakeError)
        } else {
            Ok(())
        }
    }
}

impl Max30003Interface for FakeInterface {
    type Error = FakeError;

    fn exchange(&mut self, tx: &[u8; FRAME_LEN], rx: &mut [u8; FRAME_LEN]) -> Result<(), FakeError> {
        self.record(Frame::Exchange(*tx))?;
        let word = self.replies.get(self.next_reply).copied().unwrap_or(0);
        self.next_reply += 1;
        let [_, high, mid, low] = word.to_be_bytes();
        *rx = [0, high, mid, low];
        Ok(())
    }

    fn transmit(&mut self, tx: &[u8; FRAME_LEN]) -> Result<(), FakeError> {
        self.record(Frame::Transmit(*tx))
    }

    fn idle(&mut self) -> Result<(), FakeError> {
        self.idle_calls += 1;
        if self.fail_idle { Err(FakeError) } else { Ok(()) }
    }
}
