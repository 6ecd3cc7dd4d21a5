//! Per-channel frame queues shared between the network producer and the
//! draw loop.
//!
//! One critical-section mutex guards the queues of every channel. The draw
//! loop takes it once per tick for the whole draining pass, and never holds
//! it across a hardware commit or a sleep.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::buffer_queue::{BufferQueue, OverflowPolicy};
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::timestamp::Timestamp;

/// Frame queues for `CHANNELS` outputs
pub struct FrameQueues<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> {
    inner: Mutex<RefCell<[BufferQueue<LEDS, DEPTH>; CHANNELS]>>,
}

impl<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize>
    FrameQueues<CHANNELS, LEDS, DEPTH>
{
    /// Create empty queues that drop their oldest frame on overflow
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(
                [const { BufferQueue::<LEDS, DEPTH>::new(OverflowPolicy::DropOldest) }; CHANNELS],
            )),
        }
    }

    /// Change what one channel does when its queue is full
    pub fn set_overflow_policy(&self, channel: usize, policy: OverflowPolicy) -> Result<()> {
        self.with_queue(channel, |queue| queue.set_overflow_policy(policy))
    }

    /// Get a sender handle for the producer side.
    ///
    /// Multiple senders can coexist; they share the same queues.
    pub const fn sender(&self) -> FrameSender<'_, CHANNELS, LEDS, DEPTH> {
        FrameSender { queues: self }
    }

    pub const fn channels(&self) -> usize {
        CHANNELS
    }

    /// Append a frame to a channel's queue.
    ///
    /// The caller guarantees timestamps are non-decreasing per channel.
    pub fn push_frame(
        &self,
        channel: usize,
        seconds: u64,
        micros: u32,
        pixels: &[Rgb],
    ) -> Result<()> {
        if channel >= CHANNELS {
            return Err(Error::UnknownChannel(channel));
        }
        let frame = Frame::new(Timestamp::new(seconds, micros), pixels)?;
        self.with_queue(channel, |queue| queue.push_frame(frame).map(|_| ()))?
    }

    /// Run `f` on one channel's queue inside the lock
    pub fn with_queue<R>(
        &self,
        channel: usize,
        f: impl FnOnce(&mut BufferQueue<LEDS, DEPTH>) -> R,
    ) -> Result<R> {
        critical_section::with(|cs| {
            let mut queues = self.inner.borrow(cs).borrow_mut();
            let queue = queues
                .get_mut(channel)
                .ok_or(Error::UnknownChannel(channel))?;
            Ok(f(queue))
        })
    }

    /// Run `f` on every channel's queue inside a single lock
    pub fn with_queues<R>(&self, f: impl FnOnce(&mut [BufferQueue<LEDS, DEPTH>; CHANNELS]) -> R) -> R {
        critical_section::with(|cs| {
            let mut queues = self.inner.borrow(cs).borrow_mut();
            f(&mut queues)
        })
    }

    pub fn is_empty(&self, channel: usize) -> Result<bool> {
        self.with_queue(channel, |queue| queue.is_empty())
    }

    pub fn len(&self, channel: usize) -> Result<usize> {
        self.with_queue(channel, |queue| queue.len())
    }

    /// Drop every buffered frame on every channel
    pub fn clear(&self) {
        self.with_queues(|queues| queues.iter_mut().for_each(BufferQueue::clear));
    }
}

impl<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> Default
    for FrameQueues<CHANNELS, LEDS, DEPTH>
{
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle for [`FrameQueues`].
///
/// This is a lightweight reference that can be copied and passed around.
#[derive(Clone, Copy)]
pub struct FrameSender<'a, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> {
    queues: &'a FrameQueues<CHANNELS, LEDS, DEPTH>,
}

impl<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize>
    FrameSender<'_, CHANNELS, LEDS, DEPTH>
{
    /// Append a frame to a channel's queue
    pub fn push_frame(
        &self,
        channel: usize,
        seconds: u64,
        micros: u32,
        pixels: &[Rgb],
    ) -> Result<()> {
        self.queues.push_frame(channel, seconds, micros, pixels)
    }
}
