//! Bounded frame hand-off between interrupt and task context.

use crate::frame::Frame;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal_async::delay::DelayNs;
use portable_atomic::{AtomicU32, Ordering};

/// Queue depth used by the reference firmware.
pub const FRAME_QUEUE_DEPTH: usize = 10;

/// Bounded FIFO hand-off from the interrupt-context producer to the
/// single dispatch task.
///
/// The producer side never blocks: [`try_enqueue`](FrameQueue::try_enqueue)
/// fails on a full queue and the just-completed frame is dropped
/// (drop-newest). Drops are counted, never escalated. The consumer side
/// suspends, optionally bounded by a timeout.
///
/// This queue is the only shared mutable state crossing the
/// interrupt/task boundary.
pub struct FrameQueue<const N: usize = FRAME_QUEUE_DEPTH> {
    channel: Channel<CriticalSectionRawMutex, Frame, N>,
    overflow: AtomicU32,
}

impl<const N: usize> FrameQueue<N> {
    /// Create an empty queue. `const` so it can live in a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            overflow: AtomicU32::new(0),
        }
    }

    /// Enqueue a frame without blocking. Callable from interrupt context.
    ///
    /// Returns `false` if the queue is full; the frame is dropped and the
    /// overflow counter incremented.
    pub fn try_enqueue(&self, frame: Frame) -> bool {
        match self.channel.try_send(frame) {
            Ok(()) => true,
            Err(_) => {
                self.overflow.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Dequeue without blocking.
    #[must_use]
    pub fn try_dequeue(&self) -> Option<Frame> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next frame, without bound.
    ///
    /// Only the single consumer task may call this.
    pub async fn dequeue_blocking(&self) -> Frame {
        self.channel.receive().await
    }

    /// Wait for the next frame, at most `timeout_ms` milliseconds.
    ///
    /// Returns `None` on timeout so the consumer never hangs if the
    /// producer goes quiet.
    pub async fn dequeue<D: DelayNs>(&self, delay: &mut D, timeout_ms: u32) -> Option<Frame> {
        match select(self.channel.receive(), delay.delay_ms(timeout_ms)).await {
            Either::First(frame) => Some(frame),
            Either::Second(()) => None,
        }
    }

    /// Number of frames dropped because the queue was full.
    #[must_use]
    pub fn overflow_count(&self) -> u32 {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Number of frames currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{block_on, NoDelay};

    fn frame(tag: u8) -> Frame {
        Frame([tag; crate::frame::FRAME_SIZE])
    }

    #[test]
    fn test_fifo_order() {
        let queue: FrameQueue<4> = FrameQueue::new();
        assert!(queue.try_enqueue(frame(1)));
        assert!(queue.try_enqueue(frame(2)));
        assert!(queue.try_enqueue(frame(3)));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_dequeue(), Some(frame(1)));
        assert_eq!(queue.try_dequeue(), Some(frame(2)));
        assert_eq!(queue.try_dequeue(), Some(frame(3)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_refuses_and_counts() {
        let queue: FrameQueue<2> = FrameQueue::new();
        assert!(queue.try_enqueue(frame(1)));
        assert!(queue.try_enqueue(frame(2)));
        assert!(!queue.try_enqueue(frame(3)));
        assert!(!queue.try_enqueue(frame(4)));

        assert_eq!(queue.overflow_count(), 2);
        // Queued frames are untouched by the failed enqueues
        assert_eq!(queue.try_dequeue(), Some(frame(1)));
        assert_eq!(queue.try_dequeue(), Some(frame(2)));
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_dequeue_ready_frame() {
        let queue: FrameQueue<2> = FrameQueue::new();
        queue.try_enqueue(frame(7));
        let got = block_on(queue.dequeue(&mut NoDelay, 20));
        assert_eq!(got, Some(frame(7)));
    }

    #[test]
    fn test_dequeue_timeout_on_empty() {
        let queue: FrameQueue<2> = FrameQueue::new();
        let got = block_on(queue.dequeue(&mut NoDelay, 20));
        assert_eq!(got, None);
    }

    #[test]
    fn test_dequeue_blocking_ready_frame() {
        let queue: FrameQueue<2> = FrameQueue::new();
        queue.try_enqueue(frame(9));
        assert_eq!(block_on(queue.dequeue_blocking()), frame(9));
    }
}
