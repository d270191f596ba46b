//! Fixed-length byte framing for the UART receive path.

use crate::queue::FrameQueue;

/// Number of bytes in one UART frame.
///
/// Equals the report payload size: a frame maps verbatim onto the
/// buttons/hat/axes region of a [`JoystickReport`](crate::JoystickReport).
pub const FRAME_SIZE: usize = 7;

/// A complete frame extracted from the continuous byte stream.
///
/// Only complete frames ever cross the queue boundary; partial
/// accumulation state stays inside the framer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame(pub [u8; FRAME_SIZE]);

impl Frame {
    /// Raw frame bytes, in delivery order.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }
}

/// Accumulates raw bytes into fixed-length frames.
///
/// [`on_byte_received`](ByteFramer::on_byte_received) is the interrupt
/// context entry point: non-blocking, bounded execution time. The
/// accumulation buffer is owned exclusively by that context; completed
/// frames are handed off through the [`FrameQueue`], which is the sole
/// synchronization boundary.
pub struct ByteFramer<'a, const N: usize> {
    queue: &'a FrameQueue<N>,
    buf: [u8; FRAME_SIZE],
    pos: usize,
}

impl<'a, const N: usize> ByteFramer<'a, N> {
    /// Create a framer publishing completed frames to `queue`.
    #[must_use]
    pub const fn new(queue: &'a FrameQueue<N>) -> Self {
        Self {
            queue,
            buf: [0; FRAME_SIZE],
            pos: 0,
        }
    }

    /// Append one received byte, publishing a frame on every wrap.
    ///
    /// Callable from interrupt context; never blocks. When the write
    /// position wraps to zero the completed frame is enqueued with a
    /// non-blocking try, and accumulation of the next frame continues
    /// immediately regardless of the outcome.
    ///
    /// This is a lossy path: if the queue is full the just-completed
    /// frame is dropped (drop-newest) and counted by the queue.
    pub fn on_byte_received(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos = (self.pos + 1) % FRAME_SIZE;
        if self.pos == 0 {
            let _ = self.queue.try_enqueue(Frame(self.buf));
        }
    }

    /// Bytes accumulated toward the next frame.
    #[inline]
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_whole_frames_in_order() {
        let queue: FrameQueue<4> = FrameQueue::new();
        let mut framer = ByteFramer::new(&queue);

        // 21 bytes = exactly three frames
        for b in 0..21u8 {
            framer.on_byte_received(b);
        }

        let mut frames = Vec::new();
        while let Some(frame) = queue.try_dequeue() {
            frames.push(frame);
        }

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].as_bytes(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(frames[1].as_bytes(), &[7, 8, 9, 10, 11, 12, 13]);
        assert_eq!(frames[2].as_bytes(), &[14, 15, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_partial_frame_never_published() {
        let queue: FrameQueue<4> = FrameQueue::new();
        let mut framer = ByteFramer::new(&queue);

        for b in 0..FRAME_SIZE as u8 - 1 {
            framer.on_byte_received(b);
        }

        assert_eq!(framer.pending(), FRAME_SIZE - 1);
        assert!(queue.try_dequeue().is_none());

        // One more byte completes the frame
        framer.on_byte_received(0xAA);
        assert_eq!(framer.pending(), 0);
        let frame = queue.try_dequeue().unwrap();
        assert_eq!(frame.as_bytes()[FRAME_SIZE - 1], 0xAA);
    }

    #[test]
    fn test_frame_count_is_floor_of_bytes() {
        let queue: FrameQueue<10> = FrameQueue::new();
        let mut framer = ByteFramer::new(&queue);

        // 40 bytes -> floor(40 / 7) = 5 frames, 5 bytes pending
        for b in 0..40u8 {
            framer.on_byte_received(b);
        }

        let mut count = 0;
        while queue.try_dequeue().is_some() {
            count += 1;
        }
        assert_eq!(count, 40 / FRAME_SIZE);
        assert_eq!(framer.pending(), 40 % FRAME_SIZE);
    }

    #[test]
    fn test_full_queue_drops_newest_keeps_order() {
        let queue: FrameQueue<2> = FrameQueue::new();
        let mut framer = ByteFramer::new(&queue);

        // Three complete frames into a depth-2 queue
        for b in 0..21u8 {
            framer.on_byte_received(b);
        }

        assert_eq!(queue.overflow_count(), 1);

        // Earlier frames survive, in order; the newest one was dropped
        assert_eq!(queue.try_dequeue().unwrap().as_bytes()[0], 0);
        assert_eq!(queue.try_dequeue().unwrap().as_bytes()[0], 7);
        assert!(queue.try_dequeue().is_none());

        // The framer keeps accumulating after a drop
        for b in 0..FRAME_SIZE as u8 {
            framer.on_byte_received(b);
        }
        assert_eq!(queue.try_dequeue().unwrap().as_bytes(), &[0, 1, 2, 3, 4, 5, 6]);
    }
}
