//! The consumer loop: turns frames and button edges into submitted
//! reports.

use crate::frame::Frame;
use crate::gate::EndpointGate;
use crate::queue::{FrameQueue, FRAME_QUEUE_DEPTH};
use crate::report::JoystickReport;
use crate::transport::{submit_report, ReportTransport, SubmitOutcome};
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

/// Button poll interval in milliseconds. Also paces the dispatch loop
/// when no frames arrive.
pub const BUTTON_POLL_MS: u32 = 20;

/// Gate wait budget per submission, in milliseconds.
pub const SUBMIT_TIMEOUT_MS: u32 = 10;

/// The single consumer task of the system.
///
/// Owns the current report image exclusively: the button path mutates
/// only the trigger bit, the frame path overwrites the whole payload
/// region. Each iteration of [`run`](Dispatcher::run) polls the button
/// level, then waits on the frame queue for one poll interval.
///
/// A [`Busy`](SubmitOutcome::Busy) submission is not retried within the
/// tick; the next frame or edge simply attempts again with the then
/// current state. A transport error is logged and the loop continues.
pub struct Dispatcher<'a, T, D, const N: usize = FRAME_QUEUE_DEPTH> {
    queue: &'a FrameQueue<N>,
    gate: &'a EndpointGate,
    transport: T,
    delay: D,
    report: JoystickReport,
    button_level: bool,
}

impl<'a, T: ReportTransport, D: DelayNs, const N: usize> Dispatcher<'a, T, D, N> {
    /// Create a dispatcher over the process-wide queue and gate.
    pub fn new(queue: &'a FrameQueue<N>, gate: &'a EndpointGate, transport: T, delay: D) -> Self {
        Self {
            queue,
            gate,
            transport,
            delay,
            report: JoystickReport::neutral(),
            button_level: false,
        }
    }

    /// The current report image.
    #[must_use]
    pub fn report(&self) -> &JoystickReport {
        &self.report
    }

    /// Feed one polled button level; submits a report on an edge.
    ///
    /// Returns `None` when the level is unchanged.
    pub async fn poll_button(&mut self, level: bool) -> Option<SubmitOutcome> {
        if level == self.button_level {
            return None;
        }
        self.button_level = level;
        self.report.set_button_level(level);
        Some(self.submit_current().await)
    }

    /// Assemble and submit a report from a dequeued frame.
    pub async fn dispatch_frame(&mut self, frame: Frame) -> SubmitOutcome {
        self.report.apply_frame(&frame);
        self.submit_current().await
    }

    async fn submit_current(&mut self) -> SubmitOutcome {
        let outcome = submit_report(
            self.gate,
            &mut self.transport,
            &mut self.delay,
            SUBMIT_TIMEOUT_MS,
            &self.report,
        )
        .await;
        match outcome {
            SubmitOutcome::Submitted | SubmitOutcome::Busy => {}
            SubmitOutcome::TransportError => {
                #[cfg(feature = "defmt")]
                defmt::error!("transport rejected report");
            }
        }
        outcome
    }

    /// One loop iteration: poll the button, then wait on the frame
    /// queue for one poll interval.
    pub async fn run_tick<P: InputPin>(&mut self, button: &mut P) {
        // Button read errors are treated as "no change"
        if let Ok(level) = button.is_high() {
            let _ = self.poll_button(level).await;
        }

        let frame = {
            let queue = self.queue;
            queue.dequeue(&mut self.delay, BUTTON_POLL_MS).await
        };
        if let Some(frame) = frame {
            let _ = self.dispatch_frame(frame).await;
        }
    }

    /// Run the dispatch loop, forwarding input state indefinitely.
    ///
    /// This method never returns while the device is powered.
    pub async fn run<P: InputPin>(&mut self, mut button: P) -> ! {
        loop {
            self.run_tick(&mut button).await;
        }
    }
}
