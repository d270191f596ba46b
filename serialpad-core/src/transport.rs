//! Report transport seam and flow-controlled submission.

use crate::gate::{EndpointGate, GateAcquire};
use crate::report::{JoystickReport, REPORT_SIZE};
use core::future::Future;
use embedded_hal_async::delay::DelayNs;

/// Error type for transport writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The underlying stack rejected the write.
    Io,
    /// Device not ready (e.g. USB not enumerated).
    NotReady,
}

/// Async trait for the USB HID interrupt-endpoint transport.
///
/// The transport is a black box exposing a submit operation; completion
/// of a sent report is signaled asynchronously through
/// [`EndpointGate::on_transport_ready`]. The fixed-size parameter makes
/// a report length mismatch unrepresentable at this seam.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap
/// allocation.
pub trait ReportTransport {
    /// Write one report to the endpoint.
    fn submit(
        &mut self,
        report: &[u8; REPORT_SIZE],
    ) -> impl Future<Output = Result<(), TransportError>>;
}

/// Outcome of a flow-controlled report submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum SubmitOutcome {
    /// Written; the gate stays held until the completion signal.
    Submitted,
    /// The gate could not be acquired in time; the transport was not
    /// touched.
    Busy,
    /// The write was rejected; the gate has been released.
    TransportError,
}

/// Submit one report through the gate.
///
/// Hold-until-signaled on success, release-on-failure: on a successful
/// write the gate stays held until [`EndpointGate::on_transport_ready`]
/// fires; on a transport failure it is released immediately so a future
/// submission is not deadlocked behind a report that will never
/// complete.
pub async fn submit_report<T: ReportTransport, D: DelayNs>(
    gate: &EndpointGate,
    transport: &mut T,
    delay: &mut D,
    timeout_ms: u32,
    report: &JoystickReport,
) -> SubmitOutcome {
    match gate.acquire(delay, timeout_ms).await {
        GateAcquire::TimedOut => SubmitOutcome::Busy,
        GateAcquire::Acquired => match transport.submit(&report.as_bytes()).await {
            Ok(()) => SubmitOutcome::Submitted,
            Err(_) => {
                // A failed write produces no completion signal
                gate.release();
                SubmitOutcome::TransportError
            }
        },
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testutil::{block_on, NoDelay};
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    struct MockTransport {
        sent: Arc<Mutex<Vec<[u8; REPORT_SIZE]>>>,
        fail: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }
    }

    impl ReportTransport for MockTransport {
        async fn submit(&mut self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Io);
            }
            self.sent.lock().unwrap().push(*report);
            Ok(())
        }
    }

    #[test]
    fn test_submit_holds_gate_until_ready() {
        let gate = EndpointGate::new();
        let mut transport = MockTransport::new();
        let report = JoystickReport::neutral();

        let outcome = block_on(submit_report(
            &gate,
            &mut transport,
            &mut NoDelay,
            10,
            &report,
        ));
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert!(gate.is_busy());

        // A second submission while in flight is refused without a write
        let outcome = block_on(submit_report(
            &gate,
            &mut transport,
            &mut NoDelay,
            10,
            &report,
        ));
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);

        gate.on_transport_ready();
        let outcome = block_on(submit_report(
            &gate,
            &mut transport,
            &mut NoDelay,
            10,
            &report,
        ));
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(transport.sent.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_write_releases_gate() {
        let gate = EndpointGate::new();
        let mut transport = MockTransport::new();
        transport.fail = true;
        let report = JoystickReport::neutral();

        let outcome = block_on(submit_report(
            &gate,
            &mut transport,
            &mut NoDelay,
            10,
            &report,
        ));
        assert_eq!(outcome, SubmitOutcome::TransportError);

        // The very next acquire succeeds without a ready signal
        assert!(gate.try_acquire());
    }

    #[test]
    fn test_busy_submission_does_not_touch_transport() {
        let gate = EndpointGate::new();
        assert!(gate.try_acquire());

        let mut transport = MockTransport::new();
        let report = JoystickReport::neutral();
        let outcome = block_on(submit_report(
            &gate,
            &mut transport,
            &mut NoDelay,
            10,
            &report,
        ));
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
