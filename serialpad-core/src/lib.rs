//! Platform-agnostic core for a serial-driven USB HID joystick.
//!
//! This crate moves bytes from an interrupt-context producer (the UART
//! receive path) through a bounded queue into a single consumer that
//! assembles and transmits fixed-size HID reports over a flow-controlled
//! endpoint. It has no platform dependencies and can be used both in
//! embedded `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`frame`]: Fixed-length byte framing ([`ByteFramer`], [`Frame`])
//! - [`queue`]: Bounded ISR-to-task hand-off ([`FrameQueue`])
//! - [`report`]: HID report image and assembly ([`JoystickReport`])
//! - [`gate`]: Single-slot endpoint flow control ([`EndpointGate`])
//! - [`transport`]: Report transport seam ([`ReportTransport`], [`submit_report`])
//! - [`dispatch`]: The consumer loop ([`Dispatcher`])
//!
//! # Data flow
//!
//! ```text
//! UART ISR -> ByteFramer -> FrameQueue -> Dispatcher -> JoystickReport
//!                                             |              |
//! button poll ---------------------------------              v
//!                                        EndpointGate -> transport submit
//! ```
//!
//! The button path bypasses the queue: the dispatcher polls the debounced
//! level on a fixed tick and submits on edges.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.
//! Bounded waits are expressed against [`embedded_hal_async::delay::DelayNs`]
//! so the core carries no time driver of its own.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;
pub mod frame;
pub mod gate;
pub mod queue;
pub mod report;
pub mod transport;

// Re-export main types at crate root
pub use dispatch::{Dispatcher, BUTTON_POLL_MS, SUBMIT_TIMEOUT_MS};
pub use frame::{ByteFramer, Frame, FRAME_SIZE};
pub use gate::{EndpointGate, GateAcquire};
pub use queue::{FrameQueue, FRAME_QUEUE_DEPTH};
pub use report::{AssembleError, JoystickReport, PAYLOAD_SIZE, REPORT_SIZE};
pub use transport::{submit_report, ReportTransport, SubmitOutcome, TransportError};
