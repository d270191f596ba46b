//! Serial-driven USB HID joystick firmware for RP2040.
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives raw 7-byte frames over UART (115200 baud, 8N1)
//! 2. Queues them across the interrupt/task boundary
//! 3. Assembles and submits fixed-layout USB HID joystick reports,
//!    flow-controlled to one report in flight
//!
//! A debounced button on GPIO 16 drives the trigger bit directly,
//! bypassing the frame queue; the on-board LED mirrors the level.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit (unused) |
//! | UART1 RX | 9    | Serial receive (frame data input) |
//! | Button   | 16   | Active-high digital input (pull-down) |
//! | LED      | 25   | On-board LED (mirrors button level) |
//!
//! # Architecture
//!
//! Three execution contexts, matching the core's concurrency model:
//!
//! - **UART receive task** (high-priority interrupt executor): the
//!   producer context; only ever feeds bytes to the framer, which
//!   try-enqueues completed frames without blocking
//! - **Dispatch task** (thread executor): the single consumer; polls the
//!   button and drains the frame queue through the endpoint gate
//! - **USB task**: runs the device stack; write completion frees the
//!   endpoint gate
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development
//!   (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent reset)
//!
//! # Re-exports
//!
//! This crate re-exports all public items from [`serialpad_core`] for
//! convenience, so consumers only need to depend on this crate.

#![no_std]

// Ensure mutually exclusive panic handler features
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use serialpad_core::{
    submit_report, AssembleError, ByteFramer, Dispatcher, EndpointGate, Frame, FrameQueue,
    GateAcquire, JoystickReport, ReportTransport, SubmitOutcome, TransportError, BUTTON_POLL_MS,
    FRAME_QUEUE_DEPTH, FRAME_SIZE, PAYLOAD_SIZE, REPORT_SIZE, SUBMIT_TIMEOUT_MS,
};

pub mod button;
pub mod usb;

pub use button::ButtonWithLed;
pub use usb::{configure_usb_hid, JoystickRequestHandler, UsbReportTransport, REPORT_DESCRIPTOR};
