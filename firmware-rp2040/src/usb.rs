//! USB HID joystick transport implementation.

use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use serialpad_core::{EndpointGate, ReportTransport, TransportError, REPORT_SIZE};

/// HID Report Descriptor for the fixed 8-byte joystick report.
///
/// Layout must match [`JoystickReport`](serialpad_core::JoystickReport)
/// exactly: 16 buttons, a 4-bit hat switch with 4 bits of padding, four
/// unsigned 8-bit axes (X/Y/Z/Rz) and one vendor byte. The trailing
/// vendor output report is host-to-device and ignored.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (16 buttons) ---
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x35, 0x00, //   Physical Minimum (0)
    0x45, 0x01, //   Physical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Hat switch (4 bits + 4 bits padding) ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x25, 0x07, //   Logical Maximum (7)
    0x46, 0x3B, 0x01, // Physical Maximum (315)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x65, 0x14, //   Unit (English Rotation: degrees)
    0x09, 0x39, //   Usage (Hat switch)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    // --- Axes (X/Y/Z/Rz, unsigned 8-bit) ---
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x46, 0xFF, 0x00, // Physical Maximum (255)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Vendor byte ---
    0x06, 0x00, 0xFF, // Usage Page (Vendor Defined 0xFF00)
    0x09, 0x20, //   Usage (0x20)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Vendor output report (host to device) ---
    0x0A, 0x21, 0x26, // Usage (0x2621)
    0x95, 0x08, //   Report Count (8)
    0x91, 0x02, //   Output (Data, Variable, Absolute, Non-volatile)
    //
    0xC0, // End Collection
];

/// USB HID joystick transport.
///
/// Wraps an embassy-usb HID writer. Completion of the IN transfer is
/// forwarded to the endpoint gate, which is what lets the dispatch task
/// submit the next report.
pub struct UsbReportTransport<'d> {
    writer: HidWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, REPORT_SIZE>,
    gate: &'static EndpointGate,
    ready: bool,
}

impl<'d> UsbReportTransport<'d> {
    /// Create a new transport from the given HID writer and the gate its
    /// completions should free.
    pub fn new(
        writer: HidWriter<
            'd,
            embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>,
            REPORT_SIZE,
        >,
        gate: &'static EndpointGate,
    ) -> Self {
        Self {
            writer,
            gate,
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }
}

impl ReportTransport for UsbReportTransport<'_> {
    async fn submit(&mut self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
        if !self.ready {
            return Err(TransportError::NotReady);
        }
        match self.writer.write(report).await {
            Ok(()) => {
                // The IN transfer completed; the endpoint can take the
                // next report.
                self.gate.on_transport_ready();
                Ok(())
            }
            Err(_) => Err(TransportError::Io),
        }
    }
}

/// HID request handler (handles SET_REPORT, etc.).
///
/// Output reports carry the vendor-defined host-to-device byte block,
/// which this firmware accepts and ignores.
pub struct JoystickRequestHandler;

impl RequestHandler for JoystickRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the transport.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>>,
    state: &'d mut State<'d>,
) -> HidWriter<'d, embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>, REPORT_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: REPORT_SIZE as u16,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    embassy_usb::class::hid::HidWriter::new(builder, state, config)
}
