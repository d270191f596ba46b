//! HID joystick report image and assembly.

use crate::frame::{Frame, FRAME_SIZE};

/// Size of the report wire image in bytes.
pub const REPORT_SIZE: usize = 8;

/// Size of the payload region (buttons + hat + four axes).
///
/// The trailing vendor byte is not carried by the UART protocol.
pub const PAYLOAD_SIZE: usize = 7;

// A frame maps verbatim onto the payload region.
const _: () = assert!(PAYLOAD_SIZE == FRAME_SIZE);

/// Button mask driven by the digital input edge.
pub const TRIGGER_BUTTON: u16 = 1 << 2;

/// Hat switch value for "no direction".
pub const HAT_CENTERED: u8 = 0x08;

/// Center value for the unsigned 8-bit axes.
pub const AXIS_CENTER: u8 = 128;

/// Error type for report assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssembleError {
    /// Payload length disagrees with the report payload region.
    ///
    /// Unreachable in a correct configuration; debug builds assert.
    SizeMismatch,
}

/// Fixed-layout HID joystick report.
///
/// Field order and sizes are immutable and must exactly match the
/// externally supplied report descriptor: 16 button bits, a 4-bit hat
/// direction with 4 bits of padding, four unsigned 8-bit axes and one
/// vendor byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Button bitfield (16 buttons)
    pub buttons: u16,
    /// Hat direction (low nibble) + padding
    pub hat: u8,
    /// Left stick X (0-255, center 128)
    pub lx: u8,
    /// Left stick Y
    pub ly: u8,
    /// Right stick X
    pub rx: u8,
    /// Right stick Y
    pub ry: u8,
    /// Vendor-defined byte
    pub vendor: u8,
}

impl JoystickReport {
    /// Neutral report: no buttons, hat centered, sticks centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: HAT_CENTERED,
            lx: AXIS_CENTER,
            ly: AXIS_CENTER,
            rx: AXIS_CENTER,
            ry: AXIS_CENTER,
            vendor: 0,
        }
    }

    /// Wire image of the report, little-endian buttons first.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; REPORT_SIZE] {
        let buttons = self.buttons.to_le_bytes();
        [
            buttons[0],
            buttons[1],
            self.hat,
            self.lx,
            self.ly,
            self.rx,
            self.ry,
            self.vendor,
        ]
    }

    /// Overwrite the payload region with raw frame bytes.
    ///
    /// The frame bytes are reinterpreted directly as buttons, hat and
    /// axes; the vendor byte is left untouched. Size equality between
    /// frame and payload is a compile-time constant.
    pub fn apply_frame(&mut self, frame: &Frame) {
        let b = frame.as_bytes();
        self.buttons = u16::from_le_bytes([b[0], b[1]]);
        self.hat = b[2];
        self.lx = b[3];
        self.ly = b[4];
        self.rx = b[5];
        self.ry = b[6];
    }

    /// Slice variant of [`apply_frame`](Self::apply_frame) for callers
    /// that hold unsized payload bytes.
    pub fn apply_payload(&mut self, payload: &[u8]) -> Result<(), AssembleError> {
        if payload.len() != PAYLOAD_SIZE {
            debug_assert_eq!(payload.len(), PAYLOAD_SIZE, "report payload size mismatch");
            return Err(AssembleError::SizeMismatch);
        }
        self.buttons = u16::from_le_bytes([payload[0], payload[1]]);
        self.hat = payload[2];
        self.lx = payload[3];
        self.ly = payload[4];
        self.rx = payload[5];
        self.ry = payload[6];
        Ok(())
    }

    /// Set or clear the trigger button from the polled digital level.
    ///
    /// All other fields keep their last-known values: a button edge
    /// between two frames reports the current combined state.
    pub fn set_button_level(&mut self, level: bool) {
        if level {
            self.buttons |= TRIGGER_BUTTON;
        } else {
            self.buttons &= !TRIGGER_BUTTON;
        }
    }
}

impl Default for JoystickReport {
    fn default() -> Self {
        Self::neutral()
    }
}
