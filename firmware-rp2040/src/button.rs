//! Polled button input with LED feedback.

use core::convert::Infallible;
use embassy_rp::gpio::{Input, Level, Output};
use embedded_hal::digital::{ErrorType, InputPin};

/// Debounced button adapter that mirrors the polled level onto the
/// on-board LED.
///
/// The dispatch loop polls this through [`InputPin`] on its fixed tick;
/// edge detection lives in the core, this type only reads the level.
pub struct ButtonWithLed<'d> {
    pin: Input<'d>,
    led: Output<'d>,
}

impl<'d> ButtonWithLed<'d> {
    /// Wrap a configured input pin and LED output.
    #[must_use]
    pub fn new(pin: Input<'d>, led: Output<'d>) -> Self {
        Self { pin, led }
    }
}

impl ErrorType for ButtonWithLed<'_> {
    type Error = Infallible;
}

impl InputPin for ButtonWithLed<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let level = self.pin.is_high();
        self.led.set_level(Level::from(level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.is_high()?)
    }
}
