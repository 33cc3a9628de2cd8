//! Status LED output used by the identify routine.
//!
//! Active-low: `set_low()` lights the LED, `set_high()` darkens it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO configured in hw_init.
//! On host/test: lands in the hw_init simulation mirror.

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

use crate::drivers::hw_init;

/// Raw ESP-IDF error code from a failed GPIO write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

impl digital::Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Handle to the board's status LED.  Passed explicitly to whichever
/// component runs identify.
#[derive(Debug)]
pub struct StatusPin {
    gpio: i32,
}

impl StatusPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for StatusPin {
    type Error = GpioError;
}

impl OutputPin for StatusPin {
    fn set_low(&mut self) -> Result<(), GpioError> {
        hw_init::gpio_write(self.gpio, false).map_err(GpioError)
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        hw_init::gpio_write(self.gpio, true).map_err(GpioError)
    }
}
