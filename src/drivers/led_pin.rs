//! PWM LED channel driver.
//!
//! [`LedPin`] is the exclusively owned handle a controller drives: it binds
//! one GPIO identity to one PWM channel and accepts duty in percent.  It is
//! not `Clone`: once moved into a controller, no other controller can
//! reach the same channel.
//!
//! ## Dual-target design
//!
//! [`LedcChannel`] is the production `SetDutyCycle` implementation.
//! On ESP-IDF: writes the LEDC duty register via hw_init.
//! On host/test: lands in the hw_init simulation mirror.

use embedded_hal::pwm::{self, Error as _, ErrorKind, ErrorType, SetDutyCycle};
use log::warn;

use crate::diagnostics::FaultEntry;
use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

// ── LEDC channel ──────────────────────────────────────────────

/// Raw ESP-IDF error code from a failed LEDC call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcError(pub i32);

impl pwm::Error for LedcError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One configured LEDC channel (see `hw_init::init_peripherals`).
#[derive(Debug)]
pub struct LedcChannel {
    channel: u32,
}

impl LedcChannel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }
}

impl ErrorType for LedcChannel {
    type Error = LedcError;
}

impl SetDutyCycle for LedcChannel {
    fn max_duty_cycle(&self) -> u16 {
        pins::PWM_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        hw_init::ledc_set(self.channel, duty).map_err(LedcError)
    }
}

// ── LedPin ────────────────────────────────────────────────────

/// Owned LED channel handle: GPIO identity plus PWM output.
pub struct LedPin<P> {
    gpio: i32,
    pwm: P,
    duty: u8,
    fault_count: u32,
    unreported: Option<FaultEntry>,
}

impl<P: SetDutyCycle> LedPin<P> {
    pub fn new(gpio: i32, pwm: P) -> Self {
        Self {
            gpio,
            pwm,
            duty: 0,
            fault_count: 0,
            unreported: None,
        }
    }

    /// GPIO this channel drives.
    pub fn pin(&self) -> i32 {
        self.gpio
    }

    /// Drive the channel at `duty` percent (clamped to 100).
    ///
    /// A failed write is logged and kept for the fault log; it is not
    /// returned to the caller.
    pub fn set(&mut self, duty: u8) {
        let duty = duty.min(100);
        self.duty = duty;
        if let Err(e) = self.pwm.set_duty_cycle_percent(duty) {
            self.fault_count = self.fault_count.saturating_add(1);
            warn!("GPIO {}: PWM write of {}% failed ({:?})", self.gpio, duty, e.kind());
            self.unreported = Some(FaultEntry {
                gpio: self.gpio,
                error: ActuatorError::PwmWriteFailed,
                duty,
            });
        }
    }

    /// Last duty commanded through [`set`](Self::set).
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Total failed writes since construction.
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Most recent failed write not yet handed to the fault log.
    pub fn take_fault(&mut self) -> Option<FaultEntry> {
        self.unreported.take()
    }
}
