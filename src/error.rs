//! Unified error types for the XiaoLight firmware.
//!
//! A single `Error` enum that every subsystem can convert into. All variants
//! are `Copy` so they can be recorded in the fault log and passed through the
//! accessory service without allocation.
//!
//! Controller `update()` and identify never return these: a failed PWM or
//! GPIO write is logged and recorded in
//! [`FaultLog`](crate::diagnostics::FaultLog), and the operation still
//! reports success.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A PWM channel or GPIO write failed.
    Actuator(ActuatorError),
    /// A set request from the accessory framework could not be routed.
    Request(RequestError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Request(e) => write!(f, "request: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO level write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

/// Reasons a set request or endpoint registration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// No endpoint is registered under the given id.
    UnknownEndpoint,
    /// The endpoint does not expose the requested characteristic.
    UnknownTrait,
    /// The endpoint table is full.
    TooManyEndpoints,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEndpoint => write!(f, "unknown endpoint"),
            Self::UnknownTrait => write!(f, "characteristic not supported by endpoint"),
            Self::TooManyEndpoints => write!(f, "endpoint table full"),
        }
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
