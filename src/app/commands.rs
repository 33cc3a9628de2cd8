//! Inbound commands to the accessory service.
//!
//! These represent requests delivered by the pairing/transport layer that
//! the [`AccessoryService`](super::service::AccessoryService) routes to
//! an endpoint's characteristics or to the identify routine.

use crate::lights::SetRequest;

/// Index of an endpoint in the service's endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EndpointId(pub u8);

impl core::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Turn an endpoint on or off.
    SetPower { endpoint: EndpointId, on: bool },

    /// Brightness (dimmable) or value (RGB), percent.
    SetBrightness { endpoint: EndpointId, level: i32 },

    /// Hue in degrees (RGB only).
    SetHue { endpoint: EndpointId, degrees: f32 },

    /// Saturation in percent (RGB only).
    SetSaturation { endpoint: EndpointId, percent: f32 },

    /// Blink the status LED.
    Identify,
}

impl AppCommand {
    /// Target endpoint and characteristic request, `None` for identify.
    pub fn as_set_request(&self) -> Option<(EndpointId, SetRequest)> {
        match *self {
            Self::SetPower { endpoint, on } => Some((endpoint, SetRequest::On(on))),
            Self::SetBrightness { endpoint, level } => Some((endpoint, SetRequest::Brightness(level))),
            Self::SetHue { endpoint, degrees } => Some((endpoint, SetRequest::Hue(degrees))),
            Self::SetSaturation { endpoint, percent } => Some((endpoint, SetRequest::Saturation(percent))),
            Self::Identify => None,
        }
    }
}
