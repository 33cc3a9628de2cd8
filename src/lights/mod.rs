//! LED endpoint controllers.
//!
//! Each controller owns its PWM channel handles and its characteristics,
//! restores committed values from storage at construction, and reconciles
//! pending vs committed values in [`Updatable::update`].
//!
//! The accessory framework does not dispatch through a base class; it holds
//! [`Endpoint`]s, a tagged variant over the two controller kinds.

pub mod dimmable;
pub mod identify;
pub mod info;
pub mod rgb;

use embedded_hal::pwm::SetDutyCycle;

use crate::app::characteristic::{CharValue, Characteristic};
use crate::app::ports::{StoragePort, Updatable};
use crate::color::RgbDuty;
use crate::diagnostics::FaultLog;
use crate::error::RequestError;

use dimmable::DimmableLed;
use rgb::RgbLed;

// Storage keys, one per characteristic, inside the endpoint namespace.
pub(crate) const KEY_ON: &str = "on";
pub(crate) const KEY_BRIGHTNESS: &str = "bri";
pub(crate) const KEY_HUE: &str = "hue";
pub(crate) const KEY_SATURATION: &str = "sat";

/// Effective value of a characteristic during `update()`: the pending value
/// when `updated()`, otherwise the committed one.
pub(crate) fn effective<T: CharValue>(c: &Characteristic<T>) -> T {
    if c.updated() { c.new_val() } else { c.val() }
}

/// A set request addressed to one characteristic of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetRequest {
    On(bool),
    /// Percent; integer on the wire for both endpoint kinds.
    Brightness(i32),
    /// Degrees.
    Hue(f32),
    /// Percent.
    Saturation(f32),
}

/// Current hardware output of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Single(u8),
    Rgb(RgbDuty),
}

/// Tagged endpoint variant held by the accessory service.
pub enum Endpoint<P> {
    Dimmable(DimmableLed<P>),
    Rgb(RgbLed<P>),
}

impl<P: SetDutyCycle> Endpoint<P> {
    /// Storage namespace of this endpoint.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Dimmable(led) => led.namespace(),
            Self::Rgb(led) => led.namespace(),
        }
    }

    /// Place a pending value on the addressed characteristic.
    pub fn request(&mut self, request: SetRequest) -> Result<(), RequestError> {
        match (self, request) {
            (Self::Dimmable(led), SetRequest::On(on)) => led.power_mut().request(on),
            (Self::Dimmable(led), SetRequest::Brightness(level)) => led.level_mut().request(level),
            (Self::Rgb(led), SetRequest::On(on)) => led.power_mut().request(on),
            (Self::Rgb(led), SetRequest::Brightness(level)) => led.value_mut().request(level as f32),
            (Self::Rgb(led), SetRequest::Hue(h)) => led.hue_mut().request(h),
            (Self::Rgb(led), SetRequest::Saturation(s)) => led.saturation_mut().request(s),
            (Self::Dimmable(_), SetRequest::Hue(_) | SetRequest::Saturation(_)) => {
                return Err(RequestError::UnknownTrait);
            }
        }
        Ok(())
    }

    /// `true` when any owned characteristic has a pending value that differs
    /// from its committed value.
    pub fn any_updated(&self) -> bool {
        match self {
            Self::Dimmable(led) => led.power().updated() || led.level().updated(),
            Self::Rgb(led) => {
                led.power().updated()
                    || led.hue().updated()
                    || led.saturation().updated()
                    || led.value().updated()
            }
        }
    }

    /// Collapse pending values into committed ones and persist them.
    pub fn commit(&mut self, storage: &mut impl StoragePort) {
        match self {
            Self::Dimmable(led) => led.commit(storage),
            Self::Rgb(led) => led.commit(storage),
        }
    }

    pub fn output(&self) -> Output {
        match self {
            Self::Dimmable(led) => Output::Single(led.duty()),
            Self::Rgb(led) => Output::Rgb(led.duty()),
        }
    }

    /// GPIOs bound to this endpoint.
    pub fn gpios(&self) -> heapless::Vec<i32, 3> {
        match self {
            Self::Dimmable(led) => heapless::Vec::from_slice(&[led.pin().pin()]).unwrap_or_default(),
            Self::Rgb(led) => heapless::Vec::from_slice(&led.gpios()).unwrap_or_default(),
        }
    }

    /// Move unreported channel faults into `log`.
    pub fn drain_faults(&mut self, log: &mut FaultLog) {
        match self {
            Self::Dimmable(led) => led.drain_faults(log),
            Self::Rgb(led) => led.drain_faults(log),
        }
    }
}

impl<P: SetDutyCycle> Updatable for Endpoint<P> {
    fn update(&mut self) -> bool {
        match self {
            Self::Dimmable(led) => led.update(),
            Self::Rgb(led) => led.update(),
        }
    }
}

impl<P> From<DimmableLed<P>> for Endpoint<P> {
    fn from(led: DimmableLed<P>) -> Self {
        Self::Dimmable(led)
    }
}

impl<P> From<RgbLed<P>> for Endpoint<P> {
    fn from(led: RgbLed<P>) -> Self {
        Self::Rgb(led)
    }
}
