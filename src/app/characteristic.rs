//! Characteristic store — committed vs pending values.
//!
//! Each controllable trait of an endpoint (power, brightness, hue, …) is a
//! [`Characteristic`].  The accessory framework places a *pending* value
//! with [`request`](Characteristic::request); the owning controller reads
//! it during `update()`; the framework then collapses it into the
//! *committed* value with [`commit`](Characteristic::commit), which also
//! persists it through a [`StoragePort`].
//!
//! Range clamping lives here, not in the controllers: every value that
//! enters the store (set request or restored from flash) passes through
//! the configured [`Range`].
//!
//! Values are stored with `postcard`, one key per characteristic inside
//! the endpoint's namespace.

use core::fmt::Debug;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ports::{StorageError, StoragePort};

/// Largest encoded size of any characteristic value (postcard varint i32 = 5).
const VALUE_BUF_LEN: usize = 8;

/// Legal values for a characteristic.  A `step` of zero disables snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

/// Value types a characteristic can hold.
pub trait CharValue:
    Copy + PartialEq + PartialOrd + Debug + Serialize + DeserializeOwned
{
    /// Clamp into `range` and snap to the nearest step.
    fn constrain(self, range: &Range<Self>) -> Self;
}

impl CharValue for bool {
    fn constrain(self, _range: &Range<Self>) -> Self {
        self
    }
}

impl CharValue for i32 {
    fn constrain(self, range: &Range<Self>) -> Self {
        let v = self.clamp(range.min, range.max);
        if range.step <= 0 {
            return v;
        }
        let steps = (v - range.min + range.step / 2) / range.step;
        (range.min + steps * range.step).min(range.max)
    }
}

impl CharValue for f32 {
    fn constrain(self, range: &Range<Self>) -> Self {
        if self.is_nan() {
            return range.min;
        }
        let v = self.clamp(range.min, range.max);
        if range.step <= 0.0 {
            return v;
        }
        let steps = ((v - range.min) / range.step).round();
        (range.min + steps * range.step).min(range.max)
    }
}

/// A single controllable value with committed and pending state.
#[derive(Debug, Clone)]
pub struct Characteristic<T: CharValue> {
    value: T,
    pending: Option<T>,
    range: Option<Range<T>>,
    key: Option<&'static str>,
}

impl<T: CharValue> Characteristic<T> {
    /// Volatile characteristic — never read from or written to storage.
    pub fn new(default: T) -> Self {
        Self {
            value: default,
            pending: None,
            range: None,
            key: None,
        }
    }

    /// Characteristic persisted under `key` in the owning endpoint's namespace.
    pub fn persisted(key: &'static str, default: T) -> Self {
        Self {
            key: Some(key),
            ..Self::new(default)
        }
    }

    /// Builder form of [`set_range`](Self::set_range).
    #[must_use]
    pub fn with_range(mut self, min: T, max: T, step: T) -> Self {
        self.set_range(min, max, step);
        self
    }

    /// Restrict legal values.  The committed value is clamped immediately.
    pub fn set_range(&mut self, min: T, max: T, step: T) {
        let range = Range { min, max, step };
        self.value = self.value.constrain(&range);
        self.pending = self.pending.map(|p| p.constrain(&range));
        self.range = Some(range);
    }

    pub fn range(&self) -> Option<Range<T>> {
        self.range
    }

    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    /// Committed value.
    pub fn val(&self) -> T {
        self.value
    }

    /// Pending value if one is present, otherwise the committed value.
    pub fn new_val(&self) -> T {
        self.pending.unwrap_or(self.value)
    }

    /// `true` when a pending value is present and differs from committed.
    pub fn updated(&self) -> bool {
        matches!(self.pending, Some(p) if p != self.value)
    }

    /// Place a pending value (external set request).  Clamped to the range.
    pub fn request(&mut self, value: T) {
        self.pending = Some(self.clamp(value));
    }

    /// Drop the pending value without applying it.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    /// Collapse pending into committed and persist it.
    ///
    /// Returns `true` when the committed value changed.
    pub fn commit(&mut self, storage: &mut impl StoragePort, namespace: &str) -> bool {
        let Some(next) = self.pending.take() else {
            return false;
        };
        if next == self.value {
            return false;
        }
        self.value = next;
        if let Some(key) = self.key {
            let mut buf = [0u8; VALUE_BUF_LEN];
            match postcard::to_slice(&next, &mut buf) {
                Ok(bytes) => {
                    if let Err(e) = storage.write(namespace, key, bytes) {
                        warn!("{}::{}: persist failed: {}", namespace, key, e);
                    }
                }
                Err(e) => warn!("{}::{}: encode failed: {}", namespace, key, e),
            }
        }
        true
    }

    /// Load the committed value from storage.  Missing or undecodable
    /// entries leave the default in place.
    pub fn restore(&mut self, storage: &impl StoragePort, namespace: &str) {
        let Some(key) = self.key else {
            return;
        };
        let mut buf = [0u8; VALUE_BUF_LEN];
        match storage.read(namespace, key, &mut buf) {
            Ok(len) => match postcard::from_bytes::<T>(&buf[..len]) {
                Ok(v) => {
                    self.value = self.clamp(v);
                    debug!("{}::{}: restored {:?}", namespace, key, self.value);
                }
                Err(e) => warn!("{}::{}: stored value unreadable ({}), keeping {:?}", namespace, key, e, self.value),
            },
            Err(StorageError::NotFound) => {
                debug!("{}::{}: nothing stored, default {:?}", namespace, key, self.value);
            }
            Err(e) => warn!("{}::{}: read failed: {}", namespace, key, e),
        }
    }

    fn clamp(&self, value: T) -> T {
        match &self.range {
            Some(r) => value.constrain(r),
            None => value,
        }
    }
}
