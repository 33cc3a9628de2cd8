//! Mock hardware and adapters for integration tests.
//!
//! PWM channels and the status pin record every write into shared history
//! so tests can assert on the full output sequence after the handle has
//! been moved into a controller.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;
use serde::Serialize;
use xiaolight::app::events::AppEvent;
use xiaolight::app::ports::{EventSink, StorageError, StoragePort};
use xiaolight::drivers::led_pin::LedPin;

/// Max duty of the mock channels: raw duty equals percent.
pub const MOCK_MAX_DUTY: u16 = 100;

// ── MockPwm ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPwmError;

impl pwm::Error for MockPwmError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

/// Shared view of a [`MockPwm`] kept by the test after the channel is
/// moved into a [`LedPin`].
#[derive(Clone, Default)]
pub struct PwmProbe {
    history: Rc<RefCell<Vec<u16>>>,
    failing: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl PwmProbe {
    pub fn history(&self) -> Vec<u16> {
        self.history.borrow().clone()
    }

    pub fn last(&self) -> Option<u16> {
        self.history.borrow().last().copied()
    }

    pub fn writes(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

pub struct MockPwm {
    probe: PwmProbe,
}

impl pwm::ErrorType for MockPwm {
    type Error = MockPwmError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        MOCK_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), MockPwmError> {
        if self.probe.failing.get() {
            return Err(MockPwmError);
        }
        self.probe.history.borrow_mut().push(duty);
        Ok(())
    }
}

/// A [`LedPin`] on `gpio` backed by a fresh mock channel.
pub fn mock_pin(gpio: i32) -> (LedPin<MockPwm>, PwmProbe) {
    let probe = PwmProbe::default();
    let pin = LedPin::new(
        gpio,
        MockPwm {
            probe: probe.clone(),
        },
    );
    (pin, probe)
}

// ── MockStatus ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockGpioError;

impl digital::Error for MockGpioError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Status LED recording every level written (`false` = LOW = lit).
#[derive(Default)]
pub struct MockStatus {
    pub levels: Vec<bool>,
    pub failing: bool,
}

impl digital::ErrorType for MockStatus {
    type Error = MockGpioError;
}

impl OutputPin for MockStatus {
    fn set_low(&mut self) -> Result<(), MockGpioError> {
        if self.failing {
            return Err(MockGpioError);
        }
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockGpioError> {
        if self.failing {
            return Err(MockGpioError);
        }
        self.levels.push(true);
        Ok(())
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Async delay that completes immediately and records the requested time.
#[derive(Default)]
pub struct MockDelay {
    pub waits_ns: Vec<u64>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.waits_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms) * 1_000_000);
    }
}

/// Status pin whose writes cannot fail, for the async runner.
#[derive(Default)]
pub struct InfallibleStatus {
    pub levels: Vec<bool>,
}

impl digital::ErrorType for InfallibleStatus {
    type Error = Infallible;
}

impl OutputPin for InfallibleStatus {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.push(true);
        Ok(())
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a characteristic value encoded the way the firmware stores it.
    pub fn put<T: Serialize>(&mut self, namespace: &str, key: &str, value: T) {
        let bytes = postcard::to_allocvec(&value).expect("encode");
        self.store.insert(format!("{}::{}", namespace, key), bytes);
    }

    /// Seed raw bytes.
    pub fn put_raw(&mut self, namespace: &str, key: &str, bytes: &[u8]) {
        self.store
            .insert(format!("{}::{}", namespace, key), bytes.to_vec());
    }

    /// Decode a stored characteristic value.
    pub fn get<T: serde::de::DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        self.store
            .get(&format!("{}::{}", namespace, key))
            .and_then(|b| postcard::from_bytes(b).ok())
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
