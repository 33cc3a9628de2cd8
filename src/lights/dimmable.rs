//! Single-channel dimmable LED.
//!
//! Two characteristics, both persisted: power (default off) and brightness
//! (default 50 %, legal 5–100 in steps of 1).  The channel duty is
//! `brightness` while powered and `0` otherwise.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info};

use super::{KEY_BRIGHTNESS, KEY_ON, effective};
use crate::app::characteristic::Characteristic;
use crate::app::ports::{StoragePort, Updatable};
use crate::diagnostics::FaultLog;
use crate::drivers::led_pin::LedPin;

pub const DEFAULT_BRIGHTNESS: i32 = 50;
pub const MIN_BRIGHTNESS: i32 = 5;
pub const MAX_BRIGHTNESS: i32 = 100;

pub struct DimmableLed<P> {
    namespace: &'static str,
    pin: LedPin<P>,
    power: Characteristic<bool>,
    level: Characteristic<i32>,
}

impl<P: SetDutyCycle> DimmableLed<P> {
    /// Bind `pin`, restore committed values from `storage`, and drive the
    /// channel to match them.
    pub fn new(namespace: &'static str, pin: LedPin<P>, storage: &impl StoragePort) -> Self {
        let mut power = Characteristic::persisted(KEY_ON, false);
        let mut level = Characteristic::persisted(KEY_BRIGHTNESS, DEFAULT_BRIGHTNESS)
            .with_range(MIN_BRIGHTNESS, MAX_BRIGHTNESS, 1);
        power.restore(storage, namespace);
        level.restore(storage, namespace);

        info!("Configuring dimmable LED '{}': pin={}", namespace, pin.pin());

        let mut led = Self {
            namespace,
            pin,
            power,
            level,
        };
        let duty = duty_for(led.power.val(), led.level.val());
        led.pin.set(duty);
        led
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn pin(&self) -> &LedPin<P> {
        &self.pin
    }

    pub fn power(&self) -> &Characteristic<bool> {
        &self.power
    }

    pub fn power_mut(&mut self) -> &mut Characteristic<bool> {
        &mut self.power
    }

    pub fn level(&self) -> &Characteristic<i32> {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Characteristic<i32> {
        &mut self.level
    }

    /// Duty last written to the channel.
    pub fn duty(&self) -> u8 {
        self.pin.duty()
    }

    pub fn commit(&mut self, storage: &mut impl StoragePort) {
        self.power.commit(storage, self.namespace);
        self.level.commit(storage, self.namespace);
    }

    pub fn drain_faults(&mut self, log: &mut FaultLog) {
        if let Some(fault) = self.pin.take_fault() {
            log.record(fault);
        }
    }
}

impl<P: SetDutyCycle> Updatable for DimmableLed<P> {
    fn update(&mut self) -> bool {
        let on = effective(&self.power);
        let level = effective(&self.level);

        if self.power.updated() || self.level.updated() {
            debug!(
                "Updating dimmable LED on pin={}: power={}->{} brightness={}->{}",
                self.pin.pin(),
                self.power.val(),
                on,
                self.level.val(),
                level
            );
        }

        self.pin.set(duty_for(on, level));
        true
    }
}

fn duty_for(on: bool, level: i32) -> u8 {
    if on { level.clamp(0, 100) as u8 } else { 0 }
}
