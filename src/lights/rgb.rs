//! Three-channel RGB LED driven from HSV characteristics.
//!
//! Characteristics, all persisted: power (default off), hue (0°, legal
//! 0–360), saturation (0 %, legal 0–100) and value (100 %, legal 5–100 in
//! steps of 1).  Output is [`hsv_to_rgb`] scaled by power and converted to
//! duty percent with truncation.
//!
//! ## Independent resolution
//!
//! `update()` resolves each characteristic on its own: a pending hue with
//! no pending saturation mixes the new hue with the committed saturation.
//! The four values are not applied as one atomic colour.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info};

use super::{KEY_BRIGHTNESS, KEY_HUE, KEY_ON, KEY_SATURATION, effective};
use crate::app::characteristic::Characteristic;
use crate::app::ports::{StoragePort, Updatable};
use crate::color::{RgbDuty, hsv_to_rgb};
use crate::diagnostics::FaultLog;
use crate::drivers::led_pin::LedPin;

pub const DEFAULT_HUE: f32 = 0.0;
pub const DEFAULT_SATURATION: f32 = 0.0;
pub const DEFAULT_VALUE: f32 = 100.0;

pub struct RgbLed<P> {
    namespace: &'static str,
    red: LedPin<P>,
    green: LedPin<P>,
    blue: LedPin<P>,
    power: Characteristic<bool>,
    hue: Characteristic<f32>,
    saturation: Characteristic<f32>,
    value: Characteristic<f32>,
}

impl<P: SetDutyCycle> RgbLed<P> {
    /// Bind the three channels, restore committed values from `storage`,
    /// and drive the channels to match them.
    pub fn new(
        namespace: &'static str,
        red: LedPin<P>,
        green: LedPin<P>,
        blue: LedPin<P>,
        storage: &impl StoragePort,
    ) -> Self {
        let mut power = Characteristic::persisted(KEY_ON, false);
        let mut hue = Characteristic::persisted(KEY_HUE, DEFAULT_HUE).with_range(0.0, 360.0, 0.0);
        let mut saturation =
            Characteristic::persisted(KEY_SATURATION, DEFAULT_SATURATION).with_range(0.0, 100.0, 0.0);
        let mut value =
            Characteristic::persisted(KEY_BRIGHTNESS, DEFAULT_VALUE).with_range(5.0, 100.0, 1.0);
        power.restore(storage, namespace);
        hue.restore(storage, namespace);
        saturation.restore(storage, namespace);
        value.restore(storage, namespace);

        info!(
            "Configuring RGB LED '{}': pins=({},{},{})",
            namespace,
            red.pin(),
            green.pin(),
            blue.pin()
        );

        let mut led = Self {
            namespace,
            red,
            green,
            blue,
            power,
            hue,
            saturation,
            value,
        };
        led.restore_state();
        led
    }

    /// Drive the channels from committed values only.
    pub fn restore_state(&mut self) {
        let duty = compute(
            self.power.val(),
            self.hue.val(),
            self.saturation.val(),
            self.value.val(),
        );
        self.write(duty);
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// GPIOs in red, green, blue order.
    pub fn gpios(&self) -> [i32; 3] {
        [self.red.pin(), self.green.pin(), self.blue.pin()]
    }

    pub fn power(&self) -> &Characteristic<bool> {
        &self.power
    }

    pub fn power_mut(&mut self) -> &mut Characteristic<bool> {
        &mut self.power
    }

    pub fn hue(&self) -> &Characteristic<f32> {
        &self.hue
    }

    pub fn hue_mut(&mut self) -> &mut Characteristic<f32> {
        &mut self.hue
    }

    pub fn saturation(&self) -> &Characteristic<f32> {
        &self.saturation
    }

    pub fn saturation_mut(&mut self) -> &mut Characteristic<f32> {
        &mut self.saturation
    }

    pub fn value(&self) -> &Characteristic<f32> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Characteristic<f32> {
        &mut self.value
    }

    /// Duty last written to each channel.
    pub fn duty(&self) -> RgbDuty {
        RgbDuty {
            r: self.red.duty(),
            g: self.green.duty(),
            b: self.blue.duty(),
        }
    }

    pub fn commit(&mut self, storage: &mut impl StoragePort) {
        self.power.commit(storage, self.namespace);
        self.hue.commit(storage, self.namespace);
        self.saturation.commit(storage, self.namespace);
        self.value.commit(storage, self.namespace);
    }

    pub fn drain_faults(&mut self, log: &mut FaultLog) {
        for pin in [&mut self.red, &mut self.green, &mut self.blue] {
            if let Some(fault) = pin.take_fault() {
                log.record(fault);
            }
        }
    }

    fn write(&mut self, duty: RgbDuty) {
        self.red.set(duty.r);
        self.green.set(duty.g);
        self.blue.set(duty.b);
    }
}

impl<P: SetDutyCycle> Updatable for RgbLed<P> {
    fn update(&mut self) -> bool {
        let on = effective(&self.power);
        let h = effective(&self.hue);
        let s = effective(&self.saturation);
        let v = effective(&self.value);

        let duty = compute(on, h, s, v);

        debug!(
            "Updating RGB LED pins=({},{},{}): power={}->{} H={:.0}->{:.0} S={:.0}->{:.0} V={:.0}->{:.0} RGB=({},{},{})",
            self.red.pin(),
            self.green.pin(),
            self.blue.pin(),
            self.power.val(),
            on,
            self.hue.val(),
            h,
            self.saturation.val(),
            s,
            self.value.val(),
            v,
            duty.r,
            duty.g,
            duty.b
        );

        self.write(duty);
        true
    }
}

/// Percent-scaled HSV → gated, truncated channel duty.
fn compute(on: bool, h: f32, s: f32, v: f32) -> RgbDuty {
    RgbDuty::from_color(hsv_to_rgb(h, s / 100.0, v / 100.0), on)
}
