//! Accessory configuration parameters
//!
//! Identity strings reported on the accessory-information unit, identify
//! blink timing, PWM frequency, and pin assignments.  Values can be
//! overridden via NVS; see [`NvsAdapter`](crate::adapters::nvs::NvsAdapter).

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::pins;

/// Maximum length of each identity string.
pub const IDENTITY_LEN: usize = 32;

/// Accessory identity as reported to the pairing framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryIdentity {
    pub name: String<IDENTITY_LEN>,
    pub manufacturer: String<IDENTITY_LEN>,
    pub serial_number: String<IDENTITY_LEN>,
    pub model: String<IDENTITY_LEN>,
    pub firmware_revision: String<IDENTITY_LEN>,
}

impl AccessoryIdentity {
    /// Build an identity, truncating any field longer than [`IDENTITY_LEN`].
    pub fn new(name: &str, manufacturer: &str, serial_number: &str, model: &str, firmware_revision: &str) -> Self {
        Self {
            name: truncated(name),
            manufacturer: truncated(manufacturer),
            serial_number: truncated(serial_number),
            model: truncated(model),
            firmware_revision: truncated(firmware_revision),
        }
    }
}

fn truncated(s: &str) -> String<IDENTITY_LEN> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Core accessory configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryConfig {
    pub identity: AccessoryIdentity,

    // --- Identify ---
    /// Number of blinks in the identify routine
    pub identify_blinks: u8,
    /// Time the status LED stays in each level during identify (milliseconds)
    pub identify_half_period_ms: u32,

    // --- PWM ---
    /// LEDC frequency for all LED channels
    pub pwm_freq_hz: u32,

    // --- Pins ---
    pub dimmable_gpio: i32,
    pub rgb_gpios: [i32; 3],
    pub status_gpio: i32,
}

impl AccessoryConfig {
    /// Every GPIO this configuration claims, status pin last.
    pub fn claimed_gpios(&self) -> [i32; 5] {
        [
            self.dimmable_gpio,
            self.rgb_gpios[0],
            self.rgb_gpios[1],
            self.rgb_gpios[2],
            self.status_gpio,
        ]
    }
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            identity: AccessoryIdentity::new(
                "XiaoLight",
                "XiaoLight",
                "XL-000001",
                "XIAO-ESP32C3-LED",
                env!("CARGO_PKG_VERSION"),
            ),

            // Identify
            identify_blinks: 3,
            identify_half_period_ms: 250,

            // PWM
            pwm_freq_hz: pins::LED_PWM_FREQ_HZ,

            // Pins
            dimmable_gpio: pins::DIMMABLE_LED_GPIO,
            rgb_gpios: [pins::RGB_RED_GPIO, pins::RGB_GREEN_GPIO, pins::RGB_BLUE_GPIO],
            status_gpio: pins::STATUS_LED_GPIO,
        }
    }
}
