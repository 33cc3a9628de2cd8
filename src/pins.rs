//! GPIO / peripheral pin assignments for the Seeed XIAO ESP32-C3 board.
//!
//! Single source of truth — the default [`AccessoryConfig`](crate::config::AccessoryConfig)
//! and the LEDC setup in `hw_init` reference this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Dimmable LED (single channel)
// ---------------------------------------------------------------------------

/// D2 — white LED strip MOSFET gate.
pub const DIMMABLE_LED_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// RGB LED (three channels, common cathode)
// ---------------------------------------------------------------------------

/// D3
pub const RGB_RED_GPIO: i32 = 5;
/// D4
pub const RGB_GREEN_GPIO: i32 = 6;
/// D5
pub const RGB_BLUE_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Status LED (identify blinking)
// ---------------------------------------------------------------------------

/// D10 — active-low status LED. Driving the pin LOW lights it.
pub const STATUS_LED_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// Maximum raw duty for [`PWM_RESOLUTION_BITS`].
pub const PWM_MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;
/// Default LEDC frequency for LED channels (5 kHz — flicker-free on camera).
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
/// The ESP32-C3 LEDC peripheral has six low-speed channels.
pub const LEDC_CHANNEL_COUNT: u32 = 6;
