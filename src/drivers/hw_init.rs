//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timer, one LEDC channel per LED GPIO, and the status
//! LED output using raw ESP-IDF sys calls.  Called once from `main()` before
//! the event loop starts.
//!
//! On host targets every call is simulated: duty and level writes land in
//! an in-memory mirror that [`sim_ledc_duty`] and [`sim_gpio_level`] read
//! back.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::AccessoryConfig;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
    TooManyChannels,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc)  => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc)   => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
            Self::TooManyChannels       => write!(f, "more LED GPIOs than LEDC channels"),
        }
    }
}

/// Handed out by [`init_peripherals`]: LEDC channel per LED GPIO, in the
/// order dimmable, red, green, blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedcAssignment {
    pub dimmable: u32,
    pub rgb: [u32; 3],
}

const ASSIGNMENT: LedcAssignment = LedcAssignment {
    dimmable: 0,
    rgb: [1, 2, 3],
};

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &AccessoryConfig) -> Result<LedcAssignment, HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_ledc(config)?;
        init_status_output(config.status_gpio)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(ASSIGNMENT)
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(config: &AccessoryConfig) -> Result<LedcAssignment, HwInitError> {
    if ASSIGNMENT.rgb[2] >= pins::LEDC_CHANNEL_COUNT {
        return Err(HwInitError::TooManyChannels);
    }
    log::info!(
        "hw_init(sim): LEDC {} Hz on GPIO {}/{:?}, status GPIO {}",
        config.pwm_freq_hz,
        config.dimmable_gpio,
        config.rgb_gpios,
        config.status_gpio
    );
    Ok(ASSIGNMENT)
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(config: &AccessoryConfig) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
        freq_hz: config.pwm_freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcTimerFailed(ret)); }

    let channels = [
        (ASSIGNMENT.dimmable, config.dimmable_gpio),
        (ASSIGNMENT.rgb[0], config.rgb_gpios[0]),
        (ASSIGNMENT.rgb[1], config.rgb_gpios[1]),
        (ASSIGNMENT.rgb[2], config.rgb_gpios[2]),
    ];
    for (channel, gpio) in channels {
        if channel >= pins::LEDC_CHANNEL_COUNT {
            return Err(HwInitError::TooManyChannels);
        }
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcChannelFailed(ret)); }
    }

    info!("hw_init: LEDC configured ({} Hz, {}-bit, 4 channels)", config.pwm_freq_hz, pins::PWM_RESOLUTION_BITS);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u16) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    let ret = unsafe { ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32) };
    if ret != ESP_OK as i32 { return Err(ret); }
    let ret = unsafe { ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) };
    if ret != ESP_OK as i32 { return Err(ret); }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(channel: u32, duty: u16) -> Result<(), i32> {
    match SIM_LEDC_DUTY.get(channel as usize) {
        Some(slot) => {
            slot.store(duty, Ordering::Relaxed);
            Ok(())
        }
        None => Err(-1),
    }
}

// ── Status GPIO ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_status_output(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    // Active-low LED: start dark.
    unsafe { gpio_set_level(pin, 1) };

    info!("hw_init: status GPIO {} configured", pin);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 { return Err(ret); }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    if !(0..32).contains(&pin) {
        return Err(-1);
    }
    let bit = 1u32 << pin;
    if high {
        SIM_GPIO_LEVELS.fetch_or(bit, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!bit, Ordering::Relaxed);
    }
    Ok(())
}

// ── Simulation mirror ────────────────────────────────────────

static SIM_LEDC_DUTY: [AtomicU16; pins::LEDC_CHANNEL_COUNT as usize] =
    [const { AtomicU16::new(0) }; pins::LEDC_CHANNEL_COUNT as usize];
static SIM_GPIO_LEVELS: AtomicU32 = AtomicU32::new(0);

/// Last raw duty written to `channel` (host simulation only; 0 on device).
pub fn sim_ledc_duty(channel: u32) -> u16 {
    SIM_LEDC_DUTY
        .get(channel as usize)
        .map_or(0, |slot| slot.load(Ordering::Relaxed))
}

/// Last level written to `pin` (host simulation only; `false` on device).
pub fn sim_gpio_level(pin: i32) -> bool {
    (0..32).contains(&pin) && SIM_GPIO_LEVELS.load(Ordering::Relaxed) & (1u32 << pin) != 0
}
