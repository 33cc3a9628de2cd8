//! XiaoLight Firmware — Main Entry Point
//!
//! Hexagonal architecture with a cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  LedcChannel ×4    StatusPin      NvsAdapter   LogEventSink  │
//! │  (SetDutyCycle)    (OutputPin)    (Config+NVS) (EventSink)   │
//! │                                                              │
//! │  ─────────────── Port / embedded-hal boundary ──────────     │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            AccessoryService (pure logic)             │    │
//! │  │  DimmableLed · RgbLed · AccessoryInformation         │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  COMMAND_CHANNEL (transport → control loop)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use xiaolight::adapters::log_sink::LogEventSink;
use xiaolight::adapters::nvs::NvsAdapter;
use xiaolight::app::ports::ConfigPort;
use xiaolight::app::service::AccessoryService;
use xiaolight::config::AccessoryConfig;
use xiaolight::diagnostics;
use xiaolight::drivers::hw_init;
use xiaolight::drivers::led_pin::{LedPin, LedcChannel};
use xiaolight::drivers::status_led::StatusPin;
use xiaolight::events;
use xiaolight::lights::dimmable::DimmableLed;
use xiaolight::lights::info::AccessoryInformation;
use xiaolight::lights::rgb::RgbLed;

/// Control-loop period.
const LOOP_INTERVAL_MS: u32 = 10;

/// Log a metrics snapshot every this many milliseconds.
const METRICS_INTERVAL_MS: u64 = 60_000;

fn uptime_ms() -> u64 {
    // SAFETY: read-only monotonic timer query.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("╔══════════════════════════════════════╗");
    info!("║  XiaoLight v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {e}"))?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            AccessoryConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let ledc = hw_init::init_peripherals(&config)
        .map_err(|e| anyhow::anyhow!("HAL init failed: {e}"))?;
    let mut status = StatusPin::new(config.status_gpio);

    // ── 4. Accessory + endpoints ──────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = AccessoryService::new(AccessoryInformation::from_config(&config));

    let dimmable = DimmableLed::new(
        "led0",
        LedPin::new(config.dimmable_gpio, LedcChannel::new(ledc.dimmable)),
        &nvs,
    );
    let [r, g, b] = config.rgb_gpios;
    let rgb = RgbLed::new(
        "led1",
        LedPin::new(r, LedcChannel::new(ledc.rgb[0])),
        LedPin::new(g, LedcChannel::new(ledc.rgb[1])),
        LedPin::new(b, LedcChannel::new(ledc.rgb[2])),
        &nvs,
    );
    service
        .add_endpoint(dimmable, &mut sink)
        .map_err(|e| anyhow::anyhow!("dimmable endpoint: {e}"))?;
    service
        .add_endpoint(rgb, &mut sink)
        .map_err(|e| anyhow::anyhow!("RGB endpoint: {e}"))?;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut last_metrics_ms = 0u64;
    loop {
        let now = uptime_ms();
        let now_ms = now as u32;

        events::drain_commands(|cmd| {
            if let Err(e) = service.handle_command(cmd, now_ms, &mut status, &mut sink) {
                warn!("Command {:?} rejected: {}", cmd, e);
            }
        });
        service.process(&mut nvs, &mut sink);
        service.tick(now_ms, &mut status, &mut sink);

        if now.saturating_sub(last_metrics_ms) >= METRICS_INTERVAL_MS {
            last_metrics_ms = now;
            let m = service.metrics(now);
            info!(
                "METRICS | uptime={}s endpoints={} updates={} identify={} faults={} heap={}",
                m.uptime_ms / 1000,
                m.endpoints,
                m.updates_processed,
                m.identify_runs,
                m.fault_count,
                m.heap_free
            );
        }

        FreeRtos::delay_ms(LOOP_INTERVAL_MS);
    }
}
