//! XiaoLight firmware library.
//!
//! Dimmable and RGB LED endpoints for a home-automation accessory on the
//! XIAO ESP32-C3.  Exposes the pure-logic modules for integration testing;
//! all ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod lights;
pub mod pins;

// ESP-IDF-only code paths are cfg-guarded inside; host builds get the
// simulation backends.
pub mod adapters;
pub mod drivers;

#[cfg(target_os = "espidf")]
mod esp_link_shims;

// Host unit tests link the std critical-section implementation.
#[cfg(test)]
use critical_section as _;
