//! Accessory-information unit: identity strings plus the identify routine.

use embedded_hal::digital::OutputPin;
use log::info;

use super::identify::{IdentifyRoutine, IdentifyState};
use crate::config::{AccessoryConfig, AccessoryIdentity};
use crate::diagnostics::FaultEntry;
use crate::error::ActuatorError;

pub struct AccessoryInformation {
    identity: AccessoryIdentity,
    status_gpio: i32,
    identify: IdentifyRoutine,
}

impl AccessoryInformation {
    pub fn new(identity: AccessoryIdentity, status_gpio: i32, identify: IdentifyRoutine) -> Self {
        info!("Configuring accessory information:");
        info!("  Name: {}", identity.name);
        info!("  Manufacturer: {}", identity.manufacturer);
        info!("  Serial: {}", identity.serial_number);
        info!("  Model: {}", identity.model);
        info!("  Version: {}", identity.firmware_revision);
        info!(
            "  Identify: {} blinks on GPIO {} ({} ms per level)",
            identify.n_blinks(),
            status_gpio,
            identify.half_period_ms()
        );
        Self {
            identity,
            status_gpio,
            identify,
        }
    }

    pub fn from_config(config: &AccessoryConfig) -> Self {
        Self::new(
            config.identity.clone(),
            config.status_gpio,
            IdentifyRoutine::with_half_period(config.identify_blinks, config.identify_half_period_ms),
        )
    }

    pub fn identity(&self) -> &AccessoryIdentity {
        &self.identity
    }

    pub fn status_gpio(&self) -> i32 {
        self.status_gpio
    }

    pub fn identify(&self) -> &IdentifyRoutine {
        &self.identify
    }

    /// Handle an identify request.  Returns `true` if a new sequence began.
    pub fn request_identify(&mut self, now_ms: u32, status: &mut impl OutputPin) -> bool {
        self.identify.start(now_ms, status)
    }

    /// Advance a running sequence.  Returns `true` on the poll where the
    /// sequence finishes.
    pub fn poll_identify(&mut self, now_ms: u32, status: &mut impl OutputPin) -> bool {
        self.identify.poll(now_ms, status) == IdentifyState::Done && self.identify.complete()
    }

    /// Failed status-pin write not yet handed to the fault log.
    pub fn take_fault(&mut self) -> Option<FaultEntry> {
        self.identify.take_failed_level().map(|high| FaultEntry {
            gpio: self.status_gpio,
            error: ActuatorError::GpioWriteFailed,
            duty: u8::from(high),
        })
    }
}
