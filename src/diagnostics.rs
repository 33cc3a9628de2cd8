//! Output fault log and runtime diagnostics.
//!
//! Failed PWM/GPIO writes never surface through `update()` or identify;
//! instead each channel hands its most recent failure to the
//! [`FaultLog`], a fixed-capacity ring that keeps the newest
//! [`FAULT_RING_SLOTS`] entries plus a lifetime counter.
//!
//! Runtime metrics (uptime, update count, identify runs, faults) are
//! collected on-demand as a [`RuntimeMetrics`] snapshot.

use heapless::Deque;
use serde::{Deserialize, Serialize};

use crate::error::ActuatorError;

pub const FAULT_RING_SLOTS: usize = 8;

/// One failed hardware write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultEntry {
    /// GPIO the write was addressed to.
    pub gpio: i32,
    pub error: ActuatorError,
    /// Duty percent (PWM) or level (GPIO, 0/1) that failed to apply.
    pub duty: u8,
}

/// Ring buffer of recent output faults.
#[derive(Debug, Default)]
pub struct FaultLog {
    entries: Deque<FaultEntry, FAULT_RING_SLOTS>,
    total: u32,
}

impl FaultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest when full.
    pub fn record(&mut self, entry: FaultEntry) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        let _ = self.entries.push_back(entry);
        self.total = self.total.saturating_add(1);
    }

    /// Faults recorded since boot, including evicted ones.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FaultEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&FaultEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop retained entries; the lifetime counter is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Runtime diagnostics snapshot collected on-demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeMetrics {
    pub uptime_ms: u64,
    pub endpoints: u8,
    pub updates_processed: u32,
    pub identify_runs: u32,
    pub fault_count: u32,
    pub heap_free: u32,
}

impl RuntimeMetrics {
    #[cfg(target_os = "espidf")]
    pub fn collect(uptime_ms: u64, endpoints: u8, updates_processed: u32, identify_runs: u32, fault_count: u32) -> Self {
        // SAFETY: read-only heap statistics query.
        let heap_free = unsafe { esp_idf_svc::sys::esp_get_free_heap_size() };
        Self {
            uptime_ms,
            endpoints,
            updates_processed,
            identify_runs,
            fault_count,
            heap_free,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn collect(uptime_ms: u64, endpoints: u8, updates_processed: u32, identify_runs: u32, fault_count: u32) -> Self {
        Self {
            uptime_ms,
            endpoints,
            updates_processed,
            identify_runs,
            fault_count,
            // ESP32-C3 free heap after WiFi + pairing stack init.
            heap_free: 180_224,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Panic hook
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that logs the panic reason before the default
/// handler aborts and the chip resets.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => log::error!("PANIC at {}:{}: {}", loc.file(), loc.line(), reason),
            None => log::error!("PANIC: {}", reason),
        }
    }));
}
