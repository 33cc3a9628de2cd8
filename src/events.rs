//! Inbound command queue.
//!
//! Set requests and identify requests are produced by the pairing/transport
//! task and consumed by the synchronous control loop.  A bounded
//! `embassy-sync` MPMC channel bridges the two without heap allocation.
//!
//! ```text
//! ┌──────────────┐  AppCommand  ┌──────────────┐
//! │  Transport   │─────────────▶│ Control Loop │
//! │  (async)     │              │  (sync)      │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::AppCommand;

/// Channel depth for inbound commands.
const COMMAND_DEPTH: usize = 8;

/// Transport → control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, AppCommand, COMMAND_DEPTH> = Channel::new();

/// Queue a command without waiting.
///
/// The pairing layer is the intended producer; the control loop drains.
/// Returns `false` if the queue is full (command dropped).
pub fn submit(cmd: AppCommand) -> bool {
    match COMMAND_CHANNEL.try_send(cmd) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("Command queue full, dropping {:?}", cmd);
            false
        }
    }
}

/// Drain all pending commands into a callback, in FIFO order.
pub fn drain_commands(mut handler: impl FnMut(AppCommand)) {
    while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
        handler(cmd);
    }
}
