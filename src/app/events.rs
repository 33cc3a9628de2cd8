//! Outbound application events.
//!
//! The [`AccessoryService`](super::service::AccessoryService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log to serial, notify the
//! pairing layer, etc.

use super::commands::EndpointId;
use crate::diagnostics::FaultEntry;
use crate::lights::Output;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// An endpoint was registered; carries the output restored from storage.
    EndpointRestored { id: EndpointId, output: Output },

    /// `update()` ran on an endpoint and drove a new output.
    EndpointUpdated { id: EndpointId, output: Output },

    /// An identify sequence began.
    IdentifyStarted { blinks: u8 },

    /// The identify sequence finished.
    IdentifyCompleted,

    /// A hardware write failed.  The operation that caused it still
    /// reported success.
    OutputFault(FaultEntry),
}
