//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  A pairing-layer
//! notifier would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::lights::Output;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn render(output: &Output) -> heapless::String<24> {
    use core::fmt::Write;
    let mut s = heapless::String::new();
    // Longest form is "rgb=(100,100,100)".
    let _ = match output {
        Output::Single(duty) => write!(s, "duty={}%", duty),
        Output::Rgb(d) => write!(s, "rgb=({},{},{})", d.r, d.g, d.b),
    };
    s
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::EndpointRestored { id, output } => {
                info!("RESTORE | endpoint={} {}", id, render(output));
            }
            AppEvent::EndpointUpdated { id, output } => {
                info!("UPDATE | endpoint={} {}", id, render(output));
            }
            AppEvent::IdentifyStarted { blinks } => {
                info!("IDENTIFY | started, blinks={}", blinks);
            }
            AppEvent::IdentifyCompleted => {
                info!("IDENTIFY | complete");
            }
            AppEvent::OutputFault(fault) => {
                warn!(
                    "FAULT | gpio={} {} (duty={})",
                    fault.gpio, fault.error, fault.duty
                );
            }
        }
    }
}
