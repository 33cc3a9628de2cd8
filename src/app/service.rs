//! Accessory service — the framework side of the hexagonal core.
//!
//! [`AccessoryService`] owns the accessory-information unit and every LED
//! endpoint.  It routes set requests onto characteristics, calls
//! [`Updatable::update`] on endpoints whose characteristics changed,
//! collapses pending values into committed ones, and advances identify.
//! All I/O flows through port traits or `embedded-hal` handles injected at
//! call sites, so the whole service runs against mocks on the host.
//!
//! ```text
//!  AppCommand ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │     AccessoryService      │
//!  StoragePort ◀─▶│  Endpoints · Identify     │──▶ status OutputPin
//!                 └──────────────────────────┘
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info, warn};

use crate::diagnostics::{FaultLog, RuntimeMetrics};
use crate::error::{RequestError, Result};
use crate::lights::Endpoint;
use crate::lights::info::AccessoryInformation;

use super::commands::{AppCommand, EndpointId};
use super::events::AppEvent;
use super::ports::{EventSink, StoragePort, Updatable};

/// Endpoint slots available on one accessory.
pub const MAX_ENDPOINTS: usize = 4;

// ───────────────────────────────────────────────────────────────
// AccessoryService
// ───────────────────────────────────────────────────────────────

pub struct AccessoryService<P> {
    info: AccessoryInformation,
    endpoints: heapless::Vec<Endpoint<P>, MAX_ENDPOINTS>,
    faults: FaultLog,
    updates_processed: u32,
    identify_runs: u32,
}

impl<P: SetDutyCycle> AccessoryService<P> {
    pub fn new(info: AccessoryInformation) -> Self {
        Self {
            info,
            endpoints: heapless::Vec::new(),
            faults: FaultLog::new(),
            updates_processed: 0,
            identify_runs: 0,
        }
    }

    // ── Registration ──────────────────────────────────────────

    /// Register an endpoint.  Its restored output is reported through
    /// `sink` along with any fault raised while writing it.
    pub fn add_endpoint(
        &mut self,
        endpoint: impl Into<Endpoint<P>>,
        sink: &mut impl EventSink,
    ) -> Result<EndpointId> {
        let id = EndpointId(self.endpoints.len() as u8);
        self.endpoints
            .push(endpoint.into())
            .map_err(|_| RequestError::TooManyEndpoints)?;

        let index = usize::from(id.0);
        let ep = &mut self.endpoints[index];
        info!("Endpoint {} registered: ns={} gpios={:?}", id, ep.namespace(), ep.gpios());
        sink.emit(&AppEvent::EndpointRestored {
            id,
            output: ep.output(),
        });
        self.drain_endpoint_faults(index, sink);
        Ok(id)
    }

    // ── Command handling ──────────────────────────────────────

    /// Route an external command.  Set requests land as pending values and
    /// take effect on the next [`process`](Self::process); identify starts
    /// immediately and is advanced by [`tick`](Self::tick).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        status: &mut impl OutputPin,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let Some((id, request)) = cmd.as_set_request() else {
            if self.info.request_identify(now_ms, status) {
                self.identify_runs = self.identify_runs.wrapping_add(1);
                sink.emit(&AppEvent::IdentifyStarted {
                    blinks: self.info.identify().n_blinks(),
                });
            }
            self.drain_info_fault(sink);
            return Ok(());
        };

        let ep = self
            .endpoints
            .get_mut(usize::from(id.0))
            .ok_or(RequestError::UnknownEndpoint)?;
        if let Err(e) = ep.request(request) {
            warn!("Endpoint {}: rejected {:?}: {}", id, request, e);
            return Err(e.into());
        }
        debug!("Endpoint {}: pending {:?}", id, request);
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Update every endpoint with a changed characteristic, then commit all
    /// pending values to `storage`.
    pub fn process(&mut self, storage: &mut impl StoragePort, sink: &mut impl EventSink) {
        for index in 0..self.endpoints.len() {
            let ep = &mut self.endpoints[index];
            if ep.any_updated() {
                ep.update();
                self.updates_processed = self.updates_processed.wrapping_add(1);
                sink.emit(&AppEvent::EndpointUpdated {
                    id: EndpointId(index as u8),
                    output: ep.output(),
                });
            }
            // Equal pending values are dropped here too.
            ep.commit(storage);
            self.drain_endpoint_faults(index, sink);
        }
    }

    /// Advance a running identify sequence to `now_ms`.
    pub fn tick(&mut self, now_ms: u32, status: &mut impl OutputPin, sink: &mut impl EventSink) {
        if self.info.poll_identify(now_ms, status) {
            sink.emit(&AppEvent::IdentifyCompleted);
        }
        self.drain_info_fault(sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn info(&self) -> &AccessoryInformation {
        &self.info
    }

    pub fn endpoint(&self, id: EndpointId) -> Option<&Endpoint<P>> {
        self.endpoints.get(usize::from(id.0))
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    pub fn metrics(&self, uptime_ms: u64) -> RuntimeMetrics {
        RuntimeMetrics::collect(
            uptime_ms,
            self.endpoints.len() as u8,
            self.updates_processed,
            self.identify_runs,
            self.faults.total(),
        )
    }

    // ── Internal ──────────────────────────────────────────────

    fn drain_endpoint_faults(&mut self, index: usize, sink: &mut impl EventSink) {
        let before = self.faults.total();
        self.endpoints[index].drain_faults(&mut self.faults);
        let added = self.faults.total().wrapping_sub(before) as usize;
        // Newest entries sit at the back of the ring.
        let skip = self.faults.len().saturating_sub(added);
        for fault in self.faults.iter().skip(skip) {
            sink.emit(&AppEvent::OutputFault(*fault));
        }
    }

    fn drain_info_fault(&mut self, sink: &mut impl EventSink) {
        if let Some(fault) = self.info.take_fault() {
            self.faults.record(fault);
            sink.emit(&AppEvent::OutputFault(fault));
        }
    }
}
