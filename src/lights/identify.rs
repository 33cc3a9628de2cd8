//! Identify routine — blink the status LED so a user can find the device.
//!
//! Each blink drives the active-low status pin LOW (lit) for one half
//! period, then HIGH (dark) for another.  Default cadence is 250 ms per
//! level, 500 ms per blink.
//!
//! ## State machine
//!
//! ```text
//! Idle ──start──▶ BlinkOn(0) ──▶ BlinkOff(0) ──▶ BlinkOn(1) ──▶ … ──▶ BlinkOff(n-1) ──▶ Done
//! ```
//!
//! [`IdentifyRoutine::poll`] advances it from the main loop without
//! blocking; [`IdentifyRoutine::run`] does the same sequence as an async
//! task that yields on an `embedded-hal-async` delay between toggles.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use log::{debug, warn};

pub const DEFAULT_HALF_PERIOD_MS: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyState {
    Idle,
    /// LED lit for blink `blink` since `since_ms`.
    BlinkOn { blink: u8, since_ms: u32 },
    /// LED dark for blink `blink` since `since_ms`.
    BlinkOff { blink: u8, since_ms: u32 },
    Done,
}

pub struct IdentifyRoutine {
    n_blinks: u8,
    half_period_ms: u32,
    state: IdentifyState,
    failed_level: Option<bool>,
}

impl IdentifyRoutine {
    pub fn new(n_blinks: u8) -> Self {
        Self::with_half_period(n_blinks, DEFAULT_HALF_PERIOD_MS)
    }

    pub fn with_half_period(n_blinks: u8, half_period_ms: u32) -> Self {
        Self {
            n_blinks,
            half_period_ms,
            state: IdentifyState::Idle,
            failed_level: None,
        }
    }

    pub fn n_blinks(&self) -> u8 {
        self.n_blinks
    }

    pub fn half_period_ms(&self) -> u32 {
        self.half_period_ms
    }

    pub fn state(&self) -> IdentifyState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            IdentifyState::BlinkOn { .. } | IdentifyState::BlinkOff { .. }
        )
    }

    /// Begin a sequence at `now_ms`.  Returns `false` (and changes nothing)
    /// if one is already running.
    pub fn start(&mut self, now_ms: u32, pin: &mut impl OutputPin) -> bool {
        if self.is_running() {
            debug!("identify: already running, request ignored");
            return false;
        }
        debug!("identify: starting {} blinks", self.n_blinks);
        if self.n_blinks == 0 {
            self.state = IdentifyState::Done;
            return true;
        }
        self.drive(pin, false);
        self.state = IdentifyState::BlinkOn {
            blink: 0,
            since_ms: now_ms,
        };
        true
    }

    /// Advance the sequence to `now_ms`.  At most one transition happens per
    /// call and the new level is timed from `now_ms`, so after a stalled loop
    /// every level still stays up for a full half period.  Returns the state
    /// after advancing.
    pub fn poll(&mut self, now_ms: u32, pin: &mut impl OutputPin) -> IdentifyState {
        match self.state {
            IdentifyState::BlinkOn { blink, since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.half_period_ms =>
            {
                self.drive(pin, true);
                self.state = IdentifyState::BlinkOff {
                    blink,
                    since_ms: now_ms,
                };
            }
            IdentifyState::BlinkOff { blink, since_ms }
                if now_ms.wrapping_sub(since_ms) >= self.half_period_ms =>
            {
                let next = blink + 1;
                if next < self.n_blinks {
                    self.drive(pin, false);
                    self.state = IdentifyState::BlinkOn {
                        blink: next,
                        since_ms: now_ms,
                    };
                } else {
                    debug!("identify: sequence complete");
                    self.state = IdentifyState::Done;
                }
            }
            _ => {}
        }
        self.state
    }

    /// Acknowledge a finished sequence, returning to `Idle`.
    ///
    /// Returns `true` exactly once per completed sequence.
    pub fn complete(&mut self) -> bool {
        if self.state == IdentifyState::Done {
            self.state = IdentifyState::Idle;
            true
        } else {
            false
        }
    }

    /// Run a full sequence as an async task, yielding on `delay` between
    /// toggles.  Always returns `true` once every blink is issued.
    ///
    /// For builds that host identify on an async executor instead of the
    /// polled control loop; the firmware binary uses [`Self::poll`].
    pub async fn run(&mut self, pin: &mut impl OutputPin, delay: &mut impl DelayNs) -> bool {
        debug!("identify: starting {} blinks", self.n_blinks);
        for _ in 0..self.n_blinks {
            self.drive(pin, false);
            delay.delay_ms(self.half_period_ms).await;
            self.drive(pin, true);
            delay.delay_ms(self.half_period_ms).await;
        }
        debug!("identify: sequence complete");
        true
    }

    /// Level of the most recent failed pin write, if not yet reported.
    pub fn take_failed_level(&mut self) -> Option<bool> {
        self.failed_level.take()
    }

    fn drive(&mut self, pin: &mut impl OutputPin, high: bool) {
        let res = if high { pin.set_high() } else { pin.set_low() };
        if res.is_err() {
            warn!("identify: status pin write (high={}) failed", high);
            self.failed_level = Some(high);
        }
    }
}
