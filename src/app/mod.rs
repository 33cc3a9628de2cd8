//! Application core — pure domain logic, zero I/O.
//!
//! The accessory framework side of the firmware: the characteristic store,
//! command routing, update dispatch, and identify handling.  All
//! interaction with flash and the outside world happens through **port
//! traits** defined in [`ports`]; PWM and GPIO go through `embedded-hal`.

pub mod characteristic;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
