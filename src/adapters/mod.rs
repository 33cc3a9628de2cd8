//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to            |
//! |------------|--------------|------------------------|
//! | `log_sink` | EventSink    | Serial log output      |
//! | `nvs`      | ConfigPort   | NVS / in-memory store  |
//! |            | StoragePort  |                        |
//!
//! PWM and GPIO adapters live in [`crate::drivers`] and implement the
//! `embedded-hal` traits directly.

pub mod log_sink;
pub mod nvs;
