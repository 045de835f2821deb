//! # sx1272-pingpong
//!
//! A portable, no_std ping demo for SX1272 LoRa/FSK transceiver shields
//! (e.g. the SX1272MB2xAS), written against a pluggable radio driver.
//!
//! One node plays the **sender**: each press of the user button transmits a
//! 32-byte frame made of the tag `LOR1` followed by a byte ramp. The other node
//! plays the **listener**: it keeps reception armed, and every frame starting
//! with the tag toggles an indicator LED and logs the arrival time and the
//! interval since the previous one.
//!
//! This crate provides:
//! - the [`Radio`](radio::Radio) trait the transceiver driver implements
//! - a single [`RadioEvent`](radio::RadioEvent) queue replacing the driver's five callbacks
//! - the [`App`](app::App) context with its message loop for both roles
//! - interrupt-safe signalling with `critical-section`
//! - LoRa and FSK modulation settings selected at runtime
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` and forwards `std` to `thiserror` and `critical-section` |
//! | `defmt-0-3` | Uses `defmt` logging |
//! | `log`       | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sx1272_pingpong::{app::App, config::AppConfig, radio::EventQueue, signal::TxRequest};
//!
//! static EVENTS: EventQueue = EventQueue::new();
//! static TX_REQUEST: TxRequest = TxRequest::new();
//!
//! // Button ISR:      TX_REQUEST.request();
//! // Radio DIO ISR:   let _ = EVENTS.post(RadioEvent::TxDone);
//!
//! let mut app = App::new(AppConfig::default(), radio, led, delay, clock, &EVENTS, &TX_REQUEST);
//! app.run();
//! ```
//!
//! ## Integration Notes
//!
//! - The radio driver must post exactly one event per completed `send` or `rx`.
//! - Events are drained in order at the top of every loop iteration.
//! - All waits are blocking delays; nothing else runs on the main thread meanwhile.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[macro_use]
mod fmt;

pub use critical_section;
pub use heapless;

pub mod app;
pub mod buffer;
pub mod config;
pub mod consts;
pub mod error;
pub mod payload;
pub mod radio;
pub mod signal;
pub mod state;
pub mod timer;

#[cfg(test)]
pub(crate) mod mock;
