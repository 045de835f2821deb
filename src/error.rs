//! Error types surfaced by the message loop.

use crate::buffer::BufferBusy;
use thiserror::Error;

/// Failures that can stop a single [`App::poll`](crate::app::App::poll) iteration.
///
/// None of these are fatal: [`App::run`](crate::app::App::run) logs them and
/// keeps looping.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Error<E: core::fmt::Debug> {
    /// The radio driver rejected a call.
    #[error("radio driver error: {0:?}")]
    Radio(E),
    /// The shared buffer is leased to a radio operation that has not completed.
    #[error(transparent)]
    BufferBusy(#[from] BufferBusy),
}
