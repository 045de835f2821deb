//! The radio driver seam and the events it reports.
//!
//! The transceiver itself (modem state machine, register programming, SPI
//! timing) lives in an external driver. This module defines what the demo
//! needs from it ([`Radio`]) and how completions travel back: instead of five
//! separate callbacks, the driver's interrupt handler posts a [`RadioEvent`]
//! into an [`EventQueue`], and the message loop drains the queue and matches on
//! each event exhaustively.
//!
//! ## Wiring
//!
//! ```rust
//! use sx1272_pingpong::radio::{EventQueue, RadioEvent};
//!
//! static EVENTS: EventQueue = EventQueue::new();
//!
//! // Inside the driver's DIO interrupt, once TX has completed:
//! let _ = EVENTS.post(RadioEvent::TxDone);
//! assert_eq!(EVENTS.len(), 1);
//! ```

use core::cell::RefCell;
use core::convert::Infallible;

use critical_section::Mutex;
use heapless::{Deque, Vec};

use crate::config::{RxConfig, TxConfig};
use crate::consts::{EVENT_QUEUE_LEN, MAX_RADIO_PAYLOAD_LEN};

/// Operations the demo needs from a LoRa/FSK transceiver driver.
///
/// Every call is expected to return promptly; operations that take air time
/// (`send`, `rx`) complete later by posting a [`RadioEvent`].
pub trait Radio {
    /// Driver-specific failure (bus error, invalid state, ...).
    type Error: core::fmt::Debug;

    /// Resets and initialises the transceiver.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error>;

    /// Human-readable name of the detected shield, if the driver can tell.
    fn board_name(&mut self) -> Option<&'static str> {
        None
    }

    /// Tunes the carrier frequency, in Hz.
    fn set_channel(&mut self, freq_hz: u32) -> Result<(), Self::Error>;

    /// Programs the transmit modulation.
    fn set_tx_config(&mut self, config: &TxConfig) -> Result<(), Self::Error>;

    /// Programs the receive demodulation.
    fn set_rx_config(&mut self, config: &RxConfig) -> Result<(), Self::Error>;

    /// Starts transmitting `payload`. Completion is reported as
    /// [`RadioEvent::TxDone`] or [`RadioEvent::TxTimeout`].
    fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error>;

    /// Opens a receive window of `timeout_ms`. Completion is reported as
    /// [`RadioEvent::RxDone`], [`RadioEvent::RxTimeout`] or [`RadioEvent::RxError`].
    fn rx(&mut self, timeout_ms: u32) -> Result<(), Self::Error>;

    /// Puts the transceiver to sleep.
    fn sleep(&mut self) -> Result<(), Self::Error>;
}

/// Completion of an asynchronous radio operation.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum RadioEvent {
    ///   The last frame was transmitted.
    TxDone,
    ///   A frame was received.
    RxDone {
        /// Received bytes, as reported by the radio FIFO.
        payload: Vec<u8, MAX_RADIO_PAYLOAD_LEN>,
        /// Received signal strength in dBm.
        rssi: i16,
        /// Signal to noise ratio in dB.
        snr: i8,
    },
    ///   The receive window closed without a frame.
    RxTimeout,
    ///   A frame was received but failed validation.
    RxError,
    ///   The transmission did not finish in time.
    TxTimeout,
}

impl RadioEvent {
    /// Builds an [`RxDone`](RadioEvent::RxDone) from the driver's FIFO contents.
    ///
    /// Anything past [`MAX_RADIO_PAYLOAD_LEN`] is dropped.
    pub fn rx_done(payload: &[u8], rssi: i16, snr: i8) -> Self {
        let len = payload.len().min(MAX_RADIO_PAYLOAD_LEN);
        let mut bytes = Vec::new();
        let _ = bytes.extend_from_slice(&payload[..len]);
        RadioEvent::RxDone {
            payload: bytes,
            rssi,
            snr,
        }
    }

    /// Name of the driver callback this event replaces, used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            RadioEvent::TxDone => "OnTxDone",
            RadioEvent::RxDone { .. } => "OnRxDone",
            RadioEvent::RxTimeout => "OnRxTimeout",
            RadioEvent::RxError => "OnRxError",
            RadioEvent::TxTimeout => "OnTxTimeout",
        }
    }
}

/// Interrupt-safe FIFO carrying [`RadioEvent`]s from the driver to the loop.
///
/// Holds at most [`EVENT_QUEUE_LEN`] events; posting into a full queue hands the
/// event back to the caller.
pub struct EventQueue {
    events: Mutex<RefCell<Deque<RadioEvent, EVENT_QUEUE_LEN>>>,
}

impl EventQueue {
    /// Creates an empty queue. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Appends an event. Safe to call from interrupt context.
    pub fn post(&self, event: RadioEvent) -> Result<(), RadioEvent> {
        critical_section::with(|cs| self.events.borrow(cs).borrow_mut().push_back(event))
    }

    /// Takes the oldest event, or `WouldBlock` if none is pending.
    pub fn next_event(&self) -> nb::Result<RadioEvent, Infallible> {
        critical_section::with(|cs| self.events.borrow(cs).borrow_mut().pop_front())
            .ok_or(nb::Error::WouldBlock)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.events.borrow(cs).borrow().len())
    }

    /// Returns `true` if no event is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        queue.post(RadioEvent::TxDone).unwrap();
        queue.post(RadioEvent::RxTimeout).unwrap();
        assert_eq!(queue.next_event(), Ok(RadioEvent::TxDone));
        assert_eq!(queue.next_event(), Ok(RadioEvent::RxTimeout));
        assert_eq!(queue.next_event(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_full_queue_returns_event() {
        let queue = EventQueue::new();
        for _ in 0..EVENT_QUEUE_LEN {
            queue.post(RadioEvent::RxError).unwrap();
        }
        assert_eq!(queue.post(RadioEvent::TxTimeout), Err(RadioEvent::TxTimeout));
        assert_eq!(queue.len(), EVENT_QUEUE_LEN);
    }

    #[test]
    fn test_rx_done_keeps_fifo_bytes() {
        let event = RadioEvent::rx_done(b"LOR1\x00\x01", -42, 7);
        match event {
            RadioEvent::RxDone { payload, rssi, snr } => {
                assert_eq!(&payload[..], b"LOR1\x00\x01");
                assert_eq!(rssi, -42);
                assert_eq!(snr, 7);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_rx_done_drops_bytes_past_fifo_size() {
        let long = [0x55u8; MAX_RADIO_PAYLOAD_LEN + 10];
        if let RadioEvent::RxDone { payload, .. } = RadioEvent::rx_done(&long, 0, 0) {
            assert_eq!(payload.len(), MAX_RADIO_PAYLOAD_LEN);
        } else {
            panic!("expected RxDone");
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(RadioEvent::TxDone.name(), "OnTxDone");
        assert_eq!(RadioEvent::rx_done(&[], 0, 0).name(), "OnRxDone");
        assert_eq!(RadioEvent::RxTimeout.name(), "OnRxTimeout");
        assert_eq!(RadioEvent::RxError.name(), "OnRxError");
        assert_eq!(RadioEvent::TxTimeout.name(), "OnTxTimeout");
    }
}
