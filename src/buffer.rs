//! The payload buffer shared by the send and receive paths.
//!
//! The radio is half-duplex, so a single buffer serves both directions. Rather
//! than relying on that implicitly, [`SharedBuffer`] carries a [`Lease`] naming
//! which radio operation currently owns its contents:
//!
//! - [`Lease::Transmitting`] from the moment a frame is built until TxDone/TxTimeout
//! - [`Lease::Receiving`] from the moment reception is armed until the receive outcome
//! - [`Lease::Free`] otherwise
//!
//! Writes that do not match the lease in force are refused with [`BufferBusy`].

use crate::consts::BUFFER_SIZE;
use thiserror::Error;

/// Which radio operation currently owns the buffer contents.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Lease {
    ///   No radio operation is outstanding.
    #[default]
    Free,
    ///   A frame built from the buffer has been handed to the radio.
    Transmitting,
    ///   Reception is armed and will deliver into the buffer.
    Receiving,
}

/// A buffer operation was refused because another lease is in force.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("shared buffer is held for {held:?}, wanted {wanted:?}")]
pub struct BufferBusy {
    /// The lease currently in force.
    pub held: Lease,
    /// The lease that was requested.
    pub wanted: Lease,
}

/// Outcome of copying a received frame into the buffer.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Stored {
    /// Bytes actually copied.
    pub len: usize,
    /// Bytes the radio reported; larger than `len` when the frame was clamped.
    pub reported: usize,
}

impl Stored {
    /// Returns `true` if the frame did not fit and was cut short.
    pub fn truncated(&self) -> bool {
        self.reported > self.len
    }
}

/// Fixed-capacity byte buffer plus its valid length and ownership marker.
#[derive(Debug)]
pub struct SharedBuffer {
    data: [u8; BUFFER_SIZE],
    len: usize,
    lease: Lease,
    received: bool,
}

impl SharedBuffer {
    /// Creates a zeroed buffer whose valid length is the full capacity.
    pub const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            len: BUFFER_SIZE,
            lease: Lease::Free,
            received: false,
        }
    }

    /// Total capacity in bytes.
    pub const fn capacity(&self) -> usize {
        BUFFER_SIZE
    }

    /// Number of valid bytes (`BufferSize`).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes are valid.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current lease.
    pub fn lease(&self) -> Lease {
        self.lease
    }

    /// Whether a frame has ever been stored by [`store_rx`](Self::store_rx).
    pub fn has_received(&self) -> bool {
        self.received
    }

    /// The valid bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The valid bytes up to the first NUL, as text.
    ///
    /// Stops early at the first byte that is not valid UTF-8.
    pub fn text(&self) -> &str {
        let bytes = self.as_slice();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        match core::str::from_utf8(&bytes[..end]) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Takes the transmit lease and returns the first `len` bytes for filling.
    ///
    /// Fails if any lease is already held.
    pub fn begin_tx(&mut self) -> Result<&mut [u8], BufferBusy> {
        self.acquire(Lease::Transmitting)?;
        Ok(&mut self.data[..self.len])
    }

    /// Takes the receive lease before reception is armed.
    ///
    /// Re-arming while already receiving is allowed.
    pub fn begin_rx(&mut self) -> Result<(), BufferBusy> {
        if self.lease == Lease::Receiving {
            return Ok(());
        }
        self.acquire(Lease::Receiving)
    }

    /// Copies a received frame into the buffer and releases the lease.
    ///
    /// At most [`capacity`](Self::capacity) bytes are kept; the returned
    /// [`Stored`] tells the caller whether the frame was clamped.
    pub fn store_rx(&mut self, frame: &[u8]) -> Result<Stored, BufferBusy> {
        if self.lease == Lease::Transmitting {
            return Err(BufferBusy {
                held: self.lease,
                wanted: Lease::Receiving,
            });
        }
        let len = frame.len().min(BUFFER_SIZE);
        self.data[..len].copy_from_slice(&frame[..len]);
        self.len = len;
        self.received = true;
        self.lease = Lease::Free;
        Ok(Stored {
            len,
            reported: frame.len(),
        })
    }

    /// Null-terminates the buffer after the last received frame.
    ///
    /// Does nothing if no frame has been received yet, or if the last frame
    /// filled the buffer completely. Returns whether a terminator was written.
    pub fn terminate(&mut self) -> bool {
        if !self.received || self.len >= BUFFER_SIZE {
            return false;
        }
        self.data[self.len] = 0;
        true
    }

    /// Overwrites the first byte of the buffer, if there is one.
    pub fn mark(&mut self, sentinel: u8) {
        if self.len > 0 {
            self.data[0] = sentinel;
        }
    }

    /// Drops whatever lease is held.
    pub fn release(&mut self) {
        self.lease = Lease::Free;
    }

    fn acquire(&mut self, wanted: Lease) -> Result<(), BufferBusy> {
        if self.lease != Lease::Free {
            return Err(BufferBusy {
                held: self.lease,
                wanted,
            });
        }
        self.lease = wanted;
        Ok(())
    }
}

impl Default for SharedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_defaults() {
        let buf = SharedBuffer::new();
        assert_eq!(buf.len(), BUFFER_SIZE);
        assert_eq!(buf.lease(), Lease::Free);
        assert!(!buf.has_received());
    }

    #[test]
    fn test_tx_lease_blocks_second_tx() {
        let mut buf = SharedBuffer::new();
        assert!(buf.begin_tx().is_ok());
        assert_eq!(
            buf.begin_tx().err(),
            Some(BufferBusy {
                held: Lease::Transmitting,
                wanted: Lease::Transmitting
            })
        );
        buf.release();
        assert!(buf.begin_tx().is_ok());
    }

    #[test]
    fn test_rx_lease_allows_rearm() {
        let mut buf = SharedBuffer::new();
        assert!(buf.begin_rx().is_ok());
        assert!(buf.begin_rx().is_ok());
        assert_eq!(buf.lease(), Lease::Receiving);
        assert!(buf.begin_tx().is_err());
    }

    #[test]
    fn test_store_rx_releases_and_records_len() {
        let mut buf = SharedBuffer::new();
        buf.begin_rx().unwrap();
        let stored = buf.store_rx(b"LOR1abc").unwrap();
        assert_eq!(stored.len, 7);
        assert!(!stored.truncated());
        assert_eq!(buf.as_slice(), b"LOR1abc");
        assert_eq!(buf.lease(), Lease::Free);
        assert!(buf.has_received());
    }

    #[test]
    fn test_store_rx_clamps_oversized_frame() {
        let mut buf = SharedBuffer::new();
        let frame = [7u8; 40];
        let stored = buf.store_rx(&frame).unwrap();
        assert_eq!(stored.len, BUFFER_SIZE);
        assert_eq!(stored.reported, 40);
        assert!(stored.truncated());
        assert_eq!(buf.len(), BUFFER_SIZE);
    }

    #[test]
    fn test_store_rx_refused_while_transmitting() {
        let mut buf = SharedBuffer::new();
        let _ = buf.begin_tx().unwrap();
        assert!(buf.store_rx(b"LOR1").is_err());
    }

    #[test]
    fn test_terminate_is_noop_without_prior_rx() {
        let mut buf = SharedBuffer::new();
        assert!(!buf.terminate());
    }

    #[test]
    fn test_terminate_after_rx() {
        let mut buf = SharedBuffer::new();
        let _ = buf.store_rx(b"LOR1xy").unwrap();
        assert!(buf.terminate());
        assert_eq!(buf.data[6], 0);

        let full = [1u8; BUFFER_SIZE];
        let _ = buf.store_rx(&full).unwrap();
        assert!(!buf.terminate());
    }

    #[test]
    fn test_text_stops_at_nul_and_invalid_utf8() {
        let mut buf = SharedBuffer::new();
        assert_eq!(buf.text(), "");

        let _ = buf.store_rx(b"LOR1\x00\x01\x02").unwrap();
        assert_eq!(buf.text(), "LOR1");

        let _ = buf.store_rx(b"LOR2\xff\x00").unwrap();
        assert_eq!(buf.text(), "LOR2");

        let _ = buf.store_rx(b"PING").unwrap();
        assert_eq!(buf.text(), "PING");
    }

    #[test]
    fn test_mark_overwrites_first_byte() {
        let mut buf = SharedBuffer::new();
        let _ = buf.store_rx(b"LOR1").unwrap();
        buf.mark(b'A');
        assert_eq!(buf.as_slice(), b"AOR1");
    }
}
