//! Single-slot transmit request raised from the button interrupt.
//!
//! The button ISR must do nothing but mark a request as pending; the message
//! loop services it later. The slot holds at most one request: pressing the
//! button again before the loop gets to it does not queue a second transmit.
//!
//! The flag lives in a `critical_section::Mutex<Cell<bool>>` so it works on
//! cores without atomic read-modify-write instructions.

use core::cell::Cell;
use critical_section::Mutex;

/// A pending-transmit flag shared between the button ISR and the message loop.
///
/// # Example
/// ```rust
/// use sx1272_pingpong::signal::TxRequest;
///
/// static TX_REQUEST: TxRequest = TxRequest::new();
///
/// // #[interrupt] fn EXTI15_10() {
/// TX_REQUEST.request();
/// // }
/// assert!(TX_REQUEST.is_pending());
/// ```
pub struct TxRequest {
    pending: Mutex<Cell<bool>>,
}

impl TxRequest {
    /// Creates an empty slot. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Marks a transmit as pending. Safe to call from interrupt context.
    pub fn request(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Returns whether a request is waiting to be serviced.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }

    /// Clears the slot once the loop has issued the transmit.
    pub fn clear(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(false));
    }
}

impl Default for TxRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for TxRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TxRequest")
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let flag = TxRequest::new();
        assert!(!flag.is_pending());
    }

    #[test]
    fn test_repeated_requests_collapse() {
        let flag = TxRequest::new();
        flag.request();
        flag.request();
        assert!(flag.is_pending());
        flag.clear();
        assert!(!flag.is_pending());
    }
}
