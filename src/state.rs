//! Application state reported by the radio event handlers.

/// Summary of the last radio event observed by the application.
///
/// This mirrors the outcome of the most recent radio operation. It is written
/// exclusively by [`App::handle_event`](crate::app::App::handle_event) and only
/// read by the message loop, which never assigns it itself.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum AppState {
    ///   Nothing has happened yet; the radio is asleep after power-up.
    #[default]
    LowPower,
    ///   Powered and configured but not transmitting or receiving.
    Idle,
    ///   A frame was received and copied into the shared buffer.
    Rx,
    ///   The receive window elapsed without a frame.
    RxTimeout,
    ///   A frame arrived but failed validation (e.g. CRC).
    RxError,
    ///   The last transmission completed.
    Tx,
    ///   The last transmission did not complete in time.
    TxTimeout,
    ///   Channel activity detection in progress. Never produced by this application.
    Cad,
    ///   Channel activity detection finished. Never produced by this application.
    CadDone,
}

impl AppState {
    /// Returns `true` for the outcomes of a failed radio operation.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AppState::RxTimeout | AppState::RxError | AppState::TxTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_low_power() {
        assert_eq!(AppState::default(), AppState::LowPower);
    }

    #[test]
    fn test_failure_states() {
        assert!(AppState::RxTimeout.is_failure());
        assert!(AppState::RxError.is_failure());
        assert!(AppState::TxTimeout.is_failure());
        assert!(!AppState::Rx.is_failure());
        assert!(!AppState::Tx.is_failure());
        assert!(!AppState::LowPower.is_failure());
    }
}
