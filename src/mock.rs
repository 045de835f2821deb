//! Recording test doubles for the radio driver, delay, clock and log output.

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;

use crate::config::{RxConfig, TxConfig};
use crate::radio::Radio;
use crate::timer::Clock;

/// One call made into [`MockRadio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    ReadRegister(u8),
    SetChannel(u32),
    SetTxConfig(TxConfig),
    SetRxConfig(RxConfig),
    Send(Vec<u8>),
    Rx(u32),
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Radio driver that records every call.
#[derive(Debug)]
pub struct MockRadio {
    pub calls: Vec<Call>,
    /// Number of version reads that return 0 before the chip "appears".
    pub absent_reads: usize,
    /// Version reported once the chip is present.
    pub version: u8,
    pub board: Option<&'static str>,
    pub fail_send: bool,
    pub fail_rx: bool,
    /// Number of upcoming `set_channel` calls that fail.
    pub failing_set_channel: usize,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            absent_reads: 0,
            version: 0x22,
            board: Some("SX1272MB2xAS"),
            fail_send: false,
            fail_rx: false,
            failing_set_channel: 0,
        }
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    pub fn sends(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Send(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Radio for MockRadio {
    type Error = MockError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::Init);
        Ok(())
    }

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        self.calls.push(Call::ReadRegister(addr));
        if self.absent_reads > 0 {
            self.absent_reads -= 1;
            Ok(0)
        } else {
            Ok(self.version)
        }
    }

    fn board_name(&mut self) -> Option<&'static str> {
        self.board
    }

    fn set_channel(&mut self, freq_hz: u32) -> Result<(), Self::Error> {
        self.calls.push(Call::SetChannel(freq_hz));
        if self.failing_set_channel > 0 {
            self.failing_set_channel -= 1;
            Err(MockError)
        } else {
            Ok(())
        }
    }

    fn set_tx_config(&mut self, config: &TxConfig) -> Result<(), Self::Error> {
        self.calls.push(Call::SetTxConfig(*config));
        Ok(())
    }

    fn set_rx_config(&mut self, config: &RxConfig) -> Result<(), Self::Error> {
        self.calls.push(Call::SetRxConfig(*config));
        Ok(())
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        self.calls.push(Call::Send(payload.to_vec()));
        if self.fail_send { Err(MockError) } else { Ok(()) }
    }

    fn rx(&mut self, timeout_ms: u32) -> Result<(), Self::Error> {
        self.calls.push(Call::Rx(timeout_ms));
        if self.fail_rx { Err(MockError) } else { Ok(()) }
    }

    fn sleep(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::Sleep);
        Ok(())
    }
}

/// Delay that records requested durations in milliseconds instead of waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.waits_ms.push(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

/// Clock returning a scripted sequence of timestamps; repeats the last one.
#[derive(Debug, Default)]
pub struct MockClock {
    pub times: VecDeque<u32>,
    pub last: u32,
    pub started: bool,
}

impl MockClock {
    pub fn with_times(times: &[u32]) -> Self {
        Self {
            times: times.iter().copied().collect(),
            last: 0,
            started: false,
        }
    }
}

impl Clock for MockClock {
    fn start(&mut self) {
        self.started = true;
    }

    fn now_ms(&mut self) -> u32 {
        if let Some(t) = self.times.pop_front() {
            self.last = t;
        }
        self.last
    }
}

#[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
pub mod logs {
    //! Per-thread capture of `log` output, so parallel tests do not interfere.

    use std::cell::RefCell;

    thread_local! {
        static LINES: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            LINES.with(|lines| {
                lines
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    /// Installs the capturing logger (once per process) and clears this thread's lines.
    pub fn start() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
        LINES.with(|lines| lines.borrow_mut().clear());
    }

    /// Returns and clears the lines logged on this thread.
    pub fn take() -> Vec<String> {
        take_records().into_iter().map(|(_, line)| line).collect()
    }

    /// Like [`take`], keeping the level of each line.
    pub fn take_records() -> Vec<(log::Level, String)> {
        LINES.with(|lines| core::mem::take(&mut *lines.borrow_mut()))
    }
}
