//! The ping demo application: radio event handling and the message loop.
//!
//! [`App`] owns everything the demo mutates (application state, shared buffer,
//! link quality, arrival timestamps, indicator) and borrows the two structures
//! filled from interrupt context: the [`EventQueue`] written by the radio
//! driver and the [`TxRequest`] written by the button ISR.
//!
//! ## Roles
//!
//! - **Sender**: each loop iteration checks the transmit request. When set, a
//!   frame (`tag` + ramp) is built, held for `tx_delay_ms`, and handed to the
//!   radio; the request is then cleared. Otherwise the loop idles for
//!   `idle_poll_ms`.
//! - **Listener**: reception stays armed. Every received frame starting with
//!   the tag toggles the indicator and reports its arrival time and the gap
//!   since the previous match. After any receive outcome the loop waits
//!   `rx_settle_ms` and re-arms reception.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sx1272_pingpong::app::App;
//! use sx1272_pingpong::config::{AppConfig, Role};
//! use sx1272_pingpong::radio::EventQueue;
//! use sx1272_pingpong::signal::TxRequest;
//! use sx1272_pingpong::timer::TickCounter;
//!
//! static EVENTS: EventQueue = EventQueue::new();
//! static TX_REQUEST: TxRequest = TxRequest::new();
//! static TICKS: TickCounter = TickCounter::new();
//!
//! fn main() -> ! {
//!     let config = AppConfig::new(Role::Listener, Default::default());
//!     let mut app = App::new(config, radio, led, delay, &TICKS, &EVENTS, &TX_REQUEST);
//!     app.run()
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::buffer::{Lease, SharedBuffer};
use crate::config::{AppConfig, Role};
use crate::consts::{REG_VERSION, RX_SENTINEL};
use crate::error::Error;
use crate::fmt::log_failure;
use crate::payload::{Tag, fill_payload};
use crate::radio::{EventQueue, Radio, RadioEvent};
use crate::signal::TxRequest;
use crate::state::AppState;
use crate::timer::{ArrivalTimer, Clock};

/// The demo application context.
///
/// ## Type Parameters
///
/// - `R`: the radio driver
/// - `LED`: the indicator output toggled on every matched frame
/// - `D`: blocking delay used for all pacing waits
/// - `C`: free-running clock; only read in the listener role
#[derive(Debug)]
pub struct App<'a, R, LED, D, C>
where
    R: Radio,
    LED: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Radio driver
    pub radio: R,
    /// Indicator output
    pub led: LED,
    /// Delay provider
    pub delay: D,
    /// Arrival clock
    pub clock: C,
    config: AppConfig,
    state: AppState,
    buffer: SharedBuffer,
    rssi: i16,
    snr: i8,
    arrivals: ArrivalTimer,
    led_on: bool,
    events: &'a EventQueue,
    tx_request: &'a TxRequest,
}

impl<'a, R, LED, D, C> App<'a, R, LED, D, C>
where
    R: Radio,
    LED: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Creates the application. Nothing touches the hardware until
    /// [`init`](App::init).
    pub fn new(
        config: AppConfig,
        radio: R,
        led: LED,
        delay: D,
        clock: C,
        events: &'a EventQueue,
        tx_request: &'a TxRequest,
    ) -> Self {
        Self {
            radio,
            led,
            delay,
            clock,
            config,
            state: AppState::default(),
            buffer: SharedBuffer::new(),
            rssi: 0,
            snr: 0,
            arrivals: ArrivalTimer::new(),
            led_on: false,
            events,
            tx_request,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The state left by the most recent radio event.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// The shared payload buffer.
    pub fn buffer(&self) -> &SharedBuffer {
        &self.buffer
    }

    /// RSSI (dBm) and SNR (dB) of the last received frame.
    pub fn link_quality(&self) -> (i16, i8) {
        (self.rssi, self.snr)
    }

    /// Whether the indicator is currently on.
    pub fn led_is_on(&self) -> bool {
        self.led_on
    }

    /// Timestamp of the last tag-matched frame, in ms.
    pub fn last_arrival_ms(&self) -> u32 {
        self.arrivals.latest_ms()
    }

    /// Brings the radio up and, for a listener, starts receiving.
    ///
    /// Blocks in [`detect`](App::detect) until the transceiver answers.
    /// Returns the silicon version read from the chip.
    pub fn init(&mut self) -> Result<u8, Error<R::Error>> {
        info!("SX1272 Ping Pong Demo Application");
        self.radio.init().map_err(Error::Radio)?;

        let version = self.detect();
        if let Some(board) = self.radio.board_name() {
            info!("> Board Type: {} <", board);
        }

        self.radio
            .set_channel(self.config.rf_frequency_hz)
            .map_err(Error::Radio)?;

        info!("{}", self.config.modem.banner());
        let tx = self.config.tx_config();
        let rx = self.config.rx_config();
        self.radio.set_tx_config(&tx).map_err(Error::Radio)?;
        self.radio.set_rx_config(&rx).map_err(Error::Radio)?;

        info!("Starting Ping-Pong loop as {:?}", self.config.role);
        self.write_led(false);

        if self.config.role == Role::Listener {
            self.clock.start();
            self.start_rx()?;
        }
        Ok(version)
    }

    /// Polls the version register until the transceiver answers.
    ///
    /// A read of `0x00` (or a failed read) means no chip is on the bus; this
    /// logs a warning, waits `detect_retry_ms` and tries again, forever.
    pub fn detect(&mut self) -> u8 {
        loop {
            match self.radio.read_register(REG_VERSION) {
                Ok(0) => warn!("Radio could not be detected!"),
                Ok(version) => {
                    debug!("radio version {}", version);
                    return version;
                }
                Err(e) => log_failure("Radio could not be detected", &e),
            }
            self.delay.delay_ms(self.config.detect_retry_ms);
        }
    }

    /// Applies one radio event.
    ///
    /// Every event puts the radio to sleep and sets exactly one state, whatever
    /// the previous state was. Reception is never re-armed here.
    pub fn handle_event(&mut self, event: RadioEvent) {
        if let Err(e) = self.radio.sleep() {
            log_failure("radio sleep failed", &e);
        }
        let name = event.name();
        self.state = match event {
            RadioEvent::TxDone => {
                self.buffer.release();
                AppState::Tx
            }
            RadioEvent::RxDone { payload, rssi, snr } => {
                match self.buffer.store_rx(&payload) {
                    Ok(stored) if stored.truncated() => error!(
                        "received {} bytes but the buffer holds {}, frame truncated",
                        stored.reported,
                        stored.len
                    ),
                    Ok(_) => {}
                    Err(busy) => error!("received frame dropped, buffer held for {:?}", busy.held),
                }
                self.rssi = rssi;
                self.snr = snr;
                AppState::Rx
            }
            RadioEvent::RxTimeout => {
                let _ = self.buffer.terminate();
                self.buffer.release();
                AppState::RxTimeout
            }
            RadioEvent::RxError => {
                self.buffer.release();
                AppState::RxError
            }
            RadioEvent::TxTimeout => {
                self.buffer.release();
                AppState::TxTimeout
            }
        };
        if self.state.is_failure() {
            warn!("> {}", name);
        } else {
            info!("> {}", name);
        }
    }

    /// Runs one iteration of the message loop.
    ///
    /// Drains every pending radio event, then performs the role's reaction:
    /// the listener handles received frames and re-arms reception, the sender
    /// services a pending transmit request or idles.
    pub fn poll(&mut self) -> Result<(), Error<R::Error>> {
        while let Ok(event) = self.events.next_event() {
            let received = matches!(event, RadioEvent::RxDone { .. });
            self.handle_event(event);
            if received && self.config.role == Role::Listener {
                let _ = self.on_receive();
            }
        }

        match self.config.role {
            Role::Listener => {
                if self.buffer.lease() == Lease::Free {
                    self.delay.delay_ms(self.config.rx_settle_ms);
                    self.start_rx()?;
                }
                Ok(())
            }
            Role::Sender => {
                if self.tx_request.is_pending() && self.buffer.lease() == Lease::Free {
                    let tag = self.config.tag;
                    info!("{}...", tag.as_str());
                    let result =
                        self.send_message(tag, self.config.tx_delay_ms, self.config.tx_shift);
                    self.tx_request.clear();
                    result
                } else {
                    self.delay.delay_ms(self.config.idle_poll_ms);
                    Ok(())
                }
            }
        }
    }

    /// Runs [`init`](App::init) until it succeeds.
    ///
    /// Each failure is logged and followed by a `detect_retry_ms` wait, so the
    /// message loop never starts against a half-configured radio. Returns the
    /// silicon version.
    pub fn start(&mut self) -> u8 {
        loop {
            match self.init() {
                Ok(version) => return version,
                Err(e) => log_failure("radio initialisation failed", &e),
            }
            self.delay.delay_ms(self.config.detect_retry_ms);
        }
    }

    /// Initialises the radio and runs the message loop forever.
    ///
    /// Errors from individual iterations are logged and the loop carries on;
    /// there is no exit path.
    pub fn run(&mut self) -> ! {
        let _ = self.start();
        loop {
            if let Err(e) = self.poll() {
                log_failure("message loop", &e);
            }
        }
    }

    /// Builds a frame in the shared buffer and hands it to the radio.
    ///
    /// The first `BufferSize` bytes are overwritten with `tag` followed by the
    /// ramp starting at `shift` (see [`fill_payload`]). The call then blocks for
    /// `delay_ms` before submitting. Completion is reported later by a
    /// TxDone or TxTimeout event.
    pub fn send_message(
        &mut self,
        tag: Tag,
        delay_ms: u32,
        shift: usize,
    ) -> Result<(), Error<R::Error>> {
        let frame = self.buffer.begin_tx()?;
        fill_payload(&tag, frame, shift);
        let len = frame.len();
        self.delay.delay_ms(delay_ms);
        if let Err(e) = self.radio.send(frame) {
            self.buffer.release();
            return Err(Error::Radio(e));
        }
        debug!(
            "sent {} bytes, ~{} ms on air",
            len,
            self.config.modem.time_on_air_ms(len)
        );
        Ok(())
    }

    /// Inspects the frame left in the buffer by the last RxDone.
    ///
    /// Returns `true` if it carried the configured tag. A match records the
    /// arrival time, toggles the indicator, logs the frame, puts the radio to
    /// sleep and overwrites the first byte with a sentinel so the same frame
    /// cannot match twice.
    pub fn on_receive(&mut self) -> bool {
        let tag = self.config.tag;
        if !tag.matches(self.buffer.as_slice()) {
            debug!("frame without {} tag ignored", tag.as_str());
            return false;
        }

        let now = self.clock.now_ms();
        let elapsed = self.arrivals.record(now);
        self.write_led(!self.led_on);

        info!("{} matched", tag.as_str());
        info!("Data received from...{}", self.buffer.text());
        info!("TimeStamp {}", now);
        info!("Time {}", elapsed);

        if let Err(e) = self.radio.sleep() {
            log_failure("radio sleep failed", &e);
        }
        self.buffer.mark(RX_SENTINEL);
        true
    }

    fn start_rx(&mut self) -> Result<(), Error<R::Error>> {
        self.buffer.begin_rx()?;
        if let Err(e) = self.radio.rx(self.config.rx_timeout_ms) {
            self.buffer.release();
            return Err(Error::Radio(e));
        }
        Ok(())
    }

    fn write_led(&mut self, on: bool) {
        if on {
            let _ = self.led.set_high();
        } else {
            let _ = self.led.set_low();
        }
        self.led_on = on;
    }
}
