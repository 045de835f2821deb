//! Constants used across the ping demo.
//!
//! These are the build defaults of the SX1272 shield demo: carrier frequency,
//! modulation parameters for both modems, payload sizing, and the pacing
//! intervals of the message loop. [`AppConfig::default`](crate::config::AppConfig)
//! is assembled from them.
//!
//! ## Key Concepts
//!
//! - **Channel**: a single 868 MHz carrier shared by sender and listener.
//! - **Modem**: either LoRa (chirp spread spectrum) or FSK; both sides must agree.
//! - **Payload**: a fixed 32-byte frame, a 4-byte tag followed by a byte ramp.
//! - **Pacing**: every wait in the loop is a blocking delay of a fixed length.

/// Carrier frequency in Hz.
pub const RF_FREQUENCY: u32 = 868_000_000;

/// Transmit output power in dBm.
pub const TX_OUTPUT_POWER: i8 = 14;

/// LoRa bandwidth index: `0` = 125 kHz, `1` = 250 kHz, `2` = 500 kHz.
pub const LORA_BANDWIDTH: u8 = 2;

/// LoRa spreading factor, SF7..SF12.
pub const LORA_SPREADING_FACTOR: u8 = 7;

/// LoRa coding rate index: `1` = 4/5, `2` = 4/6, `3` = 4/7, `4` = 4/8.
pub const LORA_CODINGRATE: u8 = 1;

/// LoRa preamble length in symbols, same for TX and RX.
pub const LORA_PREAMBLE_LENGTH: u16 = 8;

/// LoRa RX symbol timeout, in symbols.
pub const LORA_SYMBOL_TIMEOUT: u16 = 5;

/// Whether LoRa frames use an implicit (fixed-length) header.
pub const LORA_FIX_LENGTH_PAYLOAD_ON: bool = false;

/// Whether LoRa frequency hopping is enabled.
pub const LORA_FHSS_ENABLED: bool = false;

/// Symbols between hops when frequency hopping is enabled.
pub const LORA_NB_SYMB_HOP: u8 = 4;

/// Whether LoRa IQ inversion is enabled.
pub const LORA_IQ_INVERSION_ON: bool = false;

/// Whether the LoRa payload CRC is enabled.
pub const LORA_CRC_ENABLED: bool = true;

/// FSK frequency deviation in Hz.
pub const FSK_FDEV: u32 = 25_000;

/// FSK data rate in bits per second.
pub const FSK_DATARATE: u32 = 19_200;

/// FSK receiver bandwidth in Hz.
pub const FSK_BANDWIDTH: u32 = 50_000;

/// FSK AFC bandwidth in Hz.
pub const FSK_AFC_BANDWIDTH: u32 = 83_333;

/// FSK preamble length in bytes, same for TX and RX.
pub const FSK_PREAMBLE_LENGTH: u16 = 5;

/// Whether FSK frames have a fixed length.
pub const FSK_FIX_LENGTH_PAYLOAD_ON: bool = false;

/// Whether the FSK payload CRC is enabled.
pub const FSK_CRC_ENABLED: bool = true;

/// FSK sync word length in bytes, as programmed by the SX1272 driver.
pub const FSK_SYNC_WORD_LEN: u16 = 3;

/// Transmit timeout handed to the radio, in ms.
pub const TX_TIMEOUT_VALUE: u32 = 2_000;

/// Receive window handed to the radio each time reception is armed, in ms.
pub const RX_TIMEOUT_VALUE: u32 = 3_500;

/// Capacity of the shared payload buffer.
pub const BUFFER_SIZE: usize = 32;

/// Largest payload the radio FIFO can hand back in a single `RxDone` event.
pub const MAX_RADIO_PAYLOAD_LEN: usize = 255;

/// Number of radio events that can be pending before the loop drains them.
pub const EVENT_QUEUE_LEN: usize = 4;

/// Delay between a button press being serviced and the frame going out, in ms.
pub const DEFAULT_TX_DELAY: u32 = 1_000;

/// Index of the first ramp byte in an outgoing frame.
pub const DEFAULT_TX_SHIFT: usize = 4;

/// Settle time after handling a reception before re-arming, in ms.
pub const RX_SETTLE_MS: u32 = 10;

/// Sender idle interval between button polls, in ms.
pub const IDLE_POLL_MS: u32 = 10;

/// Interval between hardware detection attempts, in ms.
pub const DETECT_RETRY_MS: u32 = 1_000;

/// SX127x silicon version register.
pub const REG_VERSION: u8 = 0x42;

/// Byte written over the start of a handled frame so it cannot match twice.
pub const RX_SENTINEL: u8 = b'A';
