//! Modulation and role configuration.
//!
//! The demo runs in exactly one of two roles ([`Role::Sender`] or
//! [`Role::Listener`]) over exactly one of two modems ([`ModemConfig::LoRa`] or
//! [`ModemConfig::Fsk`]). Both choices are ordinary values in [`AppConfig`], so an
//! unselected mode simply cannot be expressed.
//!
//! The radio driver takes its parameters as flat records ([`TxConfig`],
//! [`RxConfig`]) mirroring the vendor API, where the meaning of `bandwidth`,
//! `datarate` and `coderate` depends on the modem. Both records are always
//! derived from the same [`ModemConfig`], so transmit and receive settings
//! cannot drift apart.
//!
//! ## LoRa parameters
//!
//! | Field        | Range | Meaning                            |
//! |--------------|-------|------------------------------------|
//! | `bandwidth`  | 0..=2 | 125 kHz, 250 kHz, 500 kHz          |
//! | `datarate`   | 7..=12| spreading factor                   |
//! | `coderate`   | 1..=4 | 4/5, 4/6, 4/7, 4/8                 |
//!
//! For FSK, `bandwidth` and `datarate` are plain Hz and bits per second.

use core::str::FromStr;

use libm::ceil;
use thiserror::Error;

use crate::consts::*;
use crate::payload::Tag;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigError {
    /// Spreading factor outside SF7..SF12.
    #[error("spreading factor {0} is outside 7..=12")]
    SpreadingFactor(u8),
    /// Bandwidth index outside 0..=2.
    #[error("LoRa bandwidth index {0} is outside 0..=2")]
    Bandwidth(u8),
    /// Coding rate index outside 1..=4.
    #[error("coding rate index {0} is outside 1..=4")]
    CodingRate(u8),
    /// Unrecognised role name.
    #[error("unknown role, expected `sender` or `listener`")]
    UnknownRole,
    /// Unrecognised modem name.
    #[error("unknown modem, expected `lora` or `fsk`")]
    UnknownModem,
}

/// Which half of the demo this node plays.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Role {
    ///   Transmits a tagged frame each time the button is pressed.
    #[default]
    Sender,
    ///   Keeps reception armed and reports every frame carrying the tag.
    Listener,
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("sender") || s.eq_ignore_ascii_case("tx") {
            Ok(Role::Sender)
        } else if s.eq_ignore_ascii_case("listener") || s.eq_ignore_ascii_case("rx") {
            Ok(Role::Listener)
        } else {
            Err(ConfigError::UnknownRole)
        }
    }
}

/// Modem family, as the radio driver distinguishes them.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ModemKind {
    ///   Frequency-shift keying.
    Fsk,
    ///   LoRa chirp spread spectrum.
    LoRa,
}

impl FromStr for ModemKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lora") {
            Ok(ModemKind::LoRa)
        } else if s.eq_ignore_ascii_case("fsk") {
            Ok(ModemKind::Fsk)
        } else {
            Err(ConfigError::UnknownModem)
        }
    }
}

/// LoRa signal bandwidth.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Bandwidth {
    ///   125 kHz
    Khz125,
    ///   250 kHz
    Khz250,
    ///   500 kHz
    Khz500,
}

impl Bandwidth {
    /// All supported bandwidths, narrowest first.
    pub const ALL: [Bandwidth; 3] = [Bandwidth::Khz125, Bandwidth::Khz250, Bandwidth::Khz500];

    /// Parses the driver's bandwidth index.
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(Bandwidth::Khz125),
            1 => Ok(Bandwidth::Khz250),
            2 => Ok(Bandwidth::Khz500),
            other => Err(ConfigError::Bandwidth(other)),
        }
    }

    /// The driver's bandwidth index.
    pub fn index(&self) -> u8 {
        match self {
            Bandwidth::Khz125 => 0,
            Bandwidth::Khz250 => 1,
            Bandwidth::Khz500 => 2,
        }
    }

    /// Bandwidth in Hz.
    pub fn hz(&self) -> u32 {
        match self {
            Bandwidth::Khz125 => 125_000,
            Bandwidth::Khz250 => 250_000,
            Bandwidth::Khz500 => 500_000,
        }
    }
}

/// LoRa spreading factor, SF7..SF12.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SpreadingFactor(u8);

impl SpreadingFactor {
    /// Validates a spreading factor.
    pub fn new(sf: u8) -> Result<Self, ConfigError> {
        if (7..=12).contains(&sf) {
            Ok(SpreadingFactor(sf))
        } else {
            Err(ConfigError::SpreadingFactor(sf))
        }
    }

    /// The raw spreading factor.
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// LoRa forward error correction rate.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CodingRate {
    ///   4/5
    Cr4_5,
    ///   4/6
    Cr4_6,
    ///   4/7
    Cr4_7,
    ///   4/8
    Cr4_8,
}

impl CodingRate {
    /// All supported coding rates.
    pub const ALL: [CodingRate; 4] = [
        CodingRate::Cr4_5,
        CodingRate::Cr4_6,
        CodingRate::Cr4_7,
        CodingRate::Cr4_8,
    ];

    /// Parses the driver's coding rate index.
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            1 => Ok(CodingRate::Cr4_5),
            2 => Ok(CodingRate::Cr4_6),
            3 => Ok(CodingRate::Cr4_7),
            4 => Ok(CodingRate::Cr4_8),
            other => Err(ConfigError::CodingRate(other)),
        }
    }

    /// The driver's coding rate index.
    pub fn index(&self) -> u8 {
        match self {
            CodingRate::Cr4_5 => 1,
            CodingRate::Cr4_6 => 2,
            CodingRate::Cr4_7 => 3,
            CodingRate::Cr4_8 => 4,
        }
    }
}

/// LoRa modem settings shared by transmit and receive.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct LoRaConfig {
    /// Signal bandwidth.
    pub bandwidth: Bandwidth,
    /// Spreading factor.
    pub spreading_factor: SpreadingFactor,
    /// Coding rate.
    pub coding_rate: CodingRate,
    /// Preamble length in symbols.
    pub preamble_len: u16,
    /// RX symbol timeout in symbols.
    pub symbol_timeout: u16,
    /// Implicit header (fixed-length payload).
    pub fixed_length: bool,
    /// Frequency hopping.
    pub freq_hop_on: bool,
    /// Symbols between hops.
    pub hop_period: u8,
    /// IQ inversion.
    pub iq_inverted: bool,
    /// Payload CRC.
    pub crc_on: bool,
}

impl LoRaConfig {
    /// Builds a config from the driver's raw indices, keeping every other field
    /// at the demo defaults.
    pub fn new(bandwidth: u8, spreading_factor: u8, coding_rate: u8) -> Result<Self, ConfigError> {
        Ok(Self {
            bandwidth: Bandwidth::from_index(bandwidth)?,
            spreading_factor: SpreadingFactor::new(spreading_factor)?,
            coding_rate: CodingRate::from_index(coding_rate)?,
            ..Self::default()
        })
    }

    /// Whether the radio enables low data rate optimisation for these settings.
    pub fn low_datarate_optimize(&self) -> bool {
        let sf = self.spreading_factor.value();
        matches!(
            (self.bandwidth, sf),
            (Bandwidth::Khz125, 11) | (Bandwidth::Khz125, 12) | (Bandwidth::Khz250, 12)
        )
    }
}

impl Default for LoRaConfig {
    fn default() -> Self {
        Self {
            bandwidth: Bandwidth::Khz500,
            spreading_factor: SpreadingFactor(LORA_SPREADING_FACTOR),
            coding_rate: CodingRate::Cr4_5,
            preamble_len: LORA_PREAMBLE_LENGTH,
            symbol_timeout: LORA_SYMBOL_TIMEOUT,
            fixed_length: LORA_FIX_LENGTH_PAYLOAD_ON,
            freq_hop_on: LORA_FHSS_ENABLED,
            hop_period: LORA_NB_SYMB_HOP,
            iq_inverted: LORA_IQ_INVERSION_ON,
            crc_on: LORA_CRC_ENABLED,
        }
    }
}

/// FSK modem settings shared by transmit and receive.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FskConfig {
    /// Frequency deviation in Hz.
    pub fdev_hz: u32,
    /// Data rate in bits per second.
    pub datarate_bps: u32,
    /// Receiver bandwidth in Hz.
    pub bandwidth_hz: u32,
    /// AFC bandwidth in Hz.
    pub afc_bandwidth_hz: u32,
    /// Preamble length in bytes.
    pub preamble_len: u16,
    /// Fixed-length frames.
    pub fixed_length: bool,
    /// Payload CRC.
    pub crc_on: bool,
}

impl Default for FskConfig {
    fn default() -> Self {
        Self {
            fdev_hz: FSK_FDEV,
            datarate_bps: FSK_DATARATE,
            bandwidth_hz: FSK_BANDWIDTH,
            afc_bandwidth_hz: FSK_AFC_BANDWIDTH,
            preamble_len: FSK_PREAMBLE_LENGTH,
            fixed_length: FSK_FIX_LENGTH_PAYLOAD_ON,
            crc_on: FSK_CRC_ENABLED,
        }
    }
}

/// The selected modem and its settings.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ModemConfig {
    ///   LoRa modulation.
    LoRa(LoRaConfig),
    ///   FSK modulation.
    Fsk(FskConfig),
}

impl Default for ModemConfig {
    fn default() -> Self {
        ModemConfig::LoRa(LoRaConfig::default())
    }
}

impl From<ModemKind> for ModemConfig {
    fn from(kind: ModemKind) -> Self {
        match kind {
            ModemKind::LoRa => ModemConfig::LoRa(LoRaConfig::default()),
            ModemKind::Fsk => ModemConfig::Fsk(FskConfig::default()),
        }
    }
}

impl ModemConfig {
    /// The modem family.
    pub fn kind(&self) -> ModemKind {
        match self {
            ModemConfig::LoRa(_) => ModemKind::LoRa,
            ModemConfig::Fsk(_) => ModemKind::Fsk,
        }
    }

    /// Banner line logged when the modem is configured.
    pub fn banner(&self) -> &'static str {
        match self {
            ModemConfig::LoRa(lora) if lora.freq_hop_on => "> LORA FHSS Mode <",
            ModemConfig::LoRa(_) => "> LORA Mode <",
            ModemConfig::Fsk(_) => "> FSK Mode <",
        }
    }

    /// Parameters for `Radio::set_tx_config`.
    pub fn tx_config(&self, power_dbm: i8, timeout_ms: u32) -> TxConfig {
        match self {
            ModemConfig::LoRa(lora) => TxConfig {
                modem: ModemKind::LoRa,
                power_dbm,
                fdev_hz: 0,
                bandwidth: u32::from(lora.bandwidth.index()),
                datarate: u32::from(lora.spreading_factor.value()),
                coderate: lora.coding_rate.index(),
                preamble_len: lora.preamble_len,
                fix_len: lora.fixed_length,
                crc_on: lora.crc_on,
                freq_hop_on: lora.freq_hop_on,
                hop_period: lora.hop_period,
                iq_inverted: lora.iq_inverted,
                timeout_ms,
            },
            ModemConfig::Fsk(fsk) => TxConfig {
                modem: ModemKind::Fsk,
                power_dbm,
                fdev_hz: fsk.fdev_hz,
                bandwidth: 0,
                datarate: fsk.datarate_bps,
                coderate: 0,
                preamble_len: fsk.preamble_len,
                fix_len: fsk.fixed_length,
                crc_on: fsk.crc_on,
                freq_hop_on: false,
                hop_period: 0,
                iq_inverted: false,
                timeout_ms,
            },
        }
    }

    /// Parameters for `Radio::set_rx_config`.
    pub fn rx_config(&self) -> RxConfig {
        match self {
            ModemConfig::LoRa(lora) => RxConfig {
                modem: ModemKind::LoRa,
                bandwidth: u32::from(lora.bandwidth.index()),
                datarate: u32::from(lora.spreading_factor.value()),
                coderate: lora.coding_rate.index(),
                bandwidth_afc: 0,
                preamble_len: lora.preamble_len,
                symbol_timeout: lora.symbol_timeout,
                fix_len: lora.fixed_length,
                payload_len: 0,
                crc_on: lora.crc_on,
                freq_hop_on: lora.freq_hop_on,
                hop_period: lora.hop_period,
                iq_inverted: lora.iq_inverted,
                rx_continuous: true,
            },
            ModemConfig::Fsk(fsk) => RxConfig {
                modem: ModemKind::Fsk,
                bandwidth: fsk.bandwidth_hz,
                datarate: fsk.datarate_bps,
                coderate: 0,
                bandwidth_afc: fsk.afc_bandwidth_hz,
                preamble_len: fsk.preamble_len,
                symbol_timeout: 0,
                fix_len: fsk.fixed_length,
                payload_len: 0,
                crc_on: fsk.crc_on,
                freq_hop_on: false,
                hop_period: 0,
                iq_inverted: false,
                rx_continuous: true,
            },
        }
    }

    /// Air time of a frame carrying `payload_len` bytes, in milliseconds.
    ///
    /// Uses the SX127x datasheet formulas. For FSK the sync word is assumed to be
    /// [`FSK_SYNC_WORD_LEN`] bytes with no address filtering.
    pub fn time_on_air_ms(&self, payload_len: usize) -> u32 {
        match self {
            ModemConfig::LoRa(lora) => {
                let sf = f64::from(lora.spreading_factor.value());
                let symbol_s = libm::pow(2.0, sf) / f64::from(lora.bandwidth.hz());
                let preamble_s = (f64::from(lora.preamble_len) + 4.25) * symbol_s;
                let de = if lora.low_datarate_optimize() { 2.0 } else { 0.0 };
                let crc = if lora.crc_on { 16.0 } else { 0.0 };
                let ih = if lora.fixed_length { 20.0 } else { 0.0 };
                let cr = f64::from(lora.coding_rate.index());
                let numerator = 8.0 * payload_len as f64 - 4.0 * sf + 28.0 + crc - ih;
                let symbols = ceil(numerator / (4.0 * (sf - de))) * (cr + 4.0);
                let payload_symbols = 8.0 + if symbols > 0.0 { symbols } else { 0.0 };
                let payload_s = payload_symbols * symbol_s;
                ceil((preamble_s + payload_s) * 1_000.0) as u32
            }
            ModemConfig::Fsk(fsk) => {
                let length_byte = if fsk.fixed_length { 0 } else { 1 };
                let crc = if fsk.crc_on { 2 } else { 0 };
                let bytes = fsk.preamble_len as usize
                    + FSK_SYNC_WORD_LEN as usize
                    + length_byte
                    + payload_len
                    + crc;
                let bits = (bytes * 8) as f64;
                ceil(bits * 1_000.0 / f64::from(fsk.datarate_bps)) as u32
            }
        }
    }
}

/// Transmit parameters in the radio driver's layout.
///
/// For LoRa, `bandwidth` is the bandwidth index, `datarate` the spreading factor
/// and `coderate` the coding rate index; for FSK they are Hz, bits per second
/// and unused.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TxConfig {
    /// Modem family.
    pub modem: ModemKind,
    /// Output power in dBm.
    pub power_dbm: i8,
    /// FSK frequency deviation in Hz; 0 for LoRa.
    pub fdev_hz: u32,
    /// Bandwidth (index for LoRa, 0 for FSK).
    pub bandwidth: u32,
    /// Spreading factor for LoRa, bits per second for FSK.
    pub datarate: u32,
    /// Coding rate index for LoRa; 0 for FSK.
    pub coderate: u8,
    /// Preamble length.
    pub preamble_len: u16,
    /// Fixed-length frames.
    pub fix_len: bool,
    /// Payload CRC.
    pub crc_on: bool,
    /// Frequency hopping.
    pub freq_hop_on: bool,
    /// Symbols between hops.
    pub hop_period: u8,
    /// IQ inversion.
    pub iq_inverted: bool,
    /// Transmit timeout in ms.
    pub timeout_ms: u32,
}

/// Receive parameters in the radio driver's layout.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RxConfig {
    /// Modem family.
    pub modem: ModemKind,
    /// Bandwidth index for LoRa, Hz for FSK.
    pub bandwidth: u32,
    /// Spreading factor for LoRa, bits per second for FSK.
    pub datarate: u32,
    /// Coding rate index for LoRa; 0 for FSK.
    pub coderate: u8,
    /// AFC bandwidth in Hz (FSK only).
    pub bandwidth_afc: u32,
    /// Preamble length.
    pub preamble_len: u16,
    /// Symbol timeout (LoRa only).
    pub symbol_timeout: u16,
    /// Fixed-length frames.
    pub fix_len: bool,
    /// Expected payload length when `fix_len` is set.
    pub payload_len: u8,
    /// Payload CRC.
    pub crc_on: bool,
    /// Frequency hopping.
    pub freq_hop_on: bool,
    /// Symbols between hops.
    pub hop_period: u8,
    /// IQ inversion.
    pub iq_inverted: bool,
    /// Keep receiving after each frame instead of a single-shot window.
    pub rx_continuous: bool,
}

/// Everything the message loop needs to know about this node.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct AppConfig {
    /// Sender or listener.
    pub role: Role,
    /// Modem and modulation settings.
    pub modem: ModemConfig,
    /// Carrier frequency in Hz.
    pub rf_frequency_hz: u32,
    /// Transmit power in dBm.
    pub tx_power_dbm: i8,
    /// Transmit timeout in ms.
    pub tx_timeout_ms: u32,
    /// Receive window in ms, used every time reception is armed.
    pub rx_timeout_ms: u32,
    /// Delay between servicing a button press and sending, in ms.
    pub tx_delay_ms: u32,
    /// Index of the first ramp byte.
    pub tx_shift: usize,
    /// Settle time before re-arming reception, in ms.
    pub rx_settle_ms: u32,
    /// Sender idle interval between polls, in ms.
    pub idle_poll_ms: u32,
    /// Interval between hardware detection attempts, in ms.
    pub detect_retry_ms: u32,
    /// Tag sent and matched.
    pub tag: Tag,
}

impl AppConfig {
    /// Demo defaults for the given role and modem.
    pub fn new(role: Role, modem: ModemConfig) -> Self {
        Self {
            role,
            modem,
            rf_frequency_hz: RF_FREQUENCY,
            tx_power_dbm: TX_OUTPUT_POWER,
            tx_timeout_ms: TX_TIMEOUT_VALUE,
            rx_timeout_ms: RX_TIMEOUT_VALUE,
            tx_delay_ms: DEFAULT_TX_DELAY,
            tx_shift: DEFAULT_TX_SHIFT,
            rx_settle_ms: RX_SETTLE_MS,
            idle_poll_ms: IDLE_POLL_MS,
            detect_retry_ms: DETECT_RETRY_MS,
            tag: Tag::LOR1,
        }
    }

    /// Builds a config from textual role and modem names.
    pub fn parse(role: &str, modem: &str) -> Result<Self, ConfigError> {
        let role = role.parse::<Role>()?;
        let modem = modem.parse::<ModemKind>()?;
        Ok(Self::new(role, modem.into()))
    }

    /// Parameters for `Radio::set_tx_config`.
    pub fn tx_config(&self) -> TxConfig {
        self.modem.tx_config(self.tx_power_dbm, self.tx_timeout_ms)
    }

    /// Parameters for `Radio::set_rx_config`.
    pub fn rx_config(&self) -> RxConfig {
        self.modem.rx_config()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(Role::default(), ModemConfig::default())
    }
}
