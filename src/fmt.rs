//! Logging shims.
//!
//! Forwards to `defmt` when `defmt-0-3` is enabled, otherwise to `log` when `log`
//! is enabled, and expands to nothing (while still borrowing every argument) when
//! neither backend is selected. Format strings must stick to `{}` and `{:?}` so
//! they are valid for both backends.

#![allow(unused_macros)]

macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::trace!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::debug!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::info!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::info!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::warn!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::error!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::error!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        let _ = ($(&$arg,)*);
    }};
}

/// Logs a driver-level failure whose type only promises `Debug`.
///
/// `defmt` cannot format arbitrary `Debug` values directly, so the value is
/// wrapped in `Debug2Format` on that backend.
pub(crate) fn log_failure<E: core::fmt::Debug>(context: &str, err: &E) {
    #[cfg(feature = "defmt-0-3")]
    defmt::error!("{}: {}", context, defmt::Debug2Format(err));
    #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
    log::error!("{}: {:?}", context, err);
    #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
    let _ = (context, err);
}
