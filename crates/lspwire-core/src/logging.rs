//! Structured logging for lspwire.
//!
//! All lspwire crates log through the standard [`log`] facade. Nothing is
//! printed unless the embedding application installs a logger; the `lspwire`
//! binary installs a small stderr logger of its own.
//!
//! # Log Levels
//!
//! - **warn**: dropped notifications, responses for unknown request ids
//! - **debug**: decode failures, dispatch decisions, request state changes
//! - **trace**: union trial attempts and other wire-level detail
//!
//! # Log Targets
//!
//! - `lspwire`: root target
//! - `lspwire::envelope`: message classification and envelope checks
//! - `lspwire::union`: untagged union trial decoding
//! - `lspwire::registry`: method name resolution
//! - `lspwire::dispatch`: per-method payload selection
//! - `lspwire::correlation`: in-flight request tracking
//!
//! Example filter: `LSPWIRE_LOG=debug`

pub use log::{debug, error, info, trace, warn};

pub use log::{Level, LevelFilter};

/// Log targets used by lspwire components.
pub mod targets {
    /// Root target for all lspwire logs.
    pub const LSPWIRE: &str = "lspwire";

    /// Message classification and envelope invariants.
    pub const ENVELOPE: &str = "lspwire::envelope";

    /// Untagged union trial decoding.
    pub const UNION: &str = "lspwire::union";

    /// Method name resolution.
    pub const REGISTRY: &str = "lspwire::registry";

    /// Per-method payload selection.
    pub const DISPATCH: &str = "lspwire::dispatch";

    /// In-flight request tracking.
    pub const CORRELATION: &str = "lspwire::correlation";
}

/// Returns whether logging is enabled at the given level for the given target.
///
/// Useful to skip building expensive diagnostics:
///
/// ```
/// use lspwire_core::logging::{is_enabled, targets, Level};
///
/// if is_enabled(Level::Trace, targets::UNION) {
///     // format every attempted alternative
/// }
/// ```
#[inline]
#[must_use]
pub fn is_enabled(level: Level, target: &str) -> bool {
    log::log_enabled!(target: target, level)
}

/// Logs an envelope event at DEBUG level.
#[macro_export]
macro_rules! log_envelope {
    ($($arg:tt)*) => {
        log::debug!(target: "lspwire::envelope", $($arg)*)
    };
}

/// Logs a dispatch event at DEBUG level.
#[macro_export]
macro_rules! log_dispatch {
    ($($arg:tt)*) => {
        log::debug!(target: "lspwire::dispatch", $($arg)*)
    };
}

/// Logs a correlation event at DEBUG level.
#[macro_export]
macro_rules! log_correlation {
    ($($arg:tt)*) => {
        log::debug!(target: "lspwire::correlation", $($arg)*)
    };
}
