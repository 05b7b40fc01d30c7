//! Logging setup.
//!
//! The crate logs through the `log` facade with a bracketed component tag
//! (`[interceptor]`, `[system_menu]`, ...). Hosts that already install a logger
//! need nothing from here; [`init`] is a convenience for hosts and tests that
//! don't.

use env_logger::Env;

/// Install an `env_logger` backend. `RUST_LOG` overrides the default `info` filter.
///
/// Safe to call more than once; later calls return an error and leave the
/// first logger in place.
pub fn init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init()
}
