//! Log output setup
//!
//! The crate logs through the `log` facade. Applications that want the
//! output on stderr call [`init`] once at start-up.

use env_logger::Env;

use crate::config::LogConfig;

/// Install an `env_logger` backend using the configured level.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init(config: &LogConfig) {
    let env = Env::default().default_filter_or(config.level.as_str());
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialised");
    }
}
