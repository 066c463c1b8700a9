//! Logger bootstrap for the `trackfolio` binary.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Filter applied when `RUST_LOG` is unset.
///
/// Bevy and wgpu are chatty at debug level, so verbose mode only lowers the
/// threshold for this crate.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        format!("{},{}={}", LevelFilter::Info, env!("CARGO_PKG_NAME"), LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    }
}

/// Initializes the global logger.
///
/// `RUST_LOG` wins over [`default_filter`] when present.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Already initialised by an earlier call (tests call this repeatedly).
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
