//! Logging setup for the statictron binary.

use log::LevelFilter;

/// Level for statictron's own modules.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialises `env_logger`.
///
/// Dependencies only report warnings; `RUST_LOG` overrides both levels.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), level_for(verbose))
        .format_timestamp(None)
        .format_target(verbose)
        .parse_default_env()
        .init();
}
