/// env_logger setup for processes that embed the sync layer.
use log::SetLoggerError;

const DEFAULT_FILTER: &str = "info";

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .try_init()
}

/// Logger for unit tests: captured by the test harness, safe to call repeatedly.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
