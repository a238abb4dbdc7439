//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Safe to call more than once; only the first call installs the logger
/// (tests from several modules may race to initialize).
pub fn init() {
    let _ = env_logger::builder().is_test(false).try_init();
}
