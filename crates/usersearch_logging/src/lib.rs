#![deny(missing_docs)]
//! Shared logging utilities for the usersearch workspace.
//!
//! This crate provides the `search_*` logging macros used across the codebase,
//! a process-wide publish tick for correlating log lines with rendered frames,
//! and a minimal test initializer for the global logger.

use std::sync::atomic::{AtomicU64, Ordering};

/// Number of view publishes performed so far by any coordinator in the process.
static PUBLISH_TICK: AtomicU64 = AtomicU64::new(0);

/// Advances the publish tick and returns the new value.
/// Called by the coordinator once per published view.
pub fn advance_publish_tick() -> u64 {
    PUBLISH_TICK.fetch_add(1, Ordering::Relaxed) + 1
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! search_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! search_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! search_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! search_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already have installed the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_tick_is_monotonic() {
        let first = advance_publish_tick();
        let second = advance_publish_tick();
        assert!(second > first);
    }
}
