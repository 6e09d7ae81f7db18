//! Logging and timing instrumentation.
//!
//! The engine logs through `tracing`; installing a subscriber is left to the
//! embedding application. `init_tracing` is a convenience for binaries and
//! tests that do not have their own.
//!
//! ## Usage
//!
//! ```ignore
//! use adaptmap::observability::{init_tracing, profiling};
//!
//! init_tracing("adaptmap=debug");
//! profiling::enable_profiling();
//! // ... register adapters, adapt values ...
//! println!("{}", profiling::get_timing_report().to_summary());
//! ```

pub mod profiling;

pub use profiling::{
    enable_profiling, get_timing_report, is_profiling_enabled, reset_timing_data, TimingReport,
    TimingSpan,
};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_directive`
/// when the variable is unset.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
