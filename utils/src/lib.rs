//! Shared utilities for rollcall.

pub mod logging;
pub mod spans;
pub mod stats;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use stats::StatsCounter;
pub use time::format_duration;
