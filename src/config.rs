//! Kernel configuration
//!
//! Compile-time settings. Log verbosity is selected with the `log-*` cargo
//! features; the most verbose enabled feature wins.

use log::LevelFilter;

/// Size of the kernel object heap (16 KiB).
///
/// Every live kernel object is charged one block from this region.
pub const OBJECT_HEAP_SIZE: usize = 16 * 1024;

/// Maximum level passed through to the kernel logger.
pub const LOG_LEVEL: LevelFilter = if cfg!(feature = "log-trace") {
    LevelFilter::Trace
} else if cfg!(feature = "log-debug") {
    LevelFilter::Debug
} else if cfg!(feature = "log-info") {
    LevelFilter::Info
} else if cfg!(feature = "log-warn") {
    LevelFilter::Warn
} else if cfg!(feature = "log-error") {
    LevelFilter::Error
} else {
    LevelFilter::Off
};
