//! Kernel Logger
//!
//! `log` backend for the kernel. Records are formatted as
//! `[LEVEL] target: message` and handed to a sink function, which is the
//! UART writer on hardware.
//!
//! # Design
//! - Installed once; later calls to [`init`] fail with `SetLoggerError`
//! - Level filtering follows [`config::LOG_LEVEL`](crate::config::LOG_LEVEL)
//! - No allocation on the logging path

use core::fmt;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Once;

use crate::config;

/// Output sink for formatted log lines (without trailing newline).
pub type Sink = fn(fmt::Arguments<'_>);

/// Logger that forwards enabled records to a [`Sink`].
pub struct KernelLogger {
    sink: Sink,
    level: LevelFilter,
}

impl KernelLogger {
    /// Create a logger writing to `sink` at the given level.
    pub const fn new(sink: Sink, level: LevelFilter) -> Self {
        Self { sink, level }
    }

    /// The maximum level this logger emits.
    #[inline]
    pub const fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        (self.sink)(format_args!(
            "[{:<5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

static LOGGER: Once<KernelLogger> = Once::new();

/// Install the kernel logger.
///
/// Must be called early in boot, before any subsystem logs.
pub fn init(sink: Sink) -> Result<(), SetLoggerError> {
    let logger = LOGGER.call_once(|| KernelLogger::new(sink, config::LOG_LEVEL));
    log::set_logger(logger)?;
    log::set_max_level(logger.level());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use spin::Mutex;
    use std::fmt::Write;
    use std::string::String;

    static CAPTURED: Mutex<String> = Mutex::new(String::new());

    fn capture(args: fmt::Arguments<'_>) {
        let mut out = CAPTURED.lock();
        let _ = out.write_fmt(args);
        out.push('\n');
    }

    #[test]
    fn test_level_filter() {
        let logger = KernelLogger::new(capture, LevelFilter::Warn);
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_disabled_record_not_written() {
        let logger = KernelLogger::new(capture, LevelFilter::Error);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("logger-filtered")
                .args(format_args!("dropped"))
                .build(),
        );
        assert!(!CAPTURED.lock().contains("logger-filtered"));
    }

    #[test]
    fn test_installed_logger_formats_records() {
        init(capture).expect("logger installed once per test binary");
        log::error!(target: "logger-test", "resource heap at {} bytes", 4096);
        let out = CAPTURED.lock();
        assert!(out.contains("[ERROR] logger-test: resource heap at 4096 bytes"));
    }
}
