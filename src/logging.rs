//! `log` backend that writes to the browser console.
//!
//! Engine code logs through the `log` macros. In the browser the frontend
//! calls `init_logging` once; natively nothing is installed and the macros
//! compile down to a level check.

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::wasm::{console_error, console_log};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        match record.level() {
            Level::Error | Level::Warn => console_error(&line),
            _ => console_log(&line),
        }
    }

    fn flush(&self) {}
}

/// Unknown names fall back to `warn`.
fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Warn)
}

/// Install the console logger. Safe to call repeatedly; later calls only
/// change the level.
pub fn init(level: &str) {
    // Err means a logger is already installed, which is fine.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(parse_level(level));
}
