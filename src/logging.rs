//! A [`log`] backend that prints through the RTT console.

use log::{LevelFilter, Metadata, Record, SetLoggerError, set_logger, set_max_level};

/// Data structure to filter log messages
struct RttLogger;

impl log::Log for RttLogger {
	fn enabled(&self, _: &Metadata<'_>) -> bool {
		true
	}

	fn flush(&self) {
		// nothing to do
	}

	fn log(&self, record: &Record<'_>) {
		if self.enabled(record.metadata()) {
			rprintln!("[{}] {}", record.level(), record.args());
		}
	}
}

/// Maps the name of a level to its filter, falling back to `Info`.
fn parse_level_filter(name: Option<&str>) -> LevelFilter {
	match name {
		Some("Error") => LevelFilter::Error,
		Some("Debug") => LevelFilter::Debug,
		Some("Off") => LevelFilter::Off,
		Some("Trace") => LevelFilter::Trace,
		Some("Warn") => LevelFilter::Warn,
		_ => LevelFilter::Info,
	}
}

/// Installs the RTT logger.
///
/// The maximum level is taken from `RTT_LOG_LEVEL_FILTER` at compile time.
/// Records are dropped until the console is initialized. Arguments of a
/// record must not log themselves, since the console is locked while they
/// are rendered.
pub fn init() -> Result<(), SetLoggerError> {
	set_logger(&RttLogger)?;
	// Determines LevelFilter at compile time
	set_max_level(parse_level_filter(option_env!("RTT_LOG_LEVEL_FILTER")));
	Ok(())
}
