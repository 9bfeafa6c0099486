//! Plain log output to stderr.
//!
//! A `log` crate compatible logger for the `lspwire` binary. Lines look like
//!
//! ```text
//! 12:04:31 DEBUG lspwire::dispatch request textDocument/hover (1)
//! ```
//!
//! with the timestamp and target columns controlled by [`LoggingConfig`].

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record};
use lspwire::LoggingConfig;
use time::OffsetDateTime;
use time::macros::format_description;

/// Logger that writes one line per record to stderr.
#[derive(Debug)]
pub struct StderrLogger {
    max_level: LevelFilter,
    show_timestamps: bool,
    show_targets: bool,
}

impl StderrLogger {
    /// Create a logger from the logging configuration.
    #[must_use]
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            max_level: config.level,
            show_timestamps: config.timestamps,
            show_targets: config.targets,
        }
    }

    /// Initialize as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(config: &LoggingConfig) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(config)))?;
        config.apply();
        Ok(())
    }

    /// Initialize as the global logger, ignoring errors if already set.
    pub fn try_init(config: &LoggingConfig) {
        let _ = Self::init(config);
    }

    fn format_line(&self, record: &Record) -> String {
        let mut line = String::new();
        if self.show_timestamps {
            let format = format_description!("[hour]:[minute]:[second]");
            if let Ok(ts) = OffsetDateTime::now_utc().format(&format) {
                line.push_str(&ts);
                line.push(' ');
            }
        }
        line.push_str(&format!("{:<5}", record.level()));
        if self.show_targets {
            line.push(' ');
            line.push_str(record.target());
        }
        line.push(' ');
        line.push_str(&record.args().to_string());
        line
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_line(record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn config(level: LevelFilter, timestamps: bool, targets: bool) -> LoggingConfig {
        LoggingConfig {
            level,
            timestamps,
            targets,
        }
    }

    fn metadata(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("test").build()
    }

    #[test]
    fn test_stderr_logger_enabled() {
        let logger = StderrLogger::new(&config(LevelFilter::Info, true, true));

        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Info)));
        assert!(!logger.enabled(&metadata(Level::Debug)));
        assert!(!logger.enabled(&metadata(Level::Trace)));
    }

    #[test]
    fn test_off_disables_everything() {
        let logger = StderrLogger::new(&config(LevelFilter::Off, true, true));
        assert!(!logger.enabled(&metadata(Level::Error)));
    }

    #[test]
    fn test_format_line_without_timestamp() {
        let logger = StderrLogger::new(&config(LevelFilter::Trace, false, true));
        let line = logger.format_line(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Warn)
                .target("lspwire::dispatch")
                .build(),
        );
        assert_eq!(line, "WARN  lspwire::dispatch hello");
    }

    #[test]
    fn test_format_line_without_target() {
        let logger = StderrLogger::new(&config(LevelFilter::Trace, false, false));
        let line = logger.format_line(
            &Record::builder()
                .args(format_args!("hi"))
                .level(Level::Debug)
                .target("lspwire::union")
                .build(),
        );
        assert_eq!(line, "DEBUG hi");
    }

    #[test]
    fn test_format_line_with_timestamp() {
        let logger = StderrLogger::new(&config(LevelFilter::Trace, true, false));
        let line = logger.format_line(
            &Record::builder()
                .args(format_args!("x"))
                .level(Level::Info)
                .build(),
        );
        // HH:MM:SS prefix
        assert_eq!(line.len(), "00:00:00 INFO  x".len());
        assert_eq!(&line[2..3], ":");
    }
}
