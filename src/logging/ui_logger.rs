use log::{Level, Log, Metadata, Record, SetLoggerError};
use std::sync::mpsc::{self, Receiver, Sender};

/// One formatted record shown in the log window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub text: String,
}

/// Logger that writes through env_logger and forwards each line into an mpsc channel.
pub struct UiLogger {
    inner: env_logger::Logger,
    sender: Sender<LogLine>,
}

impl UiLogger {
    /// Install the UI logger and return the receiver to read log lines from.
    /// The filter comes from `RUST_LOG`, defaulting to `info`.
    pub fn init() -> Result<Receiver<LogLine>, SetLoggerError> {
        let inner = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .build();
        let max_level = inner.filter();

        let (tx, rx) = mpsc::channel();
        let logger = UiLogger { inner, sender: tx };

        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(max_level);
        Ok(rx)
    }
}

/// Format a record the way the log window shows it
pub fn format_record(record: &Record) -> LogLine {
    let mut text = format!("[{}] {}: {}", record.level(), record.target(), record.args());
    if let (Some(file), Some(line)) = (record.file(), record.line()) {
        text.push_str(&format!(" ({}:{})", file, line));
    }
    LogLine {
        level: record.level(),
        text,
    }
}

impl Log for UiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.inner.matches(record) {
            self.inner.log(record);
            let _ = self.sender.send(format_record(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("Loaded {} images", 45))
                .level(Level::Info)
                .target("itunes_gallery::fetch")
                .file(Some("src/fetch/mod.rs"))
                .line(Some(12))
                .build(),
        );
        assert_eq!(line.level, Level::Info);
        assert_eq!(
            line.text,
            "[INFO] itunes_gallery::fetch: Loaded 45 images (src/fetch/mod.rs:12)"
        );
    }

    #[test]
    fn test_format_record_without_location() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("offline"))
                .level(Level::Warn)
                .target("gallery")
                .build(),
        );
        assert_eq!(line.text, "[WARN] gallery: offline");
    }
}
