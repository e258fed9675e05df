//! Logging setup
//!
//! Records go to stderr through env_logger and are mirrored into the
//! in-app log window.

mod ui_logger;

pub use ui_logger::{format_record, LogLine, UiLogger};
