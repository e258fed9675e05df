//! GUI module using egui/eframe
//!
//! Provides the gallery window: search controls, the tile grid, the
//! slideshow toggle and status reporting.

mod app;
mod status;

pub use app::GalleryApp;
pub use status::AppStatus;

use std::sync::mpsc::Receiver;
use std::sync::Mutex;

use crate::logging::LogLine;

/// Placeholder tile shown before the first successful search
pub const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/default.png");

/// Global storage for the log receiver, used to transfer from main() to GalleryApp::new()
static LOG_RECEIVER: Mutex<Option<Receiver<LogLine>>> = Mutex::new(None);

/// Store the log receiver for the app to take during initialization
pub fn set_log_receiver(receiver: Receiver<LogLine>) {
    if let Ok(mut guard) = LOG_RECEIVER.lock() {
        *guard = Some(receiver);
    }
}

/// Take the log receiver (called once by GalleryApp::new)
pub(crate) fn take_log_receiver() -> Option<Receiver<LogLine>> {
    LOG_RECEIVER.lock().ok().and_then(|mut guard| guard.take())
}
