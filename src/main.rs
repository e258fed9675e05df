//! iTunes Gallery
//!
//! A desktop gallery that searches the iTunes Search API for artwork and
//! rotates the results through a 5x4 tile grid.

use eframe::egui;

use itunes_gallery::gui::{self, PLACEHOLDER_PNG};
use itunes_gallery::logging::UiLogger;

fn main() -> eframe::Result<()> {
    match UiLogger::init() {
        Ok(receiver) => gui::set_log_receiver(receiver),
        Err(e) => eprintln!("Failed to install logger: {}", e),
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("GalleryApp!")
        .with_inner_size([520.0, 540.0])
        .with_resizable(false);

    // The placeholder tile doubles as the window icon
    match image::load_from_memory_with_format(PLACEHOLDER_PNG, image::ImageFormat::Png) {
        Ok(icon_image) => {
            let icon_rgba = icon_image.to_rgba8();
            let (icon_width, icon_height) = icon_rgba.dimensions();
            viewport = viewport.with_icon(egui::IconData {
                rgba: icon_rgba.into_raw(),
                width: icon_width,
                height: icon_height,
            });
        }
        Err(e) => log::warn!("Failed to load window icon: {}", e),
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "GalleryApp!",
        options,
        Box::new(|cc| Ok(Box::new(gui::GalleryApp::new(cc)?))),
    )
}
