//! Background fetch task
//!
//! Runs the search and downloads every artwork image off the UI thread. The
//! workers never touch UI state: each step is sent back as a [`FetchEvent`]
//! and applied by the UI thread when it drains the channel.

mod progress;

pub use progress::{PendingImages, Progress};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui;

use crate::api::{FetchError, ItunesClient, SearchRequest};

/// Messages from a fetch worker to the UI thread
#[derive(Debug)]
pub enum FetchEvent {
    /// The search succeeded; `total` images will follow
    Resolved {
        location: String,
        result_count: usize,
        total: usize,
    },
    /// One artwork image resolved; `None` if it could not be loaded
    ImageLoaded {
        index: usize,
        image: Option<egui::ColorImage>,
    },
    /// The search failed; no images follow
    Failed { location: String, error: FetchError },
}

/// Start a fetch on a new worker thread
///
/// `notify` is called after every event is sent, typically to request a
/// repaint of the UI.
pub fn spawn_fetch<N>(
    client: ItunesClient,
    request: SearchRequest,
    loaders: usize,
    notify: N,
) -> Receiver<FetchEvent>
where
    N: Fn() + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let location = client.location(&request);

        match client.fetch(&request) {
            Ok(result) => {
                let total = result.artwork_urls.len();
                let resolved = FetchEvent::Resolved {
                    location,
                    result_count: result.result_count,
                    total,
                };
                if tx.send(resolved).is_err() {
                    return;
                }
                notify();

                load_images(&client, &result.artwork_urls, loaders, &tx, &notify);
                log::info!("Finished loading {} images", total);
            }
            Err(error) => {
                log::error!("Fetch failed for {}: {}", location, error);
                let _ = tx.send(FetchEvent::Failed { location, error });
                notify();
            }
        }
    });

    rx
}

/// Download and decode `urls` on up to `loaders` threads
fn load_images<N>(
    client: &ItunesClient,
    urls: &[String],
    loaders: usize,
    tx: &Sender<FetchEvent>,
    notify: &N,
) where
    N: Fn() + Sync,
{
    let next = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..loaders.clamp(1, urls.len().max(1)) {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(url) = urls.get(index) else {
                    break;
                };

                let image = match load_image(client, url) {
                    Ok(image) => {
                        log::debug!("Loaded image {}: {}", index, url);
                        Some(image)
                    }
                    Err(e) => {
                        log::warn!("Failed to load image {} ({}): {}", index, url, e);
                        None
                    }
                };

                if tx.send(FetchEvent::ImageLoaded { index, image }).is_err() {
                    // Receiver dropped: a newer fetch replaced this one
                    break;
                }
                notify();
            });
        }
    });
}

fn load_image(client: &ItunesClient, url: &str) -> Result<egui::ColorImage, String> {
    let bytes = client
        .fetch_image_bytes(url)
        .map_err(|e| format!("Failed to fetch image: {}", e))?;
    decode_image(&bytes)
}

/// Load image from bytes into egui ColorImage
pub fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let size = [image.width() as usize, image.height() as usize];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();

    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        pixels.as_slice(),
    ))
}
