//! Main application state and UI implementation

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use eframe::egui;

use super::status::AppStatus;
use super::PLACEHOLDER_PNG;
use crate::api::{FetchError, ItunesClient, MediaType, SearchRequest};
use crate::config::{get_config, AppConfig};
use crate::fetch::{decode_image, spawn_fetch, FetchEvent, PendingImages, Progress};
use crate::gallery::{Gallery, Slideshow, GRID_COLUMNS, GRID_SIZE};
use crate::logging::LogLine;

/// Edge length of one gallery tile in points
const TILE_SIZE: f32 = 100.0;

/// Lines kept in the log window
const MAX_LOG_LINES: usize = 100;

type Tile = egui::TextureHandle;

/// A search whose events are still arriving
struct ActiveFetch {
    receiver: Receiver<FetchEvent>,
    location: String,
    pending: Option<PendingImages<Tile>>,
}

/// Main application state
pub struct GalleryApp {
    /// Search endpoint client, cloned into each fetch worker
    client: ItunesClient,
    /// Loader threads per fetch
    image_loaders: usize,
    /// Search term as typed
    term: String,
    /// Selected media type
    media: MediaType,
    status: AppStatus,
    progress: Progress,
    /// Tile shown before the first search and for images that failed to load
    placeholder: Tile,
    /// Images of the last successful search
    gallery: Option<Gallery<Tile>>,
    fetch: Option<ActiveFetch>,
    slideshow: Slideshow,
    /// Text of the error dialog, while it is showing
    alert: Option<String>,
    log_receiver: Option<Receiver<LogLine>>,
    log_messages: VecDeque<LogLine>,
    show_log_window: bool,
}

impl GalleryApp {
    /// Create a new GalleryApp instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut app = Self::with_config(&cc.egui_ctx, get_config())?;
        app.log_receiver = super::take_log_receiver();
        Ok(app)
    }

    fn with_config(
        ctx: &egui::Context,
        config: &AppConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = ItunesClient::new(&config.itunes)?;
        let placeholder = ctx.load_texture(
            "placeholder",
            decode_image(PLACEHOLDER_PNG)?,
            egui::TextureOptions::LINEAR,
        );

        Ok(Self {
            client,
            image_loaders: config.gallery.image_loaders(),
            term: String::new(),
            media: config.gallery.default_media(),
            status: AppStatus::Idle,
            progress: Progress::default(),
            placeholder,
            gallery: None,
            fetch: None,
            slideshow: Slideshow::new(config.gallery.slideshow_interval()),
            alert: None,
            log_receiver: None,
            log_messages: VecDeque::new(),
            show_log_window: false,
        })
    }

    fn is_fetching(&self) -> bool {
        self.fetch.is_some()
    }

    /// Play is only offered once a gallery exists and nothing blocks it
    fn can_play(&self) -> bool {
        self.gallery.is_some() && !self.is_fetching() && self.alert.is_none()
    }

    fn can_search(&self) -> bool {
        !self.is_fetching() && self.alert.is_none()
    }

    /// Start an async search for the current term and media type
    fn start_fetch(&mut self, ctx: &egui::Context) {
        // Stop swapping before the cache can be replaced
        if self.slideshow.is_running() {
            self.slideshow.pause();
            log::info!("Slideshow paused for new search");
        }

        let request = SearchRequest::new(self.term.clone(), self.media);
        let location = self.client.location(&request);
        log::info!("Getting images: {}", location);

        self.progress = Progress::default();
        self.status = AppStatus::Fetching;

        let repaint_ctx = ctx.clone();
        let receiver = spawn_fetch(
            self.client.clone(),
            request,
            self.image_loaders,
            move || repaint_ctx.request_repaint(),
        );

        self.fetch = Some(ActiveFetch {
            receiver,
            location,
            pending: None,
        });
    }

    /// Apply every fetch event that has arrived
    fn poll_fetch(&mut self, ctx: &egui::Context) {
        loop {
            let Some(fetch) = self.fetch.as_ref() else {
                return;
            };

            match fetch.receiver.try_recv() {
                Ok(event) => self.apply_fetch_event(ctx, event),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.fetch = None;
                    self.status = AppStatus::Failed("Fetch thread terminated unexpectedly".into());
                    log::error!("Fetch thread terminated unexpectedly");
                    return;
                }
            }
        }
    }

    fn apply_fetch_event(&mut self, ctx: &egui::Context, event: FetchEvent) {
        match event {
            FetchEvent::Resolved {
                location,
                result_count,
                total,
            } => {
                log::info!(
                    "{} results for {}, loading {} images",
                    result_count,
                    location,
                    total
                );
                if let Some(fetch) = self.fetch.as_mut() {
                    fetch.pending = Some(PendingImages::new(total));
                }
                self.progress = Progress::begin(total);
            }
            FetchEvent::ImageLoaded { index, image } => {
                let Some(pending) = self.fetch.as_mut().and_then(|f| f.pending.as_mut()) else {
                    return;
                };

                let tile = match image {
                    Some(image) => ctx.load_texture(
                        format!("artwork-{}", index),
                        image,
                        egui::TextureOptions::LINEAR,
                    ),
                    None => self.placeholder.clone(),
                };
                pending.insert(index, tile);
                self.progress = pending.progress();

                if pending.is_complete() {
                    self.finish_fetch();
                }
            }
            FetchEvent::Failed { location, error } => self.fail_fetch(&location, error),
        }
    }

    /// Swap in the completed cache
    fn finish_fetch(&mut self) {
        let Some(fetch) = self.fetch.take() else {
            return;
        };
        let Some(pending) = fetch.pending else {
            return;
        };

        match pending.into_gallery() {
            Ok(gallery) => {
                log::info!("Gallery ready with {} images", gallery.len());
                self.gallery = Some(gallery);
                self.status = AppStatus::Ready(fetch.location);
            }
            Err(e) => {
                log::error!("Could not build gallery: {}", e);
                self.status = AppStatus::Failed(e.to_string());
            }
        }
    }

    fn fail_fetch(&mut self, location: &str, error: FetchError) {
        self.fetch = None;
        if matches!(error, FetchError::InsufficientResults(_)) {
            self.alert = Some(format!("URI: {}\n\n{}", location, error));
        }
        self.status = AppStatus::Failed(error.to_string());
    }

    fn tick_slideshow(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        if self.slideshow.poll(now) {
            if let Some(gallery) = self.gallery.as_mut() {
                match gallery.random_swap(&mut rand::thread_rng()) {
                    Ok((slot, reserve_index)) => {
                        log::debug!("Swapped slot {} with image {}", slot, reserve_index)
                    }
                    Err(e) => log::error!("Slideshow swap failed: {}", e),
                }
            }
        }
        if let Some(wait) = self.slideshow.time_until_tick(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn poll_logs(&mut self) {
        if let Some(ref receiver) = self.log_receiver {
            while let Ok(line) = receiver.try_recv() {
                self.log_messages.push_back(line);
                if self.log_messages.len() > MAX_LOG_LINES {
                    self.log_messages.pop_front();
                }
            }
        }
    }

    fn show_search_bar(&mut self, ctx: &egui::Context) {
        let mut play_clicked = false;
        let mut get_images_clicked = false;
        let can_play = self.can_play();
        let can_search = self.can_search();

        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(can_play, egui::Button::new(self.slideshow.label()))
                    .clicked()
                {
                    play_clicked = true;
                }

                ui.label("Search:");
                ui.add_enabled(
                    can_search,
                    egui::TextEdit::singleline(&mut self.term).desired_width(187.0),
                );

                ui.add_enabled_ui(can_search, |ui| {
                    egui::ComboBox::new("media_type_combo", "")
                        .selected_text(self.media.as_str())
                        .show_ui(ui, |ui| {
                            for media in MediaType::ALL {
                                ui.selectable_value(&mut self.media, media, media.as_str());
                            }
                        });
                });

                if ui
                    .add_enabled(can_search, egui::Button::new("Get Images"))
                    .clicked()
                {
                    get_images_clicked = true;
                }
            });
            ui.add_space(4.0);
        });

        if play_clicked {
            self.slideshow.toggle(Instant::now());
            log::info!("Slideshow {:?}", self.slideshow.state());
        }
        if get_images_clicked {
            self.start_fetch(ctx);
        }
    }

    fn show_footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(egui::ProgressBar::new(self.progress.fraction()).desired_width(240.0));
                ui.label("Images provided by iTunes Search API.");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Log").clicked() {
                        self.show_log_window = !self.show_log_window;
                    }
                    ui.weak(format!("v{}", env!("APP_VERSION")));
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_gallery(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let status = ui.label(self.status.message());
            if let Some(reason) = self.status.reason() {
                status.on_hover_text(reason);
            }
            ui.add_space(4.0);

            let tiles: Vec<&Tile> = match &self.gallery {
                Some(gallery) => gallery.visible().iter().collect(),
                None => vec![&self.placeholder; GRID_SIZE],
            };

            egui::Grid::new("gallery_grid")
                .spacing([0.0, 0.0])
                .show(ui, |ui| {
                    for (i, tile) in tiles.iter().enumerate() {
                        ui.image((tile.id(), egui::vec2(TILE_SIZE, TILE_SIZE)));
                        if (i + 1) % GRID_COLUMNS == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
    }

    fn show_log(&mut self, ctx: &egui::Context) {
        if !self.show_log_window {
            return;
        }

        egui::Window::new("Log")
            .open(&mut self.show_log_window)
            .default_size([500.0, 300.0])
            .resizable(true)
            .show(ctx, |ui| {
                if ui.button("Clear").clicked() {
                    self.log_messages.clear();
                }
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_messages {
                            let color = match line.level {
                                log::Level::Error => egui::Color32::RED,
                                log::Level::Warn => egui::Color32::YELLOW,
                                log::Level::Info => egui::Color32::GRAY,
                                log::Level::Debug | log::Level::Trace => egui::Color32::DARK_GRAY,
                            };
                            ui.colored_label(color, &line.text);
                        }
                    });
            });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.as_deref() else {
            return;
        };

        let mut dismissed = false;
        let response = egui::Modal::new(egui::Id::new("error_alert")).show(ctx, |ui| {
            ui.set_max_width(400.0);
            ui.heading("Error");
            ui.label(message);
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

        if dismissed || response.should_close() {
            self.alert = None;
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_logs();
        self.poll_fetch(ctx);
        self.tick_slideshow(ctx);

        // Request repaint while loading
        if self.is_fetching() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.show_search_bar(ctx);
        self.show_footer(ctx);
        self.show_gallery(ctx);
        self.show_log(ctx);
        self.show_alert(ctx);
    }
}
