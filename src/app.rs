use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::widget::{button, canvas, column, container, opaque, row, stack, text};
use iced::{window, Alignment, Element, Length, Size, Subscription, Task, Theme};
use reqwest::Url;
use rfd::FileDialog;

use crate::config::Config;
use crate::error::{LayerError, Result};
use crate::giphy::GiphyClient;
use crate::media::AnimatedGif;
use crate::state::{LayoutDocument, OverlayCanvas, PanFeedback};
use crate::ui::anim::{self, Animated};
use crate::ui::gestures::{self, GestureInput, Outcome};
use crate::ui::picker::{self, GifPicker};
use crate::ui::{BasePicture, OverlayLayer};

/// Initial window size
pub const WINDOW_SIZE: Size = Size::new(1024.0, 768.0);

const TOOLBAR_HEIGHT: f32 = 52.0;
const STATUS_HEIGHT: f32 = 28.0;

/// Animation frame interval
const FRAME: Duration = Duration::from_millis(16);

/// Main application state
pub struct GifLayers {
    client: GiphyClient,
    picker: GifPicker,
    /// Overlay model shown over the base picture
    canvas: OverlayCanvas,
    base: Option<BasePicture>,
    /// Delete target fade
    target_alpha: Animated,
    /// Delete target growth and dragged overlay shrink
    trash_progress: Animated,
    started: Instant,
    /// Time of the last animation frame
    now: Instant,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    Picker(picker::Message),
    Canvas(GestureInput),
    /// User clicked "Add GIF"
    OpenPicker,
    /// User clicked "Choose picture"
    PickBase,
    BaseLoaded(Result<BasePicture>),
    /// A GIF for a restored overlay finished downloading
    OverlayLoaded {
        index: usize,
        url: String,
        result: Result<Arc<AnimatedGif>>,
    },
    SaveLayout,
    LayoutSaved(Result<PathBuf>),
    LoadLayout,
    LayoutLoaded(Result<LayoutDocument>),
    ClearOverlays,
    Tick(Instant),
    WindowResized(Size),
}

impl GifLayers {
    /// Create a new instance of the application
    pub fn new() -> (Self, Task<Message>) {
        let config = Config::load();
        log::info!("🎨 gif-layers initialized");
        (Self::with_config(config), Task::none())
    }

    pub fn with_config(config: Config) -> Self {
        let client = GiphyClient::new(config.giphy.clone());
        let picker = GifPicker::new(client.clone(), config.debounce(), WINDOW_SIZE.height);
        let now = Instant::now();

        Self {
            client,
            picker,
            canvas: OverlayCanvas::new(canvas_size(WINDOW_SIZE)),
            base: None,
            target_alpha: Animated::new(0.0),
            trash_progress: Animated::new(0.0),
            started: now,
            now,
            status: String::from("Ready. Add a GIF to get started."),
        }
    }

    pub fn canvas(&self) -> &OverlayCanvas {
        &self.canvas
    }

    pub fn picker(&self) -> &GifPicker {
        &self.picker
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let now = Instant::now();

        match message {
            Message::Picker(message) => {
                let (task, event) = self.picker.update(message, now);
                if let Some(event) = event {
                    self.on_picker_event(event);
                }
                return task.map(Message::Picker);
            }
            Message::Canvas(input) => self.on_gesture(input, now),
            Message::OpenPicker => {
                return self.picker.open(now).map(Message::Picker);
            }
            Message::PickBase => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Choose a Picture")
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Loading {}...", path.display());
                    return Task::perform(load_base(path), Message::BaseLoaded);
                }
            }
            Message::BaseLoaded(Ok(base)) => {
                self.status = format!("🖼️  Picture {}×{}", base.width, base.height);
                self.base = Some(base);
            }
            Message::BaseLoaded(Err(err)) => {
                log::warn!("⚠️  Failed to load picture: {}", err);
                self.status = format!("⚠️  {}", err);
            }
            Message::OverlayLoaded { index, url, result } => match result {
                Ok(gif) => {
                    if !self.canvas.attach_gif(index, &url, gif) {
                        log::debug!("Overlay {} changed before {} arrived", index, url);
                    }
                }
                Err(err) => log::warn!("⚠️  Failed to load {}: {}", url, err),
            },
            Message::SaveLayout => {
                let Some(path) = LayoutDocument::default_path() else {
                    self.status = String::from("⚠️  No data directory for layouts");
                    return Task::none();
                };
                self.canvas.save_records();
                let document = LayoutDocument::new(self.canvas.records().to_vec());
                return Task::perform(
                    async move { document.save(path).await },
                    Message::LayoutSaved,
                );
            }
            Message::LayoutSaved(result) => {
                self.status = match result {
                    Ok(path) => format!("💾 Saved layout to {}", path.display()),
                    Err(err) => format!("⚠️  {}", err),
                };
            }
            Message::LoadLayout => {
                let Some(path) = LayoutDocument::default_path() else {
                    self.status = String::from("⚠️  No data directory for layouts");
                    return Task::none();
                };
                return Task::perform(LayoutDocument::load(path), Message::LayoutLoaded);
            }
            Message::LayoutLoaded(Ok(document)) => {
                self.status = format!("📂 Restored {} overlays", document.records.len());
                return self.restore(document);
            }
            Message::LayoutLoaded(Err(err)) => {
                log::warn!("⚠️  Failed to load layout: {}", err);
                self.status = format!("⚠️  {}", err);
            }
            Message::ClearOverlays => {
                self.canvas.clear();
                self.status = String::from("Cleared all overlays");
            }
            Message::Tick(now) => {
                self.now = now;
                self.target_alpha.tick(now);
                self.trash_progress.tick(now);
                if let Some(event) = self.picker.tick(now) {
                    self.on_picker_event(event);
                }
            }
            Message::WindowResized(size) => {
                self.picker.set_window_height(size.height);
                self.canvas.set_bounds(canvas_size(size));
            }
        }

        Task::none()
    }

    fn on_picker_event(&mut self, event: picker::Event) {
        match event {
            picker::Event::GifChosen { gif, url } => {
                let index = self.canvas.add_overlay(url.as_str(), Some(gif));
                self.status = format!("✨ Added overlay #{}", index + 1);
            }
            picker::Event::Closed => log::debug!("GIF picker closed"),
        }
    }

    fn on_gesture(&mut self, input: GestureInput, now: Instant) {
        match gestures::apply(&mut self.canvas, input) {
            Outcome::Feedback(PanFeedback::EnteredTarget) => {
                // Desktop stand-in for the haptic tap
                log::info!("📳 Over delete target");
            }
            Outcome::Removed(index) => {
                self.status = format!("🗑️  Removed overlay #{}", index + 1);
            }
            Outcome::Feedback(_) | Outcome::None => {}
        }

        let target = if self.canvas.target_visible() { 1.0 } else { 0.0 };
        if self.target_alpha.target() != target {
            self.target_alpha.animate_to(target, now, anim::STANDARD);
        }

        let trash = if self.canvas.target_engaged() { 1.0 } else { 0.0 };
        if self.trash_progress.target() != trash {
            self.trash_progress.animate_to(trash, now, anim::STANDARD);
        }
    }

    /// Place a loaded layout and start downloading its GIFs
    fn restore(&mut self, document: LayoutDocument) -> Task<Message> {
        self.canvas.load_records(document.records);

        let loads = self
            .canvas
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let client = self.client.clone();
                let url = record.url.clone();
                Task::perform(
                    async move {
                        let parsed = Url::parse(&url).map_err(|e| LayerError::Url(e.to_string()));
                        let result = match parsed {
                            Ok(parsed) => client.fetch_gif(parsed).await.map(Arc::new),
                            Err(err) => Err(err),
                        };
                        (index, url, result)
                    },
                    |(index, url, result)| Message::OverlayLoaded { index, url, result },
                )
            })
            .collect::<Vec<_>>();

        Task::batch(loads)
    }

    /// Whether anything on screen changes between frames
    fn needs_frames(&self) -> bool {
        self.picker.is_visible()
            || self.picker.is_animating()
            || self.target_alpha.is_animating()
            || self.trash_progress.is_animating()
            || self
                .canvas
                .overlays()
                .iter()
                .any(|overlay| overlay.gif.as_ref().is_some_and(|gif| gif.is_animated()))
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let elapsed = self.now.saturating_duration_since(self.started);
        let has_overlays = !self.canvas.is_empty();

        let toolbar = row![
            button("Add GIF").on_press(Message::OpenPicker).padding(10),
            button("Choose picture").on_press(Message::PickBase).padding(10),
            button("Save layout")
                .on_press_maybe(has_overlays.then_some(Message::SaveLayout))
                .padding(10),
            button("Load layout").on_press(Message::LoadLayout).padding(10),
            button("Clear")
                .on_press_maybe(has_overlays.then_some(Message::ClearOverlays))
                .padding(10),
        ]
        .spacing(10)
        .padding([0, 10])
        .height(Length::Fixed(TOOLBAR_HEIGHT))
        .align_y(Alignment::Center);

        let layer: Element<GestureInput> = canvas(OverlayLayer {
            canvas: &self.canvas,
            base: self.base.as_ref(),
            elapsed,
            target_alpha: self.target_alpha.value(),
            trash_progress: self.trash_progress.value(),
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into();

        let status = container(text(&self.status).size(14))
            .padding([4, 10])
            .height(Length::Fixed(STATUS_HEIGHT));

        let content = column![toolbar, layer.map(Message::Canvas), status];

        if self.picker.is_visible() {
            stack![content, opaque(self.picker.view(elapsed).map(Message::Picker))].into()
        } else {
            content.into()
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let resizes = window::resize_events().map(|(_id, size)| Message::WindowResized(size));

        if self.needs_frames() {
            Subscription::batch([resizes, iced::time::every(FRAME).map(Message::Tick)])
        } else {
            resizes
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Area left for the canvas below the toolbar and above the status line
fn canvas_size(window: Size) -> cgmath::Vector2<f32> {
    cgmath::Vector2::new(
        window.width,
        (window.height - TOOLBAR_HEIGHT - STATUS_HEIGHT).max(0.0),
    )
}

/// Read and decode the base picture off the UI thread
async fn load_base(path: PathBuf) -> Result<BasePicture> {
    let bytes = tokio::fs::read(&path).await?;
    let decoded = AnimatedGif::decode(bytes).await?;
    let (width, height) = decoded.dimensions();

    log::info!("🖼️  Loaded {} ({}×{})", path.display(), width, height);
    Ok(BasePicture {
        handle: decoded.frame_at(Duration::ZERO).clone(),
        width,
        height,
    })
}
