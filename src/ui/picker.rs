/// GIF picker component
///
/// Owns the search controller, the result grid and the bottom-sheet panel.
/// The host forwards [`Message`]s to [`GifPicker::update`] and calls
/// [`GifPicker::tick`] on every animation frame; the picker reports back
/// through [`Event`]s.

use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::widget::{column, container, mouse_area, Space};
use iced::{Background, Color, Element, Length, Point, Task, Theme};
use reqwest::Url;

use super::grid::{self, GridState};
use super::panel::{Panel, PanelEvent, TOP_INSET};
use crate::error::LayerError;
use crate::giphy::{Endpoint, GiphyClient};
use crate::media::AnimatedGif;
use crate::search::{debounce, Applied, SearchController, Ticket};

/// Height of the grab handle strip at the top of the sheet
pub const HANDLE_HEIGHT: f32 = 25.0;

/// A press that moves less than this before release is a tap
const TAP_SLOP: f32 = 4.0;

#[derive(Debug, Clone)]
pub enum Message {
    Grid(grid::Message),
    DebounceElapsed(Ticket),
    ResultsFetched(Ticket, Result<Vec<Url>, LayerError>),
    CellLoaded(Url, Result<Arc<AnimatedGif>, LayerError>),
    PointerMoved(Point),
    DragStarted,
    DragEnded,
}

/// Notifications for the host
#[derive(Debug, Clone)]
pub enum Event {
    /// Emitted at most once per panel session
    GifChosen { gif: Arc<AnimatedGif>, url: Url },
    /// The panel finished sliding out
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    on_handle: bool,
    /// Whether movement is driving the panel offset
    forwarding: bool,
}

pub struct GifPicker {
    client: GiphyClient,
    search: SearchController,
    grid: GridState,
    panel: Panel,
    pointer: Point,
    drag: Option<Drag>,
    chosen: bool,
}

impl GifPicker {
    pub fn new(client: GiphyClient, debounce: Duration, window_height: f32) -> Self {
        Self {
            client,
            search: SearchController::new(debounce),
            grid: GridState::new(),
            panel: Panel::new(window_height),
            pointer: Point::ORIGIN,
            drag: None,
            chosen: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_visible()
    }

    pub fn is_animating(&self) -> bool {
        self.panel.is_animating() || self.grid.is_animating()
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn set_window_height(&mut self, height: f32) {
        self.panel.set_window_height(height);
    }

    /// Slide the panel in with a fresh trending listing
    pub fn open(&mut self, now: Instant) -> Task<Message> {
        if !self.panel.open(now) {
            return Task::none();
        }

        self.chosen = false;
        self.drag = None;
        self.grid = GridState::new();
        let (ticket, endpoint) = self.search.reset();
        log::info!("🔍 Opening GIF picker");

        Task::batch([self.fetch(ticket, endpoint), grid::scroll_to_top()])
    }

    pub fn close(&mut self, now: Instant) {
        self.drag = None;
        self.panel.close(now);
    }

    /// Advance animations; reports `Closed` once the slide-out finishes
    pub fn tick(&mut self, now: Instant) -> Option<Event> {
        self.grid.tick(now);

        match self.panel.tick(now)? {
            PanelEvent::Closed => {
                self.release();
                Some(Event::Closed)
            }
            PanelEvent::Opened | PanelEvent::Settled => None,
        }
    }

    pub fn update(&mut self, message: Message, now: Instant) -> (Task<Message>, Option<Event>) {
        match message {
            Message::Grid(message) => return self.update_grid(message, now),
            Message::DebounceElapsed(ticket) => {
                if let Some(endpoint) = self.search.fire(ticket) {
                    return (self.fetch(ticket, endpoint), None);
                }
            }
            Message::ResultsFetched(ticket, result) => {
                if let Applied::Replaced(count) = self.search.apply(ticket, result) {
                    log::info!("✅ {} GIFs for {:?}", count, self.search.query());
                    let pending = self.grid.begin_loads(self.search.results());
                    let loads = pending.into_iter().map(|url| self.load_cell(url));
                    return (Task::batch(loads), None);
                }
            }
            Message::CellLoaded(url, result) => {
                self.grid.finish_load(url, result);
            }
            Message::PointerMoved(position) => {
                self.pointer = position;
                if let Some(drag) = self.drag.filter(|drag| drag.forwarding) {
                    self.panel.drag_to(position.y - drag.start.y);
                }
            }
            Message::DragStarted => self.drag_started(now),
            Message::DragEnded => return (self.drag_ended(now), None),
        }
        (Task::none(), None)
    }

    fn update_grid(&mut self, message: grid::Message, now: Instant) -> (Task<Message>, Option<Event>) {
        match message {
            grid::Message::QueryChanged(text) => {
                self.grid.set_editing(true, now);
                let ticket = self.search.update_query(&text);
                return (self.wait(ticket), None);
            }
            grid::Message::CancelPressed => {
                self.grid.set_editing(false, now);
                let (ticket, endpoint) = self.search.reset();
                return (self.fetch(ticket, endpoint), None);
            }
            grid::Message::CellPressed(index) => {
                if self.chosen || !self.panel.is_interactive() {
                    return (Task::none(), None);
                }
                match self.grid.chosen_at(self.search.results(), index) {
                    Some((gif, url)) => {
                        log::info!("🎞️  Chose {}", url);
                        self.chosen = true;
                        self.close(now);
                        return (Task::none(), Some(Event::GifChosen { gif, url }));
                    }
                    None => log::debug!("Ignoring tap on unloaded cell {}", index),
                }
            }
            grid::Message::HeaderPressed => return (self.header_tapped(now), None),
            grid::Message::Scrolled(offset) => self.grid.set_scroll_offset(offset),
        }
        (Task::none(), None)
    }

    /// Header or handle tap: drop the search, then scroll to the top or close if already there
    fn header_tapped(&mut self, now: Instant) -> Task<Message> {
        self.grid.set_editing(false, now);
        let task = if self.search.query().is_empty() {
            Task::none()
        } else {
            let ticket = self.search.update_query("");
            self.wait(ticket)
        };

        if self.grid.is_at_top() {
            self.close(now);
            task
        } else {
            self.grid.set_scroll_offset(0.0);
            Task::batch([task, grid::scroll_to_top()])
        }
    }

    fn drag_started(&mut self, now: Instant) {
        if !self.panel.is_interactive() {
            return;
        }

        let top = self.sheet_top();
        if self.pointer.y < top {
            // Press on the dimmed backdrop above the sheet
            self.close(now);
            return;
        }

        let on_handle = self.pointer.y < top + HANDLE_HEIGHT;
        self.drag = Some(Drag {
            start: self.pointer,
            on_handle,
            forwarding: on_handle || self.grid.is_at_top(),
        });
    }

    fn drag_ended(&mut self, now: Instant) -> Task<Message> {
        let Some(drag) = self.drag.take() else {
            return Task::none();
        };

        if drag.forwarding {
            self.panel.drag_end(self.pointer.y - drag.start.y, now);
        }

        if drag.on_handle && self.pointer.distance(drag.start) < TAP_SLOP {
            return self.header_tapped(now);
        }
        Task::none()
    }

    fn sheet_top(&self) -> f32 {
        TOP_INSET + self.panel.offset()
    }

    /// Drop everything a closed panel does not need
    fn release(&mut self) {
        self.grid = GridState::new();
        self.search.clear();
        self.drag = None;
    }

    fn wait(&self, ticket: Ticket) -> Task<Message> {
        Task::perform(
            debounce::wait(ticket, self.search.debounce()),
            Message::DebounceElapsed,
        )
    }

    fn fetch(&self, ticket: Ticket, endpoint: Endpoint) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move { client.fetch(&endpoint).await },
            move |result| Message::ResultsFetched(ticket, result),
        )
    }

    fn load_cell(&self, url: Url) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move {
                let result = client.fetch_gif(url.clone()).await.map(Arc::new);
                (url, result)
            },
            |(url, result)| Message::CellLoaded(url, result),
        )
    }

    pub fn view(&self, elapsed: Duration) -> Element<'_, Message> {
        let handle = container(
            container(Space::new(Length::Fixed(40.0), Length::Fixed(5.0))).style(|theme: &Theme| {
                container::Style {
                    background: Some(Background::Color(theme.extended_palette().background.strong.color)),
                    border: iced::Border::default().rounded(2.5),
                    ..Default::default()
                }
            }),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fixed(HANDLE_HEIGHT));

        let grid = self
            .grid
            .view(
                self.search.results(),
                self.search.query(),
                self.search.header_visible(),
                elapsed,
            )
            .map(Message::Grid);

        let sheet = container(column![handle, grid])
            .width(Length::Fill)
            .height(Length::Fixed(self.panel.height()))
            .style(|theme: &Theme| container::Style {
                background: Some(Background::Color(theme.extended_palette().background.weak.color)),
                border: iced::Border::default().rounded(12.0),
                ..Default::default()
            });

        let layout = column![Space::with_height(Length::Fixed(self.sheet_top())), sheet];

        let dim = 0.4 * (1.0 - self.panel.offset() / (self.panel.height() + TOP_INSET).max(1.0));
        let backdrop = container(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .clip(true)
            .style(move |_theme: &Theme| container::Style {
                background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, dim.clamp(0.0, 0.4)))),
                ..Default::default()
            });

        mouse_area(backdrop)
            .on_move(Message::PointerMoved)
            .on_press(Message::DragStarted)
            .on_release(Message::DragEnded)
            .into()
    }
}
