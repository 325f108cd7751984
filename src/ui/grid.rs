/// Result grid of the GIF picker
///
/// Fixed 100×100 cells flowing left to right with 10 unit gaps, a search row
/// above them and an optional "TRENDING GIFS" section header. Each cell loads
/// its GIF independently; the cache is keyed by URL so a URL that survives from
/// one result list to the next is not downloaded twice.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::widget::scrollable::AbsoluteOffset;
use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Space};
use iced::{ContentFit, Element, Length, Pixels};
use iced_aw::Wrap;
use reqwest::Url;

use super::anim::{self, Animated};
use crate::error::LayerError;
use crate::media::AnimatedGif;

pub const CELL_SIZE: f32 = 100.0;
pub const SPACING: f32 = 10.0;
/// Left/right inset of the grid section
pub const SECTION_INSET: f32 = 20.0;
pub const HEADER_HEIGHT: f32 = 40.0;

/// Right inset of the search field while Cancel is hidden / shown
pub const CANCEL_HIDDEN_INSET: f32 = 20.0;
pub const CANCEL_SHOWN_INSET: f32 = 90.0;

pub const SCROLL_ID: &str = "gif-grid";

/// Offsets this close to zero count as "at the top"
const TOP_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone)]
pub enum CellState {
    Loading,
    Loaded(Arc<AnimatedGif>),
    Failed,
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    CellPressed(usize),
    HeaderPressed,
    CancelPressed,
    Scrolled(f32),
}

#[derive(Debug, Clone)]
pub struct GridState {
    cells: HashMap<Url, CellState>,
    scroll_offset: f32,
    editing: bool,
    cancel_inset: Animated,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
            scroll_offset: 0.0,
            editing: false,
            cancel_inset: Animated::new(CANCEL_HIDDEN_INSET),
        }
    }
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, url: &Url) -> Option<&CellState> {
        self.cells.get(url)
    }

    /// Prune the cache to `urls` and mark the uncached ones as loading.
    ///
    /// Returns the URLs whose download should start now.
    pub fn begin_loads(&mut self, urls: &[Url]) -> Vec<Url> {
        let current: HashSet<&Url> = urls.iter().collect();
        self.cells.retain(|url, _| current.contains(url));

        let mut pending = Vec::new();
        for url in urls {
            if !self.cells.contains_key(url) {
                self.cells.insert(url.clone(), CellState::Loading);
                pending.push(url.clone());
            }
        }
        pending
    }

    /// Record a finished download
    pub fn finish_load(&mut self, url: Url, result: Result<Arc<AnimatedGif>, LayerError>) {
        let state = match result {
            Ok(gif) => CellState::Loaded(gif),
            Err(err) => {
                log::warn!("⚠️  Failed to load {}: {}", url, err);
                CellState::Failed
            }
        };
        self.cells.insert(url, state);
    }

    /// The GIF at `index` of `results`, if its cell has finished loading
    pub fn chosen_at(&self, results: &[Url], index: usize) -> Option<(Arc<AnimatedGif>, Url)> {
        let url = results.get(index)?;
        match self.cells.get(url)? {
            CellState::Loaded(gif) => Some((Arc::clone(gif), url.clone())),
            CellState::Loading | CellState::Failed => None,
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    pub fn is_at_top(&self) -> bool {
        self.scroll_offset <= TOP_TOLERANCE
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    /// Reveal or hide Cancel by animating the field's right inset
    pub fn set_editing(&mut self, editing: bool, now: Instant) {
        if self.editing == editing {
            return;
        }
        self.editing = editing;
        let target = if editing {
            CANCEL_SHOWN_INSET
        } else {
            CANCEL_HIDDEN_INSET
        };
        self.cancel_inset.animate_to(target, now, anim::STANDARD);
    }

    pub fn cancel_inset(&self) -> f32 {
        self.cancel_inset.value()
    }

    pub fn is_animating(&self) -> bool {
        self.cancel_inset.is_animating()
    }

    pub fn tick(&mut self, now: Instant) {
        self.cancel_inset.tick(now);
    }

    pub fn view<'a>(
        &'a self,
        results: &'a [Url],
        query: &'a str,
        header_visible: bool,
        elapsed: Duration,
    ) -> Element<'a, Message> {
        let search = self.search_row(query);

        let cells: Vec<Element<'a, Message>> = results
            .iter()
            .enumerate()
            .map(|(index, url)| self.cell_view(index, url, elapsed))
            .collect();

        let wrap = Wrap::with_elements(cells)
            .spacing(Pixels(SPACING))
            .line_spacing(Pixels(SPACING));

        let mut section = column![].padding([0.0, SECTION_INSET]).width(Length::Fill);
        if header_visible {
            section = section.push(
                button(text("TRENDING GIFS").size(13))
                    .style(button::text)
                    .padding(0)
                    .height(Length::Fixed(HEADER_HEIGHT))
                    .on_press(Message::HeaderPressed),
            );
        }
        section = section.push(wrap).push(Space::with_height(Length::Fixed(SECTION_INSET)));

        let grid = scrollable(section)
            .id(scroll_id())
            .on_scroll(|viewport| Message::Scrolled(viewport.absolute_offset().y))
            .width(Length::Fill)
            .height(Length::Fill);

        column![search, grid].spacing(SPACING).into()
    }

    /// Search field with the Cancel button sliding into its right inset
    fn search_row<'a>(&'a self, query: &'a str) -> Element<'a, Message> {
        let field = text_input("Search GIPHY", query)
            .on_input(Message::QueryChanged)
            .padding(8)
            .width(Length::Fill);

        let slot_width = (self.cancel_inset() - CANCEL_HIDDEN_INSET).max(0.0);
        let cancel = container(
            button(text("Cancel").size(14))
                .style(button::text)
                .on_press_maybe(self.editing.then_some(Message::CancelPressed)),
        )
        .width(Length::Fixed(slot_width))
        .center_y(Length::Shrink)
        .clip(true);

        row![field, cancel]
            .padding([0.0, SECTION_INSET])
            .align_y(iced::Alignment::Center)
            .into()
    }

    fn cell_view<'a>(&'a self, index: usize, url: &Url, elapsed: Duration) -> Element<'a, Message> {
        let size = Length::Fixed(CELL_SIZE);

        let content: Element<'a, Message> = match self.cells.get(url) {
            Some(CellState::Loaded(gif)) => image(gif.frame_at(elapsed).clone())
                .width(size)
                .height(size)
                .content_fit(ContentFit::Contain)
                .into(),
            Some(CellState::Failed) => container(text("⚠").size(20))
                .center(size)
                .style(container::rounded_box)
                .into(),
            _ => container(Space::new(size, size))
                .style(container::rounded_box)
                .into(),
        };

        button(content)
            .padding(0)
            .style(button::text)
            .on_press(Message::CellPressed(index))
            .into()
    }
}

pub fn scroll_id() -> scrollable::Id {
    scrollable::Id::new(SCROLL_ID)
}

/// Task scrolling the grid back to the first row
pub fn scroll_to_top<T>() -> iced::Task<T> {
    scrollable::scroll_to(scroll_id(), AbsoluteOffset { x: 0.0, y: 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::gif::tests::sample_gif;

    fn url(name: &str) -> Url {
        Url::parse(&format!("https://media.giphy.com/{}.gif", name)).unwrap()
    }

    fn gif() -> Arc<AnimatedGif> {
        Arc::new(AnimatedGif::decode_blocking(&sample_gif(&[100, 100])).unwrap())
    }

    #[test]
    fn test_begin_loads_skips_cached_and_prunes() {
        let mut grid = GridState::new();
        let first = vec![url("a"), url("b")];
        assert_eq!(grid.begin_loads(&first), first);

        grid.finish_load(url("a"), Ok(gif()));

        let second = vec![url("a"), url("c")];
        assert_eq!(grid.begin_loads(&second), vec![url("c")]);
        assert!(grid.cell(&url("b")).is_none());
        assert!(matches!(grid.cell(&url("a")), Some(CellState::Loaded(_))));
    }

    #[test]
    fn test_only_loaded_cells_can_be_chosen() {
        let mut grid = GridState::new();
        let results = vec![url("a"), url("b"), url("c")];
        grid.begin_loads(&results);
        grid.finish_load(url("b"), Ok(gif()));
        grid.finish_load(url("c"), Err(LayerError::Http(404)));

        assert!(grid.chosen_at(&results, 0).is_none());
        assert!(grid.chosen_at(&results, 2).is_none());
        assert!(grid.chosen_at(&results, 7).is_none());

        let (_, chosen) = grid.chosen_at(&results, 1).unwrap();
        assert_eq!(chosen, url("b"));
    }

    #[test]
    fn test_editing_animates_cancel_inset() {
        let now = Instant::now();
        let mut grid = GridState::new();
        assert_eq!(grid.cancel_inset(), CANCEL_HIDDEN_INSET);

        grid.set_editing(true, now);
        assert!(grid.is_animating());
        grid.tick(now + anim::STANDARD);
        assert_eq!(grid.cancel_inset(), CANCEL_SHOWN_INSET);

        grid.set_editing(false, now + anim::STANDARD);
        grid.tick(now + anim::STANDARD * 2);
        assert_eq!(grid.cancel_inset(), CANCEL_HIDDEN_INSET);
        assert!(!grid.editing());
    }

    #[test]
    fn test_scroll_top_detection() {
        let mut grid = GridState::new();
        assert!(grid.is_at_top());
        grid.set_scroll_offset(120.0);
        assert!(!grid.is_at_top());
        grid.set_scroll_offset(0.0);
        assert!(grid.is_at_top());
    }
}
