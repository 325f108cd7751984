/// Bottom-sheet presentation of the GIF picker
///
/// The panel slides in from below the window, can be dragged down, and either
/// snaps back or slides away when released. `offset` is the distance from the
/// flush (fully open) position; it never goes negative.

use std::time::Instant;

use super::anim::{self, Animated};

/// Releasing a drag further down than this closes the panel
pub const DISMISS_THRESHOLD: f32 = 60.0;

/// Gap kept between the window top and the open panel
pub const TOP_INSET: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Opening,
    Open,
    Dragging,
    /// Animating back to flush after a short drag
    Settling,
    Closing,
}

/// Transitions reported by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Opened,
    Settled,
    /// Slide-out finished; panel-owned state can be released
    Closed,
}

#[derive(Debug, Clone)]
pub struct Panel {
    phase: Phase,
    offset: Animated,
    window_height: f32,
    interactive: bool,
}

impl Panel {
    pub fn new(window_height: f32) -> Self {
        Self {
            phase: Phase::Hidden,
            offset: Animated::new(window_height),
            window_height,
            interactive: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_animating(&self) -> bool {
        self.offset.is_animating()
    }

    /// Distance below the flush position
    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    /// Sheet height: the window minus the top inset
    pub fn height(&self) -> f32 {
        (self.window_height - TOP_INSET).max(0.0)
    }

    pub fn set_window_height(&mut self, height: f32) {
        self.window_height = height;
        if self.phase == Phase::Hidden {
            self.offset.set(height);
        }
    }

    /// Slide in from below the window. Returns `false` if already showing.
    pub fn open(&mut self, now: Instant) -> bool {
        if self.is_visible() && self.phase != Phase::Closing {
            return false;
        }

        if self.phase == Phase::Hidden {
            self.offset.set(self.window_height);
        }
        self.offset.animate_to(0.0, now, anim::PANEL_OPEN);
        self.phase = Phase::Opening;
        self.interactive = true;
        true
    }

    /// Slide out; `tick` reports `Closed` when done
    pub fn close(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Hidden | Phase::Closing) {
            return;
        }
        self.offset
            .animate_to(self.window_height, now, anim::STANDARD);
        self.phase = Phase::Closing;
        self.interactive = false;
    }

    /// Follow a drag `delta` (total since the drag started); never above flush
    pub fn drag_to(&mut self, delta: f32) {
        if !self.interactive || !matches!(self.phase, Phase::Open | Phase::Dragging) {
            return;
        }
        self.phase = Phase::Dragging;
        self.offset.set(delta.max(0.0));
    }

    /// Release a drag: close past the threshold, otherwise snap back.
    ///
    /// Interaction stays off until the resulting animation completes.
    pub fn drag_end(&mut self, delta: f32, now: Instant) {
        if !self.interactive || !matches!(self.phase, Phase::Open | Phase::Dragging) {
            return;
        }
        self.drag_to(delta);
        self.interactive = false;

        if delta > DISMISS_THRESHOLD {
            self.close(now);
        } else {
            self.offset.animate_to(0.0, now, anim::STANDARD);
            self.phase = Phase::Settling;
        }
    }

    pub fn tick(&mut self, now: Instant) -> Option<PanelEvent> {
        if !self.offset.tick(now) {
            return None;
        }

        match self.phase {
            Phase::Opening => {
                self.phase = Phase::Open;
                Some(PanelEvent::Opened)
            }
            Phase::Settling => {
                self.phase = Phase::Open;
                self.interactive = true;
                Some(PanelEvent::Settled)
            }
            Phase::Closing => {
                self.phase = Phase::Hidden;
                Some(PanelEvent::Closed)
            }
            _ => None,
        }
    }
}
