use iced::keyboard;
use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Frame, Path, Program, Stroke};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector};
use std::time::Duration;

use super::gestures::{self, GestureInput, Recognizer};
use crate::state::overlay::{Overlay, OverlayCanvas, Rect};
use crate::state::Transform2D;

/// Pixels per wheel line when the platform reports pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Picture the overlays are laid over
#[derive(Debug, Clone)]
pub struct BasePicture {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Canvas program drawing the base picture, the overlays and the delete target.
///
/// It only reads the model; every interaction leaves as a [`GestureInput`]
/// for the app to apply.
pub struct OverlayLayer<'a> {
    pub canvas: &'a OverlayCanvas,
    pub base: Option<&'a BasePicture>,
    /// Time since app start, picks the GIF frame to show
    pub elapsed: Duration,
    /// Delete target opacity, 0 hides it
    pub target_alpha: f32,
    /// Trash tween: 0 resting, 1 target grown and dragged overlay shrunk
    pub trash_progress: f32,
}

impl<'a> Program<GestureInput> for OverlayLayer<'a> {
    type State = LayerState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let palette = theme.extended_palette();

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette.background.weak.color);

        if let Some(base) = self.base {
            let fill = aspect_fill(base, bounds.size());
            frame.with_clip(Rectangle::with_size(bounds.size()), |frame| {
                frame.draw_image(fill, canvas::Image::new(base.handle.clone()));
            });
        }

        for (index, overlay) in self.canvas.overlays().iter().enumerate() {
            let transform = self
                .canvas
                .display_transform(index, self.trash_progress)
                .unwrap_or(overlay.transform);
            draw_overlay(&mut frame, overlay, transform, self.elapsed, palette.primary.base.color);
        }

        if self.target_alpha > 0.0 {
            draw_delete_target(
                &mut frame,
                self.canvas.delete_target_at(self.trash_progress),
                self.canvas.target_engaged(),
                self.target_alpha,
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<GestureInput>) {
        let input = match event {
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = modifiers;
                None
            }

            // Mouse wheel: zoom, or rotate with Shift held
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y,
                    mouse::ScrollDelta::Pixels { y, .. } => y / PIXELS_PER_LINE,
                };
                let shift = state.modifiers.shift();
                cursor
                    .position_in(bounds)
                    .map(|position| gestures::wheel(position, lines, shift))
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => cursor
                .position_in(bounds)
                .and_then(|position| state.recognizer.press(position)),

            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                state.recognizer.moved(position - bounds_offset(bounds))
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.recognizer.release()
            }

            canvas::Event::Touch(touch::Event::FingerPressed { id, position })
                if bounds.contains(position) =>
            {
                state.recognizer.finger_pressed(id, position - bounds_offset(bounds))
            }

            canvas::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                state.recognizer.finger_moved(id, position - bounds_offset(bounds))
            }

            canvas::Event::Touch(
                touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. },
            ) => state.recognizer.finger_lifted(id),

            _ => None,
        };

        match state.with_size_report(bounds.size(), input) {
            Some(input @ GestureInput::Resized(_)) => (canvas::event::Status::Ignored, Some(input)),
            Some(input) => (canvas::event::Status::Captured, Some(input)),
            None => (canvas::event::Status::Ignored, None),
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.recognizer.is_dragging() {
            return mouse::Interaction::Grabbing;
        }

        match cursor.position_in(bounds) {
            Some(position) if self.canvas.hit_test(gestures::to_point(position)).is_some() => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }
}

/// Widget-local state for the overlay layer
#[derive(Debug, Default)]
pub struct LayerState {
    recognizer: Recognizer,
    known_size: Option<Size>,
    modifiers: keyboard::Modifiers,
}

impl LayerState {
    /// Output for one event once the canvas size is taken into account.
    ///
    /// A gesture always goes out first. A size that has not been reported
    /// yet leaves on the next event that produces no gesture.
    fn with_size_report(&mut self, size: Size, input: Option<GestureInput>) -> Option<GestureInput> {
        if input.is_some() || self.known_size == Some(size) {
            return input;
        }
        self.known_size = Some(size);
        Some(GestureInput::Resized(cgmath::Vector2::new(size.width, size.height)))
    }
}

fn bounds_offset(bounds: Rectangle) -> Vector {
    Vector::new(bounds.x, bounds.y)
}

/// Scale `base` to cover `size`, centered
fn aspect_fill(base: &BasePicture, size: Size) -> Rectangle {
    if base.width == 0 || base.height == 0 {
        return Rectangle::with_size(size);
    }

    let scale = (size.width / base.width as f32).max(size.height / base.height as f32);
    let fitted = Size::new(base.width as f32 * scale, base.height as f32 * scale);
    Rectangle::new(
        Point::new(
            (size.width - fitted.width) / 2.0,
            (size.height - fitted.height) / 2.0,
        ),
        fitted,
    )
}

/// Scale `width`×`height` to fit a `side`×`side` square centered on the origin
fn aspect_fit(width: u32, height: u32, side: f32) -> Rectangle {
    let longest = width.max(height).max(1) as f32;
    let fitted = Size::new(side * width as f32 / longest, side * height as f32 / longest);
    Rectangle::new(Point::new(-fitted.width / 2.0, -fitted.height / 2.0), fitted)
}

fn draw_overlay(
    frame: &mut Frame,
    overlay: &Overlay,
    transform: Transform2D,
    elapsed: Duration,
    accent: Color,
) {
    let side = overlay.base_size * transform.scale();

    frame.with_save(|frame| {
        frame.translate(Vector::new(overlay.center.x, overlay.center.y));
        frame.rotate(transform.rotation());

        match &overlay.gif {
            Some(gif) => {
                let (width, height) = gif.dimensions();
                let handle = gif.frame_at(elapsed).clone();
                frame.draw_image(aspect_fit(width, height, side), canvas::Image::new(handle));
            }
            None => {
                // Still downloading
                let square = Path::rectangle(Point::new(-side / 2.0, -side / 2.0), Size::new(side, side));
                frame.fill(&square, Color { a: 0.15, ..accent });
                frame.stroke(
                    &square,
                    Stroke::default().with_color(accent).with_width(2.0),
                );
            }
        }
    });
}

fn draw_delete_target(frame: &mut Frame, target: Rect, engaged: bool, alpha: f32) {
    let center = Point::new(target.center().x, target.center().y);
    let radius = target.width() / 2.0;

    let fill = if engaged {
        Color::from_rgba(0.85, 0.2, 0.2, 0.9 * alpha)
    } else {
        Color::from_rgba(0.0, 0.0, 0.0, 0.55 * alpha)
    };
    frame.fill(&Path::circle(center, radius), fill);

    let arm = radius * 0.4;
    let cross = Path::new(|builder| {
        builder.move_to(Point::new(center.x - arm, center.y - arm));
        builder.line_to(Point::new(center.x + arm, center.y + arm));
        builder.move_to(Point::new(center.x + arm, center.y - arm));
        builder.line_to(Point::new(center.x - arm, center.y + arm));
    });
    frame.stroke(
        &cross,
        Stroke::default()
            .with_color(Color { a: alpha, ..Color::WHITE })
            .with_width(3.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_fill_covers_and_centers() {
        let base = BasePicture {
            handle: Handle::from_rgba(1, 1, vec![0; 4]),
            width: 200,
            height: 100,
        };
        let rect = aspect_fill(&base, Size::new(100.0, 100.0));
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.x, -50.0);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_resize_does_not_swallow_press() {
        let mut state = LayerState::default();
        state.known_size = Some(Size::new(400.0, 300.0));

        let press = state.recognizer.press(Point::new(10.0, 10.0));
        assert!(press.is_some());
        let out = state.with_size_report(Size::new(500.0, 300.0), press);
        assert_eq!(out, press);

        // The new size is reported on the next quiet event, once
        let out = state.with_size_report(Size::new(500.0, 300.0), None);
        assert_eq!(out, Some(GestureInput::Resized(cgmath::Vector2::new(500.0, 300.0))));
        assert_eq!(state.with_size_report(Size::new(500.0, 300.0), None), None);
    }

    #[test]
    fn test_first_quiet_event_reports_size() {
        let mut state = LayerState::default();
        let out = state.with_size_report(Size::new(320.0, 200.0), None);
        assert_eq!(out, Some(GestureInput::Resized(cgmath::Vector2::new(320.0, 200.0))));
    }

    #[test]
    fn test_aspect_fit_keeps_ratio_inside_square() {
        let rect = aspect_fit(100, 50, 80.0);
        assert_eq!(rect.width, 80.0);
        assert_eq!(rect.height, 40.0);
        assert_eq!(rect.center(), Point::ORIGIN);
    }
}
