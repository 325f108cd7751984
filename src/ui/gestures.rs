/// Translate raw pointer and touch input into overlay gestures
///
/// The canvas widget turns iced events into [`GestureInput`] messages; the
/// app applies them to the [`OverlayCanvas`] model with [`apply`].
///
/// Mapping:
/// - one finger / left mouse drag → pan
/// - two fingers → pinch (distance ratio) and rotate (angle delta) at their midpoint
/// - mouse wheel → pinch step at the cursor
/// - Shift + mouse wheel → rotate step at the cursor

use std::collections::HashMap;

use cgmath::{Point2, Vector2};
use iced::touch::Finger;
use iced::Point;

use crate::state::overlay::{OverlayCanvas, PanFeedback};

/// Scale change per wheel line
pub const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Rotation per wheel line (15°)
pub const WHEEL_ROTATE_STEP: f32 = std::f32::consts::PI / 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// Canvas bounds changed
    Resized(Vector2<f32>),
    PanBegan(Point2<f32>),
    PanMoved(Vector2<f32>),
    PanEnded,
    TwoFingerBegan(Point2<f32>),
    TwoFingerMoved { factor: f32, rotation: f32 },
    TwoFingerEnded,
    /// A complete pinch from one wheel event
    WheelPinch { at: Point2<f32>, factor: f32 },
    /// A complete rotation from one wheel event
    WheelRotate { at: Point2<f32>, radians: f32 },
}

/// What applying an input did, for the host's feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    None,
    Feedback(PanFeedback),
    /// Overlay at this index was dropped on the delete target
    Removed(usize),
}

/// Apply one input to the model
pub fn apply(canvas: &mut OverlayCanvas, input: GestureInput) -> Outcome {
    match input {
        GestureInput::Resized(size) => canvas.set_bounds(size),
        GestureInput::PanBegan(at) => {
            canvas.pan_began(at);
        }
        GestureInput::PanMoved(delta) => {
            return Outcome::Feedback(canvas.pan_changed(delta));
        }
        GestureInput::PanEnded => {
            if let Some(index) = canvas.pan_ended() {
                return Outcome::Removed(index);
            }
        }
        GestureInput::TwoFingerBegan(at) => {
            // A second finger turns a drag into a pinch
            canvas.cancel_gesture();
            canvas.pinch_began(at);
        }
        GestureInput::TwoFingerMoved { factor, rotation } => {
            canvas.pinch_changed(factor);
            canvas.rotate_changed(rotation);
        }
        GestureInput::TwoFingerEnded => canvas.pinch_ended(),
        GestureInput::WheelPinch { at, factor } => {
            if canvas.pinch_began(at) {
                canvas.pinch_changed(factor);
                canvas.pinch_ended();
            }
        }
        GestureInput::WheelRotate { at, radians } => {
            if canvas.rotate_began(at) {
                canvas.rotate_changed(radians);
                canvas.rotate_ended();
            }
        }
    }
    Outcome::None
}

#[derive(Debug, Clone, Copy)]
struct TwoFinger {
    start_distance: f32,
    last_angle: f32,
}

/// Per-widget recognizer state
#[derive(Debug, Default)]
pub struct Recognizer {
    /// Last pointer position of an active one-pointer drag
    drag: Option<Point>,
    fingers: HashMap<Finger, Point>,
    two_finger: Option<TwoFinger>,
}

impl Recognizer {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn press(&mut self, position: Point) -> Option<GestureInput> {
        if self.two_finger.is_some() {
            return None;
        }
        self.drag = Some(position);
        Some(GestureInput::PanBegan(to_point(position)))
    }

    pub fn moved(&mut self, position: Point) -> Option<GestureInput> {
        let last = self.drag?;
        self.drag = Some(position);
        Some(GestureInput::PanMoved(Vector2::new(
            position.x - last.x,
            position.y - last.y,
        )))
    }

    pub fn release(&mut self) -> Option<GestureInput> {
        self.drag.take().map(|_| GestureInput::PanEnded)
    }

    pub fn finger_pressed(&mut self, id: Finger, position: Point) -> Option<GestureInput> {
        self.fingers.insert(id, position);

        match self.fingers.len() {
            1 => self.press(position),
            2 => {
                let (a, b) = self.pair()?;
                self.drag = None;
                self.two_finger = Some(TwoFinger {
                    start_distance: a.distance(b),
                    last_angle: angle(a, b),
                });
                Some(GestureInput::TwoFingerBegan(to_point(midpoint(a, b))))
            }
            _ => None,
        }
    }

    pub fn finger_moved(&mut self, id: Finger, position: Point) -> Option<GestureInput> {
        if !self.fingers.contains_key(&id) {
            return None;
        }
        self.fingers.insert(id, position);

        match self.two_finger {
            Some(mut pinch) => {
                let (a, b) = self.pair()?;
                if pinch.start_distance <= f32::EPSILON {
                    return None;
                }
                let current = angle(a, b);
                let rotation = wrap_angle(current - pinch.last_angle);
                pinch.last_angle = current;
                self.two_finger = Some(pinch);

                Some(GestureInput::TwoFingerMoved {
                    factor: a.distance(b) / pinch.start_distance,
                    rotation,
                })
            }
            None => self.moved(position),
        }
    }

    pub fn finger_lifted(&mut self, id: Finger) -> Option<GestureInput> {
        self.fingers.remove(&id)?;

        if self.two_finger.take().is_some() {
            // Remaining finger does not resume dragging until lifted and pressed again
            return Some(GestureInput::TwoFingerEnded);
        }
        self.release()
    }

    /// The two lowest finger ids, so the pair keeps its order between events
    fn pair(&self) -> Option<(Point, Point)> {
        let mut fingers: Vec<(&Finger, &Point)> = self.fingers.iter().collect();
        fingers.sort_by_key(|(id, _)| id.0);
        match fingers.as_slice() {
            [(_, a), (_, b), ..] => Some((**a, **b)),
            _ => None,
        }
    }
}

/// Input for one wheel event of `lines` notches
pub fn wheel(at: Point, lines: f32, rotate: bool) -> GestureInput {
    if rotate {
        GestureInput::WheelRotate {
            at: to_point(at),
            radians: lines * WHEEL_ROTATE_STEP,
        }
    } else {
        GestureInput::WheelPinch {
            at: to_point(at),
            factor: WHEEL_ZOOM_STEP.powf(lines),
        }
    }
}

pub fn to_point(p: Point) -> Point2<f32> {
    Point2::new(p.x, p.y)
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn angle(a: Point, b: Point) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Into (-π, π] so crossing the atan2 seam is a small step
fn wrap_angle(radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_mouse_drag_produces_incremental_deltas() {
        let mut recognizer = Recognizer::default();
        assert_eq!(
            recognizer.press(Point::new(10.0, 10.0)),
            Some(GestureInput::PanBegan(Point2::new(10.0, 10.0)))
        );
        assert_eq!(
            recognizer.moved(Point::new(15.0, 12.0)),
            Some(GestureInput::PanMoved(Vector2::new(5.0, 2.0)))
        );
        assert_eq!(
            recognizer.moved(Point::new(16.0, 12.0)),
            Some(GestureInput::PanMoved(Vector2::new(1.0, 0.0)))
        );
        assert_eq!(recognizer.release(), Some(GestureInput::PanEnded));
        assert_eq!(recognizer.moved(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_two_fingers_pinch_and_rotate() {
        let mut recognizer = Recognizer::default();
        let first = Finger(1);
        let second = Finger(2);

        recognizer.finger_pressed(first, Point::new(0.0, 0.0));
        let began = recognizer.finger_pressed(second, Point::new(10.0, 0.0));
        assert_eq!(began, Some(GestureInput::TwoFingerBegan(Point2::new(5.0, 0.0))));
        assert!(!recognizer.is_dragging());

        // Second finger swings to (0, 20): distance doubles, quarter turn
        match recognizer.finger_moved(second, Point::new(0.0, 20.0)) {
            Some(GestureInput::TwoFingerMoved { factor, rotation }) => {
                assert!(close(factor, 2.0));
                assert!(close(rotation, std::f32::consts::FRAC_PI_2));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(recognizer.finger_lifted(second), Some(GestureInput::TwoFingerEnded));
        assert_eq!(recognizer.finger_moved(first, Point::new(3.0, 3.0)), None);
    }

    #[test]
    fn test_wrap_angle() {
        use std::f32::consts::{FRAC_PI_2, PI};
        assert!(close(wrap_angle(-3.0 * FRAC_PI_2), FRAC_PI_2));
        assert!(close(wrap_angle(0.25), 0.25));
        assert!(close(wrap_angle(PI + 0.5), -PI + 0.5));
    }

    #[test]
    fn test_wheel_steps() {
        match wheel(Point::new(1.0, 2.0), 2.0, false) {
            GestureInput::WheelPinch { factor, .. } => assert!(close(factor, 1.21)),
            other => panic!("unexpected {:?}", other),
        }
        match wheel(Point::new(1.0, 2.0), -1.0, true) {
            GestureInput::WheelRotate { radians, .. } => assert!(close(radians, -WHEEL_ROTATE_STEP)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apply_drop_on_target_reports_removal() {
        let mut canvas = OverlayCanvas::new(Vector2::new(375.0, 300.0));
        canvas.add_overlay("https://media.giphy.com/a.gif", None);

        apply(&mut canvas, GestureInput::PanBegan(Point2::new(187.5, 150.0)));
        let outcome = apply(&mut canvas, GestureInput::PanMoved(Vector2::new(0.0, 110.0)));
        assert_eq!(outcome, Outcome::Feedback(PanFeedback::EnteredTarget));
        assert_eq!(apply(&mut canvas, GestureInput::PanEnded), Outcome::Removed(0));
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_apply_wheel_pinch_scales_topmost() {
        let mut canvas = OverlayCanvas::new(Vector2::new(375.0, 300.0));
        canvas.add_overlay("https://media.giphy.com/a.gif", None);
        canvas.add_overlay("https://media.giphy.com/b.gif", None);

        apply(
            &mut canvas,
            GestureInput::WheelPinch {
                at: Point2::new(187.5, 150.0),
                factor: 2.0,
            },
        );
        assert!(close(canvas.overlays()[0].transform.scale(), 1.0));
        assert!(close(canvas.overlays()[1].transform.scale(), 2.0));
        assert_eq!(canvas.selected(), None);
    }
}
