/// Overlay canvas model
///
/// Holds the GIFs layered over the base picture and interprets pinch,
/// rotate and pan gestures as updates to their transforms. This is pure
/// state: the iced canvas in `ui::canvas` feeds it gestures and draws it.
///
/// Invariant: `overlays` and `records` always have the same length and are
/// index-aligned. Every removal goes through `remove_at`.

use std::sync::Arc;

use cgmath::{Point2, Vector2};

use super::record::TransformRecord;
use super::transform::Transform2D;
use crate::media::AnimatedGif;

/// Overlay side length is the container width divided by this
pub const BASE_SIZE_DIVISOR: f32 = 3.75;

/// Pinch results are clamped into this range
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 5.0;

/// Delete target side as a fraction of the container width
const TARGET_WIDTH_FRACTION: f32 = 0.1;
/// Distance from the container bottom to the delete target center
const TARGET_BOTTOM_OFFSET: f32 = 40.0;
/// Delete target grows by this much while an overlay hovers it
pub const TARGET_ENGAGED_SCALE: f32 = 1.5;
/// Trashed overlays end up this much smaller than the engaged target
const TRASH_MARGIN: f32 = 1.3;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Rect {
    pub fn from_center(center: Point2<f32>, size: Vector2<f32>) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Point2<f32>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// One placed GIF
#[derive(Debug, Clone)]
pub struct Overlay {
    pub url: String,
    /// Center in container pixels
    pub center: Point2<f32>,
    /// Untransformed side length
    pub base_size: f32,
    pub transform: Transform2D,
    /// Decoded image; `None` while loading or if loading failed
    pub gif: Option<Arc<AnimatedGif>>,
}

impl Overlay {
    /// Axis-aligned bounds of the transformed overlay
    pub fn frame(&self) -> Rect {
        Rect::from_center(
            self.center,
            self.transform.bounding_size(self.base_size, self.base_size),
        )
    }
}

/// Which gesture is manipulating which overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    Pinching {
        index: usize,
        baseline: Transform2D,
    },
    Rotating {
        index: usize,
    },
    Panning {
        index: usize,
        /// Transform before the overlay was shrunk over the delete target
        trashed_from: Option<Transform2D>,
    },
}

/// What a pan step did to the delete target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanFeedback {
    None,
    /// Overlay entered the target and was shrunk; hosts fire a haptic cue here
    EnteredTarget,
    /// Overlay left the target and its transform was restored
    LeftTarget,
}

#[derive(Debug, Clone)]
pub struct OverlayCanvas {
    size: Vector2<f32>,
    overlays: Vec<Overlay>,
    records: Vec<TransformRecord>,
    gesture: Gesture,
    target_visible: bool,
    target_engaged: bool,
}

impl Default for OverlayCanvas {
    fn default() -> Self {
        Self::new(Vector2::new(0.0, 0.0))
    }
}

impl OverlayCanvas {
    pub fn new(size: Vector2<f32>) -> Self {
        Self {
            size,
            overlays: Vec::new(),
            records: Vec::new(),
            gesture: Gesture::Idle,
            target_visible: false,
            target_engaged: false,
        }
    }

    pub fn size(&self) -> Vector2<f32> {
        self.size
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Records as of the last `save_records` (or load/add)
    pub fn records(&self) -> &[TransformRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Index of the overlay currently being manipulated
    pub fn selected(&self) -> Option<usize> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Pinching { index, .. }
            | Gesture::Rotating { index }
            | Gesture::Panning { index, .. } => Some(index),
        }
    }

    pub fn target_visible(&self) -> bool {
        self.target_visible
    }

    pub fn target_engaged(&self) -> bool {
        self.target_engaged
    }

    /// Side length of an overlay at scale 1 for the current container
    pub fn base_size(&self) -> f32 {
        self.size.x / BASE_SIZE_DIVISOR
    }

    /// Current delete target bounds (grown while engaged)
    pub fn delete_target(&self) -> Rect {
        self.delete_target_at(if self.target_engaged { 1.0 } else { 0.0 })
    }

    /// Delete target with its growth `progress` between 0 (resting) and 1 (engaged)
    pub fn delete_target_at(&self, progress: f32) -> Rect {
        let growth = 1.0 + (TARGET_ENGAGED_SCALE - 1.0) * progress;
        let side = self.size.x * TARGET_WIDTH_FRACTION * growth;
        Rect::from_center(
            Point2::new(self.size.x / 2.0, self.size.y - TARGET_BOTTOM_OFFSET),
            Vector2::new(side, side),
        )
    }

    /// Side length an overlay shrinks to while held over the delete target
    fn trash_side(&self) -> f32 {
        self.size.x * TARGET_WIDTH_FRACTION * TARGET_ENGAGED_SCALE / TRASH_MARGIN
    }

    /// Transform to draw overlay `index` with while the trash shrink is at `progress`.
    ///
    /// Only the dragged overlay is affected: 0 shows it at its own size, 1 at
    /// the trash size. Every other overlay draws with its model transform.
    pub fn display_transform(&self, index: usize, progress: f32) -> Option<Transform2D> {
        let overlay = self.overlays.get(index)?;
        let own = match self.gesture {
            Gesture::Panning {
                index: selected,
                trashed_from,
            } if selected == index => trashed_from.unwrap_or(overlay.transform),
            _ => return Some(overlay.transform),
        };

        let current = own.scale();
        if current <= 0.0 || overlay.base_size <= 0.0 {
            return Some(own);
        }
        let shrink = self.trash_side() / overlay.base_size / current;
        Some(own.scaled(1.0 + (shrink - 1.0) * progress.clamp(0.0, 1.0)))
    }

    /// Top-most overlay whose frame contains `point`
    pub fn hit_test(&self, point: Point2<f32>) -> Option<usize> {
        self.overlays
            .iter()
            .rposition(|overlay| overlay.frame().contains(point))
    }

    // ========== Adding / removing ==========

    /// Add a GIF centered in the container at base size
    pub fn add_overlay(&mut self, url: impl Into<String>, gif: Option<Arc<AnimatedGif>>) -> usize {
        let record = TransformRecord::new(url);
        let mut overlay = self.place(&record);
        overlay.gif = gif;

        self.overlays.push(overlay);
        self.records.push(record);
        self.overlays.len() - 1
    }

    /// Remove an overlay and its record at the same index
    pub fn remove_at(&mut self, index: usize) -> Option<TransformRecord> {
        if index >= self.overlays.len() {
            return None;
        }
        self.gesture = Gesture::Idle;
        self.overlays.remove(index);
        Some(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.gesture = Gesture::Idle;
        self.target_visible = false;
        self.target_engaged = false;
        self.overlays.clear();
        self.records.clear();
    }

    /// Attach a decoded GIF if the overlay at `index` still shows `url`
    pub fn attach_gif(&mut self, index: usize, url: &str, gif: Arc<AnimatedGif>) -> bool {
        match self.overlays.get_mut(index) {
            Some(overlay) if overlay.url == url => {
                overlay.gif = Some(gif);
                true
            }
            _ => false,
        }
    }

    // ========== Persistence ==========

    /// Recompute every record from its overlay's live transform and position.
    ///
    /// Must be called before handing records out for storage; gestures do not
    /// update records on their own.
    pub fn save_records(&mut self) {
        let size = self.size;
        for (overlay, record) in self.overlays.iter().zip(self.records.iter_mut()) {
            record.rotation = overlay.transform.rotation();
            record.scale = overlay.transform.scale();
            if size.x > 0.0 && size.y > 0.0 {
                record.universal_location_x = overlay.center.x / size.x;
                record.universal_location_y = overlay.center.y / size.y;
            }
        }
    }

    /// Replace all overlays with the given records.
    ///
    /// Overlays start without an image; the caller loads each record's URL and
    /// hands the result to `attach_gif`.
    pub fn load_records(&mut self, records: Vec<TransformRecord>) {
        self.clear();
        self.overlays = records.iter().map(|record| self.place(record)).collect();
        self.records = records;
    }

    /// Container resized: keep normalized placement, recompute pixels
    pub fn set_bounds(&mut self, size: Vector2<f32>) {
        if size == self.size {
            return;
        }

        self.cancel_gesture();
        self.save_records();
        self.size = size;

        for (overlay, record) in self.overlays.iter_mut().zip(self.records.iter()) {
            let placed = Self::placement(size, record);
            overlay.center = placed.0;
            overlay.base_size = placed.1;
            overlay.transform = placed.2;
        }
    }

    fn place(&self, record: &TransformRecord) -> Overlay {
        let (center, base_size, transform) = Self::placement(self.size, record);
        Overlay {
            url: record.url.clone(),
            center,
            base_size,
            transform,
            gif: None,
        }
    }

    fn placement(size: Vector2<f32>, record: &TransformRecord) -> (Point2<f32>, f32, Transform2D) {
        let center = Point2::new(
            record.universal_location_x * size.x,
            record.universal_location_y * size.y,
        );
        let transform = Transform2D::from_parts(record.scale, record.rotation);
        (center, size.x / BASE_SIZE_DIVISOR, transform)
    }

    // ========== Gestures ==========

    /// Abort whatever gesture is running, undoing a pending trash shrink
    pub fn cancel_gesture(&mut self) {
        if let Gesture::Panning {
            index,
            trashed_from: Some(transform),
        } = self.gesture
        {
            if let Some(overlay) = self.overlays.get_mut(index) {
                overlay.transform = transform;
            }
        }
        self.gesture = Gesture::Idle;
        self.target_visible = false;
        self.target_engaged = false;
    }

    fn begin(&mut self, point: Point2<f32>) -> Option<usize> {
        if self.gesture != Gesture::Idle {
            return None;
        }
        self.hit_test(point)
    }

    pub fn pinch_began(&mut self, point: Point2<f32>) -> bool {
        match self.begin(point) {
            Some(index) => {
                let baseline = self.overlays[index].transform;
                self.gesture = Gesture::Pinching { index, baseline };
                true
            }
            None => false,
        }
    }

    /// `factor` is relative to the size when the pinch began
    pub fn pinch_changed(&mut self, factor: f32) {
        if let Gesture::Pinching { index, baseline } = self.gesture {
            let base_scale = baseline.scale();
            if base_scale <= 0.0 || !factor.is_finite() {
                return;
            }
            let target = (base_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
            self.overlays[index].transform = baseline.scaled(target / base_scale);
        }
    }

    pub fn pinch_ended(&mut self) {
        if matches!(self.gesture, Gesture::Pinching { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn rotate_began(&mut self, point: Point2<f32>) -> bool {
        match self.begin(point) {
            Some(index) => {
                self.gesture = Gesture::Rotating { index };
                true
            }
            None => false,
        }
    }

    /// Compose `delta` radians onto the live transform.
    ///
    /// During a pinch the baseline turns too, so two-finger gestures can
    /// scale and rotate at once.
    pub fn rotate_changed(&mut self, delta: f32) {
        match &mut self.gesture {
            Gesture::Rotating { index } => {
                let overlay = &mut self.overlays[*index];
                overlay.transform = overlay.transform.rotated(delta);
            }
            Gesture::Pinching { index, baseline } => {
                *baseline = baseline.rotated(delta);
                let overlay = &mut self.overlays[*index];
                overlay.transform = overlay.transform.rotated(delta);
            }
            _ => {}
        }
    }

    pub fn rotate_ended(&mut self) {
        if matches!(self.gesture, Gesture::Rotating { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Select the overlay under `point` for dragging and reveal the delete target
    pub fn pan_began(&mut self, point: Point2<f32>) -> bool {
        match self.begin(point) {
            Some(index) => {
                self.gesture = Gesture::Panning {
                    index,
                    trashed_from: None,
                };
                self.target_visible = true;
                true
            }
            None => false,
        }
    }

    /// Move the selected overlay by an incremental `delta`
    pub fn pan_changed(&mut self, delta: Vector2<f32>) -> PanFeedback {
        let Gesture::Panning {
            index,
            trashed_from,
        } = self.gesture
        else {
            return PanFeedback::None;
        };

        let target = self.delete_target();
        let trash_side = self.trash_side();

        let overlay = &mut self.overlays[index];
        overlay.center += delta;
        let inside = target.contains(overlay.center);

        match (inside, trashed_from) {
            (true, None) => {
                let before = overlay.transform;
                let current = before.scale();
                if current > 0.0 && overlay.base_size > 0.0 {
                    overlay.transform = before.scaled(trash_side / overlay.base_size / current);
                }
                self.gesture = Gesture::Panning {
                    index,
                    trashed_from: Some(before),
                };
                self.target_engaged = true;
                PanFeedback::EnteredTarget
            }
            (false, Some(before)) => {
                overlay.transform = before;
                self.gesture = Gesture::Panning {
                    index,
                    trashed_from: None,
                };
                self.target_engaged = false;
                PanFeedback::LeftTarget
            }
            _ => PanFeedback::None,
        }
    }

    /// Finish a drag; returns the removed index if it was dropped on the target
    pub fn pan_ended(&mut self) -> Option<usize> {
        let removed = match self.gesture {
            Gesture::Panning { index, .. } => {
                let center = self.overlays[index].center;
                if self.delete_target().contains(center) {
                    self.remove_at(index).map(|_| index)
                } else {
                    None
                }
            }
            _ => return None,
        };

        self.gesture = Gesture::Idle;
        self.target_visible = false;
        self.target_engaged = false;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    /// 375 × 300 container: base size 100, delete target 37.5 wide at (187.5, 260)
    fn new_canvas() -> OverlayCanvas {
        OverlayCanvas::new(Vector2::new(375.0, 300.0))
    }

    fn url(n: usize) -> String {
        format!("https://media.giphy.com/{}.gif", n)
    }

    fn drag_to(canvas: &mut OverlayCanvas, index: usize, to: Point2<f32>) -> Vec<PanFeedback> {
        let from = canvas.overlays()[index].center;
        let mut feedback = Vec::new();
        assert!(canvas.pan_began(from));
        // Two steps so we pass through intermediate positions
        let half = (to - from) / 2.0;
        feedback.push(canvas.pan_changed(half));
        feedback.push(canvas.pan_changed(half));
        feedback
    }

    #[test]
    fn test_add_overlay_is_centered_at_base_size() {
        let mut canvas = new_canvas();
        let index = canvas.add_overlay(url(0), None);

        let overlay = &canvas.overlays()[index];
        assert_eq!(overlay.center, Point2::new(187.5, 150.0));
        assert!(close(overlay.base_size, 100.0));
        assert_eq!(canvas.records()[index], TransformRecord::new(url(0)));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        canvas.add_overlay(url(1), None);

        assert_eq!(canvas.hit_test(Point2::new(187.5, 150.0)), Some(1));
        assert_eq!(canvas.hit_test(Point2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_pinch_scales_from_baseline() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        assert!(canvas.pinch_began(Point2::new(190.0, 150.0)));
        canvas.pinch_changed(1.5);
        canvas.pinch_changed(2.0);
        assert!(close(canvas.overlays()[0].transform.scale(), 2.0));
        canvas.pinch_ended();
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn test_pinch_is_clamped() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        canvas.pinch_began(Point2::new(187.5, 150.0));
        canvas.pinch_changed(100.0);
        assert!(close(canvas.overlays()[0].transform.scale(), MAX_SCALE));
        canvas.pinch_changed(0.001);
        assert!(close(canvas.overlays()[0].transform.scale(), MIN_SCALE));
    }

    #[test]
    fn test_pinch_outside_any_overlay_selects_nothing() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        assert!(!canvas.pinch_began(Point2::new(1.0, 1.0)));
        canvas.pinch_changed(3.0);
        assert!(close(canvas.overlays()[0].transform.scale(), 1.0));
    }

    #[test]
    fn test_rotate_composes_on_live_transform() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        canvas.rotate_began(Point2::new(187.5, 150.0));
        canvas.rotate_changed(0.25);
        canvas.rotate_changed(0.25);
        canvas.rotate_ended();
        assert!(close(canvas.overlays()[0].transform.rotation(), 0.5));
    }

    #[test]
    fn test_rotate_during_pinch_keeps_both() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        canvas.pinch_began(Point2::new(187.5, 150.0));
        canvas.pinch_changed(2.0);
        canvas.rotate_changed(0.3);
        canvas.pinch_changed(1.5);

        let t = canvas.overlays()[0].transform;
        assert!(close(t.scale(), 1.5));
        assert!(close(t.rotation(), 0.3));
    }

    #[test]
    fn test_pan_moves_center_and_reveals_target() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        assert!(canvas.pan_began(Point2::new(187.5, 150.0)));
        assert!(canvas.target_visible());
        assert_eq!(canvas.pan_changed(Vector2::new(-50.0, -20.0)), PanFeedback::None);
        assert_eq!(canvas.pan_ended(), None);

        assert_eq!(canvas.overlays()[0].center, Point2::new(137.5, 130.0));
        assert!(!canvas.target_visible());
    }

    #[test]
    fn test_drop_on_target_removes_only_that_overlay() {
        let mut canvas = new_canvas();
        // Spread them out along the top so each can be hit
        for (n, x) in [(0, 60.0), (1, 187.5), (2, 320.0)] {
            let index = canvas.add_overlay(url(n), None);
            let start = canvas.overlays()[index].center;
            assert!(canvas.pan_began(start));
            canvas.pan_changed(Point2::new(x, 80.0) - start);
            canvas.pan_ended();
        }
        canvas.save_records();
        let before: Vec<TransformRecord> = canvas.records().to_vec();

        let target = canvas.delete_target().center();
        let feedback = drag_to(&mut canvas, 1, target);
        assert_eq!(feedback, vec![PanFeedback::None, PanFeedback::EnteredTarget]);
        assert_eq!(canvas.pan_ended(), Some(1));

        assert_eq!(canvas.len(), 2);
        assert_eq!(canvas.records().len(), 2);
        assert_eq!(canvas.records()[0], before[0]);
        assert_eq!(canvas.records()[1], before[2]);
        assert_eq!(canvas.overlays()[0].url, url(0));
        assert_eq!(canvas.overlays()[1].url, url(2));
    }

    #[test]
    fn test_trash_shrinks_to_constant_size_and_restores() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);

        canvas.pinch_began(Point2::new(187.5, 150.0));
        canvas.pinch_changed(2.0);
        canvas.pinch_ended();
        canvas.rotate_began(Point2::new(187.5, 150.0));
        canvas.rotate_changed(0.4);
        canvas.rotate_ended();
        let original = canvas.overlays()[0].transform;

        let target = canvas.delete_target().center();
        drag_to(&mut canvas, 0, target);
        assert!(canvas.target_engaged());
        // 37.5 × 1.5 / 1.3 / 100
        assert!(close(canvas.overlays()[0].transform.scale(), 0.432_692_3));
        assert!(close(canvas.overlays()[0].transform.rotation(), 0.4));

        assert_eq!(
            canvas.pan_changed(Vector2::new(0.0, -120.0)),
            PanFeedback::LeftTarget
        );
        assert_eq!(canvas.overlays()[0].transform, original);
        assert!(!canvas.target_engaged());

        assert_eq!(canvas.pan_ended(), None);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_display_transform_follows_trash_progress() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        canvas.add_overlay(url(1), None);
        canvas.pinch_began(Point2::new(187.5, 150.0));
        canvas.pinch_changed(2.0);
        canvas.pinch_ended();

        let target = canvas.delete_target().center();
        drag_to(&mut canvas, 1, target);
        let shrunk = canvas.overlays()[1].transform.scale();

        // Entering: from full size toward the trash size
        assert!(close(canvas.display_transform(1, 0.0).unwrap().scale(), 2.0));
        let halfway = canvas.display_transform(1, 0.5).unwrap().scale();
        assert!(close(halfway, (2.0 + shrunk) / 2.0));
        assert!(close(canvas.display_transform(1, 1.0).unwrap().scale(), shrunk));
        assert!(close(canvas.display_transform(0, 1.0).unwrap().scale(), 1.0));

        // Leaving: the model is restored at once, the drawing grows back
        canvas.pan_changed(Vector2::new(0.0, -120.0));
        assert!(close(canvas.overlays()[1].transform.scale(), 2.0));
        assert!(close(canvas.display_transform(1, 1.0).unwrap().scale(), shrunk));
        assert!(close(canvas.display_transform(1, 0.0).unwrap().scale(), 2.0));

        assert!(canvas.display_transform(5, 0.0).is_none());
    }

    #[test]
    fn test_delete_target_grows_with_progress() {
        let canvas = new_canvas();
        let rest = canvas.delete_target_at(0.0);
        assert!(close(rest.width(), 37.5));
        assert!(close(canvas.delete_target_at(0.5).width(), 37.5 * 1.25));
        let engaged = canvas.delete_target_at(1.0);
        assert!(close(engaged.width(), 37.5 * TARGET_ENGAGED_SCALE));
        assert_eq!(engaged.center(), rest.center());
    }

    #[test]
    fn test_entering_target_twice_only_signals_once() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        let target = canvas.delete_target().center();
        drag_to(&mut canvas, 0, target);

        assert_eq!(canvas.pan_changed(Vector2::new(1.0, 0.0)), PanFeedback::None);
        assert_eq!(canvas.pan_changed(Vector2::new(-1.0, 0.0)), PanFeedback::None);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        canvas.pinch_began(Point2::new(187.5, 150.0));
        canvas.pinch_changed(1.7);
        canvas.rotate_changed(-0.8);
        canvas.pinch_ended();
        canvas.pan_began(Point2::new(187.5, 150.0));
        canvas.pan_changed(Vector2::new(-75.0, 30.0));
        canvas.pan_ended();

        canvas.save_records();
        let saved = canvas.records()[0].clone();
        assert!(close(saved.universal_location_x, 112.5 / 375.0));
        assert!(close(saved.universal_location_y, 180.0 / 300.0));
        assert!(close(saved.scale, 1.7));
        assert!(close(saved.rotation, -0.8));

        let map = saved.to_map();
        let mut reloaded = new_canvas();
        reloaded.load_records(vec![TransformRecord::from_map(map).unwrap()]);
        reloaded.save_records();

        let again = &reloaded.records()[0];
        assert!(close(again.universal_location_x, saved.universal_location_x));
        assert!(close(again.universal_location_y, saved.universal_location_y));
        assert!(close(again.scale, saved.scale));
        assert!(close(again.rotation, saved.rotation));
    }

    #[test]
    fn test_resize_keeps_normalized_placement() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        canvas.pan_began(Point2::new(187.5, 150.0));
        canvas.pan_changed(Vector2::new(75.0, -60.0));
        canvas.pan_ended();

        canvas.set_bounds(Vector2::new(750.0, 600.0));

        let overlay = &canvas.overlays()[0];
        assert!(close(overlay.center.x, 525.0));
        assert!(close(overlay.center.y, 180.0));
        assert!(close(overlay.base_size, 200.0));
        assert!(close(canvas.records()[0].universal_location_x, 0.7));
    }

    #[test]
    fn test_resize_mid_trash_restores_transform() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        let target = canvas.delete_target().center();
        drag_to(&mut canvas, 0, target);

        canvas.set_bounds(Vector2::new(400.0, 300.0));
        assert!(close(canvas.records()[0].scale, 1.0));
        assert_eq!(canvas.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_attach_gif_checks_url() {
        let mut canvas = new_canvas();
        canvas.load_records(vec![TransformRecord::new(url(0)), TransformRecord::new(url(1))]);
        let gif = Arc::new(
            AnimatedGif::decode_blocking(&crate::media::gif::tests::sample_gif(&[100])).unwrap(),
        );

        assert!(!canvas.attach_gif(0, &url(1), gif.clone()));
        assert!(canvas.attach_gif(1, &url(1), gif));
        assert!(canvas.overlays()[0].gif.is_none());
        assert!(canvas.overlays()[1].gif.is_some());
    }

    #[test]
    fn test_clear_empties_both_lists() {
        let mut canvas = new_canvas();
        canvas.add_overlay(url(0), None);
        canvas.add_overlay(url(1), None);
        canvas.clear();
        assert!(canvas.is_empty());
        assert!(canvas.records().is_empty());
        assert_eq!(canvas.remove_at(0), None);
    }
}
