//! Selection gesture state machine.
//!
//! `SelectionController` owns the rectangle the user is about to submit. It
//! is seeded from the ink's bounding box, then moved, resized from any of
//! eight handles, or redrawn by rubber-banding. Every pointer-move computes
//! the new rectangle from the snapshot taken at gesture start plus the total
//! pointer delta, so dropped intermediate moves never accumulate error.
//!
//! The controller performs no I/O. Mutating calls return a
//! [`SelectionEvent`] that the owner publishes to the UI.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::camera::{Camera, Point};
use crate::consts::{CLICK_SLOP, MIN_SELECTION_SIZE};
use crate::geometry::{Rect, clamp_min_size, grow_to_min_size};
use crate::hit::{Handle, HitPart, hit_test};

/// What an in-progress adjustment does with pointer deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Translate the whole rectangle.
    Move,
    /// Move the edges implied by a handle.
    Resize(Handle),
    /// Rubber-band a new rectangle from the gesture start point.
    Draw,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    /// No selection exists.
    #[default]
    Inactive,
    /// A rectangle is shown and waiting for a gesture, confirm, or cancel.
    Selecting { rect: Rect },
    /// A pointer gesture is in progress.
    Adjusting {
        /// What the pointer is doing.
        gesture: Gesture,
        /// Surface position of the pointer when the gesture began.
        start: Point,
        /// Most recent pointer position.
        last: Point,
        /// Rectangle at gesture start; every move is computed from this.
        orig: Rect,
        /// Current rectangle.
        rect: Rect,
    },
    /// The user accepted the rectangle.
    Confirmed { rect: Rect },
    /// The user dismissed the selection.
    Cancelled,
}

/// Change notification for the owner to publish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// The rectangle moved or changed size.
    Changed(Rect),
    /// The rectangle was accepted.
    Confirmed(Rect),
    /// The selection was discarded.
    Cleared,
}

/// Owns the selection rectangle and its gesture lifecycle.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    min_size: f64,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(MIN_SELECTION_SIZE)
    }
}

impl SelectionController {
    /// Create an inactive controller that keeps rectangles at least `min_size` on each side.
    #[must_use]
    pub fn new(min_size: f64) -> Self {
        Self { state: SelectionState::Inactive, min_size }
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    #[must_use]
    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Current rectangle, if a selection is shown.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        match self.state {
            SelectionState::Selecting { rect }
            | SelectionState::Adjusting { rect, .. }
            | SelectionState::Confirmed { rect } => Some(rect),
            SelectionState::Inactive | SelectionState::Cancelled => None,
        }
    }

    /// Whether a rectangle is shown and still editable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. } | SelectionState::Adjusting { .. })
    }

    /// Whether a pointer gesture is in progress.
    #[must_use]
    pub fn is_adjusting(&self) -> bool {
        matches!(self.state, SelectionState::Adjusting { .. })
    }

    // --- Lifecycle ---

    /// Enter selection mode showing `seed`, grown to the minimum size if needed.
    pub fn activate(&mut self, seed: Rect) -> SelectionEvent {
        let rect = grow_to_min_size(seed, self.min_size);
        self.state = SelectionState::Selecting { rect };
        SelectionEvent::Changed(rect)
    }

    /// Replace the rectangle of an active selection. Any gesture in progress is dropped.
    pub fn replace(&mut self, rect: Rect) -> Option<SelectionEvent> {
        if !self.is_active() || !rect.is_finite() {
            return None;
        }
        Some(self.activate(rect))
    }

    /// Accept the rectangle. An unfinished gesture is ended first.
    pub fn confirm(&mut self) -> Option<Rect> {
        if self.is_adjusting() {
            self.end_adjust();
        }
        let SelectionState::Selecting { rect } = self.state else {
            return None;
        };
        self.state = SelectionState::Confirmed { rect };
        Some(rect)
    }

    /// Discard the selection. Returns `None` if there was nothing to discard.
    pub fn cancel(&mut self) -> Option<SelectionEvent> {
        if self.rect().is_none() {
            return None;
        }
        self.state = SelectionState::Cancelled;
        Some(SelectionEvent::Cleared)
    }

    /// Return to `Inactive` after the owner consumed a confirmed or cancelled selection.
    pub fn reset(&mut self) {
        self.state = SelectionState::Inactive;
    }

    // --- Gestures ---

    /// Start translating the rectangle.
    pub fn begin_drag(&mut self, pos: Point) -> bool {
        self.begin(Gesture::Move, pos)
    }

    /// Start moving the edges implied by `handle`.
    pub fn begin_resize(&mut self, pos: Point, handle: Handle) -> bool {
        self.begin(Gesture::Resize(handle), pos)
    }

    /// Start rubber-banding a new rectangle from `pos`.
    pub fn begin_draw(&mut self, pos: Point) -> bool {
        self.begin(Gesture::Draw, pos)
    }

    /// Start whichever gesture the pointer lands on: a handle resizes, the
    /// body drags, anywhere else draws a new rectangle.
    pub fn pointer_down(&mut self, pos: Point, camera: &Camera) -> Option<Gesture> {
        let SelectionState::Selecting { rect } = self.state else {
            return None;
        };
        let gesture = match hit_test(pos, &rect, camera)? {
            HitPart::Handle(handle) => Gesture::Resize(handle),
            HitPart::Body => Gesture::Move,
        };
        self.begin(gesture, pos).then_some(gesture)
    }

    /// Like [`pointer_down`](Self::pointer_down), but a miss starts a draw.
    pub fn pointer_down_or_draw(&mut self, pos: Point, camera: &Camera) -> Option<Gesture> {
        if let Some(gesture) = self.pointer_down(pos, camera) {
            return Some(gesture);
        }
        self.begin_draw(pos).then_some(Gesture::Draw)
    }

    fn begin(&mut self, gesture: Gesture, pos: Point) -> bool {
        let SelectionState::Selecting { rect } = self.state else {
            return false;
        };
        if !pos.is_finite() {
            return false;
        }
        self.state = SelectionState::Adjusting { gesture, start: pos, last: pos, orig: rect, rect };
        true
    }

    /// Recompute the rectangle for the pointer at `pos`.
    pub fn on_pointer_move(&mut self, pos: Point) -> Option<SelectionEvent> {
        let SelectionState::Adjusting { gesture, start, orig, .. } = self.state else {
            return None;
        };
        if !pos.is_finite() {
            return None;
        }
        let rect = self.apply(gesture, start, orig, pos);
        self.state = SelectionState::Adjusting { gesture, start, last: pos, orig, rect };
        Some(SelectionEvent::Changed(rect))
    }

    /// Finish the gesture and go back to `Selecting`.
    ///
    /// A draw that never left the click slop restores the previous rectangle.
    pub fn end_adjust(&mut self) -> Option<SelectionEvent> {
        let SelectionState::Adjusting { gesture, start, last, orig, rect } = self.state else {
            return None;
        };
        let is_click = (last.x - start.x).abs() <= CLICK_SLOP && (last.y - start.y).abs() <= CLICK_SLOP;
        let rect = if gesture == Gesture::Draw && is_click { orig } else { rect };
        self.state = SelectionState::Selecting { rect };
        Some(SelectionEvent::Changed(rect))
    }

    fn apply(&self, gesture: Gesture, start: Point, orig: Rect, pos: Point) -> Rect {
        let dx = pos.x - start.x;
        let dy = pos.y - start.y;
        match gesture {
            Gesture::Move => orig.translated(dx, dy),
            Gesture::Resize(handle) => {
                let mut r = orig;
                if handle.moves_left() {
                    r.x = orig.x + dx;
                    r.width = orig.width - dx;
                }
                if handle.moves_right() {
                    r.width = orig.width + dx;
                }
                if handle.moves_top() {
                    r.y = orig.y + dy;
                    r.height = orig.height - dy;
                }
                if handle.moves_bottom() {
                    r.height = orig.height + dy;
                }
                clamp_min_size(r, handle, self.min_size, self.min_size)
            }
            Gesture::Draw => {
                let handle = Handle::toward(start, pos);
                clamp_min_size(Rect::from_corners(start, pos), handle, self.min_size, self.min_size)
            }
        }
    }
}
