//! Stroke model: ink gestures, their style, and the undoable stroke store.
//!
//! A `Stroke` is one continuous pen or eraser gesture. The drawing input
//! handler opens a stroke on pointer-down (`StrokeStore::begin`), extends it
//! on every pointer-move, and seals it on pointer-up. Only sealed strokes are
//! "committed" and visible to bounding-box computation and export; readers
//! always receive an owned snapshot so a stroke in progress can never leak
//! into a raster that is being encoded.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{DEFAULT_ERASER_WIDTH, DEFAULT_PEN_COLOR, DEFAULT_PEN_WIDTH};

/// Which ink tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Draws with the stroke color (default).
    #[default]
    Pen,
    /// Paints the canvas background over existing ink.
    Eraser,
}

/// Visual style of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// CSS hex color (`#RRGGBB` or `#RRGGBBAA`). Ignored for the eraser.
    #[serde(default = "default_color")]
    pub color: String,
    /// Line width in surface units.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Tool that drew the stroke.
    #[serde(default)]
    pub tool: Tool,
}

fn default_color() -> String {
    DEFAULT_PEN_COLOR.to_owned()
}

fn default_width() -> f64 {
    DEFAULT_PEN_WIDTH
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::pen()
    }
}

impl StrokeStyle {
    /// Default black pen.
    #[must_use]
    pub fn pen() -> Self {
        Self { color: default_color(), width: DEFAULT_PEN_WIDTH, tool: Tool::Pen }
    }

    /// Default eraser.
    #[must_use]
    pub fn eraser() -> Self {
        Self { color: default_color(), width: DEFAULT_ERASER_WIDTH, tool: Tool::Eraser }
    }
}

/// One continuous gesture in surface coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Sampled pointer positions, in input order.
    pub points: Vec<Point>,
    /// Color, width, and tool.
    #[serde(default)]
    pub style: StrokeStyle,
}

impl Stroke {
    #[must_use]
    pub fn new(points: Vec<Point>, style: StrokeStyle) -> Self {
        Self { points, style }
    }
}

/// Committed strokes plus the stroke currently being drawn.
#[derive(Debug, Default)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    active: Option<Stroke>,
    redo: Vec<Stroke>,
}

impl StrokeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new stroke at `point`. An unsealed stroke is sealed first.
    pub fn begin(&mut self, point: Point, style: StrokeStyle) {
        self.seal();
        self.active = Some(Stroke::new(vec![point], style));
    }

    /// Append a point to the active stroke. Returns false if no stroke is open.
    pub fn extend(&mut self, point: Point) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.points.push(point);
        true
    }

    /// Seal the active stroke and commit it. Clears the redo stack.
    pub fn seal(&mut self) -> bool {
        let Some(stroke) = self.active.take() else {
            return false;
        };
        if stroke.points.is_empty() {
            return false;
        }
        self.committed.push(stroke);
        self.redo.clear();
        true
    }

    /// Remove the most recent committed stroke. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.committed.pop() else {
            return false;
        };
        self.redo.push(stroke);
        true
    }

    /// Re-commit the most recently undone stroke.
    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo.pop() else {
            return false;
        };
        self.committed.push(stroke);
        true
    }

    /// Drop every stroke, including the active one and the redo history.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.active = None;
        self.redo.clear();
    }

    /// Replace the committed set wholesale (e.g. from a saved document).
    pub fn load_snapshot(&mut self, strokes: Vec<Stroke>) {
        self.clear();
        self.committed = strokes;
    }

    /// Committed strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.committed
    }

    /// Owned copy of the committed strokes.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.committed.clone()
    }

    /// The stroke currently being drawn, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Number of committed strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Returns `true` if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}
