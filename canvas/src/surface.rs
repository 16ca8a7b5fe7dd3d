//! Drawing-surface capability and the reference raster implementation.
//!
//! Export and submission never see a UI toolkit. They talk to a
//! [`DrawingSurface`]: something with a fixed logical size that can hand out
//! its committed strokes and render itself in full. [`InkSurface`] is the
//! in-process implementation used by the CLI and the tests; a browser host
//! would implement the same trait over its own canvas.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::render::{RenderError, render_strokes};
use crate::stroke::{Stroke, StrokeStore, StrokeStyle};

/// What the export pipeline and orchestrator need from a drawing canvas.
pub trait DrawingSurface: Send + Sync {
    /// Logical size in surface units, independent of any viewport.
    fn size(&self) -> (u32, u32);

    /// Owned copy of the committed strokes.
    fn committed_strokes(&self) -> Vec<Stroke>;

    /// PNG of the entire logical surface at 1 pixel per surface unit.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if rasterization or encoding fails.
    fn export_full_raster(&self) -> Result<Vec<u8>, RenderError>;

    /// Remove every stroke.
    fn clear(&self);

    /// Remove the most recent stroke. Returns false if there was none.
    fn undo(&self) -> bool;
}

/// On-disk stroke document: surface size plus strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDocument {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

/// Thread-safe stroke surface rendered with `tiny-skia`.
#[derive(Debug)]
pub struct InkSurface {
    width: u32,
    height: u32,
    store: RwLock<StrokeStore>,
}

impl InkSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, store: RwLock::new(StrokeStore::new()) }
    }

    #[must_use]
    pub fn from_document(doc: SurfaceDocument) -> Self {
        let surface = Self::new(doc.width, doc.height);
        surface.load_strokes(doc.strokes);
        surface
    }

    #[must_use]
    pub fn to_document(&self) -> SurfaceDocument {
        SurfaceDocument { width: self.width, height: self.height, strokes: self.committed_strokes() }
    }

    // --- Drawing input ---

    /// Pointer-down with a drawing tool.
    pub fn begin_stroke(&self, point: Point, style: StrokeStyle) {
        self.write().begin(point, style);
    }

    /// Pointer-move while drawing. Returns false if no stroke is open.
    pub fn extend_stroke(&self, point: Point) -> bool {
        self.write().extend(point)
    }

    /// Pointer-up. Returns true if a stroke was committed.
    pub fn end_stroke(&self) -> bool {
        self.write().seal()
    }

    pub fn redo(&self) -> bool {
        self.write().redo()
    }

    /// Replace all strokes.
    pub fn load_strokes(&self, strokes: Vec<Stroke>) {
        self.write().load_snapshot(strokes);
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, StrokeStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StrokeStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DrawingSurface for InkSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn committed_strokes(&self) -> Vec<Stroke> {
        self.read().snapshot()
    }

    fn export_full_raster(&self) -> Result<Vec<u8>, RenderError> {
        // Held for the whole render so a concurrent stroke cannot land mid-encode.
        let store = self.read();
        render_strokes(self.width, self.height, store.strokes())
    }

    fn clear(&self) {
        self.write().clear();
    }

    fn undo(&self) -> bool {
        self.write().undo()
    }
}
