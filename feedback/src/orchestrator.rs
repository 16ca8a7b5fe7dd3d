//! Submission orchestrator: ink → selection → crop → service → overlay.
//!
//! DESIGN
//! ======
//! One state machine per orchestrator:
//!
//! ```text
//! Idle → BoundsPending → Selecting → Exporting → AwaitingService → Remapping → Done → Idle
//! ```
//!
//! `FeedbackOrchestrator` is a cheap clonable handle. Cycle state lives in a
//! `std::sync::Mutex` that is only ever held between suspension points; every
//! change is published as a [`FeedbackView`] snapshot on a `watch` channel.
//! Rasterization runs on the blocking pool; the service call is the only
//! network await.
//!
//! Each cycle carries a generation. `cancel()` mid-flight bumps it, and a
//! result that comes back for an older generation is dropped as
//! [`SubmitOutcome::Discarded`] without touching the published state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use canvas::camera::{Camera, Point};
use canvas::export::{ExportResult, export_region};
use canvas::geometry::{BoundsPolicy, Rect, compute_bounding_box_with};
use canvas::hit::{HitPart, hit_test};
use canvas::remap::{BoxOrder, remap_with};
use canvas::selection::{Gesture, SelectionController};
use canvas::surface::DrawingSurface;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::FeedbackService;
use crate::config::{FeedbackConfig, OverlayPolicy};
use crate::identity::Identity;
use crate::state::{FeedbackView, Outcome, Overlay, Phase};
use crate::types::{FeedbackError, FeedbackReport};

// =============================================================================
// TYPES
// =============================================================================

/// Tunables the orchestrator reads once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorSettings {
    pub bounds: BoundsPolicy,
    pub min_selection_size: f64,
    pub overlay_policy: OverlayPolicy,
    pub box_order: BoxOrder,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&FeedbackConfig::default())
    }
}

impl OrchestratorSettings {
    #[must_use]
    pub fn from_config(config: &FeedbackConfig) -> Self {
        Self {
            bounds: config.bounds,
            min_selection_size: config.min_selection_size,
            overlay_policy: config.overlay_policy,
            box_order: config.box_order,
        }
    }
}

/// How a submission that got past validation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The overlay was published.
    Completed(Overlay),
    /// The cycle was cancelled while in flight; its result was dropped.
    Discarded,
}

struct Cycle {
    view: FeedbackView,
    cycle_id: Uuid,
    selection: SelectionController,
    camera: Camera,
}

struct Inner {
    surface: Arc<dyn DrawingSurface>,
    service: Arc<dyn FeedbackService>,
    identity: Arc<dyn Identity>,
    settings: OrchestratorSettings,
    cycle: Mutex<Cycle>,
    tx: watch::Sender<FeedbackView>,
}

/// Drives one submission cycle at a time over injected collaborators.
#[derive(Clone)]
pub struct FeedbackOrchestrator {
    inner: Arc<Inner>,
}

// =============================================================================
// CONSTRUCTION / OBSERVATION
// =============================================================================

impl FeedbackOrchestrator {
    #[must_use]
    pub fn new(
        surface: Arc<dyn DrawingSurface>,
        service: Arc<dyn FeedbackService>,
        identity: Arc<dyn Identity>,
        settings: OrchestratorSettings,
    ) -> Self {
        let view = FeedbackView {
            bounding_box: compute_bounding_box_with(&surface.committed_strokes(), &settings.bounds),
            ..FeedbackView::default()
        };
        let (tx, _) = watch::channel(view.clone());
        let cycle = Cycle {
            view,
            cycle_id: Uuid::nil(),
            selection: SelectionController::new(settings.min_selection_size),
            camera: Camera::default(),
        };
        Self { inner: Arc::new(Inner { surface, service, identity, settings, cycle: Mutex::new(cycle), tx }) }
    }

    /// Receiver that sees every published [`FeedbackView`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedbackView> {
        self.inner.tx.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn view(&self) -> FeedbackView {
        self.lock().view.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Cycle> {
        self.inner.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, cycle: &Cycle) {
        self.inner.tx.send_replace(cycle.view.clone());
    }

    fn set_phase(&self, cycle: &mut Cycle, phase: Phase) {
        cycle.view.phase = phase;
        self.publish(cycle);
    }
}

// =============================================================================
// STARTING A CYCLE
// =============================================================================

impl FeedbackOrchestrator {
    /// Enter selection mode seeded from the bounding box of the committed ink.
    /// Returns the selection as published, grown to the minimum size.
    ///
    /// # Errors
    ///
    /// - [`FeedbackError::SubmissionInProgress`] if a cycle is active; nothing changes.
    /// - [`FeedbackError::AuthRequired`] if nobody is signed in.
    /// - [`FeedbackError::EmptyCanvas`] if there is no ink.
    pub fn request_feedback(&self) -> Result<Rect, FeedbackError> {
        let mut cycle = self.lock();
        self.begin_cycle(&mut cycle)?;

        self.set_phase(&mut cycle, Phase::BoundsPending);
        let strokes = self.inner.surface.committed_strokes();
        let bbox = compute_bounding_box_with(&strokes, &self.inner.settings.bounds);
        cycle.view.bounding_box = bbox;
        let Some(seed) = bbox else {
            return Err(self.reject(&mut cycle, FeedbackError::EmptyCanvas));
        };

        cycle.selection.activate(seed);
        let selection = cycle.selection.rect().unwrap_or(seed);
        cycle.view.selection = Some(selection);
        self.set_phase(&mut cycle, Phase::Selecting);
        info!(
            generation = cycle.view.generation,
            cycle_id = %cycle.cycle_id,
            strokes = strokes.len(),
            "feedback: selection started"
        );
        Ok(selection)
    }

    /// Submit the whole surface without interactive selection.
    ///
    /// # Errors
    ///
    /// Fails like [`request_feedback`](Self::request_feedback) before any
    /// work starts, and like [`confirm`](Self::confirm) afterwards.
    pub async fn submit_all(&self) -> Result<SubmitOutcome, FeedbackError> {
        let (rect, generation) = {
            let mut cycle = self.lock();
            self.begin_cycle(&mut cycle)?;
            if self.inner.surface.committed_strokes().is_empty() {
                return Err(self.reject(&mut cycle, FeedbackError::EmptyCanvas));
            }
            let (w, h) = self.inner.surface.size();
            let rect = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
            info!(generation = cycle.view.generation, cycle_id = %cycle.cycle_id, "feedback: submitting whole surface");
            self.set_phase(&mut cycle, Phase::Exporting);
            (rect, cycle.view.generation)
        };
        self.run(rect, generation).await
    }

    /// Guard shared by every cycle entry point; bumps the generation on success.
    fn begin_cycle(&self, cycle: &mut Cycle) -> Result<(), FeedbackError> {
        if cycle.view.phase.is_busy() {
            return Err(FeedbackError::SubmissionInProgress);
        }
        if self.inner.identity.current_user().is_none() {
            return Err(self.reject(cycle, FeedbackError::AuthRequired));
        }
        cycle.view.generation += 1;
        cycle.view.error = None;
        cycle.cycle_id = Uuid::new_v4();
        Ok(())
    }

    /// Record `err` as the visible message and return to Idle.
    fn reject(&self, cycle: &mut Cycle, err: FeedbackError) -> FeedbackError {
        cycle.view.error = Some(err.to_string());
        cycle.view.selection = None;
        self.set_phase(cycle, Phase::Idle);
        err
    }
}

// =============================================================================
// SELECTING
// =============================================================================

impl FeedbackOrchestrator {
    /// Record where the surface sits in the viewport. Pointer positions are
    /// mapped through it. Returns false, keeping the old viewport, for a
    /// non-finite offset or a zoom that is not positive.
    pub fn set_viewport(&self, scroll_x: f64, scroll_y: f64, zoom: f64) -> bool {
        let Some(camera) = Camera::scrolled(scroll_x, scroll_y, zoom) else {
            warn!(scroll_x, scroll_y, zoom, "feedback: ignoring invalid viewport");
            return false;
        };
        self.lock().camera = camera;
        true
    }

    /// Pointer-down in screen coordinates: resize, drag, or draw a new rectangle.
    pub fn pointer_down(&self, screen: Point) -> Option<Gesture> {
        let mut cycle = self.lock();
        if cycle.view.phase != Phase::Selecting {
            return None;
        }
        let camera = cycle.camera;
        cycle.selection.pointer_down_or_draw(camera.screen_to_surface(screen), &camera)
    }

    /// Pointer-move in screen coordinates.
    pub fn pointer_move(&self, screen: Point) -> Option<Rect> {
        let mut cycle = self.lock();
        if cycle.view.phase != Phase::Selecting {
            return None;
        }
        let pos = cycle.camera.screen_to_surface(screen);
        cycle.selection.on_pointer_move(pos)?;
        self.sync_selection(&mut cycle)
    }

    /// Pointer-up: finish the gesture.
    pub fn pointer_up(&self) -> Option<Rect> {
        let mut cycle = self.lock();
        if cycle.view.phase != Phase::Selecting {
            return None;
        }
        cycle.selection.end_adjust()?;
        self.sync_selection(&mut cycle)
    }

    /// CSS cursor for a pointer hovering at `screen` while selecting.
    #[must_use]
    pub fn cursor_at(&self, screen: Point) -> Option<&'static str> {
        let cycle = self.lock();
        if cycle.view.phase != Phase::Selecting {
            return None;
        }
        let rect = cycle.selection.rect()?;
        let cursor = match hit_test(cycle.camera.screen_to_surface(screen), &rect, &cycle.camera) {
            Some(HitPart::Handle(handle)) => handle.cursor(),
            Some(HitPart::Body) => "move",
            None => "crosshair",
        };
        Some(cursor)
    }

    /// Set the selection rectangle directly, in surface coordinates.
    pub fn replace_selection(&self, rect: Rect) -> Option<Rect> {
        let mut cycle = self.lock();
        if cycle.view.phase != Phase::Selecting {
            return None;
        }
        cycle.selection.replace(rect)?;
        self.sync_selection(&mut cycle)
    }

    fn sync_selection(&self, cycle: &mut Cycle) -> Option<Rect> {
        cycle.view.selection = cycle.selection.rect();
        self.publish(cycle);
        cycle.view.selection
    }

    /// Accept the selection and run export → service → remap.
    ///
    /// # Errors
    ///
    /// - [`FeedbackError::NotSelecting`] outside selection mode.
    /// - [`FeedbackError::Export`], [`FeedbackError::AuthRequired`], or
    ///   [`FeedbackError::Service`] from the cycle itself. The orchestrator is
    ///   back in Idle with the message published when these are returned.
    pub async fn confirm(&self) -> Result<SubmitOutcome, FeedbackError> {
        let (rect, generation) = {
            let mut cycle = self.lock();
            if cycle.view.phase != Phase::Selecting {
                return Err(FeedbackError::NotSelecting);
            }
            let Some(rect) = cycle.selection.confirm() else {
                return Err(FeedbackError::NotSelecting);
            };
            cycle.selection.reset();
            cycle.view.selection = None;
            self.set_phase(&mut cycle, Phase::Exporting);
            (rect, cycle.view.generation)
        };
        self.run(rect, generation).await
    }

    /// Abandon the current cycle. Returns false when there was nothing to cancel.
    pub fn cancel(&self) -> bool {
        let mut cycle = self.lock();
        match cycle.view.phase {
            Phase::Idle => false,
            Phase::Selecting | Phase::BoundsPending => {
                cycle.selection.cancel();
                cycle.selection.reset();
                cycle.view.selection = None;
                self.set_phase(&mut cycle, Phase::Idle);
                info!(generation = cycle.view.generation, "feedback: selection cancelled");
                true
            }
            Phase::Exporting | Phase::AwaitingService | Phase::Remapping | Phase::Done(_) => {
                cycle.view.generation += 1;
                self.set_phase(&mut cycle, Phase::Idle);
                info!(generation = cycle.view.generation, "feedback: in-flight cycle abandoned");
                true
            }
        }
    }
}

// =============================================================================
// RUNNING A CYCLE
// =============================================================================

impl FeedbackOrchestrator {
    /// Export → service → remap. The caller has already moved to `Exporting`.
    async fn run(&self, rect: Rect, generation: u64) -> Result<SubmitOutcome, FeedbackError> {
        let surface = Arc::clone(&self.inner.surface);
        let exported = tokio::task::spawn_blocking(move || export_region(surface.as_ref(), rect))
            .await
            .map_err(|e| FeedbackError::Internal(format!("export task failed: {e}")))
            .and_then(|r| r.map_err(FeedbackError::from));
        let export = match exported {
            Ok(export) => export,
            Err(err) => return self.fail(generation, err),
        };

        {
            let mut cycle = self.lock();
            if cycle.view.generation != generation {
                return Ok(SubmitOutcome::Discarded);
            }
            if self.inner.settings.overlay_policy == OverlayPolicy::ClearAfterExport {
                cycle.view.overlay = None;
            }
            info!(
                generation,
                cycle_id = %cycle.cycle_id,
                width = export.pixel_width,
                height = export.pixel_height,
                "feedback: selection exported"
            );
            self.set_phase(&mut cycle, Phase::AwaitingService);
        }

        let report = match self.call_service(&export).await {
            Ok(report) => report,
            Err(err) => return self.fail(generation, err),
        };

        let mut cycle = self.lock();
        if cycle.view.generation != generation {
            info!(generation, "feedback: dropping result for abandoned cycle");
            return Ok(SubmitOutcome::Discarded);
        }
        self.set_phase(&mut cycle, Phase::Remapping);
        let regions = remap_with(&report.errors, export.bounds, self.inner.settings.box_order);
        let overlay = Overlay {
            crop: export.bounds,
            regions,
            translated_handwriting: report.translated_handwriting,
            ocr_text: report.ocr_text,
            ai_feedback: report.ai_feedback,
            image_gcs_url: report.image_gcs_url,
        };
        info!(generation, cycle_id = %cycle.cycle_id, regions = overlay.regions.len(), "feedback: overlay published");
        cycle.view.overlay = Some(overlay.clone());
        cycle.view.error = None;
        self.set_phase(&mut cycle, Phase::Done(Outcome::Success));
        self.set_phase(&mut cycle, Phase::Idle);
        Ok(SubmitOutcome::Completed(overlay))
    }

    async fn call_service(&self, export: &ExportResult) -> Result<FeedbackReport, FeedbackError> {
        let user = self.inner.identity.current_user().ok_or(FeedbackError::AuthRequired)?;
        let token = user.id_token().await?;
        debug!(uid = user.uid(), bytes = export.image.len(), "feedback: calling service");
        self.inner.service.submit(&token, export.image.clone()).await
    }

    fn fail(&self, generation: u64, err: FeedbackError) -> Result<SubmitOutcome, FeedbackError> {
        let mut cycle = self.lock();
        if cycle.view.generation != generation {
            return Ok(SubmitOutcome::Discarded);
        }
        warn!(generation, cycle_id = %cycle.cycle_id, error = %err, "feedback: cycle failed");
        cycle.view.error = Some(err.to_string());
        self.set_phase(&mut cycle, Phase::Done(Outcome::Failure));
        self.set_phase(&mut cycle, Phase::Idle);
        Err(err)
    }
}

// =============================================================================
// CANVAS CHANGES
// =============================================================================

impl FeedbackOrchestrator {
    /// Recompute and publish the bounding box after the stroke set changed.
    pub fn strokes_changed(&self) -> Option<Rect> {
        let bbox = compute_bounding_box_with(&self.inner.surface.committed_strokes(), &self.inner.settings.bounds);
        let mut cycle = self.lock();
        cycle.view.bounding_box = bbox;
        self.publish(&cycle);
        bbox
    }

    /// Undo the last stroke. Returns false if there was none.
    pub fn undo(&self) -> bool {
        let undone = self.inner.surface.undo();
        self.strokes_changed();
        undone
    }

    /// Remove all ink.
    pub fn clear_canvas(&self) {
        self.inner.surface.clear();
        self.strokes_changed();
    }

    /// Abandon any cycle and reset canvas, overlay, and error for a fresh attempt.
    pub fn start_over(&self) {
        self.cancel();
        self.inner.surface.clear();
        let mut cycle = self.lock();
        cycle.view.bounding_box = None;
        cycle.view.overlay = None;
        cycle.view.error = None;
        self.publish(&cycle);
    }

    /// Clear the visible error message.
    pub fn dismiss_error(&self) {
        let mut cycle = self.lock();
        if cycle.view.error.take().is_some() {
            self.publish(&cycle);
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
