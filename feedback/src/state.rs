//! Published state: the cycle phase and what the UI should draw.

use canvas::geometry::Rect;
use canvas::remap::RemappedErrorRegion;

/// How a finished cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Where the current submission cycle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    BoundsPending,
    Selecting,
    Exporting,
    AwaitingService,
    Remapping,
    Done(Outcome),
}

impl Phase {
    /// A cycle owns the orchestrator; a new one cannot start.
    #[must_use]
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Work is running that the user is waiting on.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Exporting | Self::AwaitingService | Self::Remapping)
    }
}

/// Feedback placed on the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Surface rectangle that was sent for analysis.
    pub crop: Rect,
    /// Error regions in surface coordinates.
    pub regions: Vec<RemappedErrorRegion>,
    pub translated_handwriting: Option<String>,
    pub ocr_text: Option<String>,
    pub ai_feedback: Option<String>,
    pub image_gcs_url: Option<String>,
}

impl Overlay {
    /// The service found nothing wrong.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Snapshot published on every state change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedbackView {
    pub phase: Phase,
    /// Increments when a cycle starts or is abandoned.
    pub generation: u64,
    /// Padded box around the committed ink, if any.
    pub bounding_box: Option<Rect>,
    /// Selection rectangle while selecting.
    pub selection: Option<Rect>,
    pub overlay: Option<Overlay>,
    /// User-facing message from the last failure.
    pub error: Option<String>,
}

impl FeedbackView {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
