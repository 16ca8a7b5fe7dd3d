//! Shared types: errors and the decoded service report.

use canvas::export::ExportError;
use canvas::remap::NormalizedErrorRegion;
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR CODES
// =============================================================================

/// Stable, grepable identifier for an error, plus whether retrying can help.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Everything a submission cycle can fail with.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    /// No committed strokes, so there is nothing to select.
    #[error("Draw something before asking for feedback.")]
    EmptyCanvas,

    /// Cropping the selection failed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// No signed-in user, or the identity provider refused a token.
    #[error("You must be logged in to submit.")]
    AuthRequired,

    /// A cycle is already running.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// The feedback service failed or rejected the request. The message is user-facing.
    #[error("{0}")]
    Service(String),

    /// The operation needs an active selection.
    #[error("no selection is active")]
    NotSelecting,

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A background task died before reporting a result.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorCode for FeedbackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCanvas => "E_EMPTY_CANVAS",
            Self::Export(_) => "E_EXPORT",
            Self::AuthRequired => "E_AUTH_REQUIRED",
            Self::SubmissionInProgress => "E_SUBMISSION_IN_PROGRESS",
            Self::Service(_) => "E_SERVICE",
            Self::NotSelecting => "E_NOT_SELECTING",
            Self::Config(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Service(_) | Self::SubmissionInProgress)
    }
}

// =============================================================================
// SERVICE REPORT
// =============================================================================

/// Decoded reply from the feedback service.
///
/// Error boxes are still in the service's normalized space; the orchestrator
/// remaps them against the crop they were computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub image_gcs_url: Option<String>,
    pub ocr_text: Option<String>,
    pub ai_feedback: Option<String>,
    pub translated_handwriting: Option<String>,
    pub errors: Vec<NormalizedErrorRegion>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
