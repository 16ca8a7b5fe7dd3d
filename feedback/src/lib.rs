//! Handwriting feedback: submission orchestration over the canvas core.
//!
//! ARCHITECTURE
//! ============
//! The orchestrator owns one submission cycle at a time. It reads ink from a
//! [`canvas::surface::DrawingSurface`], lets the user adjust a selection,
//! crops it, sends the crop to a [`client::FeedbackService`], and remaps the
//! service's normalized error boxes back onto the drawing. Identity, the
//! surface, and the service are injected, so the whole cycle runs in tests
//! against mocks.
//!
//! | Module | Role |
//! |--------|------|
//! | [`orchestrator`] | Cycle state machine and published view |
//! | [`client`] | HTTP client for the feedback service |
//! | [`identity`] | Signed-in user and bearer token |
//! | [`config`] | Typed configuration from `FEEDBACK_*` env vars |
//! | [`state`] | Phase, overlay, and view snapshot types |
//! | [`types`] | Error taxonomy and the decoded service report |

pub mod client;
pub mod config;
pub mod identity;
pub mod orchestrator;
pub mod state;
pub mod types;

pub use client::{FeedbackService, HttpFeedbackClient};
pub use config::{FeedbackConfig, OverlayPolicy};
pub use orchestrator::{FeedbackOrchestrator, OrchestratorSettings, SubmitOutcome};
pub use state::{FeedbackView, Outcome, Overlay, Phase};
pub use types::{ErrorCode, FeedbackError, FeedbackReport};
