//! Feedback configuration parsed from environment variables.

use canvas::consts::{DEFAULT_BOUNDS_PADDING, MIN_SELECTION_SIZE};
use canvas::geometry::BoundsPolicy;
use canvas::remap::BoxOrder;

use crate::types::FeedbackError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// What happens to the previous overlay when a new cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPolicy {
    /// Prior feedback stays until a new cycle succeeds.
    #[default]
    KeepUntilSuccess,
    /// Prior feedback is cleared as soon as the new cycle's export succeeds.
    ClearAfterExport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackConfig {
    /// Base URL up to and including the API version, without a trailing `/`.
    pub api_base_url: String,
    pub timeouts: Timeouts,
    pub bounds: BoundsPolicy,
    pub min_selection_size: f64,
    pub overlay_policy: OverlayPolicy,
    pub box_order: BoxOrder,
    /// Bearer token for a statically signed-in user.
    pub id_token: Option<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeouts: Timeouts::default(),
            bounds: BoundsPolicy::default(),
            min_selection_size: MIN_SELECTION_SIZE,
            overlay_policy: OverlayPolicy::default(),
            box_order: BoxOrder::default(),
            id_token: None,
        }
    }
}

impl FeedbackConfig {
    /// Build typed config from environment variables.
    ///
    /// All optional:
    /// - `FEEDBACK_API_BASE_URL`: default `http://127.0.0.1:8000/api/v1`
    /// - `FEEDBACK_REQUEST_TIMEOUT_SECS`: default 120
    /// - `FEEDBACK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `FEEDBACK_BOUNDS_PADDING`: default 20
    /// - `FEEDBACK_ALLOW_NEGATIVE_ORIGIN`: `true` (default) or `false`
    /// - `FEEDBACK_MIN_SELECTION_SIZE`: default 20
    /// - `FEEDBACK_OVERLAY_POLICY`: `keep` (default) or `clear`
    /// - `FEEDBACK_BOX_ORDER`: `xyxy` (default) or `yxyx`
    /// - `FEEDBACK_ID_TOKEN`: unset means signed out
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::Config`] for an unrecognized enum or boolean value.
    pub fn from_env() -> Result<Self, FeedbackError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FeedbackError> {
        let api_base_url = lookup("FEEDBACK_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = Timeouts {
            request_secs: parse_or(&lookup, "FEEDBACK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "FEEDBACK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let bounds = BoundsPolicy {
            padding: parse_or(&lookup, "FEEDBACK_BOUNDS_PADDING", DEFAULT_BOUNDS_PADDING).max(0.0),
            allow_negative_origin: parse_bool(lookup("FEEDBACK_ALLOW_NEGATIVE_ORIGIN").as_deref(), true)?,
        };
        let min_selection_size = parse_or(&lookup, "FEEDBACK_MIN_SELECTION_SIZE", MIN_SELECTION_SIZE).max(1.0);
        let overlay_policy = parse_overlay_policy(lookup("FEEDBACK_OVERLAY_POLICY").as_deref())?;
        let box_order = match lookup("FEEDBACK_BOX_ORDER") {
            Some(raw) => raw.parse::<BoxOrder>().map_err(FeedbackError::Config)?,
            None => BoxOrder::default(),
        };
        let id_token = lookup("FEEDBACK_ID_TOKEN").filter(|t| !t.trim().is_empty());

        Ok(Self { api_base_url, timeouts, bounds, min_selection_size, overlay_policy, box_order, id_token })
    }

    /// Full URL of the submission endpoint.
    #[must_use]
    pub fn submit_url(&self) -> String {
        format!("{}/submission/submit/solution", self.api_base_url)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: Option<&str>, default: bool) -> Result<bool, FeedbackError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(FeedbackError::Config(format!("expected a boolean, got '{other}'"))),
    }
}

fn parse_overlay_policy(raw: Option<&str>) -> Result<OverlayPolicy, FeedbackError> {
    match raw.unwrap_or("keep") {
        "keep" => Ok(OverlayPolicy::KeepUntilSuccess),
        "clear" => Ok(OverlayPolicy::ClearAfterExport),
        other => Err(FeedbackError::Config(format!(
            "unsupported FEEDBACK_OVERLAY_POLICY '{other}' (expected 'keep' or 'clear')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
