//! Feedback service HTTP client.
//!
//! Thin wrapper over `POST <base>/submission/submit/solution`: one multipart
//! field `file` carrying the PNG, a bearer token, a JSON reply. Reply and
//! error-body handling are pure functions (`parse_response`,
//! `error_message`) so they can be tested without a server.

use std::time::Duration;

use async_trait::async_trait;
use canvas::remap::NormalizedErrorRegion;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::{FeedbackConfig, Timeouts};
use crate::types::{FeedbackError, FeedbackReport};

pub const UPLOAD_FILE_NAME: &str = "selection.png";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred during submission.";

/// Remote analysis of a cropped image.
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Send `png` on behalf of the user holding `token`.
    async fn submit(&self, token: &str, png: Vec<u8>) -> Result<FeedbackReport, FeedbackError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpFeedbackClient {
    http: reqwest::Client,
    url: String,
}

impl HttpFeedbackClient {
    /// Client posting to the full endpoint `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(url: impl Into<String>, timeouts: Timeouts) -> Result<Self, FeedbackError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| FeedbackError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }

    /// Client for the endpoint and timeouts in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &FeedbackConfig) -> Result<Self, FeedbackError> {
        Self::new(config.submit_url(), config.timeouts)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedbackService for HttpFeedbackClient {
    async fn submit(&self, token: &str, png: Vec<u8>) -> Result<FeedbackReport, FeedbackError> {
        let bytes = png.len();
        let part = Part::bytes(png)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("image/png")
            .map_err(|e| FeedbackError::Service(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::debug!(url = %self.url, bytes, "feedback: posting selection");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FeedbackError::Service(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FeedbackError::Service(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "feedback: service rejected submission");
            return Err(FeedbackError::Service(error_message(status.as_u16(), &text)));
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    image_gcs_url: Option<String>,
    #[serde(default)]
    ocr_text: Option<String>,
    #[serde(default)]
    ai_feedback: Option<String>,
    #[serde(default)]
    ai_feedback_data: Option<ApiFeedbackData>,
    /// Older backend revision.
    #[serde(default)]
    error_masks: Option<Vec<NormalizedErrorRegion>>,
}

#[derive(Deserialize)]
struct ApiFeedbackData {
    #[serde(default)]
    translated_handwriting: Option<String>,
    #[serde(default)]
    errors: Vec<NormalizedErrorRegion>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Decode a 2xx reply. Missing `ai_feedback_data` means no errors.
fn parse_response(json: &str) -> Result<FeedbackReport, FeedbackError> {
    let api: ApiResponse = serde_json::from_str(json)
        .map_err(|e| FeedbackError::Service(format!("invalid response from feedback service: {e}")))?;

    let (translated_handwriting, errors) = match api.ai_feedback_data {
        Some(data) => (data.translated_handwriting, data.errors),
        None => (None, api.error_masks.unwrap_or_default()),
    };

    Ok(FeedbackReport {
        image_gcs_url: api.image_gcs_url,
        ocr_text: api.ocr_text,
        ai_feedback: api.ai_feedback,
        translated_handwriting,
        errors,
    })
}

/// User-facing message for a non-2xx reply.
///
/// JSON with a `detail` field yields that field; JSON without it yields the
/// status; anything else yields a generic message.
fn error_message(status: u16, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return UNKNOWN_ERROR_MESSAGE.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Null | serde_json::Value::String(_)) | None => {
            format!("Server responded with status {status}")
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
