//! Identity collaborator: who is signed in, and their bearer token.
//!
//! Sign-in itself happens elsewhere. The orchestrator only asks whether a
//! user exists and, right before the network call, for a fresh token.

use std::sync::Arc;

use crate::types::FeedbackError;

/// A signed-in user.
#[async_trait::async_trait]
pub trait CurrentUser: Send + Sync {
    /// Stable user id, for logs.
    fn uid(&self) -> &str;

    /// Opaque bearer token. May refresh behind the scenes.
    async fn id_token(&self) -> Result<String, FeedbackError>;
}

/// Source of the current user.
pub trait Identity: Send + Sync {
    fn current_user(&self) -> Option<Arc<dyn CurrentUser>>;
}

/// User with a fixed token (from config or the command line).
#[derive(Debug, Clone)]
pub struct StaticUser {
    uid: String,
    token: String,
}

impl StaticUser {
    #[must_use]
    pub fn new(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Self { uid: uid.into(), token: token.into() }
    }
}

#[async_trait::async_trait]
impl CurrentUser for StaticUser {
    fn uid(&self) -> &str {
        &self.uid
    }

    async fn id_token(&self) -> Result<String, FeedbackError> {
        Ok(self.token.clone())
    }
}

/// Identity that is either signed out or always the same user.
#[derive(Clone, Default)]
pub struct StaticIdentity {
    user: Option<Arc<StaticUser>>,
}

impl StaticIdentity {
    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None }
    }

    #[must_use]
    pub fn signed_in(user: StaticUser) -> Self {
        Self { user: Some(Arc::new(user)) }
    }

    /// Signed in as `"static"` when a token is present.
    #[must_use]
    pub fn from_token(token: Option<String>) -> Self {
        token.map_or_else(Self::signed_out, |t| Self::signed_in(StaticUser::new("static", t)))
    }
}

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<Arc<dyn CurrentUser>> {
        self.user.clone().map(|u| u as Arc<dyn CurrentUser>)
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
