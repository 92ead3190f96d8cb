//! Capability traits for talking to Slack
//!
//! Everything that needs the remote API takes a `&dyn SlackApi` (or a generic
//! `A: SlackApi`) instead of reaching for a global client, so the logic in this
//! crate can be exercised against an in-memory fake.

use async_trait::async_trait;

use crate::error::{MissiveError, Result};
use crate::types::{ChannelPage, Identity, PostedMessage};

/// The subset of the Slack Web API missive relies on
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `auth.test`
    async fn auth_test(&self) -> Result<Identity>;

    /// `conversations.list`, one page at a time
    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage>;

    /// `conversations.members`, returning user ids
    async fn channel_members(&self, channel_id: &str) -> Result<Vec<String>>;

    /// `conversations.replies`, returning how many messages came back
    async fn thread_replies(&self, channel_id: &str, ts: &str, limit: u32) -> Result<usize>;

    /// `chat.postMessage`
    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<PostedMessage>;
}

/// Supplies the bearer token used for API calls
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<String>;
}

/// A token known up front, e.g. from the config file
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        let token = self.0.trim();
        if token.is_empty() {
            return Err(MissiveError::Config("Slack token is empty".to_string()));
        }
        Ok(token.to_string())
    }
}

/// Reads the token from an environment variable on every call
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn access_token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(MissiveError::Config(format!(
                "Failed to get authentication token: set {} or slack.token in the config file",
                self.var
            ))),
        }
    }
}
