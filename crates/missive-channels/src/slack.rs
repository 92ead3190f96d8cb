//! Slack Web API client

use std::time::Duration;

use async_trait::async_trait;
use missive_core::config::SlackConfig;
use missive_core::types::{ChannelPage, Identity, PostedMessage, RawChannel};
use missive_core::{MissiveError, Result, SlackApi, TokenProvider};
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

/// Page size for `conversations.list` and `conversations.members`
const PAGE_LIMIT: &str = "200";

/// Upper bound on `conversations.members` pages followed for one channel
const MAX_MEMBER_PAGES: usize = 50;

/// Channel types listed when picking a target
const CHANNEL_TYPES: &str = "public_channel,private_channel";

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    channels: Vec<RawChannel>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    members: Vec<String>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct RepliesResponse {
    #[serde(default)]
    messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    channel: Option<String>,
    ts: Option<String>,
}

fn next_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata
        .and_then(|m| m.next_cursor)
        .filter(|c| !c.trim().is_empty())
}

fn transport(method: &str, e: reqwest::Error) -> MissiveError {
    MissiveError::Transport(format!("{}: {}", method, e))
}

/// Bearer-authenticated client for the handful of methods missive uses
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl SlackClient {
    /// # Arguments
    /// * `api_base` - API root, normally `https://slack.com/api`
    /// * `token` - user or bot token (`xoxp-` / `xoxb-`)
    pub fn new(api_base: &str, token: String, timeout: Duration) -> Result<Self> {
        Url::parse(api_base)
            .map_err(|e| MissiveError::Config(format!("invalid Slack API base {:?}: {}", api_base, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("missive/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MissiveError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &SlackConfig, tokens: &dyn TokenProvider) -> Result<Self> {
        let token = tokens.access_token()?;
        debug!("Slack token present, using API base {}", config.api_base);
        Self::new(
            &config.api_base,
            token,
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    fn get(&self, method: &str) -> RequestBuilder {
        self.http.get(self.url(method)).bearer_auth(&self.token)
    }

    fn post(&self, method: &str) -> RequestBuilder {
        self.http.post(self.url(method)).bearer_auth(&self.token)
    }

    /// Send a request and unwrap Slack's `{"ok": ..., "error": ...}` envelope
    async fn call<T: DeserializeOwned>(&self, method: &str, request: RequestBuilder) -> Result<T> {
        debug!("Calling Slack {}", method);

        let response = request.send().await.map_err(|e| transport(method, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport(method, e))?;

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            MissiveError::Transport(format!(
                "{} returned {} with a non-JSON body: {}",
                method, status, e
            ))
        })?;

        if data.get("ok").and_then(Value::as_bool) != Some(true) {
            let code = data
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("http_{}", status.as_u16()));
            warn!("Slack {} failed: {}", method, code);
            return Err(MissiveError::Api {
                method: method.to_string(),
                code,
            });
        }

        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<Identity> {
        self.call("auth.test", self.post("auth.test")).await
    }

    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage> {
        let mut query = vec![
            ("types", CHANNEL_TYPES),
            ("exclude_archived", "true"),
            ("limit", PAGE_LIMIT),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let response: ListResponse = self
            .call("conversations.list", self.get("conversations.list").query(&query))
            .await?;

        Ok(ChannelPage {
            channels: response.channels,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn channel_members(&self, channel_id: &str) -> Result<Vec<String>> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        for page_number in 1..=MAX_MEMBER_PAGES {
            let mut query = vec![("channel", channel_id), ("limit", PAGE_LIMIT)];
            if let Some(ref c) = cursor {
                query.push(("cursor", c.as_str()));
            }

            let response: MembersResponse = self
                .call(
                    "conversations.members",
                    self.get("conversations.members").query(&query),
                )
                .await?;
            members.extend(response.members);

            cursor = next_cursor(response.response_metadata);
            if cursor.is_none() {
                break;
            }
            if page_number == MAX_MEMBER_PAGES {
                warn!(
                    "Stopped following conversations.members for {} after {} pages",
                    channel_id, MAX_MEMBER_PAGES
                );
            }
        }

        debug!("{} has {} members", channel_id, members.len());
        Ok(members)
    }

    async fn thread_replies(&self, channel_id: &str, ts: &str, limit: u32) -> Result<usize> {
        let limit = limit.to_string();
        let query = [("channel", channel_id), ("ts", ts), ("limit", limit.as_str())];

        let response: RepliesResponse = self
            .call(
                "conversations.replies",
                self.get("conversations.replies").query(&query),
            )
            .await?;
        Ok(response.messages.len())
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<PostedMessage> {
        let mut payload = json!({
            "channel": channel_id,
            "text": text,
        });
        if let Some(thread_ts) = thread_ts {
            payload["thread_ts"] = Value::String(thread_ts.to_string());
        }

        let response: PostResponse = self
            .call("chat.postMessage", self.post("chat.postMessage").json(&payload))
            .await?;

        Ok(PostedMessage {
            channel: response.channel.unwrap_or_else(|| channel_id.to_string()),
            ts: response.ts.ok_or_else(|| {
                MissiveError::Transport("chat.postMessage response missing ts".to_string())
            })?,
        })
    }
}
