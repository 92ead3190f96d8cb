//! Core data types for templates and Slack entities

use serde::{Deserialize, Serialize};

/// A named, reusable message body bound to a channel and optional thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub content: String,
    #[serde(alias = "slackChannelId")]
    pub channel_id: String,
    #[serde(alias = "slackChannelName")]
    pub channel_name: String,
    /// Canonical `seconds.microseconds` thread timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_timestamp: Option<String>,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        channel_id: impl Into<String>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            thread_timestamp: None,
        }
    }

    pub fn with_thread(mut self, thread_timestamp: Option<String>) -> Self {
        self.thread_timestamp = thread_timestamp;
        self
    }

    /// First 50 characters of the content, with an ellipsis when cut
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 50;
        if self.content.chars().count() > PREVIEW_CHARS {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.content.clone()
        }
    }
}

/// A Slack conversation the user can post to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// Who the token belongs to, as reported by `auth.test`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub user_id: Option<String>,
    pub user: Option<String>,
}

/// One page of `conversations.list`
#[derive(Debug, Clone, Default)]
pub struct ChannelPage {
    pub channels: Vec<RawChannel>,
    pub next_cursor: Option<String>,
}

/// A channel as returned by the API, before filtering
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChannel {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

/// Where `chat.postMessage` put the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_json_shape() {
        let template = Template::new("standup", "Morning {user}", "C1", "general")
            .with_thread(Some("1700000000.000100".to_string()));
        let json = serde_json::to_value(&template).unwrap();

        assert_eq!(json["name"], "standup");
        assert_eq!(json["channelId"], "C1");
        assert_eq!(json["channelName"], "general");
        assert_eq!(json["threadTimestamp"], "1700000000.000100");
    }

    #[test]
    fn test_thread_omitted_when_absent() {
        let template = Template::new("a", "b", "C1", "general");
        let json = serde_json::to_string(&template).unwrap();
        assert!(!json.contains("threadTimestamp"));
    }

    #[test]
    fn test_reads_legacy_keys() {
        let json = r#"{
            "name": "old",
            "content": "hi",
            "slackChannelId": "C9",
            "slackChannelName": "random"
        }"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(template.channel_id, "C9");
        assert_eq!(template.channel_name, "random");
        assert!(template.thread_timestamp.is_none());
    }

    #[test]
    fn test_preview() {
        let short = Template::new("a", "short", "C1", "g");
        assert_eq!(short.preview(), "short");

        let long = Template::new("a", "x".repeat(60), "C1", "g");
        assert_eq!(long.preview(), format!("{}...", "x".repeat(50)));
    }
}
