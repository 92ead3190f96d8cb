//! In-memory `SlackApi` used by the unit tests in this crate

use std::sync::Mutex;

use async_trait::async_trait;
use missive_core::{ChannelPage, Identity, MissiveError, PostedMessage, Result, SlackApi};

pub struct FakeSlack {
    pub identity: Identity,
    /// `Err(code)` makes `conversations.members` fail with that Slack error code
    pub members: std::result::Result<Vec<String>, String>,
    pub replies: usize,
    pub pages: Vec<(Option<String>, ChannelPage)>,
    pub calls: Mutex<Vec<String>>,
    pub cursors: Mutex<Vec<Option<String>>>,
    pub posted: Mutex<Vec<(String, String, Option<String>)>>,
}

impl Default for FakeSlack {
    fn default() -> Self {
        Self {
            identity: Identity {
                user_id: Some("U1".to_string()),
                user: Some("bob".to_string()),
            },
            members: Ok(vec!["U1".to_string(), "U2".to_string()]),
            replies: 1,
            pages: Vec::new(),
            calls: Mutex::new(Vec::new()),
            cursors: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSlack {
    /// Serve `pages` in order, each reachable through the previous page's cursor
    pub fn with_pages(mut self, pages: Vec<ChannelPage>) -> Self {
        let mut cursor = None;
        for page in pages {
            let next = page.next_cursor.clone();
            self.pages.push((cursor, page));
            cursor = next;
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<(String, String, Option<String>)> {
        self.posted.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn auth_test(&self) -> Result<Identity> {
        self.record("auth.test");
        Ok(self.identity.clone())
    }

    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage> {
        self.record("conversations.list");
        self.cursors.lock().unwrap().push(cursor.map(str::to_string));
        Ok(self
            .pages
            .iter()
            .find(|(key, _)| key.as_deref() == cursor)
            .map(|(_, page)| page.clone())
            .unwrap_or_default())
    }

    async fn channel_members(&self, _channel_id: &str) -> Result<Vec<String>> {
        self.record("conversations.members");
        self.members.clone().map_err(|code| MissiveError::Api {
            method: "conversations.members".to_string(),
            code,
        })
    }

    async fn thread_replies(&self, _channel_id: &str, _ts: &str, _limit: u32) -> Result<usize> {
        self.record("conversations.replies");
        Ok(self.replies)
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<PostedMessage> {
        self.record("chat.postMessage");
        self.posted.lock().unwrap().push((
            channel_id.to_string(),
            text.to_string(),
            thread_ts.map(str::to_string),
        ));
        Ok(PostedMessage {
            channel: channel_id.to_string(),
            ts: "1700000001.000200".to_string(),
        })
    }
}
