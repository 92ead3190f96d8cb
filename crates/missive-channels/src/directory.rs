//! Channel listing and lookup

use missive_core::{Channel, MissiveError, Result, SlackApi};
use tracing::debug;

/// Upper bound on `conversations.list` pages (200 channels each)
const MAX_PAGES: usize = 50;

/// Every non-archived public and private channel visible to the token
pub async fn fetch_all_channels<A: SlackApi + ?Sized>(api: &A) -> Result<Vec<Channel>> {
    let mut channels = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=MAX_PAGES {
        let page = api.list_channels(cursor.as_deref()).await?;
        debug!(
            "conversations.list page {} returned {} channels",
            page_number,
            page.channels.len()
        );

        channels.extend(page.channels.into_iter().filter_map(|raw| {
            if raw.is_archived {
                return None;
            }
            match (raw.id, raw.name) {
                (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => {
                    Some(Channel { id, name })
                }
                _ => None,
            }
        }));

        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Ok(channels)
}

pub fn find_channel_by_id<'a>(channels: &'a [Channel], channel_id: &str) -> Option<&'a Channel> {
    channels.iter().find(|c| c.id == channel_id)
}

/// Look a channel up remotely; used to fill in `channelName` on templates
pub async fn resolve_channel<A: SlackApi + ?Sized>(api: &A, channel_id: &str) -> Result<Channel> {
    let channels = fetch_all_channels(api).await?;
    find_channel_by_id(&channels, channel_id)
        .cloned()
        .ok_or_else(|| MissiveError::ChannelNotFound(channel_id.to_string()))
}
