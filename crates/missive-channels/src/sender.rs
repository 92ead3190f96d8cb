//! Send a message: membership check, thread validation, expansion, post

use missive_core::{
    MissiveError, PostedMessage, Result, SlackApi, Template, expand_variables,
    validate_and_normalize_thread_ts,
};
use tracing::{debug, info};

/// Slack error codes that mean the user cannot post to the channel
const NOT_IN_CHANNEL_CODES: [&str; 2] = ["not_in_channel", "channel_not_found"];

/// Fail with `NotInChannel` unless the token's user is a member of `channel_id`.
///
/// Only structured API error codes are inspected; error messages are never matched.
pub async fn check_channel_membership<A: SlackApi + ?Sized>(api: &A, channel_id: &str) -> Result<()> {
    let identity = api.auth_test().await?;
    let user_id = identity
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| MissiveError::Transport("Failed to get user ID".to_string()))?;

    let members = match api.channel_members(channel_id).await {
        Ok(members) => members,
        Err(e) if e.api_code().is_some_and(|code| NOT_IN_CHANNEL_CODES.contains(&code)) => {
            debug!("Membership lookup for {} refused: {}", channel_id, e);
            return Err(MissiveError::NotInChannel);
        }
        Err(e) => return Err(e),
    };

    if members.iter().any(|m| *m == user_id) {
        Ok(())
    } else {
        Err(MissiveError::NotInChannel)
    }
}

/// Post `message` to `channel_id`, optionally as a reply in `thread_ts`.
///
/// Steps run strictly in order and the first failure wins; nothing is sent
/// unless every check passed.
pub async fn send_message<A: SlackApi + ?Sized>(
    api: &A,
    channel_id: &str,
    message: &str,
    thread_ts: Option<&str>,
) -> Result<PostedMessage> {
    check_channel_membership(api, channel_id).await?;

    let thread_ts = match thread_ts {
        Some(raw) => validate_and_normalize_thread_ts(raw, channel_id, api).await?,
        None => None,
    };

    let text = expand_variables(message, api).await?;
    let posted = api.post_message(channel_id, &text, thread_ts.as_deref()).await?;

    info!(
        "Message sent to {}{} (ts {})",
        posted.channel,
        thread_ts.map(|ts| format!(" in thread {}", ts)).unwrap_or_default(),
        posted.ts
    );
    Ok(posted)
}

pub async fn send_template<A: SlackApi + ?Sized>(api: &A, template: &Template) -> Result<PostedMessage> {
    debug!("Sending template '{}'", template.name);
    send_message(
        api,
        &template.channel_id,
        &template.content,
        template.thread_timestamp.as_deref(),
    )
    .await
}
