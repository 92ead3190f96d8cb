//! Thread timestamp normalization
//!
//! Slack identifies a thread by the timestamp of its root message, written as
//! `seconds.microseconds`. Permalinks show the same value with a leading `p`
//! and without the decimal point (`p1700000000000100`).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::api::SlackApi;
use crate::error::{MissiveError, Result};

static CANONICAL_TS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("valid thread timestamp regex"));

/// Digits after the decimal point in a canonical timestamp
const MICROS_DIGITS: usize = 6;

/// Bring a user-supplied thread id into canonical form without touching the network.
///
/// Returns `Ok(None)` for empty or whitespace-only input.
pub fn normalize_thread_ts(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut ts = trimmed.strip_prefix('p').unwrap_or(trimmed).to_string();

    if !ts.is_empty() && ts.chars().all(|c| c.is_ascii_digit()) && ts.len() > MICROS_DIGITS {
        let split = ts.len() - MICROS_DIGITS;
        ts.insert(split, '.');
    }

    if !CANONICAL_TS.is_match(&ts) {
        return Err(MissiveError::InvalidThreadFormat(trimmed.to_string()));
    }

    Ok(Some(ts))
}

/// Normalize a thread id and confirm the thread exists in `channel_id`.
///
/// A single `conversations.replies` probe with `limit = 1`; any failure of the
/// probe, including transport errors, is reported as `ThreadNotFound`.
pub async fn validate_and_normalize_thread_ts<A: SlackApi + ?Sized>(
    raw: &str,
    channel_id: &str,
    api: &A,
) -> Result<Option<String>> {
    let Some(ts) = normalize_thread_ts(raw)? else {
        return Ok(None);
    };

    match api.thread_replies(channel_id, &ts, 1).await {
        Ok(count) if count > 0 => {
            debug!("Thread {} found in {}", ts, channel_id);
            Ok(Some(ts))
        }
        Ok(_) => Err(MissiveError::ThreadNotFound),
        Err(e) => {
            debug!("Thread probe for {} in {} failed: {}", ts, channel_id, e);
            Err(MissiveError::ThreadNotFound)
        }
    }
}
