//! Slack adapter for missive
//!
//! This crate provides the `reqwest`-backed Slack Web API client, channel
//! listing, and the send pipeline built on top of the `SlackApi` trait.

pub mod directory;
pub mod sender;
pub mod slack;

#[cfg(test)]
mod testing;

// Re-export main types
pub use directory::{fetch_all_channels, find_channel_by_id, resolve_channel};
pub use sender::{check_channel_membership, send_message, send_template};
pub use slack::SlackClient;
