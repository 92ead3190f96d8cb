//! Core types and logic for missive
//!
//! Templates, their JSON storage and import/export, thread timestamp
//! normalization, placeholder expansion, and the `SlackApi` capability trait
//! the rest of the workspace is written against.

pub mod api;
pub mod config;
pub mod error;
pub mod merge;
pub mod store;
pub mod thread_ts;
pub mod transfer;
pub mod types;
pub mod variables;

pub use api::{EnvToken, SlackApi, StaticToken, TokenProvider};
pub use config::MissiveConfig;
pub use error::{ErrorKind, MissiveError, Result};
pub use merge::{ConflictPolicy, merge_templates};
pub use store::TemplateStore;
pub use thread_ts::{normalize_thread_ts, validate_and_normalize_thread_ts};
pub use transfer::{ImportReport, default_transfer_path, export_templates, import_templates};
pub use types::{Channel, ChannelPage, Identity, PostedMessage, RawChannel, Template};
pub use variables::{TemplateVariables, expand_variables};
