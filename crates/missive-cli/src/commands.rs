//! Command handlers
//!
//! Each handler is a boundary: library errors are reported through the
//! notifier and then returned so the process exits non-zero.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use missive_channels::{SlackClient, fetch_all_channels, resolve_channel, send_message, send_template};
use missive_core::{
    ConflictPolicy, MissiveConfig, MissiveError, SlackApi, Template, TemplateStore,
    default_transfer_path, export_templates, import_templates, normalize_thread_ts,
    validate_and_normalize_thread_ts,
};
use tracing::{debug, warn};

use crate::notify::Notifier;

/// Field updates for `templates edit`; `None` keeps the current value
#[derive(Debug, Default, Clone)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub content: Option<String>,
    pub channel: Option<String>,
    pub thread: Option<String>,
    pub clear_thread: bool,
}

pub struct App {
    config: MissiveConfig,
    store: TemplateStore,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(config: MissiveConfig, notifier: Arc<dyn Notifier>) -> Self {
        let store = TemplateStore::new(config.storage.templates_path.clone());
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Build the API client; fails when no token is available
    pub fn slack(&self) -> anyhow::Result<SlackClient> {
        let tokens = self.config.token_provider();
        self.report(
            SlackClient::from_config(&self.config.slack, tokens.as_ref()),
            Some("Failed to get authentication token"),
        )
    }

    /// Surface a failure to the user and hand it back to the caller
    fn report<T>(&self, result: missive_core::Result<T>, title: Option<&str>) -> anyhow::Result<T> {
        result.map_err(|e| {
            let title = title.unwrap_or(e.title());
            self.notifier.failure(title, Some(&e.to_string()));
            anyhow::Error::new(e).context(title.to_string())
        })
    }

    pub async fn send(&self, api: &dyn SlackApi, name: &str) -> anyhow::Result<()> {
        let template = self.report(self.store.get(name), None)?;
        let posted = self.report(send_template(api, &template).await, Some("Failed to send message"))?;

        debug!("Posted ts {}", posted.ts);
        self.notifier.success(
            "Message sent successfully",
            Some(&format!("#{}", template.channel_name)),
        );
        Ok(())
    }

    pub async fn post(
        &self,
        api: &dyn SlackApi,
        channel: &str,
        thread: Option<&str>,
        message: &str,
    ) -> anyhow::Result<()> {
        if message.trim().is_empty() {
            return self.report(
                Err(MissiveError::Validation("Please enter a message".to_string())),
                None,
            );
        }

        self.report(
            send_message(api, channel, message, thread).await,
            Some("Failed to send message"),
        )?;
        self.notifier.success("Message sent successfully", None);
        Ok(())
    }

    pub async fn channels(&self, api: &dyn SlackApi) -> anyhow::Result<()> {
        let channels = self.report(
            fetch_all_channels(api).await,
            Some("Failed to fetch channel list"),
        )?;
        for channel in channels {
            println!("{}\t#{}", channel.id, channel.name);
        }
        Ok(())
    }

    /// Stored templates; a load failure is reported and treated as an empty list
    pub fn load_templates(&self) -> Vec<Template> {
        match self.store.load() {
            Ok(templates) => templates,
            Err(e) => {
                warn!("Failed to load templates: {}", e);
                self.notifier
                    .failure("Failed to load templates", Some(&e.to_string()));
                Vec::new()
            }
        }
    }

    pub fn list_templates(&self) -> anyhow::Result<()> {
        let templates = self.load_templates();
        if templates.is_empty() {
            self.notifier.success("No templates saved", None);
            return Ok(());
        }

        for template in templates {
            println!("{}", template_line(&template));
        }
        Ok(())
    }

    pub fn show_template(&self, name: &str) -> anyhow::Result<()> {
        let template = self.report(self.store.get(name), None)?;
        let json = serde_json::to_string_pretty(&template).context("Failed to format template")?;
        println!("{}", json);
        Ok(())
    }

    pub async fn create_template(
        &self,
        api: &dyn SlackApi,
        name: &str,
        channel: &str,
        thread: Option<&str>,
        content: &str,
    ) -> anyhow::Result<()> {
        let title = Some("Failed to create template");
        self.report(require_fields(name, content, channel), title)?;

        let thread_timestamp = match thread {
            Some(raw) => self.report(validate_and_normalize_thread_ts(raw, channel, api).await, title)?,
            None => None,
        };
        let channel = self.report(resolve_channel(api, channel).await, title)?;

        let template =
            Template::new(name, content, channel.id, channel.name).with_thread(thread_timestamp);
        let created = self.report(self.store.create(template), title)?;

        self.notifier.success(
            "Template created successfully",
            Some(&format!("{} → #{}", created.name, created.channel_name)),
        );
        Ok(())
    }

    pub async fn edit_template(
        &self,
        api: &dyn SlackApi,
        original_name: &str,
        changes: TemplateChanges,
    ) -> anyhow::Result<()> {
        let title = Some("Failed to update template");
        let current = self.report(self.store.get(original_name), title)?;

        let mut updated = current.clone();
        if let Some(name) = changes.name {
            updated.name = name;
        }
        if let Some(content) = changes.content {
            updated.content = content;
        }
        let channel_changed = match changes.channel {
            Some(channel) if channel.trim() != current.channel_id => {
                let channel = self.report(resolve_channel(api, channel.trim()).await, title)?;
                updated.channel_id = channel.id;
                updated.channel_name = channel.name;
                true
            }
            _ => false,
        };
        self.report(
            require_fields(&updated.name, &updated.content, &updated.channel_id),
            title,
        )?;

        // A thread only exists in one channel, so moving channels re-checks it
        updated.thread_timestamp = if changes.clear_thread {
            None
        } else if let Some(raw) = changes.thread {
            self.report(
                validate_and_normalize_thread_ts(&raw, &updated.channel_id, api).await,
                Some("Invalid thread"),
            )?
        } else if let (true, Some(ts)) = (channel_changed, current.thread_timestamp.as_deref()) {
            self.report(
                validate_and_normalize_thread_ts(ts, &updated.channel_id, api).await,
                Some("Invalid thread"),
            )?
        } else {
            current.thread_timestamp.clone()
        };

        self.report(self.store.update(updated, original_name), title)?;
        self.notifier.success("Template updated successfully", None);
        Ok(())
    }

    pub fn delete_template(&self, name: &str) -> anyhow::Result<()> {
        let remaining = self.report(self.store.delete(name), Some("Failed to delete template"))?;
        self.notifier.success(
            "Template deleted successfully",
            Some(&format!("{} templates left", remaining.len())),
        );
        Ok(())
    }

    pub fn import(&self, path: Option<&Path>, overwrite: bool) -> anyhow::Result<()> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_transfer_path);
        let policy = ConflictPolicy::from_overwrite(overwrite);

        let report = self.report(
            import_templates(&self.store, &path, policy),
            Some("Import failed"),
        )?;
        self.notifier.success(
            "Import successful",
            Some(&format!(
                "Imported {} templates ({} total)",
                report.imported, report.total
            )),
        );
        Ok(())
    }

    pub async fn export(&self, path: Option<&Path>, force: bool, reveal: bool) -> anyhow::Result<()> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_transfer_path);

        let count = self.report(
            export_templates(&self.store, &path, force),
            Some("Export failed"),
        )?;
        self.notifier.success(
            "Export successful",
            Some(&format!("Exported {} templates to {}", count, path.display())),
        );

        if reveal {
            reveal_in_file_browser(&path).await;
        }
        Ok(())
    }

    pub fn normalize(&self, raw: &str) -> anyhow::Result<()> {
        match self.report(normalize_thread_ts(raw), None)? {
            Some(ts) => println!("{}", ts),
            None => self.notifier.success("No thread timestamp given", None),
        }
        Ok(())
    }
}

fn require_fields(name: &str, content: &str, channel: &str) -> missive_core::Result<()> {
    if name.trim().is_empty() {
        return Err(MissiveError::Validation("Please enter a template name".to_string()));
    }
    if content.trim().is_empty() {
        return Err(MissiveError::Validation("Please enter a message".to_string()));
    }
    if channel.trim().is_empty() {
        return Err(MissiveError::Validation("Please select a channel".to_string()));
    }
    Ok(())
}

/// `name  #channel (Thread)  preview`
pub fn template_line(template: &Template) -> String {
    let thread = if template.thread_timestamp.is_some() {
        " (Thread)"
    } else {
        ""
    };
    format!(
        "{}\t#{}{}\t{}",
        template.name,
        template.channel_name,
        thread,
        template.preview().replace('\n', " ")
    )
}

async fn reveal_in_file_browser(path: &Path) {
    let folder: PathBuf = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let result = tokio::task::spawn_blocking(move || open::that(&folder)).await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to open folder: {}", e),
        Err(e) => warn!("Failed to open folder: {}", e),
    }
}
