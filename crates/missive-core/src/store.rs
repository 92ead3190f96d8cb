//! JSON file storage for templates
//!
//! The whole collection is read and rewritten on every operation. There is no
//! locking: one user, one process.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MissiveError, Result};
use crate::types::Template;

/// File name used for the template collection
pub const TEMPLATES_FILENAME: &str = "slack-templates.json";

pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every template; a missing file is an empty collection
    pub fn load(&self) -> Result<Vec<Template>> {
        debug!("Loading templates from {:?}", self.path);

        if !self.path.exists() {
            debug!("Template file does not exist at {:?}, returning empty list", self.path);
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let templates: Vec<Template> = serde_json::from_str(&content)?;
        debug!("Loaded {} templates", templates.len());
        Ok(templates)
    }

    /// Replace the stored collection
    pub fn save(&self, templates: &[Template]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(templates)?;
        std::fs::write(&self.path, json)?;

        info!("Saved {} templates to {:?}", templates.len(), self.path);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Template> {
        self.load()?
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| MissiveError::TemplateNotFound(name.to_string()))
    }

    /// Add a new template; names must be unique
    pub fn create(&self, template: Template) -> Result<Template> {
        let template = validate(template)?;
        let mut templates = self.load()?;

        if templates.iter().any(|t| t.name == template.name) {
            return Err(MissiveError::DuplicateName(template.name));
        }

        templates.push(template.clone());
        self.save(&templates)?;
        info!("Created template '{}'", template.name);
        Ok(template)
    }

    /// Replace the template called `original_name` wholesale, keeping its position
    pub fn update(&self, template: Template, original_name: &str) -> Result<Template> {
        let template = validate(template)?;
        let mut templates = self.load()?;

        let index = templates
            .iter()
            .position(|t| t.name == original_name)
            .ok_or_else(|| MissiveError::TemplateNotFound(original_name.to_string()))?;

        if template.name != original_name && templates.iter().any(|t| t.name == template.name) {
            return Err(MissiveError::DuplicateName(template.name));
        }

        templates[index] = template.clone();
        self.save(&templates)?;
        info!("Updated template '{}'", original_name);
        Ok(template)
    }

    /// Remove a template and return what is left
    pub fn delete(&self, name: &str) -> Result<Vec<Template>> {
        let templates = self.load()?;
        let before = templates.len();
        let remaining: Vec<Template> = templates.into_iter().filter(|t| t.name != name).collect();

        if remaining.len() == before {
            return Err(MissiveError::TemplateNotFound(name.to_string()));
        }

        self.save(&remaining)?;
        info!("Deleted template '{}'", name);
        Ok(remaining)
    }
}

pub(crate) fn validate(mut template: Template) -> Result<Template> {
    template.name = template.name.trim().to_string();
    template.content = template.content.trim().to_string();
    template.channel_id = template.channel_id.trim().to_string();

    if template.name.is_empty() {
        return Err(MissiveError::Validation("Template name is required".to_string()));
    }
    if template.content.is_empty() {
        return Err(MissiveError::Validation("Message content is required".to_string()));
    }
    if template.channel_id.is_empty() {
        return Err(MissiveError::Validation("Channel selection is required".to_string()));
    }
    Ok(template)
}
