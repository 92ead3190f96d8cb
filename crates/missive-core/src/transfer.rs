//! Import and export of template files

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{MissiveError, Result};
use crate::merge::{ConflictPolicy, merge_templates};
use crate::store::{TEMPLATES_FILENAME, TemplateStore, validate};
use crate::types::Template;

/// `<Downloads>/slack-templates.json`, falling back to `~/Downloads`
pub fn default_transfer_path() -> PathBuf {
    let downloads = dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"));
    downloads.join(TEMPLATES_FILENAME)
}

/// Read and validate a template file written by `export` (or by hand)
pub fn read_templates_file(path: &Path) -> Result<Vec<Template>> {
    if path.as_os_str().is_empty() {
        return Err(MissiveError::Validation("Please enter a file path".to_string()));
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(MissiveError::Validation("Please select a JSON file".to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let templates: Vec<Template> = serde_json::from_value(value).map_err(|e| {
        warn!("Rejected template file {:?}: {}", path, e);
        invalid_format()
    })?;

    let mut names = HashSet::new();
    templates
        .into_iter()
        .map(|template| {
            let template = validate(template).map_err(|e| {
                warn!("Rejected template file {:?}: {}", path, e);
                invalid_format()
            })?;
            if !names.insert(template.name.clone()) {
                warn!("Rejected template file {:?}: duplicate name '{}'", path, template.name);
                return Err(invalid_format());
            }
            Ok(template)
        })
        .collect()
}

fn invalid_format() -> MissiveError {
    MissiveError::Validation("Invalid template format".to_string())
}

pub fn write_templates_file(path: &Path, templates: &[Template]) -> Result<()> {
    let json = serde_json::to_string_pretty(templates)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Templates found in the file
    pub imported: usize,
    /// Templates in the store after merging
    pub total: usize,
}

/// Merge a template file into the store
pub fn import_templates(
    store: &TemplateStore,
    path: &Path,
    policy: ConflictPolicy,
) -> Result<ImportReport> {
    let imported = read_templates_file(path)?;
    let existing = store.load()?;
    let count = imported.len();

    let merged = merge_templates(imported, existing, policy);
    store.save(&merged)?;

    info!("Imported {} templates from {:?} ({:?})", count, path, policy);
    Ok(ImportReport {
        imported: count,
        total: merged.len(),
    })
}

/// Write the whole store to `path`; refuses to replace a file unless `force`
pub fn export_templates(store: &TemplateStore, path: &Path, force: bool) -> Result<usize> {
    if path.exists() && !force {
        return Err(MissiveError::FileExists(path.display().to_string()));
    }

    let templates = store.load()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_templates_file(path, &templates)?;

    info!("Exported {} templates to {:?}", templates.len(), path);
    Ok(templates.len())
}
