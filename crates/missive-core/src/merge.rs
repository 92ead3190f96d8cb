//! Merge imported templates into an existing collection

use std::collections::HashSet;

use crate::types::Template;

/// Which side wins when both lists contain the same template name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Imported entries replace existing ones
    PreferImported,
    /// Existing entries are kept; colliding imports are dropped
    #[default]
    PreferExisting,
}

impl ConflictPolicy {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            Self::PreferImported
        } else {
            Self::PreferExisting
        }
    }
}

/// Merge by name. Untouched existing entries always come first, in their
/// original order, followed by the imported entries that survived.
pub fn merge_templates(
    imported: Vec<Template>,
    existing: Vec<Template>,
    policy: ConflictPolicy,
) -> Vec<Template> {
    match policy {
        ConflictPolicy::PreferImported => {
            let imported_names: HashSet<&str> = imported.iter().map(|t| t.name.as_str()).collect();
            let mut merged: Vec<Template> = existing
                .into_iter()
                .filter(|t| !imported_names.contains(t.name.as_str()))
                .collect();
            merged.extend(imported);
            merged
        }
        ConflictPolicy::PreferExisting => {
            let existing_names: HashSet<String> = existing.iter().map(|t| t.name.clone()).collect();
            let mut merged = existing;
            merged.extend(
                imported
                    .into_iter()
                    .filter(|t| !existing_names.contains(&t.name)),
            );
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, content: &str) -> Template {
        Template::new(name, content, "C1", "general")
    }

    #[test]
    fn test_prefer_imported() {
        let imported = vec![template("A", "imported")];
        let existing = vec![template("A", "existing"), template("B", "existing")];

        let merged = merge_templates(imported, existing, ConflictPolicy::PreferImported);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "B");
        assert_eq!(merged[1].name, "A");
        assert_eq!(merged[1].content, "imported");
    }

    #[test]
    fn test_prefer_existing() {
        let imported = vec![template("A", "imported")];
        let existing = vec![template("A", "existing"), template("B", "existing")];

        let merged = merge_templates(imported, existing, ConflictPolicy::PreferExisting);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "A");
        assert_eq!(merged[0].content, "existing");
        assert_eq!(merged[1].name, "B");
    }

    #[test]
    fn test_new_names_are_appended() {
        let imported = vec![template("C", "new"), template("A", "imported")];
        let existing = vec![template("A", "existing")];

        let keep = merge_templates(imported.clone(), existing.clone(), ConflictPolicy::PreferExisting);
        let names: Vec<&str> = keep.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);

        let replace = merge_templates(imported, existing, ConflictPolicy::PreferImported);
        let names: Vec<&str> = replace.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
    }

    #[test]
    fn test_from_overwrite() {
        assert_eq!(ConflictPolicy::from_overwrite(true), ConflictPolicy::PreferImported);
        assert_eq!(ConflictPolicy::from_overwrite(false), ConflictPolicy::PreferExisting);
    }
}
