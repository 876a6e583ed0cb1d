//! Sectioned settings-file provider
//!
//! Values live under a named `[section]` of a TOML file as key/value pairs.
//! The framework writes quoted strings, but reads accept any scalar value so
//! hand edits in idiomatic TOML (`MaxItems = 15`, unquoted) load the same as
//! framework-written ones. Writes are in-place edits of the parsed document:
//! unrelated sections, keys, comments, and formatting are preserved, and only
//! the keys
//! belonging to the written map are rewritten. Concurrent writers to the same
//! file are not coordinated; last write wins.

use crate::error::{Error, Result};
use crate::map::PersistedMap;
use crate::provider::{read_if_exists, write_atomic, ConfigurationProvider};
use log::{debug, warn};
use std::path::PathBuf;
use toml_edit::DocumentMut;

/// Provider storing the map under one section of a shared settings file
pub struct FileSectionProvider {
    path: PathBuf,
    section: String,
}

impl FileSectionProvider {
    /// Create a provider for `section` within the file at `path`.
    ///
    /// Neither the file nor the section needs to exist yet; both are created
    /// on the first write.
    pub fn new(path: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            section: section.into(),
        }
    }

    /// Target file path
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<DocumentMut> {
        content.parse::<DocumentMut>().map_err(|e| Error::SectionFile {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Textual form of a scalar TOML value; booleans get their canonical
/// stored casing. `None` for arrays and inline tables, which have no flat
/// field counterpart.
fn value_text(value: &toml_edit::Value) -> Option<String> {
    match value {
        toml_edit::Value::String(s) => Some(s.value().clone()),
        toml_edit::Value::Integer(n) => Some(n.value().to_string()),
        toml_edit::Value::Float(f) => Some(f.value().to_string()),
        toml_edit::Value::Boolean(b) => Some(if *b.value() { "True" } else { "False" }.into()),
        toml_edit::Value::Datetime(d) => Some(d.value().to_string()),
        _ => None,
    }
}

impl ConfigurationProvider for FileSectionProvider {
    fn read(&self) -> Result<PersistedMap> {
        let Some(content) = read_if_exists(&self.path)? else {
            debug!("Settings file {} missing; empty read", self.path.display());
            return Ok(PersistedMap::new());
        };

        let doc = self.parse(&content)?;
        let mut map = PersistedMap::new();

        let Some(table) = doc.get(&self.section).and_then(|item| item.as_table()) else {
            debug!("Section [{}] missing; empty read", self.section);
            return Ok(map);
        };

        for (key, item) in table.iter() {
            match item.as_value().and_then(value_text) {
                Some(value) => map.insert(key, value),
                None => warn!(
                    "Skipping non-scalar entry '{key}' in section [{}]",
                    self.section
                ),
            }
        }

        debug!(
            "Read {} entries from [{}] in {}",
            map.len(),
            self.section,
            self.path.display()
        );
        Ok(map)
    }

    fn write(&self, map: &PersistedMap) -> Result<()> {
        let mut doc = match read_if_exists(&self.path)? {
            Some(content) => self.parse(&content)?,
            None => DocumentMut::new(),
        };

        let item = doc
            .entry(&self.section)
            .or_insert(toml_edit::table());
        let Some(table) = item.as_table_mut() else {
            return Err(Error::SectionFile {
                path: self.path.clone(),
                reason: format!("'{}' exists but is not a table", self.section),
            });
        };
        table.set_implicit(false);

        // Rewrite only the keys this map owns; foreign keys in the section
        // and every other part of the document keep their formatting.
        for (key, value) in map.iter() {
            table.insert(key, toml_edit::value(value));
        }

        write_atomic(&self.path, &doc.to_string())?;
        debug!(
            "Wrote {} entries to [{}] in {}",
            map.len(),
            self.section,
            self.path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file_section"
    }
}

// =============================================================================
// Tests
// =============================================================================
