//! External XML-document provider
//!
//! The backend is a standalone document holding the whole serialized map: one
//! child element per field under a configurable root. Writes replace the file
//! atomically (write-to-temp, then rename) so a crash never leaves a
//! truncated document; a missing file reads as empty.

use crate::error::{Error, Result};
use crate::map::PersistedMap;
use crate::provider::{read_if_exists, write_atomic, ConfigurationProvider};
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};

const DEFAULT_ROOT: &str = "configuration";

/// Provider storing the map as a standalone XML document
pub struct XmlFileProvider {
    path: PathBuf,
    root: String,
}

impl XmlFileProvider {
    /// Create a provider for the document at `path` with the default
    /// `<configuration>` root element.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: DEFAULT_ROOT.into(),
        }
    }

    /// Use a custom root element name.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Target document path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn xml_error(&self, reason: impl std::fmt::Display) -> Error {
        Error::Xml {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn parse(&self, content: &str) -> Result<PersistedMap> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut map = PersistedMap::new();
        let mut depth = 0usize;
        let mut current: Option<String> = None;
        let mut text: Option<String> = None;

        loop {
            match reader.read_event().map_err(|e| self.xml_error(e))? {
                Event::Start(e) => {
                    depth += 1;
                    if depth == 2 {
                        let name = std::str::from_utf8(e.local_name().as_ref())
                            .map_err(|e| self.xml_error(e))?
                            .to_string();
                        current = Some(name);
                        text = None;
                    }
                }
                Event::Text(e) => {
                    if depth == 2 {
                        let value = e.unescape().map_err(|e| self.xml_error(e))?;
                        text = Some(value.into_owned());
                    }
                }
                Event::Empty(e) => {
                    if depth == 1 {
                        let name = std::str::from_utf8(e.local_name().as_ref())
                            .map_err(|e| self.xml_error(e))?
                            .to_string();
                        map.insert(name, "");
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(name) = current.take() {
                            map.insert(name, text.take().unwrap_or_default());
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(map)
    }

    fn render(&self, map: &PersistedMap) -> Result<String> {
        let mut buf = Vec::new();
        let mut writer = Writer::new_with_indent(&mut buf, b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| self.xml_error(e))?;
        writer
            .write_event(Event::Start(BytesStart::new(self.root.as_str())))
            .map_err(|e| self.xml_error(e))?;

        for (key, value) in map.iter() {
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(|e| self.xml_error(e))?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(|e| self.xml_error(e))?;
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(|e| self.xml_error(e))?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.root.as_str())))
            .map_err(|e| self.xml_error(e))?;

        String::from_utf8(buf).map_err(|e| self.xml_error(e))
    }
}

impl ConfigurationProvider for XmlFileProvider {
    fn read(&self) -> Result<PersistedMap> {
        let Some(content) = read_if_exists(&self.path)? else {
            debug!("XML document {} missing; empty read", self.path.display());
            return Ok(PersistedMap::new());
        };

        let map = self.parse(&content)?;
        debug!(
            "Read {} entries from XML document {}",
            map.len(),
            self.path.display()
        );
        Ok(map)
    }

    fn write(&self, map: &PersistedMap) -> Result<()> {
        let content = self.render(map)?;
        write_atomic(&self.path, &content)?;
        debug!(
            "Wrote {} entries to XML document {}",
            map.len(),
            self.path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "xml_file"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let provider = XmlFileProvider::new(dir.path().join("config.xml"));

        assert!(provider.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let provider = XmlFileProvider::new(dir.path().join("config.xml"));

        let mut map = PersistedMap::new();
        map.insert("ApplicationName", "Sample");
        map.insert("MaxDisplayListItems", "12");
        provider.write(&map).unwrap();

        assert_eq!(provider.read().unwrap(), map);
    }

    #[test]
    fn test_special_characters_escaped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        let provider = XmlFileProvider::new(&path);

        let mut map = PersistedMap::new();
        map.insert("ConnectionString", "server=<db>&user='a'");
        provider.write(&map).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("server=<db>"));

        let loaded = provider.read().unwrap();
        assert_eq!(loaded.get("ConnectionString"), Some("server=<db>&user='a'"));
    }

    #[test]
    fn test_empty_value_roundtrip() {
        let dir = tempdir().unwrap();
        let provider = XmlFileProvider::new(dir.path().join("config.xml"));

        let mut map = PersistedMap::new();
        map.insert("MailCc", "");
        map.insert("MailServer", "smtp.example.com");
        provider.write(&map).unwrap();

        let loaded = provider.read().unwrap();
        assert_eq!(loaded.get("MailCc"), Some(""));
        assert_eq!(loaded.get("MailServer"), Some("smtp.example.com"));
    }

    #[test]
    fn test_custom_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        let provider = XmlFileProvider::new(&path).with_root("ApplicationConfiguration");

        let mut map = PersistedMap::new();
        map.insert("DebugMode", "Default");
        provider.write(&map).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("<ApplicationConfiguration>"));
        assert_eq!(provider.read().unwrap(), map);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.xml");
        std::fs::write(&path, "<configuration><a>1</b></configuration>").unwrap();

        let provider = XmlFileProvider::new(&path);
        assert!(matches!(provider.read(), Err(Error::Xml { .. })));
    }
}
