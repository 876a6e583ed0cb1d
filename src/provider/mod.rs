//! Configuration providers - the pluggable persistence backends
//!
//! A provider reads a backend into a [`PersistedMap`] and writes a map back.
//! Common policy across all variants: reading a backend, section, or table
//! that does not exist yet yields an empty map (first-run bootstrap), and the
//! first write creates it.

use crate::error::{Error, Result};
use crate::map::PersistedMap;
use std::path::Path;

mod file_section;
mod string_blob;

#[cfg(feature = "sqlite")]
mod sql_table;
#[cfg(feature = "xml")]
mod xml_file;

pub use file_section::FileSectionProvider;
pub use string_blob::StringBlobProvider;

#[cfg(feature = "sqlite")]
pub use sql_table::SqlTableProvider;
#[cfg(feature = "xml")]
pub use xml_file::XmlFileProvider;

/// Read/write contract implemented once per backend kind
pub trait ConfigurationProvider: Send {
    /// Read the backend into a fresh map.
    ///
    /// A missing file, section, table, or row is empty state, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when the backend exists but cannot be read (permissions,
    /// malformed content, unreachable database).
    fn read(&self) -> Result<PersistedMap>;

    /// Persist the map, creating the backend on first use.
    ///
    /// # Errors
    ///
    /// Fails when the backend cannot be written.
    fn write(&self, map: &PersistedMap) -> Result<()>;

    /// Short backend name, used in log output
    fn name(&self) -> &'static str;
}

/// Write file content atomically: temp file in the same directory, then
/// rename over the target. A crash mid-write leaves the old file intact.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let file_name = path.file_name().ok_or_else(|| {
        Error::Config(format!(
            "Invalid path '{}': must have a filename",
            path.display()
        ))
    })?;
    let mut temp_filename = file_name.to_os_string();
    temp_filename.push(".tmp");
    let temp_path = path.with_file_name(temp_filename);

    std::fs::write(&temp_path, content).map_err(|e| Error::FileWrite {
        path: temp_path.clone(),
        source: e,
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a file to string, mapping a missing file to `None`.
pub(crate) fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        }),
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
    fn test_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/file.txt");

        write_atomic(&path, "content").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
        // No temp file left behind
        assert!(!path.with_file_name("file.txt.tmp").exists());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_read_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");

        assert!(read_if_exists(&path).unwrap().is_none());

        std::fs::write(&path, "data").unwrap();
        assert_eq!(read_if_exists(&path).unwrap().as_deref(), Some("data"));
    }
}
