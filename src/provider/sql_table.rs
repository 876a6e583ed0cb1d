//! Relational-table provider backed by SQLite
//!
//! The whole serialized map lives in a single text column of one row,
//! addressed by an integer primary-key value in a caller-named table - not
//! one column per field. Writes are upserts: the table is created if absent,
//! the row inserted or updated in place. Concurrent writers to the same key
//! race with last-write-wins, SQLite's native semantics.

use crate::error::{Error, Result};
use crate::map::PersistedMap;
use crate::provider::ConfigurationProvider;
use log::debug;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};

const PK_COLUMN: &str = "id";
const DATA_COLUMN: &str = "config_data";

/// Provider storing the map as one row of a SQLite table
pub struct SqlTableProvider {
    path: PathBuf,
    table: String,
    key: i64,
}

impl SqlTableProvider {
    /// Create a provider for the database file at `path`, using `table` and
    /// the row identified by `key`. Database, table, and row are all created
    /// on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `table` is not a plain identifier; the
    /// name is interpolated into SQL and must not carry quoting or
    /// punctuation.
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>, key: i64) -> Result<Self> {
        let table = table.into();
        let valid = !table.is_empty()
            && !table.starts_with(|c: char| c.is_ascii_digit())
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(Error::Config(format!("Invalid table name '{table}'")));
        }

        Ok(Self {
            path: path.into(),
            table,
            key,
        })
    }

    /// Database file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigurationProvider for SqlTableProvider {
    fn read(&self) -> Result<PersistedMap> {
        if !self.path.exists() {
            debug!("Database {} missing; empty read", self.path.display());
            return Ok(PersistedMap::new());
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [self.table.as_str()],
            |row| row.get(0),
        )?;
        if !table_exists {
            debug!("Table {} missing; empty read", self.table);
            return Ok(PersistedMap::new());
        }

        let blob: Option<String> = conn
            .query_row(
                &format!(
                    "SELECT {DATA_COLUMN} FROM {} WHERE {PK_COLUMN} = ?1",
                    self.table
                ),
                params![self.key],
                |row| row.get(0),
            )
            .optional()?;

        match blob {
            Some(text) => {
                let map = PersistedMap::from_json(&text)?;
                debug!(
                    "Read {} entries from {}[{}]",
                    map.len(),
                    self.table,
                    self.key
                );
                Ok(map)
            }
            None => {
                debug!("Row {} missing in {}; empty read", self.key, self.table);
                Ok(PersistedMap::new())
            }
        }
    }

    fn write(&self, map: &PersistedMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(&self.path)?;

        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({PK_COLUMN} INTEGER PRIMARY KEY, {DATA_COLUMN} TEXT NOT NULL)",
                self.table
            ),
            [],
        )?;

        let text = map.to_json()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({PK_COLUMN}, {DATA_COLUMN}) VALUES (?1, ?2) \
                 ON CONFLICT({PK_COLUMN}) DO UPDATE SET {DATA_COLUMN} = excluded.{DATA_COLUMN}",
                self.table
            ),
            params![self.key, text],
        )?;

        debug!(
            "Wrote {} entries to {}[{}]",
            map.len(),
            self.table,
            self.key
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sql_table"
    }
}

// =============================================================================
// Tests
// =============================================================================
