//! In-memory string provider
//!
//! The backend is a caller-supplied string: read parses it, write produces
//! the serialized text and keeps it for the caller to fetch with [`text`].
//! Persistence responsibility stays with the caller - typical uses are a
//! session store or any transport that carries opaque strings.
//!
//! [`text`]: StringBlobProvider::text

use crate::error::{Error, Result};
use crate::map::PersistedMap;
use crate::provider::ConfigurationProvider;
use log::debug;
use std::sync::Mutex;

/// Provider round-tripping the map through a caller-owned string
#[derive(Default)]
pub struct StringBlobProvider {
    // Mutex only to satisfy the shared-reference write contract; there is no
    // cross-instance coordination.
    text: Mutex<String>,
}

impl StringBlobProvider {
    /// Create an empty provider; the first read yields an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider over previously serialized text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
        }
    }

    /// The current serialized text, as produced by the last write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if a writer panicked mid-operation.
    pub fn text(&self) -> Result<String> {
        Ok(self.text.lock().map_err(|_| Error::LockPoisoned)?.clone())
    }

    /// Replace the stored text, e.g. with a string received from transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if a writer panicked mid-operation.
    pub fn set_text(&self, text: impl Into<String>) -> Result<()> {
        *self.text.lock().map_err(|_| Error::LockPoisoned)? = text.into();
        Ok(())
    }
}

impl ConfigurationProvider for StringBlobProvider {
    fn read(&self) -> Result<PersistedMap> {
        let text = self.text()?;
        if text.trim().is_empty() {
            return Ok(PersistedMap::new());
        }
        let map = PersistedMap::from_json(&text)?;
        debug!("Read {} entries from string blob", map.len());
        Ok(map)
    }

    fn write(&self, map: &PersistedMap) -> Result<()> {
        let serialized = map.to_json()?;
        self.set_text(serialized)?;
        debug!("Serialized {} entries to string blob", map.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "string_blob"
    }
}

// =============================================================================
// Tests
// =============================================================================
