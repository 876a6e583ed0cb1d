//! The configuration orchestrator
//!
//! [`AppConfiguration`] owns one typed settings object and one bound
//! provider, and drives the full pipeline: provider read → decrypt designated
//! fields → convert text → apply onto the object, and the inverse for writes.
//! Provider-level failures fail the call and set the last-error message;
//! per-field conversion or decryption failures are absorbed into the
//! [`ApplyReport`] so the object ends up as complete as the backend allows.

use crate::crypto::FieldEncryptor;
use crate::error::{Error, Result};
use crate::map::PersistedMap;
use crate::model::{apply_fields, extract_fields, ApplyReport, SettingsModel};
use crate::provider::ConfigurationProvider;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

/// Typed application configuration bound to a persistence provider.
///
/// # Example
///
/// ```rust,no_run
/// use appconf::{config_model, AppConfiguration, FileSectionProvider};
///
/// #[derive(Debug, Default)]
/// struct AppSettings {
///     application_name: String,
///     max_items: i64,
/// }
///
/// config_model! {
///     AppSettings {
///         "ApplicationName" => Text(application_name),
///         "MaxItems" => Integer(max_items),
///     }
/// }
///
/// # fn main() -> appconf::Result<()> {
/// let mut config = AppConfiguration::<AppSettings>::builder()
///     .provider(FileSectionProvider::new("app.toml", "Application"))
///     .build()?;
///
/// config.read()?;
/// config.settings_mut().max_items = 25;
/// config.write()?;
/// # Ok(())
/// # }
/// ```
pub struct AppConfiguration<T: SettingsModel> {
    settings: T,
    provider: Box<dyn ConfigurationProvider>,
    encryptor: Option<FieldEncryptor>,
    encrypted_fields: BTreeSet<String>,
    last_error: Option<String>,
}

impl<T: SettingsModel> fmt::Debug for AppConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfiguration")
            .field("provider", &self.provider.name())
            .field("encrypted_fields", &self.encrypted_fields)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl<T: SettingsModel> AppConfiguration<T> {
    /// Start building a configuration instance.
    #[must_use]
    pub fn builder() -> AppConfigurationBuilder<T> {
        AppConfigurationBuilder::new()
    }

    /// The live settings object, with encrypted fields in plain form.
    pub fn settings(&self) -> &T {
        &self.settings
    }

    /// Mutable access for staging values ahead of a `write`.
    pub fn settings_mut(&mut self) -> &mut T {
        &mut self.settings
    }

    /// Consume the instance, keeping the settings object.
    pub fn into_settings(self) -> T {
        self.settings
    }

    /// Message of the most recent failed operation; `None` after a success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Rebind the persistence provider. Settings values are untouched.
    pub fn bind_provider(&mut self, provider: impl ConfigurationProvider + 'static) {
        debug!("Rebinding provider to {}", provider.name());
        self.provider = Box::new(provider);
    }

    /// Load settings from the bound provider.
    ///
    /// Only fields present in the backend are overwritten; everything else
    /// keeps its current value. Per-field conversion and decryption failures
    /// are reported, not fatal.
    ///
    /// # Errors
    ///
    /// Fails when the provider itself cannot read the backend.
    pub fn read(&mut self) -> Result<ApplyReport> {
        match self.provider.read() {
            Ok(map) => {
                let report = self.apply_map(map);
                self.last_error = None;
                Ok(report)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Load settings from a caller-supplied serialized string, overriding
    /// the bound provider for this call.
    ///
    /// # Errors
    ///
    /// Fails when the text is not a valid serialized map.
    pub fn read_from_text(&mut self, raw: &str) -> Result<ApplyReport> {
        match PersistedMap::from_json(raw) {
            Ok(map) => {
                let report = self.apply_map(map);
                self.last_error = None;
                Ok(report)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Persist the current settings through the bound provider.
    ///
    /// # Errors
    ///
    /// Fails when a designated field cannot be encrypted or the backend
    /// cannot be written.
    pub fn write(&mut self) -> Result<()> {
        let outcome = self
            .export_map()
            .and_then(|map| self.provider.write(&map));
        match &outcome {
            Ok(()) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        outcome
    }

    /// Serialize the current settings to a self-contained string instead of
    /// a backend. Designated fields are encrypted exactly as they would be
    /// at rest.
    ///
    /// # Errors
    ///
    /// Fails when a designated field cannot be encrypted.
    pub fn write_to_string(&mut self) -> Result<String> {
        let outcome = self.export_map().and_then(|map| map.to_json());
        match &outcome {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        outcome
    }

    /// Decrypt designated entries, then fold the map onto the settings.
    fn apply_map(&mut self, mut map: PersistedMap) -> ApplyReport {
        let mut decrypt_errors = BTreeMap::new();

        if let Some(encryptor) = &self.encryptor {
            for name in &self.encrypted_fields {
                let stored = match map.get(name) {
                    Some(s) => s.to_string(),
                    None => continue,
                };
                match encryptor.decrypt(&stored) {
                    Ok(plain) => map.insert(name.clone(), plain),
                    Err(e) => {
                        // Field keeps its current in-memory value
                        warn!("Field '{name}' could not be decrypted: {e}");
                        map.remove(name);
                        decrypt_errors.insert(name.clone(), e.to_string());
                    }
                }
            }
        }

        let mut report = apply_fields(&mut self.settings, &map);
        report.field_errors.extend(decrypt_errors);
        report
    }

    /// Extract, convert, and encrypt the current settings into a map.
    fn export_map(&self) -> Result<PersistedMap> {
        let mut map = extract_fields(&self.settings);

        if let Some(encryptor) = &self.encryptor {
            for name in &self.encrypted_fields {
                let plain = match map.get(name) {
                    Some(s) => s.to_string(),
                    None => continue,
                };
                map.insert(name.clone(), encryptor.encrypt(&plain)?);
            }
        }

        Ok(map)
    }
}

/// Builder for [`AppConfiguration`].
///
/// A provider must be bound explicitly; the encrypted-field set is validated
/// against the settings type's declared fields, so a typo fails at build time
/// rather than silently persisting a secret in clear text.
pub struct AppConfigurationBuilder<T: SettingsModel> {
    provider: Option<Box<dyn ConfigurationProvider>>,
    encrypted_fields: BTreeSet<String>,
    encryption_key: Option<String>,
    _model: PhantomData<T>,
}

impl<T: SettingsModel> Default for AppConfigurationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SettingsModel> AppConfigurationBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            encrypted_fields: BTreeSet::new(),
            encryption_key: None,
            _model: PhantomData,
        }
    }

    /// Bind the persistence provider.
    #[must_use]
    pub fn provider(mut self, provider: impl ConfigurationProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Designate fields to encrypt at rest, with the key material to use.
    ///
    /// The key is caller-supplied; the framework never invents or stores one.
    #[must_use]
    pub fn encrypt_fields<I, S>(mut self, names: I, key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encrypted_fields
            .extend(names.into_iter().map(Into::into));
        self.encryption_key = Some(key.into());
        self
    }

    /// Build the configuration instance. Performs no I/O.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when no provider is bound,
    /// [`Error::UnknownEncryptedField`] when an encrypted name does not match
    /// any declared field.
    pub fn build(self) -> Result<AppConfiguration<T>> {
        let provider = self
            .provider
            .ok_or_else(|| Error::Config("No provider bound".into()))?;

        for name in &self.encrypted_fields {
            if !T::fields().iter().any(|f| f.name == name) {
                return Err(Error::UnknownEncryptedField(name.clone()));
            }
        }

        let encryptor = match (&self.encryption_key, self.encrypted_fields.is_empty()) {
            (Some(key), false) => Some(FieldEncryptor::new(key)),
            _ => None,
        };

        info!(
            "Initialized configuration on provider '{}' ({} encrypted fields)",
            provider.name(),
            self.encrypted_fields.len()
        );

        Ok(AppConfiguration {
            settings: T::default(),
            provider,
            encryptor,
            encrypted_fields: self.encrypted_fields,
            last_error: None,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
