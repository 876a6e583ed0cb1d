//! # appconf - Typed Application Configuration
//!
//! A configuration-persistence library: application settings are a
//! strongly-typed struct whose fields are read from, and written to, one of
//! several interchangeable storage backends, with selected fields encrypted
//! at rest.
//!
//! ## Features
//!
//! - **Typed settings**: declare fields once with [`config_model!`]; values
//!   round-trip through canonical text (invariant numbers, `True`/`False`,
//!   enum symbolic names, RFC 3339 dates)
//! - **Pluggable providers**: sectioned TOML file, standalone XML document
//!   (`xml` feature), SQLite table row (`sqlite` feature), or a plain string
//!   for transport
//! - **Per-field encryption**: designated fields are never persisted in
//!   clear text by any backend; ciphertext is deterministic under a fixed
//!   key, so unchanged values stay diff-stable
//! - **Forgiving reads**: missing files, sections, or tables read as empty
//!   state; a field that fails to parse is reported and skipped while the
//!   rest of the object loads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appconf::{config_enum, config_model, AppConfiguration, FileSectionProvider};
//!
//! config_enum! {
//!     pub enum DebugModes {
//!         Default,
//!         ApplicationErrorMessage,
//!         DeveloperErrorMessage,
//!     }
//! }
//!
//! #[derive(Debug, Default)]
//! pub struct AppSettings {
//!     pub application_name: String,
//!     pub max_display_list_items: i64,
//!     pub debug_mode: DebugModes,
//!     pub send_admin_email_confirmations: bool,
//!     pub connection_string: String,
//! }
//!
//! config_model! {
//!     AppSettings {
//!         "ApplicationName" => Text(application_name),
//!         "MaxDisplayListItems" => Integer(max_display_list_items),
//!         "DebugMode" => Enum(debug_mode),
//!         "SendAdminEmailConfirmations" => Boolean(send_admin_email_confirmations),
//!         "ConnectionString" => Text(connection_string),
//!     }
//! }
//!
//! # fn main() -> appconf::Result<()> {
//! let mut config = AppConfiguration::<AppSettings>::builder()
//!     .provider(FileSectionProvider::new("app.toml", "ApplicationConfiguration"))
//!     .encrypt_fields(["ConnectionString"], "machine-key")
//!     .build()?;
//!
//! // First run: nothing on disk yet, object keeps its defaults
//! config.read()?;
//!
//! config.settings_mut().max_display_list_items = 15;
//! config.write()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing a backend
//!
//! All providers implement [`ConfigurationProvider`] and are injected
//! explicitly:
//!
//! ```rust,no_run
//! # use appconf::*;
//! # #[derive(Debug, Default)] struct AppSettings { name: String }
//! # config_model! { AppSettings { "Name" => Text(name) } }
//! # fn main() -> appconf::Result<()> {
//! // Shared settings file, one section per concern
//! let file = FileSectionProvider::new("settings.toml", "App");
//!
//! // Standalone XML document, replaced atomically on write
//! #[cfg(feature = "xml")]
//! let xml = XmlFileProvider::new("Configuration.xml");
//!
//! // One row in a SQLite table, upserted in place
//! #[cfg(feature = "sqlite")]
//! let table = SqlTableProvider::new("app.db", "Configuration", 1)?;
//!
//! // Caller-owned string for session stores or other transports
//! let blob = StringBlobProvider::new();
//! # Ok(())
//! # }
//! ```
//!
//! For transports where the caller stores the text itself, use
//! [`AppConfiguration::write_to_string`] and
//! [`AppConfiguration::read_from_text`].

// Core modules
mod convert;
mod crypto;
mod error;
mod manager;
mod map;
mod model;

pub mod provider;

// Re-exports from core
pub use convert::{from_text, to_text, ConfigValue, FieldKind};
pub use crypto::FieldEncryptor;
pub use error::{Error, Result};
pub use manager::{AppConfiguration, AppConfigurationBuilder};
pub use map::PersistedMap;
pub use model::{
    apply_fields, extract_fields, ApplyReport, EnumField, FieldDescriptor, SettingsModel,
};

// Provider re-exports
pub use provider::{ConfigurationProvider, FileSectionProvider, StringBlobProvider};

#[cfg(feature = "sqlite")]
pub use provider::SqlTableProvider;
#[cfg(feature = "xml")]
pub use provider::XmlFileProvider;
