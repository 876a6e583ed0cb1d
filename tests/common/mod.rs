//! Common test utilities for appconf integration tests
//!
//! Provides the shared settings model and fixture helpers.

#![allow(dead_code)]

use appconf::{config_enum, config_model};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use time::macros::datetime;
use time::OffsetDateTime;

pub const SECTION: &str = "ApplicationConfiguration";
pub const ENCRYPTION_KEY: &str = "test-machine-key";

config_enum! {
    pub enum DebugModes {
        Default,
        ApplicationErrorMessage,
        DeveloperErrorMessage,
    }
}

/// A settings model covering every supported field kind, shaped after a
/// typical web-application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub application_name: String,
    pub max_display_list_items: i64,
    pub debug_mode: DebugModes,
    pub send_admin_email_confirmations: bool,
    pub price_markup: f64,
    pub license_renewal: OffsetDateTime,
    pub connection_string: String,
    pub mail_server_password: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            application_name: "Configuration Tests".into(),
            max_display_list_items: 12,
            debug_mode: DebugModes::Default,
            send_admin_email_confirmations: false,
            price_markup: 1.2,
            license_renewal: datetime!(2026-01-01 00:00:00 UTC),
            connection_string: "server=.;database=app;integrated security=true".into(),
            mail_server_password: "mail-secret".into(),
        }
    }
}

config_model! {
    AppSettings {
        "ApplicationName" => Text(application_name),
        "MaxDisplayListItems" => Integer(max_display_list_items),
        "DebugMode" => Enum(debug_mode),
        "SendAdminEmailConfirmations" => Boolean(send_admin_email_confirmations),
        "PriceMarkup" => Float(price_markup),
        "LicenseRenewal" => DateTime(license_renewal),
        "ConnectionString" => Text(connection_string),
        "MailServerPassword" => Text(mail_server_password),
    }
}

/// Temporary directory plus path helpers for backend files
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A settings object with every field changed away from its default
pub fn changed_settings() -> AppSettings {
    AppSettings {
        application_name: "Changed".into(),
        max_display_list_items: 15,
        debug_mode: DebugModes::DeveloperErrorMessage,
        send_admin_email_confirmations: true,
        price_markup: 2.5,
        license_renewal: datetime!(2027-06-15 08:30:00 UTC),
        connection_string: "server=db.example.com;database=prod".into(),
        mail_server_password: "hunter2".into(),
    }
}

/// Read a backend file's raw text
pub fn read_raw(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read backend file")
}
