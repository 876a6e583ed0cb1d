//! SQLite table backend integration tests

mod common;

use appconf::{AppConfiguration, SqlTableProvider};
use common::{changed_settings, AppSettings, TestFixture, ENCRYPTION_KEY};

fn provider(fixture: &TestFixture, key: i64) -> SqlTableProvider {
    SqlTableProvider::new(fixture.path("app.db"), "Configuration", key).unwrap()
}

#[test]
fn test_table_roundtrip() {
    let fixture = TestFixture::new();

    let mut writer = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();
    *writer.settings_mut() = changed_settings();
    writer.write().unwrap();

    let mut reader = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();
    let report = reader.read().unwrap();

    assert!(report.is_success());
    assert_eq!(*reader.settings(), changed_settings());
}

#[test]
fn test_missing_database_keeps_defaults() {
    let fixture = TestFixture::new();
    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();

    assert!(config.read().unwrap().is_success());
    assert_eq!(*config.settings(), AppSettings::default());
}

#[test]
fn test_repeated_write_updates_in_place() {
    let fixture = TestFixture::new();
    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();

    config.write().unwrap();
    config.settings_mut().application_name = "Second Write".into();
    config.write().unwrap();

    let mut reader = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();
    reader.read().unwrap();
    assert_eq!(reader.settings().application_name, "Second Write");
}

#[test]
fn test_distinct_keys_hold_distinct_configurations() {
    let fixture = TestFixture::new();

    let mut staging = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();
    staging.settings_mut().application_name = "Staging".into();
    staging.write().unwrap();

    let mut production = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 2))
        .build()
        .unwrap();
    production.settings_mut().application_name = "Production".into();
    production.write().unwrap();

    let mut check = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .build()
        .unwrap();
    check.read().unwrap();
    assert_eq!(check.settings().application_name, "Staging");
}

#[test]
fn test_encrypted_fields_opaque_in_row() {
    let fixture = TestFixture::new();

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .encrypt_fields(["ConnectionString", "MailServerPassword"], ENCRYPTION_KEY)
        .build()
        .unwrap();
    *config.settings_mut() = changed_settings();
    config.write().unwrap();

    // Reading through the provider exposes the raw stored map, pre-decryption
    use appconf::ConfigurationProvider;
    let raw = provider(&fixture, 1).read().unwrap();
    assert_ne!(raw.get("MailServerPassword"), Some("hunter2"));
    assert_ne!(
        raw.get("ConnectionString"),
        Some("server=db.example.com;database=prod")
    );

    let mut reader = AppConfiguration::<AppSettings>::builder()
        .provider(provider(&fixture, 1))
        .encrypt_fields(["ConnectionString", "MailServerPassword"], ENCRYPTION_KEY)
        .build()
        .unwrap();
    reader.read().unwrap();
    assert_eq!(*reader.settings(), changed_settings());
}
