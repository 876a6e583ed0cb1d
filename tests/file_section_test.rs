//! FileSection backend integration tests
//!
//! The sectioned settings file is the default backend and carries the
//! strictest write semantics: in-place section updates that leave the rest
//! of the file untouched.

mod common;

use appconf::{AppConfiguration, FileSectionProvider};
use common::{AppSettings, DebugModes, TestFixture, SECTION};

#[test]
fn test_written_entries_use_canonical_text() {
    let fixture = TestFixture::new();
    let path = fixture.path("app.toml");

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, SECTION))
        .build()
        .unwrap();
    config.settings_mut().max_display_list_items = 12;
    config.settings_mut().debug_mode = DebugModes::DeveloperErrorMessage;
    config.settings_mut().application_name = "Changed".into();
    config.settings_mut().send_admin_email_confirmations = true;
    config.write().unwrap();

    let text = common::read_raw(&path);
    assert!(text.contains(&format!("[{SECTION}]")));
    assert!(text.contains("MaxDisplayListItems = \"12\""));
    assert!(text.contains("DebugMode = \"DeveloperErrorMessage\""));
    assert!(text.contains("SendAdminEmailConfirmations = \"True\""));
    assert!(text.contains("ApplicationName = \"Changed\""));
}

#[test]
fn test_hand_edited_unquoted_values_are_applied() {
    let fixture = TestFixture::new();
    let path = fixture.path("app.toml");
    // An operator editing by hand writes idiomatic TOML, not quoted strings
    std::fs::write(
        &path,
        format!(
            "[{SECTION}]\n\
             MaxDisplayListItems = 15\n\
             SendAdminEmailConfirmations = true\n\
             PriceMarkup = 2.5\n"
        ),
    )
    .unwrap();

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, SECTION))
        .build()
        .unwrap();
    let report = config.read().unwrap();

    assert!(report.is_success());
    assert_eq!(config.settings().max_display_list_items, 15);
    assert!(config.settings().send_admin_email_confirmations);
    assert_eq!(config.settings().price_markup, 2.5);
}

#[test]
fn test_unrelated_sections_and_comments_survive() {
    let fixture = TestFixture::new();
    let path = fixture.path("app.toml");
    std::fs::write(
        &path,
        "# deployment notes, do not remove\n\
         [Logging]\n\
         level = \"info\"  # keep at info in prod\n\n",
    )
    .unwrap();

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, SECTION))
        .build()
        .unwrap();
    config.write().unwrap();

    let text = common::read_raw(&path);
    assert!(text.contains("# deployment notes, do not remove"));
    assert!(text.contains("level = \"info\"  # keep at info in prod"));
    assert!(text.contains(&format!("[{SECTION}]")));
}

#[test]
fn test_repeated_write_is_byte_identical() {
    let fixture = TestFixture::new();
    let path = fixture.path("app.toml");
    std::fs::write(
        &path,
        "# header\n[Logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, SECTION))
        .build()
        .unwrap();

    config.write().unwrap();
    let first = common::read_raw(&path);
    config.write().unwrap();
    let second = common::read_raw(&path);

    assert_eq!(first, second);
}

#[test]
fn test_two_sections_in_one_file_stay_independent() {
    let fixture = TestFixture::new();
    let path = fixture.path("app.toml");

    let mut first = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, "FirstApp"))
        .build()
        .unwrap();
    first.settings_mut().application_name = "First".into();
    first.write().unwrap();

    let mut second = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, "SecondApp"))
        .build()
        .unwrap();
    second.settings_mut().application_name = "Second".into();
    second.write().unwrap();

    let mut check_first = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, "FirstApp"))
        .build()
        .unwrap();
    check_first.read().unwrap();
    assert_eq!(check_first.settings().application_name, "First");

    let mut check_second = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, "SecondApp"))
        .build()
        .unwrap();
    check_second.read().unwrap();
    assert_eq!(check_second.settings().application_name, "Second");
}

#[test]
fn test_write_creates_missing_directories() {
    let fixture = TestFixture::new();
    let path = fixture.path("nested/config/app.toml");

    let mut config = AppConfiguration::<AppSettings>::builder()
        .provider(FileSectionProvider::new(&path, SECTION))
        .build()
        .unwrap();
    config.write().unwrap();

    assert!(path.exists());
}
