// tests/config_test.rs
use std::io::Write;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

use git_republish::config::{load_config, Config, RefNameCheck, LOCAL_CONFIG_FILE};

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.publish.branch_prefix, "republish");
    assert_eq!(config.publish.commit_message, "Republish package contents");
    assert!(!config.publish.keep_clone);
    assert_eq!(config.tags.version_pattern, "v{version}");
    assert!(!config.tags.annotated);
    assert_eq!(config.validation.ref_names, RefNameCheck::Git);
}

#[test]
fn test_load_fixture_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/republish.toml");
    let config = load_config(Some(path)).unwrap();

    assert_eq!(config.publish.branch_prefix, "ci-republish");
    assert_eq!(config.publish.work_dir(), PathBuf::from("/var/tmp/republish"));
    assert!(config.publish.keep_clone);
    assert_eq!(config.tags.version_pattern, "release-{version}");
    assert_eq!(config.tags.message_for("v2"), Some("Release v2".to_string()));
    assert_eq!(config.validation.ref_names, RefNameCheck::Native);
    assert_eq!(config.package.exclude, vec!["republish.toml", "docs"]);
}

#[test]
fn test_load_partial_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[tags]\nversion_pattern = \"{version}\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.tags.version_pattern, "{version}");
    assert_eq!(config.publish, Config::default().publish);
    assert_eq!(config.package, Config::default().package);
}

#[test]
fn test_invalid_toml_reports_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[publish\nkeep_clone = yes\n").unwrap();
    temp_file.flush().unwrap();

    let path = temp_file.path().to_str().unwrap().to_string();
    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains(&path), "got: {}", err);
}

#[test]
#[serial]
fn test_local_file_preferred_over_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(LOCAL_CONFIG_FILE),
        "[publish]\nbranch_prefix = \"local\"\n",
    )
    .unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(config.unwrap().publish.branch_prefix, "local");
}
