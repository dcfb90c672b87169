//! Integration tests for Configuration System

use super::test_utils::with_env;
use std::fs;
use tempfile::TempDir;
use yang_context::config::{ConfigLoader, ContextConfig};
use yang_context::{Context, ContextOptions, ErrorKind, ErrorStore};

#[test]
fn test_config_file_builds_context() {
    let temp_dir = TempDir::new().unwrap();
    let models = temp_dir.path().join("models");
    fs::create_dir(&models).unwrap();
    let config_file = temp_dir.path().join("context.toml");

    fs::write(
        &config_file,
        format!(
            r#"
search_dirs = ["{}"]
errors = "last"

[options]
all_implemented = true
disable_searchdir_cwd = true

[logging]
level = "debug"
"#,
            models.display()
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.errors, ErrorStore::Last);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "text");

    let ctx = Context::from_config(&config).unwrap();
    assert_eq!(
        ctx.options(),
        ContextOptions::ALL_IMPLEMENTED | ContextOptions::DISABLE_SEARCHDIR_CWD
    );
    assert_eq!(ctx.error_store(), ErrorStore::Last);
    assert_eq!(ctx.search_dirs(), &[dunce::canonicalize(&models).unwrap()]);
}

#[test]
fn test_config_with_missing_search_dir_fails_context() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("context.toml");
    fs::write(&config_file, "search_dirs = [\"/nonexistent/yang/models\"]\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let err = Context::from_config(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SystemAccess);
}

#[test]
fn test_invalid_logging_format_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("context.toml");
    fs::write(&config_file, "[logging]\nformat = \"xml\"\n").unwrap();

    let err = ConfigLoader::load_from_file(&config_file).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("Invalid log format"));
}

#[test]
fn test_missing_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_written_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("context.toml");

    let mut config = ContextConfig::default();
    config.search_dirs = vec![temp_dir.path().to_path_buf()];
    config.options.prefer_searchdirs = true;
    config.errors = ErrorStore::Off;
    fs::write(&config_file, config.to_toml().unwrap()).unwrap();

    let loaded = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_home = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("context.toml");
    fs::write(&config_file, "[options]\ntrusted = false\n").unwrap();

    let config = with_env(
        &config_home,
        &[
            ("YANG_CONTEXT__OPTIONS__TRUSTED", "true"),
            ("YANG_CONTEXT__ERRORS", "last"),
        ],
        || ConfigLoader::load(Some(config_file.as_path())).unwrap(),
    );

    assert!(config.options.trusted);
    assert_eq!(config.errors, ErrorStore::Last);
}

#[test]
fn test_global_config_file_is_read() {
    let config_home = TempDir::new().unwrap();
    let global_dir = config_home.path().join("yang-context");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "[options]\nno_yang_library = true\n",
    )
    .unwrap();

    let config = with_env(&config_home, &[], || ConfigLoader::load(None).unwrap());
    assert!(config.options.no_yang_library);
    assert_eq!(config.options.to_flags(), ContextOptions::NO_YANG_LIBRARY);
}
