use crate::config::{StorageConfig, constants::LOG_FILE_PATH};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("backend"));
    assert_eq!(log_filters[0].level.as_deref(), Some("trace"));

    let log_file = &log.file;
    assert_eq!(log_file.path, "/var/logs/sidekick.log");
    assert_eq!(log_file.append, true);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(sqlite.path.as_deref(), Some("/var/lib/sidekick/store.db"));
        }
    }
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("info"));
    assert_eq!(log.file.path, LOG_FILE_PATH);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(sqlite.path, None);
        }
    }
}

#[test]
fn test_resolve_path() {
    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("TEST_PATH", dir);
        std::env::set_var("USER_PATH", user_path);
    }
    let ret = resolve_path("$TEST_PATH/${USER_PATH}/config.toml").expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}
