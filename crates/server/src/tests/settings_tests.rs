use super::{build_settings, normalize_database_url, Settings};

use config::Map;
use std::{
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_map(pairs: &[(&str, &str)]) -> Map<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://data/designs.db"),
        "sqlite://data/designs.db"
    );
    assert_eq!(
        normalize_database_url("  "),
        Settings::default().database_url
    );
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings =
        build_settings(Path::new("does-not-exist.toml"), Some(Map::new())).expect("settings");
    assert_eq!(settings.bind_addr, "127.0.0.1:8443");
    assert_eq!(settings.database_url, "sqlite://./data/designs.db");
    assert!(settings.include_default_synonyms);
    assert!(settings.color_matcher().matches("Gray", "grey"));
}

#[test]
fn file_then_env_overrides() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("balloon_server_config_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let file = temp_root.join("server.toml");
    fs::write(
        &file,
        "bind_addr = \"0.0.0.0:9000\"\ndatabase_url = \"./file.db\"\ncolor_synonyms = \"mint|seafoam\"\n",
    )
    .expect("write");

    let settings = build_settings(
        &file,
        Some(env_map(&[
            ("APP__DATABASE_URL", "sqlite::memory:"),
            ("APP__INCLUDE_DEFAULT_SYNONYMS", "false"),
        ])),
    )
    .expect("settings");

    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert_eq!(settings.database_url, "sqlite::memory:");
    let matcher = settings.color_matcher();
    assert!(matcher.matches("Mint", "seafoam"));
    assert!(!matcher.matches("Gray", "grey"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
