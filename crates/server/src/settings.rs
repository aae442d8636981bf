use std::path::Path;

use anyhow::Context;
use assistant::{default_synonyms, ColorMatcher, SynonymTable};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    /// Extra synonym groups, `a|b|c; d|e`.
    #[serde(default)]
    pub color_synonyms: Option<String>,
    pub include_default_synonyms: bool,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8443".into(),
            database_url: "sqlite://./data/designs.db".into(),
            color_synonyms: None,
            include_default_synonyms: true,
            max_body_bytes: 256 * 1024,
        }
    }
}

impl Settings {
    pub fn color_matcher(&self) -> ColorMatcher {
        let mut synonyms = if self.include_default_synonyms {
            default_synonyms()
        } else {
            SynonymTable::new()
        };
        if let Some(raw) = &self.color_synonyms {
            synonyms.extend(SynonymTable::parse(raw));
        }
        ColorMatcher::new(synonyms)
    }
}

/// Defaults, then `server.toml` if present, then `APP__*` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    build_settings(Path::new("server.toml"), None)
}

pub(crate) fn build_settings(
    file: &Path,
    env: Option<Map<String, String>>,
) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let settings = Config::builder()
        .set_default("bind_addr", defaults.bind_addr)?
        .set_default("database_url", defaults.database_url)?
        .set_default("include_default_synonyms", defaults.include_default_synonyms)?
        .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("failed to load server settings")?
        .try_deserialize::<Settings>()
        .context("invalid server settings")?;

    Ok(Settings {
        database_url: normalize_database_url(&settings.database_url),
        ..settings
    })
}

pub(crate) fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
