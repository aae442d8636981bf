use std::path::Path;

use anyhow::{Context, Result};
use assistant::{default_synonyms, ColorMatcher, SynonymTable};
use serde::Deserialize;

/// Synonym groups read from a TOML file:
///
/// ```toml
/// replace_defaults = false
/// groups = [["mint", "seafoam"], ["coral", "salmon"]]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SynonymFile {
    #[serde(default)]
    pub replace_defaults: bool,
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
}

impl SynonymFile {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read synonym file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid synonym file {}", path.display()))
    }

    pub fn into_matcher(self) -> ColorMatcher {
        let mut table = if self.replace_defaults {
            SynonymTable::new()
        } else {
            default_synonyms()
        };
        table.extend(SynonymTable::from_groups(self.groups));
        ColorMatcher::new(table)
    }
}

pub fn matcher_from(path: Option<&Path>) -> Result<ColorMatcher> {
    match path {
        Some(path) => Ok(SynonymFile::load(path)?.into_matcher()),
        None => Ok(ColorMatcher::default()),
    }
}

#[cfg(test)]
#[path = "tests/synonyms_tests.rs"]
mod tests;
