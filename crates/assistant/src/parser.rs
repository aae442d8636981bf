use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};
use shared::domain::{BalloonSize, Correction};
use tracing::debug;

const UPDATE_CLUSTERS: &str =
    r#"(?i)^\s*(?:change|set|update)\s+(?:the\s+)?([a-z][a-z \-]*?)\s+clusters?\s*(?:\bto\b|=)\s*(\d+)\s*[.!]?\s*$"#;
const MAKE_CLUSTERS: &str =
    r#"(?i)^\s*(?:make|set)\s+(?:the\s+)?([a-z][a-z \-]*?)\s*(?:\bto\b|=)\s*(\d+)\s+clusters?\s*[.!]?\s*$"#;
const ADD_COLOR: &str =
    r#"(?i)^\s*add\s+([a-z][a-z \-]*?)(?:\s+colou?r)?\s+with\s+(\d+)\s+clusters?\s*[.!]?\s*$"#;
const REMOVE_COLOR: &str =
    r#"(?i)^\s*remove\s+(?:the\s+)?([a-z][a-z \-]*?)(?:\s+colou?r)?\s*[.!]?\s*$"#;
const UPDATE_BALLOONS: &str =
    r#"(?i)^\s*(?:change|set|update)\s+(?:the\s+)?([a-z][a-z \-]*?)\s+(11|16)\s*(?:"|-?inch(?:es)?|in)?\s+balloons?\s*(?:\bto\b|=)\s*(\d+)\s*[.!]?\s*$"#;

type BuildFn = fn(&Captures<'_>) -> Option<Correction>;

/// One entry of the ordered rule table: a matcher plus the constructor that
/// turns its captures into a correction.
#[derive(Clone)]
pub struct CommandPattern {
    name: &'static str,
    matcher: Regex,
    build: BuildFn,
}

impl CommandPattern {
    pub fn new(name: &'static str, pattern: &str, build: BuildFn) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            matcher: Regex::new(pattern)?,
            build,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // Only called with the pattern constants above.
    fn builtin(name: &'static str, pattern: &str, build: BuildFn) -> Self {
        Self::new(name, pattern, build).expect("invalid built-in pattern")
    }
}

impl fmt::Debug for CommandPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPattern")
            .field("name", &self.name)
            .field("matcher", &self.matcher.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered, first-match-wins command table.
#[derive(Debug, Clone)]
pub struct CommandParser {
    patterns: Vec<CommandPattern>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandParser {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self {
            patterns: vec![
                CommandPattern::builtin("update_clusters", UPDATE_CLUSTERS, build_cluster_count),
                CommandPattern::builtin("make_clusters", MAKE_CLUSTERS, build_cluster_count),
                CommandPattern::builtin("add_color", ADD_COLOR, build_add_color),
                CommandPattern::builtin("remove_color", REMOVE_COLOR, build_remove_color),
                CommandPattern::builtin("update_balloons", UPDATE_BALLOONS, build_balloon_count),
            ],
        }
    }

    /// Appends a rule; it is tried after every existing rule.
    pub fn push(&mut self, pattern: CommandPattern) {
        self.patterns.push(pattern);
    }

    pub fn patterns(&self) -> &[CommandPattern] {
        &self.patterns
    }

    pub fn parse(&self, text: &str) -> Option<Correction> {
        self.parse_with_rule(text).map(|(_, correction)| correction)
    }

    /// Like [`CommandParser::parse`], also naming the rule that fired.
    ///
    /// Only the first rule whose pattern matches is consulted. If its
    /// constructor rejects the captures (an out-of-range number, say) the
    /// result is `None` and later rules are not tried.
    pub fn parse_with_rule(&self, text: &str) -> Option<(&'static str, Correction)> {
        let Some((pattern, captures)) = self
            .patterns
            .iter()
            .find_map(|pattern| pattern.matcher.captures(text).map(|caps| (pattern, caps)))
        else {
            debug!(%text, "no command pattern matched");
            return None;
        };

        let correction = (pattern.build)(&captures);
        debug!(rule = pattern.name, matched = correction.is_some(), "command pattern fired");
        correction.map(|correction| (pattern.name, correction))
    }
}

static STANDARD_PARSER: LazyLock<CommandParser> = LazyLock::new(CommandParser::standard);

/// Parses `text` with the built-in rule table.
pub fn parse_command(text: &str) -> Option<Correction> {
    STANDARD_PARSER.parse(text)
}

/// Lower-cases and collapses internal whitespace.
pub fn normalize_color(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn color_at(captures: &Captures<'_>, index: usize) -> Option<String> {
    let color = normalize_color(captures.get(index)?.as_str());
    (!color.is_empty()).then_some(color)
}

fn count_at(captures: &Captures<'_>, index: usize) -> Option<u32> {
    captures.get(index)?.as_str().parse().ok()
}

fn build_cluster_count(captures: &Captures<'_>) -> Option<Correction> {
    Some(Correction::cluster_count(
        color_at(captures, 1)?,
        count_at(captures, 2)?,
    ))
}

fn build_add_color(captures: &Captures<'_>) -> Option<Correction> {
    Some(Correction::add_color(
        color_at(captures, 1)?,
        count_at(captures, 2)?,
    ))
}

fn build_remove_color(captures: &Captures<'_>) -> Option<Correction> {
    let original = captures.get(1)?.as_str().trim();
    Some(Correction::remove_color(color_at(captures, 1)?, original))
}

fn build_balloon_count(captures: &Captures<'_>) -> Option<Correction> {
    let size: BalloonSize = captures.get(2)?.as_str().parse().ok()?;
    Some(Correction::balloon_count(
        color_at(captures, 1)?,
        size,
        count_at(captures, 3)?,
    ))
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
