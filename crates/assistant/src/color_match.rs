use serde::{Deserialize, Serialize};

/// Which rule of the matching policy accepted a pair of color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Containment,
    Synonym,
    Normalized,
}

/// Groups of color names that refer to the same stock color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymTable {
    groups: Vec<Vec<String>>,
}

const DEFAULT_SYNONYM_GROUPS: &[&[&str]] = &[
    &["wild berry", "wildberry", "wild-berry"],
    &["rose gold", "rosegold", "rose-gold"],
    &["baby blue", "light blue", "pale blue"],
    &["baby pink", "light pink", "pale pink"],
    &["blush", "blush pink"],
    &["grey", "gray"],
    &["lilac", "lavender"],
    &["burgundy", "maroon", "wine"],
    &["navy", "navy blue", "dark blue"],
    &["sage", "sage green", "eucalyptus"],
];

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for group in groups {
            table.add_group(group);
        }
        table
    }

    /// Parses `a|b|c; d|e` into two groups. Empty names are dropped.
    pub fn parse(raw: &str) -> Self {
        Self::from_groups(raw.split(';').map(|group| group.split('|')))
    }

    /// Adds a group; groups with fewer than two distinct names are ignored.
    pub fn add_group<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut group: Vec<String> = Vec::new();
        for name in names {
            let key = fold(name.as_ref());
            if !key.is_empty() && !group.contains(&key) {
                group.push(key);
            }
        }
        if group.len() > 1 {
            self.groups.push(group);
        }
    }

    pub fn extend(&mut self, other: SynonymTable) {
        self.groups.extend(other.groups);
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// True when either name belongs to a group and the other one equals or
    /// overlaps any member of that group.
    fn related(&self, a: &str, b: &str) -> bool {
        self.expands_to(a, b) || self.expands_to(b, a)
    }

    fn expands_to(&self, member: &str, other: &str) -> bool {
        let squashed = squash(member);
        self.groups
            .iter()
            .filter(|group| {
                group.iter().any(|name| {
                    name == member || (!squashed.is_empty() && squash(name) == squashed)
                })
            })
            .flatten()
            .any(|name| other == name || other.contains(name.as_str()) || name.contains(other))
    }
}

pub fn default_synonyms() -> SynonymTable {
    SynonymTable::from_groups(DEFAULT_SYNONYM_GROUPS.iter().map(|group| group.iter()))
}

/// Permissive color-name matcher.
///
/// Stages run in order and the first success wins: case-insensitive equality,
/// substring containment in either direction, synonym groups (a name in a group
/// matches anything equal to or overlapping another member), then equality or
/// containment after stripping whitespace and punctuation. Containment means
/// `orange` matches `blood orange`; callers that need exact semantics use
/// [`ColorMatcher::matches_exact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMatcher {
    synonyms: SynonymTable,
}

impl Default for ColorMatcher {
    fn default() -> Self {
        Self::new(default_synonyms())
    }
}

impl ColorMatcher {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn matches_exact(&self, reference: &str, query: &str) -> bool {
        fold(reference) == fold(query)
    }

    pub fn matches(&self, reference: &str, query: &str) -> bool {
        self.match_stage(reference, query).is_some()
    }

    pub fn match_stage(&self, reference: &str, query: &str) -> Option<MatchStage> {
        let reference = fold(reference);
        let query = fold(query);
        if reference.is_empty() || query.is_empty() {
            return None;
        }

        if reference == query {
            return Some(MatchStage::Exact);
        }
        if reference.contains(&query) || query.contains(&reference) {
            return Some(MatchStage::Containment);
        }
        if self.synonyms.related(&reference, &query) {
            return Some(MatchStage::Synonym);
        }

        let reference = squash(&reference);
        let query = squash(&query);
        if reference.is_empty() || query.is_empty() {
            return None;
        }
        if reference == query || reference.contains(&query) || query.contains(&reference) {
            return Some(MatchStage::Normalized);
        }
        None
    }

    /// First element (in slice order) whose key matches `query`.
    pub fn find_first<'a, T, F>(&self, items: &'a [T], key: F, query: &str) -> Option<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        items.iter().find(|item| self.matches(key(item), query))
    }

    pub fn position<T, F>(&self, items: &[T], key: F, query: &str) -> Option<usize>
    where
        F: Fn(&T) -> &str,
    {
        items.iter().position(|item| self.matches(key(item), query))
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

fn squash(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

#[cfg(test)]
#[path = "tests/color_match_tests.rs"]
mod tests;
