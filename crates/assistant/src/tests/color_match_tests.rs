use super::*;

#[test]
fn exact_match_ignores_case_and_padding() {
    let matcher = ColorMatcher::default();
    assert_eq!(matcher.match_stage("Pink", " pink "), Some(MatchStage::Exact));
    assert!(matcher.matches_exact("Wild Berry", "wild berry"));
}

#[test]
fn wild_berry_spellings_are_equivalent() {
    let matcher = ColorMatcher::default();
    assert!(matcher.matches("Wild Berry", "wildberry"));
    assert!(matcher.matches("wild-berry", "Wild Berry"));
}

#[test]
fn containment_is_deliberately_permissive() {
    // Display names vary in spacing and qualifiers, so "Orange" resolving to
    // "Blood Orange" is accepted behavior.
    let matcher = ColorMatcher::default();
    assert_eq!(
        matcher.match_stage("Blood Orange", "Orange"),
        Some(MatchStage::Containment)
    );
    assert_eq!(
        matcher.match_stage("Orange", "Blood Orange"),
        Some(MatchStage::Containment)
    );
    assert!(!matcher.matches_exact("Blood Orange", "Orange"));
}

#[test]
fn synonym_groups_match_names_without_shared_text() {
    let matcher = ColorMatcher::default();
    assert_eq!(matcher.match_stage("Gray", "grey"), Some(MatchStage::Synonym));
    assert_eq!(
        matcher.match_stage("Lavender", "lilac"),
        Some(MatchStage::Synonym)
    );
}

#[test]
fn injected_synonyms_replace_defaults() {
    let matcher = ColorMatcher::new(SynonymTable::parse("mint|seafoam; ; solo"));
    assert_eq!(matcher.synonyms().groups().len(), 1);
    assert!(matcher.matches("Mint", "seafoam"));
    assert!(!matcher.matches("Gray", "grey"));
}

#[test]
fn punctuation_is_stripped_before_the_last_attempt() {
    let matcher = ColorMatcher::new(SynonymTable::new());
    assert_eq!(
        matcher.match_stage("Rose-Gold", "rose gold"),
        Some(MatchStage::Normalized)
    );
    assert_eq!(
        matcher.match_stage("Pastel.Yellow", "pastel yellow chrome"),
        Some(MatchStage::Normalized)
    );
}

#[test]
fn unrelated_and_empty_names_do_not_match() {
    let matcher = ColorMatcher::default();
    assert!(!matcher.matches("Pink", "Green"));
    assert!(!matcher.matches("", "Green"));
    assert!(!matcher.matches("Pink", "   "));
    assert!(!matcher.matches("--", "!!"));
}

#[test]
fn find_first_returns_earliest_candidate() {
    let matcher = ColorMatcher::default();
    let stored = vec!["Blood Orange", "Orange", "Burnt Orange"];
    let found = matcher.find_first(&stored, |name| *name, "orange");
    assert_eq!(found, Some(&"Blood Orange"));
    assert_eq!(matcher.position(&stored, |name| *name, "burnt"), Some(2));
    assert_eq!(matcher.find_first(&stored, |name| *name, "teal"), None);
}

#[test]
fn synonym_member_matches_names_that_contain_another_member() {
    let matcher = ColorMatcher::default();
    assert_eq!(
        matcher.match_stage("Gray Pearl", "grey"),
        Some(MatchStage::Synonym)
    );
    assert_eq!(
        matcher.match_stage("Pale Blue Chrome", "baby blue"),
        Some(MatchStage::Synonym)
    );
    assert_eq!(
        matcher.match_stage("grey", "Gray Pearl"),
        Some(MatchStage::Synonym)
    );
}

#[test]
fn synonym_membership_tolerates_spelling_punctuation() {
    let matcher = ColorMatcher::default();
    assert_eq!(
        matcher.match_stage("Rose Gold Satin", "rose_gold"),
        Some(MatchStage::Synonym)
    );
    assert!(!matcher.matches("Gray Pearl", "lilac"));
}
