//! Heuristic query expansion.
//!
//! Queries about technical roles rarely contain the catalog's category
//! vocabulary ("knowledge and skills assessment"), so retrieval quality
//! improves when the query is augmented with the category phrase. The
//! rules are a fixed, ordered table so the set is independently testable
//! and extension is a one-line change.

/// One expansion rule: if any keyword occurs in the lower-cased query,
/// the hint sentence is appended.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionRule {
    pub keywords: &'static [&'static str],
    pub hint: &'static str,
}

/// Rules are evaluated in table order and matched hints are appended in
/// that same order, regardless of keyword positions in the query.
pub const EXPANSION_RULES: &[ExpansionRule] = &[
    ExpansionRule {
        keywords: &["java", "python", "sql", "developer", "engineer", "backend", "ml"],
        hint: "knowledge and skills assessment",
    },
    ExpansionRule {
        keywords: &["collaborate", "stakeholder", "communication", "team", "lead", "manage"],
        hint: "personality and behavior assessment",
    },
];

/// Appends category hints for every rule the query matches.
///
/// Matching is case-insensitive substring containment; the original casing
/// of the query is preserved in the output. A query matching no rule is
/// returned unchanged, with no trailing separator.
#[must_use]
pub fn expand_query(query: &str) -> String {
    let lowered = query.to_lowercase();

    let hints: Vec<&str> = EXPANSION_RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map(|rule| rule.hint)
        .collect();

    if hints.is_empty() {
        return query.to_string();
    }

    format!("{query}. {}", hints.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technical_keyword_appends_skills_hint() {
        let expanded = expand_query("hiring a senior developer");
        assert_eq!(
            expanded,
            "hiring a senior developer. knowledge and skills assessment"
        );
        assert_eq!(expanded.matches("knowledge and skills assessment").count(), 1);
    }

    #[test]
    fn test_collaboration_keyword_appends_personality_hint() {
        assert_eq!(
            expand_query("strong stakeholder management"),
            "strong stakeholder management. personality and behavior assessment"
        );
    }

    #[test]
    fn test_both_rules_match_in_fixed_order() {
        let expanded =
            expand_query("Senior Java backend developer needing strong stakeholder collaboration");
        assert!(expanded.ends_with(
            ". knowledge and skills assessment. personality and behavior assessment"
        ));
    }

    #[test]
    fn test_skills_hint_precedes_personality_even_when_keywords_reversed() {
        // Collaboration keyword appears first in the text; table order wins.
        let expanded = expand_query("team lead for python platform");
        assert!(expanded.ends_with(
            ". knowledge and skills assessment. personality and behavior assessment"
        ));
    }

    #[test]
    fn test_no_match_returns_query_unchanged() {
        assert_eq!(expand_query("warehouse operative"), "warehouse operative");
    }

    #[test]
    fn test_matching_is_case_insensitive_and_preserves_casing() {
        let expanded = expand_query("JAVA Expert");
        assert!(expanded.starts_with("JAVA Expert. "));
        assert!(expanded.contains("knowledge and skills assessment"));
    }

    #[test]
    fn test_multiple_keywords_from_one_rule_append_hint_once() {
        let expanded = expand_query("java and python and sql");
        assert_eq!(expanded.matches("knowledge and skills assessment").count(), 1);
    }
}
