// 🔎 Name Matcher - free text → roster entries
//
// Two strategies, both pure:
// - Exact: normalized full name / "first last" / "nickname last"
// - Substring: normalized query contained in full, first, last or nickname
//
// Normalization is lowercase + trim only. No accent folding, no
// punctuation stripping, no edit distance.

use tracing::debug;

use crate::entities::{LegislatorIndex, LegislatorRecord};

/// Lowercase + trim
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// First roster entry (source order) whose exact key equals the
/// normalized name.
pub fn match_exact<'a>(name: &str, index: &'a LegislatorIndex) -> Option<&'a LegislatorRecord> {
    let key = normalize(name);
    if key.is_empty() {
        return None;
    }
    let found = index.find_by_name(&key);
    debug!(name, resolved = ?found.map(|l| l.stable_id.as_str()), "exact name match");
    found
}

/// Every roster entry with a name field containing the normalized query,
/// in source order. No deduplication.
pub fn match_substring<'a>(query: &str, index: &'a LegislatorIndex) -> Vec<&'a LegislatorRecord> {
    let needle = normalize(query);
    index
        .entries()
        .iter()
        .filter(|leg| {
            leg.search_fields()
                .iter()
                .any(|field| !field.is_empty() && field.contains(&needle))
        })
        .collect()
}

/// Stable id a free-text name resolves to, if any
pub fn resolve_id(name: &str, index: &LegislatorIndex) -> Option<String> {
    match_exact(name, index).map(|leg| leg.stable_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{roster_row, sample_roster};

    fn index() -> LegislatorIndex {
        LegislatorIndex::build(&sample_roster())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Amy KLOBUCHAR "), "amy klobuchar");
        assert_eq!(normalize(""), "");
        // No accent folding
        assert_eq!(normalize("José"), "josé");
    }

    #[test]
    fn test_match_exact_full_name() {
        let index = index();
        let leg = match_exact("Amy Klobuchar", &index).unwrap();
        assert_eq!(leg.stable_id, "K000367");
        assert_eq!(match_exact("  amy klobuchar ", &index).unwrap().stable_id, "K000367");
    }

    #[test]
    fn test_match_exact_first_last_and_nickname() {
        let index = index();
        assert_eq!(match_exact("Rafael Cruz", &index).unwrap().stable_id, "C001098");
        assert_eq!(match_exact("Ted Cruz", &index).unwrap().stable_id, "C001098");
        assert_eq!(match_exact("Bernie Sanders", &index).unwrap().stable_id, "S000033");
    }

    #[test]
    fn test_match_exact_misses() {
        let index = index();
        assert!(match_exact("Klobuchar", &index).is_none());
        assert!(match_exact("Amy Klobuchr", &index).is_none());
        assert!(match_exact("", &index).is_none());
        assert!(match_exact("   ", &index).is_none());
    }

    #[test]
    fn test_match_substring() {
        let index = index();
        let hits = match_substring("klo", &index);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stable_id, "K000367");

        assert!(match_substring("zzz", &index).is_empty());
    }

    #[test]
    fn test_match_substring_nickname_and_source_order() {
        let index = index();
        let hits: Vec<_> = match_substring("BERNIE", &index).iter().map(|l| l.stable_id.clone()).collect();
        assert_eq!(hits, vec!["S000033"]);

        // "tina" and "balint": order follows the roster
        let hits: Vec<_> = match_substring("in", &index).iter().map(|l| l.stable_id.clone()).collect();
        assert_eq!(hits, vec!["S001203", "B001318"]);
    }

    #[test]
    fn test_match_substring_no_dedup() {
        let rows = vec![
            roster_row("A1", "Chris Smith", "Chris", "Smith", "rep", "NJ", "4", "Republican"),
            roster_row("A1", "Chris Smith", "Chris", "Smith", "rep", "NJ", "4", "Republican"),
        ];
        let index = LegislatorIndex::build(&rows);
        assert_eq!(match_substring("smith", &index).len(), 2);
    }

    #[test]
    fn test_matchers_are_deterministic() {
        let index = index();
        let a: Vec<_> = match_substring("an", &index).iter().map(|l| l.stable_id.clone()).collect();
        let b: Vec<_> = match_substring("an", &index).iter().map(|l| l.stable_id.clone()).collect();
        assert_eq!(a, b);
        assert_eq!(resolve_id("Ted Cruz", &index), resolve_id("ted cruz", &index));
    }
}
