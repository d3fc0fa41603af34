use chrono::Utc;

use crate::models::{HistoryEntry, MatchSet, MatchedEntry, Query};

const ROOT_PATH: &str = "/";

#[must_use]
pub fn match_entries(entries: &[HistoryEntry], query: &Query) -> MatchSet {
    match_entries_at(entries, query, Utc::now().timestamp())
}

/// Keeps entries whose path contains every query term; `now` fixes the age clock.
#[must_use]
pub fn match_entries_at(entries: &[HistoryEntry], query: &Query, now: i64) -> MatchSet {
    let terms = query.comparable_terms();
    let matched = entries
        .iter()
        .filter(|entry| contains_all_terms(&entry.path, &terms, query.case_sensitive))
        .map(|entry| MatchedEntry {
            rank: entry.rank,
            age: now.saturating_sub(entry.atime),
            path: entry.path.clone(),
        })
        .collect::<Vec<_>>();
    let common = common_prefix(&matched, &terms, query.case_sensitive);
    MatchSet::new(matched, query.case_sensitive, common)
}

/// Case-sensitive first; an empty result is retried case-insensitively.
#[must_use]
pub fn match_with_fallback(entries: &[HistoryEntry], query: &Query) -> MatchSet {
    match_with_fallback_at(entries, query, Utc::now().timestamp())
}

#[must_use]
pub fn match_with_fallback_at(entries: &[HistoryEntry], query: &Query, now: i64) -> MatchSet {
    let strict = match_entries_at(entries, &query.clone().with_case_sensitive(true), now);
    if !strict.is_empty() {
        return strict;
    }
    match_entries_at(entries, &query.clone().with_case_sensitive(false), now)
}

fn contains_all_terms(path: &str, terms: &[String], case_sensitive: bool) -> bool {
    if case_sensitive {
        terms.iter().all(|term| path.contains(term.as_str()))
    } else {
        let lowered = path.to_lowercase();
        terms.iter().all(|term| lowered.contains(term.as_str()))
    }
}

/// Common ancestor shortcut: the shared prefix of every match, accepted only when
/// it is itself a matched path and still contains every term.
///
/// `terms` must already be in comparable form (lowercased when case-insensitive).
#[must_use]
pub fn common_prefix(
    matched: &[MatchedEntry],
    terms: &[String],
    case_sensitive: bool,
) -> Option<String> {
    let prefix = longest_common_prefix(matched.iter().map(|entry| entry.path.as_str()))?;
    if prefix.is_empty() || prefix == ROOT_PATH {
        return None;
    }
    if !matched.iter().any(|entry| entry.path == prefix) {
        return None;
    }
    if !contains_all_terms(prefix, terms, case_sensitive) {
        return None;
    }
    Some(prefix.to_string())
}

fn longest_common_prefix<'a>(mut paths: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let first = paths.next()?;
    let mut len = first.len();
    for path in paths {
        len = first[..len]
            .char_indices()
            .zip(path.chars())
            .find(|((_, a), b)| a != b)
            .map_or(len.min(path.len()), |((idx, _), _)| idx);
        if len == 0 {
            break;
        }
    }
    Some(&first[..len])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn entry(path: &str, rank: f64, age: i64) -> HistoryEntry {
        HistoryEntry {
            path: path.to_string(),
            rank,
            atime: NOW - age,
        }
    }

    fn matched(paths: &[&str]) -> Vec<MatchedEntry> {
        paths
            .iter()
            .map(|path| MatchedEntry {
                rank: 1.0,
                age: 0,
                path: (*path).to_string(),
            })
            .collect()
    }

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn every_term_must_occur_in_any_order() {
        let entries = vec![
            entry("/home/user/src/zrank", 3.0, 10),
            entry("/home/user/docs", 2.0, 10),
            entry("/srv/zrank-home", 1.0, 10),
        ];
        let set = match_entries_at(&entries, &Query::parse("zrank home"), NOW);
        let paths = set
            .entries()
            .iter()
            .map(|m| m.path.as_str())
            .collect::<Vec<_>>();
        assert_eq!(paths, vec!["/home/user/src/zrank", "/srv/zrank-home"]);
    }

    #[test]
    fn empty_query_matches_everything_and_records_age() {
        let entries = vec![entry("/a", 1.0, 42), entry("/b", 2.0, 7)];
        let set = match_entries_at(&entries, &Query::default().with_case_sensitive(true), NOW);
        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0].age, 42);
        assert_eq!(set.entries()[1].age, 7);
        assert_eq!(set.entries()[1].rank, 2.0);
    }

    #[test]
    fn case_insensitive_never_reduces_matches() {
        let entries = vec![
            entry("/Users/Me/Projects", 1.0, 1),
            entry("/users/me/projects/old", 1.0, 1),
            entry("/opt/Tools", 1.0, 1),
        ];
        for raw in ["Projects", "projects", "me", "TOOLS", "", "nothing"] {
            let strict = match_entries_at(&entries, &Query::parse(raw), NOW);
            let relaxed =
                match_entries_at(&entries, &Query::parse(raw).with_case_sensitive(false), NOW);
            assert!(relaxed.len() >= strict.len(), "query {raw:?}");
            assert!(!relaxed.case_sensitive());
        }
    }

    #[test]
    fn fallback_only_relaxes_when_strict_is_empty() {
        let entries = vec![entry("/work/Api", 1.0, 1), entry("/work/api-old", 1.0, 1)];

        let strict = match_with_fallback_at(&entries, &Query::parse("Api"), NOW);
        assert!(strict.case_sensitive());
        assert_eq!(strict.len(), 1);

        let relaxed = match_with_fallback_at(&entries, &Query::parse("API"), NOW);
        assert!(!relaxed.case_sensitive());
        assert_eq!(relaxed.len(), 2);
    }

    #[test]
    fn common_prefix_accepts_matched_ancestor() {
        let set = matched(&["/home/user/project", "/home/user/project/src"]);
        assert_eq!(
            common_prefix(&set, &terms(&["project"]), true),
            Some("/home/user/project".to_string())
        );
    }

    #[test]
    fn common_prefix_rejects_partial_directory() {
        let set = matched(&["/a/b", "/a/c"]);
        assert_eq!(common_prefix(&set, &[], true), None);
    }

    #[test]
    fn common_prefix_rejects_root_and_empty() {
        assert_eq!(common_prefix(&matched(&["/", "/etc"]), &[], true), None);
        assert_eq!(common_prefix(&matched(&["/a", "b"]), &[], true), None);
        assert_eq!(common_prefix(&[], &[], true), None);
    }

    #[test]
    fn common_prefix_requires_every_term() {
        let set = matched(&["/srv/app", "/srv/app/logs"]);
        assert_eq!(common_prefix(&set, &terms(&["logs"]), true), None);
        assert_eq!(
            common_prefix(&matched(&["/srv/App", "/srv/App/logs"]), &terms(&["app"]), false),
            Some("/srv/App".to_string())
        );
    }

    #[test]
    fn single_match_is_its_own_prefix() {
        let entries = vec![entry("/var/log", 1.0, 1)];
        let set = match_entries_at(&entries, &Query::parse("log"), NOW);
        assert_eq!(set.common_prefix(), Some("/var/log"));
    }

    #[test]
    fn longest_common_prefix_respects_char_boundaries() {
        let paths = ["/tmp/caf\u{e9}", "/tmp/caf\u{e8}"];
        assert_eq!(longest_common_prefix(paths.into_iter()), Some("/tmp/caf"));
        let paths = ["/tmp/d\u{e9}j\u{e0}/x", "/tmp/d\u{e9}j\u{e0}"];
        assert_eq!(
            longest_common_prefix(paths.into_iter()),
            Some("/tmp/d\u{e9}j\u{e0}")
        );
    }
}
