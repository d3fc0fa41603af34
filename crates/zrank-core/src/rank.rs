use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZrankError;
use crate::models::{MatchSet, MatchedEntry, OrderKey, RankedEntry};

const HOUR_SECS: i64 = 3_600;
const DAY_SECS: i64 = 86_400;
const WEEK_SECS: i64 = 604_800;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Rank,
    Recent,
    #[default]
    Frecent,
}

impl Order {
    pub const ALL: [Self; 3] = [Self::Rank, Self::Recent, Self::Frecent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Recent => "recent",
            Self::Frecent => "frecent",
        }
    }

    #[must_use]
    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == raw.trim())
    }
}

impl FromStr for Order {
    type Err = ZrankError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_key(raw).ok_or_else(|| {
            ZrankError::Validation(format!(
                "unknown order '{raw}' (expected rank|recent|frecent)"
            ))
        })
    }
}

/// Age-bucketed weight applied by the `frecent` order.
#[must_use]
pub fn frecent_score(rank: f64, age: i64) -> f64 {
    if age <= HOUR_SECS {
        rank * 4.0
    } else if age <= DAY_SECS {
        rank * 2.0
    } else if age <= WEEK_SECS {
        rank / 2.0
    } else {
        rank / 4.0
    }
}

#[must_use]
pub fn rank(matches: &MatchSet, order: Order) -> Vec<RankedEntry> {
    let keyed = matches.entries().iter().map(|entry| RankedEntry {
        key: order_key(entry, order),
        path: entry.path.clone(),
    });
    let mut ranked = keyed.collect::<Vec<_>>();
    match order {
        Order::Recent => ranked.sort_by(ascending),
        Order::Rank | Order::Frecent => ranked.sort_by(|a, b| ascending(b, a)),
    }
    ranked
}

/// String-keyed entry point; unknown keys rank nothing.
#[must_use]
pub fn rank_by_key(matches: &MatchSet, key: &str) -> Vec<RankedEntry> {
    Order::from_key(key).map_or_else(Vec::new, |order| rank(matches, order))
}

fn order_key(entry: &MatchedEntry, order: Order) -> OrderKey {
    match order {
        Order::Rank => OrderKey::Score(entry.rank),
        Order::Recent => OrderKey::Age(entry.age),
        Order::Frecent => OrderKey::Score(frecent_score(entry.rank, entry.age)),
    }
}

fn ascending(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    a.key.total_cmp(&b.key).then_with(|| a.path.cmp(&b.path))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::matching::match_entries_at;
    use crate::models::{HistoryEntry, Query};

    const NOW: i64 = 1_700_000_000;

    fn set(rows: &[(&str, f64, i64)]) -> MatchSet {
        let entries = rows
            .iter()
            .map(|(path, rank, age)| HistoryEntry {
                path: (*path).to_string(),
                rank: *rank,
                atime: NOW - age,
            })
            .collect::<Vec<_>>();
        match_entries_at(&entries, &Query::default(), NOW)
    }

    fn paths(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked.iter().map(|entry| entry.path.as_str()).collect()
    }

    #[test]
    fn order_keys_round_trip_through_strings() {
        for order in Order::ALL {
            assert_eq!(order.as_str().parse::<Order>().expect("parse"), order);
        }
        assert_eq!(Order::default(), Order::Frecent);
        assert!("bogus".parse::<Order>().is_err());
    }

    #[test]
    fn frecent_bucket_boundaries() {
        assert_eq!(frecent_score(10.0, 0), 40.0);
        assert_eq!(frecent_score(10.0, 3_600), 40.0);
        assert_eq!(frecent_score(10.0, 3_601), 20.0);
        assert_eq!(frecent_score(10.0, 86_400), 20.0);
        assert_eq!(frecent_score(10.0, 86_401), 5.0);
        assert_eq!(frecent_score(10.0, 604_800), 5.0);
        assert_eq!(frecent_score(10.0, 604_801), 2.5);
    }

    #[test]
    fn rank_orders_by_raw_weight_descending() {
        let matches = set(&[("/a", 1.0, 10), ("/b", 9.0, 999_999), ("/c", 4.0, 10)]);
        let ranked = rank(&matches, Order::Rank);
        assert_eq!(paths(&ranked), vec!["/b", "/c", "/a"]);
        assert_eq!(ranked[0].key, OrderKey::Score(9.0));
    }

    #[test]
    fn recent_orders_by_age_ascending() {
        let matches = set(&[("/ten", 1.0, 10), ("/old", 1.0, 5_000), ("/hundred", 1.0, 100)]);
        let ranked = rank(&matches, Order::Recent);
        let ages = ranked.iter().map(|entry| entry.key).collect::<Vec<_>>();
        assert_eq!(
            ages,
            vec![OrderKey::Age(10), OrderKey::Age(100), OrderKey::Age(5_000)]
        );
        assert_eq!(paths(&ranked), vec!["/ten", "/hundred", "/old"]);
    }

    #[test]
    fn frecent_reweights_before_sorting() {
        let matches = set(&[
            ("/stale-heavy", 40.0, 700_000),
            ("/fresh-light", 3.0, 60),
            ("/yesterday", 5.0, 50_000),
        ]);
        let ranked = rank(&matches, Order::Frecent);
        assert_eq!(
            ranked,
            vec![
                RankedEntry {
                    key: OrderKey::Score(12.0),
                    path: "/fresh-light".to_string(),
                },
                RankedEntry {
                    key: OrderKey::Score(10.0),
                    path: "/yesterday".to_string(),
                },
                RankedEntry {
                    key: OrderKey::Score(10.0),
                    path: "/stale-heavy".to_string(),
                },
            ]
        );
    }

    #[test]
    fn equal_keys_fall_back_to_path_in_key_direction() {
        let matches = set(&[("/a", 2.0, 5), ("/b", 2.0, 5)]);
        assert_eq!(paths(&rank(&matches, Order::Rank)), vec!["/b", "/a"]);
        assert_eq!(paths(&rank(&matches, Order::Recent)), vec!["/a", "/b"]);
    }

    #[test]
    fn unknown_key_ranks_nothing() {
        let matches = set(&[("/a", 2.0, 5)]);
        assert!(rank_by_key(&matches, "bogus").is_empty());
        assert_eq!(rank_by_key(&matches, "rank").len(), 1);
    }

    #[test]
    fn empty_match_set_ranks_nothing() {
        let matches = set(&[]);
        for order in Order::ALL {
            assert!(rank(&matches, order).is_empty());
        }
    }
}
