use std::path::Path;

use crate::history;
use crate::matching::match_with_fallback;
use crate::models::{HistoryEntry, MatchSet, Query, RankedEntry, ResultRow};
use crate::rank::{Order, rank};

/// Loaded history plus the query operations over it.
#[derive(Debug, Clone, Default)]
pub struct FrecencyIndex {
    entries: Vec<HistoryEntry>,
}

impl FrecencyIndex {
    /// Never fails; an unreadable file gives an empty index.
    #[must_use]
    pub fn open(datafile: &Path) -> Self {
        Self::from_entries(history::load(datafile))
    }

    #[must_use]
    pub const fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn search(&self, query: &Query) -> MatchSet {
        match_with_fallback(&self.entries, query)
    }

    #[must_use]
    pub fn query(&self, query: &Query, order: Order) -> QueryOutcome {
        let matches = self.search(query);
        QueryOutcome {
            rows: rank(&matches, order),
            common: matches.common_prefix().map(ToString::to_string),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub rows: Vec<RankedEntry>,
    pub common: Option<String>,
    pub errors: Vec<String>,
}

impl QueryOutcome {
    #[must_use]
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Where a jump should land: the common ancestor if there is one, else the top row.
    #[must_use]
    pub fn jump_target(&self) -> Option<&str> {
        self.common
            .as_deref()
            .or_else(|| self.rows.first().map(|row| row.path.as_str()))
    }

    #[must_use]
    pub fn result_rows(&self) -> Vec<ResultRow> {
        self.rows.iter().cloned().map(ResultRow::from).collect()
    }
}
