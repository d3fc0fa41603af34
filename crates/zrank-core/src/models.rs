use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

const LABEL_WIDTH: usize = 15;

/// One `path|rank|atime` line of the history file.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub path: String,
    pub rank: f64,
    pub atime: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub terms: Vec<String>,
    pub case_sensitive: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl Query {
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            case_sensitive: true,
        }
    }

    /// Splits free text on whitespace. Blank input yields the match-everything query.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split_whitespace())
    }

    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in the form they are compared in.
    #[must_use]
    pub fn comparable_terms(&self) -> Vec<String> {
        if self.case_sensitive {
            self.terms.clone()
        } else {
            self.terms.iter().map(|term| term.to_lowercase()).collect()
        }
    }

    /// Original text as handed to an external helper.
    #[must_use]
    pub fn joined(&self) -> String {
        self.terms.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEntry {
    pub rank: f64,
    pub age: i64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet {
    entries: Vec<MatchedEntry>,
    case_sensitive: bool,
    common: Option<String>,
}

impl MatchSet {
    pub(crate) fn new(
        entries: Vec<MatchedEntry>,
        case_sensitive: bool,
        common: Option<String>,
    ) -> Self {
        Self {
            entries,
            case_sensitive,
            common,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[MatchedEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[must_use]
    pub fn common_prefix(&self) -> Option<&str> {
        self.common.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderKey {
    Age(i64),
    Score(f64),
}

impl OrderKey {
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "ages only need relative ordering"
    )]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Age(age) => age as f64,
            Self::Score(score) => score,
        }
    }

    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Age(a), Self::Age(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Age(age) => write!(f, "{age}"),
            Self::Score(score) => f.write_str(&format_score(*score)),
        }
    }
}

/// Shortest round-trip form with a trailing `.0` on integral values, switching to
/// `1e+16` / `1e-05` style exponents outside `[1e-4, 1e16)`.
fn format_score(score: f64) -> String {
    if score.is_nan() {
        return "nan".to_string();
    }
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = score.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(score);
    }
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        format!("{score}")
    }
}

fn format_exponent(score: f64) -> String {
    let raw = format!("{score:e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return raw;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub key: OrderKey,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub path: String,
    pub order: OrderKey,
}

impl From<RankedEntry> for ResultRow {
    fn from(entry: RankedEntry) -> Self {
        let key = entry.key.to_string();
        Self {
            label: format!("{key:<LABEL_WIDTH$} {}", entry.path),
            path: entry.path,
            order: entry.key,
        }
    }
}
