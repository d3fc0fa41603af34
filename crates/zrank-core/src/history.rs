use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, ZrankError};
use crate::models::HistoryEntry;

pub const FIELD_SEPARATOR: char = '|';

#[derive(Debug, Clone, Default)]
pub struct HistoryParseOutcome {
    pub entries: Vec<HistoryEntry>,
    pub skipped_lines: usize,
    pub first_error: Option<(usize, String)>,
}

/// Parses `path|rank|atime` lines, skipping anything that does not fit the shape.
///
/// The path is everything before the last two separators, so a `|` inside a
/// directory name survives.
#[must_use]
pub fn parse_history(raw: &str) -> HistoryParseOutcome {
    let mut outcome = HistoryParseOutcome::default();

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(entry) => outcome.entries.push(entry),
            Err(message) => {
                outcome.skipped_lines += 1;
                if outcome.first_error.is_none() {
                    outcome.first_error = Some((line_no + 1, message));
                }
            }
        }
    }

    outcome
}

fn parse_line(line: &str) -> std::result::Result<HistoryEntry, String> {
    let mut fields = line.rsplitn(3, FIELD_SEPARATOR);
    let (Some(atime), Some(rank), Some(path)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(format!("expected path|rank|atime, got '{line}'"));
    };
    if path.is_empty() {
        return Err("empty path".to_string());
    }
    let rank = rank
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid rank '{rank}': {err}"))?;
    if !rank.is_finite() {
        return Err(format!("non-finite rank '{rank}'"));
    }
    let atime = atime
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid atime '{atime}': {err}"))?;

    Ok(HistoryEntry {
        path: path.to_string(),
        rank,
        atime,
    })
}

/// Reads and parses a history file, keeping only entries whose path exists right now.
pub fn read_history(datafile: &Path) -> Result<Vec<HistoryEntry>> {
    if !datafile.exists() {
        return Err(ZrankError::NotFound(datafile.display().to_string()));
    }
    let bytes = fs::read(datafile)?;
    let raw = String::from_utf8_lossy(&bytes);
    let outcome = parse_history(&raw);
    if let Some((line_no, message)) = &outcome.first_error {
        debug!(
            datafile = %datafile.display(),
            skipped = outcome.skipped_lines,
            first_line = line_no,
            "skipped malformed history lines: {message}"
        );
    }

    let total = outcome.entries.len();
    let entries = outcome
        .entries
        .into_iter()
        .filter(|entry| Path::new(&entry.path).exists())
        .collect::<Vec<_>>();
    debug!(
        datafile = %datafile.display(),
        kept = entries.len(),
        stale = total - entries.len(),
        "loaded history"
    );
    Ok(entries)
}

/// Soft-failing load: any read failure becomes an empty history.
#[must_use]
pub fn load(datafile: &Path) -> Vec<HistoryEntry> {
    match read_history(datafile) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(datafile = %datafile.display(), code = err.code(), "history unavailable: {err}");
            Vec::new()
        }
    }
}
