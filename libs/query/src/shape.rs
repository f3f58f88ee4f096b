//! Result shaping: fetched rows to caller-facing tuples.
//!
//! Tuple order is a contract with the client. It depends only on the search mode
//! and `aa_flag`, never on which individual filters were set.

use crate::plan::{Catalog, QueryPlan};
use thiserror::Error;

/// One result tuple; `None` is a SQL NULL.
pub type ResultRow = Vec<Option<String>>;

const MUSIC_FIELDS: &[&str] = &["title", "composer", "lyricist", "canonical", "sheet", "src"];
const MUSIC_RECORDING_FIELDS: &[&str] = &[
    "title", "composer", "lyricist", "canonical", "sheet", "src", "artist", "album",
];
const AUDIO_FIELDS: &[&str] = &["title", "artist", "album"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {index} has {actual} columns, expected {expected}")]
pub struct ColumnMismatch {
    pub index: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Caller-facing field names for a plan's result tuples.
pub fn fields(plan: &QueryPlan) -> &'static [&'static str] {
    match (plan.catalog(), plan.aa_flag()) {
        (Catalog::Titles, false) => MUSIC_FIELDS,
        (Catalog::Titles, true) => MUSIC_RECORDING_FIELDS,
        (Catalog::Recordings, _) => AUDIO_FIELDS,
    }
}

/// Checks every row against the plan's tuple width.
pub fn shape_rows(plan: &QueryPlan, rows: Vec<ResultRow>) -> Result<Vec<ResultRow>, ColumnMismatch> {
    let expected = fields(plan).len();
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(ColumnMismatch {
            index,
            expected,
            actual: row.len(),
        });
    }
    Ok(rows)
}
