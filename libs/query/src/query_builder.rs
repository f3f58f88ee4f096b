//! SQL statement assembly for catalog searches.
//!
//! The rows and count statements are rendered from the same
//! `FROM ... JOIN ... WHERE ...` text and the same [`Binding`], so the reported
//! count always describes the rows a larger LIMIT would return.

use crate::bind::Binding;
use crate::plan::{Catalog, QueryPlan};
use std::fmt;

const MUSIC_COLUMNS: &[&str] = &[
    "titles_distinct.title",
    "titles.composer",
    "titles.lyricist",
    "local2canonical.canonical",
    "titles.sheet",
    "titles.src",
];
const RECORDING_COLUMNS: &[&str] = &["audio_files.artist", "audio_files.album"];
const AUDIO_COLUMNS: &[&str] = &["title", "artist", "album"];

const MUSIC_SOURCE: &str = "FROM titles_distinct \
     JOIN titles USING( title_id ) \
     JOIN local2canonical USING( src, local )";
const RECORDING_JOIN: &str = "JOIN audio_files USING( title )";
const AUDIO_SOURCE: &str = "FROM audio_files";

/// A rendered SQL statement with its positional bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub binding: Binding,
}

impl Statement {
    pub fn new(sql: impl Into<String>, binding: Binding) -> Self {
        Self {
            sql: sql.into(),
            binding,
        }
    }

    /// A statement without parameters.
    pub fn unbound(sql: impl Into<String>) -> Self {
        Self::new(sql, Binding::new())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Query builder for music and audio searches.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    plan: &'a QueryPlan,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(plan: &'a QueryPlan) -> Self {
        Self { plan }
    }

    /// `SELECT <contract columns> ... ORDER BY title LIMIT <n>`
    pub fn build_sql(&self) -> Statement {
        let mut sql = String::from("SELECT ");
        sql.push_str(&self.select_columns().join(", "));
        let binding = self.push_filtered_source(&mut sql);

        sql.push_str(" ORDER BY ");
        sql.push_str(self.order_column());
        // Only the validated integer is interpolated.
        sql.push_str(&format!(" LIMIT {}", self.plan.limit()));

        Statement { sql, binding }
    }

    /// `SELECT COUNT(*) AS cnt ...` with no ordering and no limit.
    pub fn build_count_sql(&self) -> Statement {
        let mut sql = String::from("SELECT COUNT(*) AS cnt");
        let binding = self.push_filtered_source(&mut sql);
        Statement { sql, binding }
    }

    /// The WHERE clause shared by both statements, if any predicate is present.
    pub fn where_clause(&self) -> Option<String> {
        if self.plan.is_unfiltered() {
            return None;
        }
        let conditions: Vec<&str> = self.plan.predicates().iter().map(|p| p.condition).collect();
        Some(format!("WHERE {}", conditions.join(" AND ")))
    }

    fn select_columns(&self) -> Vec<&'static str> {
        match self.plan.catalog() {
            Catalog::Titles => {
                let mut columns = MUSIC_COLUMNS.to_vec();
                if self.plan.aa_flag() {
                    columns.extend_from_slice(RECORDING_COLUMNS);
                }
                columns
            }
            Catalog::Recordings => AUDIO_COLUMNS.to_vec(),
        }
    }

    fn order_column(&self) -> &'static str {
        match self.plan.catalog() {
            Catalog::Titles => "titles_distinct.title",
            Catalog::Recordings => "title",
        }
    }

    /// Appends `FROM`, joins and `WHERE`, returning the matching binding.
    fn push_filtered_source(&self, sql: &mut String) -> Binding {
        sql.push(' ');
        match self.plan.catalog() {
            Catalog::Titles => {
                sql.push_str(MUSIC_SOURCE);
                if self.plan.aa_flag() {
                    sql.push(' ');
                    sql.push_str(RECORDING_JOIN);
                }
            }
            Catalog::Recordings => sql.push_str(AUDIO_SOURCE),
        }

        let mut binding = Binding::new();
        if let Some(clause) = self.where_clause() {
            sql.push(' ');
            sql.push_str(&clause);
            for predicate in self.plan.predicates() {
                binding.push(predicate.param, predicate.value.clone());
            }
        }
        binding
    }
}
