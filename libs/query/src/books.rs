//! Indexed-books listing: which index sources cover each canonical book.

use crate::Statement;
use serde::ser::{Serialize, SerializeMap, Serializer};

const BOOKS_SQL: &str = "SELECT src, canonical FROM local2canonical ORDER BY canonical, src";

/// The single statement behind the books listing. It takes no filters.
pub fn books_statement() -> Statement {
    Statement::unbound(BOOKS_SQL)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub canonical: String,
    /// Index sources in query order; repeats are kept.
    pub sources: Vec<String>,
}

/// Canonical book name → index sources, in first-seen canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookIndex {
    entries: Vec<BookEntry>,
}

impl BookIndex {
    /// Groups `(src, canonical)` rows. Rows are expected sorted by canonical,
    /// but a canonical name seen again later still lands in its first group.
    pub fn from_pairs<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<BookEntry> = Vec::new();
        for (src, canonical) in rows {
            match entries.iter_mut().rev().find(|e| e.canonical == canonical) {
                Some(entry) => entry.sources.push(src),
                None => entries.push(BookEntry {
                    canonical,
                    sources: vec![src],
                }),
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[BookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-column plain-text table: space-joined sources, then the canonical name.
    pub fn render_table(&self) -> String {
        const SRC_HEADER: &str = "Index Src";
        const CANONICAL_HEADER: &str = "Canonical Book Name";

        let joined: Vec<String> = self.entries.iter().map(|e| e.sources.join(" ")).collect();
        let width = joined
            .iter()
            .map(|s| s.chars().count())
            .chain(std::iter::once(SRC_HEADER.len()))
            .max()
            .unwrap_or(SRC_HEADER.len());

        let mut out = format!("{SRC_HEADER:<width$}  {CANONICAL_HEADER}\n");
        out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(CANONICAL_HEADER.len())));
        for (sources, entry) in joined.iter().zip(&self.entries) {
            out.push_str(&format!("{sources:<width$}  {}\n", entry.canonical));
        }
        out
    }
}

/// Serializes as an ordered `{canonical: [src, ...]}` object.
impl Serialize for BookIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.canonical, &entry.sources)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(rows: &[(&str, &str)]) -> Vec<(String, String)> {
        rows.iter()
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn statement_orders_by_canonical_then_source() {
        let stmt = books_statement();
        assert!(stmt.sql.ends_with("ORDER BY canonical, src"));
        assert!(stmt.binding.is_empty());
    }

    #[test]
    fn groups_sources_by_canonical_in_order() {
        let index = BookIndex::from_pairs(pairs(&[
            ("Buf", "Real Book Vol 1"),
            ("Skr", "Real Book Vol 1"),
            ("Ajp", "Real Book Vol 2"),
            ("Buf", "Real Book Vol 2"),
            ("Buf", "Real Book Vol 2"),
        ]));

        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].canonical, "Real Book Vol 1");
        assert_eq!(index.entries()[0].sources, vec!["Buf", "Skr"]);
        assert_eq!(index.entries()[1].sources, vec!["Ajp", "Buf", "Buf"]);

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(
            json,
            r#"{"Real Book Vol 1":["Buf","Skr"],"Real Book Vol 2":["Ajp","Buf","Buf"]}"#
        );
    }

    #[test]
    fn renders_plain_table() {
        let index = BookIndex::from_pairs(pairs(&[("Buf", "Colorado Cookbook")]));
        let table = index.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Index Src  Canonical Book Name");
        assert_eq!(lines[2], "Buf        Colorado Cookbook");
    }

    #[test]
    fn empty_index_serializes_as_empty_object() {
        let index = BookIndex::from_pairs(Vec::new());
        assert!(index.is_empty());
        assert_eq!(serde_json::to_string(&index).unwrap(), "{}");
    }
}
