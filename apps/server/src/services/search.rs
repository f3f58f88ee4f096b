//! Search service - catalog search implementation
//!
//! Orchestrates a search by:
//! - Normalizing request parameters into a filter set
//! - Building the rows and count statements from one query plan
//! - Running both on a single store session and shaping the envelope

use crate::{
    db::{CatalogSession, CatalogStore},
    error::QueryStage,
    metrics, Error, Result,
};
use birdland_query::{
    books::{books_statement, BookIndex},
    shape, QueryBuilder, QueryPlan, SearchMode, SearchRequest,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

/// Rows and total for one music or audio search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub results: Vec<shape::ResultRow>,
    pub count: i64,
    /// Music searches only: rows carry artist and album.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aa_flag: Option<bool>,
}

/// Search service coordinates catalog searches
pub struct SearchService {
    store: Arc<dyn CatalogStore>,
    default_limit: u64,
}

impl SearchService {
    pub fn new(store: Arc<dyn CatalogStore>, default_limit: u64) -> Self {
        Self {
            store,
            default_limit,
        }
    }

    /// Run a search from raw request parameters and return the success envelope.
    ///
    /// `error` is always `""` in the returned value; failures are returned as
    /// [`Error`] and rendered by the caller.
    pub async fn search(&self, items: &[(String, String)]) -> Result<JsonValue> {
        let request = match SearchRequest::from_items_with_default_limit(items, self.default_limit)
        {
            Ok(request) => request,
            Err(e) => {
                metrics::SEARCH_TOTAL
                    .with_label_values(&["unknown", "request"])
                    .inc();
                return Err(e.into());
            }
        };

        let mode = request.mode;
        tracing::Span::current().record("search.mode", mode.as_str());

        let outcome = self.run(&request).await;
        let status = match &outcome {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::SEARCH_TOTAL
            .with_label_values(&[mode.as_str(), status])
            .inc();

        outcome
    }

    async fn run(&self, request: &SearchRequest) -> Result<JsonValue> {
        let mut session = self.store.session().await?;

        match request.mode {
            SearchMode::MusicSearch | SearchMode::AudioSearch => {
                let result = self.search_catalog(session.as_mut(), request).await?;
                Ok(envelope(json!({
                    "results": result.results,
                    "count": result.count,
                    "aa_flag": result.aa_flag,
                })))
            }
            SearchMode::IndexedBooks => {
                let books = self.list_books(session.as_mut()).await?;
                Ok(envelope(json!({ "results": books })))
            }
        }
    }

    /// Rows then count for a music or audio search, on the given session.
    pub async fn search_catalog(
        &self,
        session: &mut dyn CatalogSession,
        request: &SearchRequest,
    ) -> Result<SearchResult> {
        let plan = match request.mode {
            SearchMode::AudioSearch => QueryPlan::audio(&request.filters),
            _ => QueryPlan::music(&request.filters),
        };
        let builder = QueryBuilder::new(&plan);
        let rows_statement = builder.build_sql();
        let count_statement = builder.build_count_sql();

        tracing::debug!(
            mode = plan.mode().as_str(),
            predicates = plan.predicates().len(),
            aa_flag = plan.aa_flag(),
            limit = plan.limit(),
            sql = %rows_statement,
            binding = %rows_statement.binding,
            "Executing catalog search"
        );

        let rows = session
            .fetch_rows(QueryStage::Rows, &rows_statement)
            .await?;
        let count = session.fetch_count(&count_statement).await?;

        let results = shape::shape_rows(&plan, rows).map_err(|e| Error::QueryExecution {
            stage: QueryStage::Rows,
            message: e.to_string(),
            statement: rows_statement.clone(),
        })?;

        metrics::SEARCH_RESULTS
            .with_label_values(&[plan.mode().as_str()])
            .observe(results.len() as f64);

        let aa_flag = match plan.mode() {
            SearchMode::MusicSearch => Some(plan.aa_flag()),
            _ => None,
        };

        Ok(SearchResult {
            results,
            count,
            aa_flag,
        })
    }

    /// Canonical book names with their source indices.
    pub async fn list_books(&self, session: &mut dyn CatalogSession) -> Result<BookIndex> {
        let statement = books_statement();
        let rows = session.fetch_rows(QueryStage::Books, &statement).await?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            let mut columns = row.into_iter();
            match (columns.next(), columns.next()) {
                (Some(src), Some(canonical)) => {
                    pairs.push((src.unwrap_or_default(), canonical.unwrap_or_default()))
                }
                _ => {
                    return Err(Error::QueryExecution {
                        stage: QueryStage::Books,
                        message: "expected columns src and canonical".to_string(),
                        statement,
                    })
                }
            }
        }

        let books = BookIndex::from_pairs(pairs);
        metrics::SEARCH_RESULTS
            .with_label_values(&[SearchMode::IndexedBooks.as_str()])
            .observe(books.len() as f64);
        Ok(books)
    }
}

/// Prefixes `error: ""` to a success body.
fn envelope(body: JsonValue) -> JsonValue {
    let mut out = serde_json::Map::new();
    out.insert("error".to_string(), JsonValue::String(String::new()));
    if let JsonValue::Object(fields) = body {
        for (key, value) in fields {
            if !value.is_null() {
                out.insert(key, value);
            }
        }
    }
    JsonValue::Object(out)
}
