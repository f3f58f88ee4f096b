//! Store traits for catalog queries
//!
//! A search acquires one [`CatalogSession`] and runs its statements on it in
//! order: rows, then count. Implementations translate driver failures into
//! [`Error::StoreConnection`](crate::Error::StoreConnection) when acquiring a
//! session and [`Error::QueryExecution`](crate::Error::QueryExecution) when
//! running a statement.

use crate::{error::QueryStage, Result};
use async_trait::async_trait;
use birdland_query::{ResultRow, Statement};

/// Source of per-request store sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn session(&self) -> Result<Box<dyn CatalogSession>>;
}

/// One store connection, used sequentially by a single request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSession: Send {
    /// Run a row-returning statement. Every column is decoded as a nullable string.
    ///
    /// `stage` labels the statement in errors and metrics.
    async fn fetch_rows(&mut self, stage: QueryStage, statement: &Statement)
        -> Result<Vec<ResultRow>>;

    /// Run a `SELECT COUNT(*)` statement and return its single value.
    async fn fetch_count(&mut self, statement: &Statement) -> Result<i64>;
}
