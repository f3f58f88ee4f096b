//! Query construction for the Birdland catalog search.
//!
//! Turns raw request key/value pairs into parametrized SQL:
//! - [`SearchRequest`] normalizes the caller's fields into a [`FilterSet`]
//! - [`QueryPlan`] maps present filters to predicate fragments and join decisions
//! - [`QueryBuilder`] renders the rows and count statements from one shared clause
//! - [`shape`] and [`books`] turn fetched rows into caller-facing structures
//!
//! Nothing in this crate touches the database; statements are executed by the server.

#![forbid(unsafe_code)]

mod bind;
pub mod books;
mod error;
mod filter;
mod plan;
mod query_builder;
pub mod shape;

pub use bind::{BindValue, Binding};
pub use books::{BookEntry, BookIndex};
pub use error::{RequestError, Result};
pub use filter::{FilterSet, SearchMode, SearchRequest, DEFAULT_LIMIT};
pub use plan::{Predicate, QueryPlan};
pub use query_builder::{QueryBuilder, Statement};
pub use shape::ResultRow;
