//! Birdland catalog search server
//!
//! HTTP API over the Birdland music catalog:
//! - Music and audio searches with full-text and substring filters
//! - Indexed-books listing
//! - Contact form delivery through a mail relay

#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
