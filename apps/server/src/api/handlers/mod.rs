//! Request handlers for API endpoints

pub mod contact;
pub mod metrics;
pub mod search;

pub use contact::contact_handler;
pub use metrics::metrics_handler;
pub use search::search_handler;
