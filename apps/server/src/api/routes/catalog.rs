//! Catalog API routes
//!
//! The `.php` paths keep existing clients working.

use crate::api::handlers::{contact_handler, search_handler};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/search", get(search_handler).post(search_handler))
        .route("/search.php", get(search_handler).post(search_handler))
        .route("/api/contact", post(contact_handler))
        .route("/contact.php", post(contact_handler))
}
