//! Services - business logic between the HTTP layer and the store

pub mod contact;
pub mod search;

pub use contact::{ContactForm, ContactMessage, ContactService, Mailer};
pub use search::{SearchResult, SearchService};
