//! Database layer - store traits and the MySQL implementation

pub mod mysql;
pub mod store;

pub use mysql::MySqlCatalogStore;
pub use store::{CatalogSession, CatalogStore};
