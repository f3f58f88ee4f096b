//! Shared application state

use crate::{
    config::Config,
    db::{CatalogStore, MySqlCatalogStore},
    services::{contact, ContactService, Mailer, SearchService},
    Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub search_service: Arc<SearchService>,
    pub contact_service: Arc<ContactService>,
}

impl AppState {
    /// Build state with a lazily connecting MySQL pool and the configured mailer.
    ///
    /// No connection is attempted here; an unreachable database surfaces as a
    /// per-request store connection error.
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn CatalogStore> =
            Arc::new(MySqlCatalogStore::connect_lazy(&config.database)?);
        let mailer = contact::mailer_from_config(&config.mail)?;

        Ok(Self::from_parts(config, store, mailer))
    }

    /// Assemble state from explicit collaborators.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn CatalogStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let search_service = Arc::new(SearchService::new(store, config.search.default_limit));
        let contact_service = Arc::new(ContactService::new(mailer, config.mail.clone()));

        Self {
            config: Arc::new(config),
            search_service,
            contact_service,
        }
    }
}
