use crate::catalog::CatalogStore;
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::search::{Search, SearchCriteria};
use crate::shortlist::ShortlistManager;
use crate::stores::{PropertyStore, ShortlistStore};
use crate::types::{Outcome, Property};

/// Process-wide listing store. Build once at startup and hand out
/// `&ListingDB` (or `Arc<ListingDB>`) to request handlers.
pub struct ListingDB {
    catalog: CatalogStore,
    shortlist: ShortlistManager,
    config: CatalogConfig,
}

impl ListingDB {
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        tracing::info!(
            default_limit = config.default_limit,
            max_limit = ?config.max_limit,
            parallel_scan_threshold = config.parallel_scan_threshold,
            "listing catalog initialised"
        );
        Self {
            catalog: CatalogStore::new(config.max_location_len),
            shortlist: ShortlistManager::new(),
            config,
        }
    }

    // --- Resource Accessors (Public API) ---
    pub fn properties(&self) -> PropertyStore<'_> { PropertyStore::new(self) }
    pub fn shortlists(&self) -> ShortlistStore<'_> { ShortlistStore::new(self) }

    /// Run a search described by a whole criteria document.
    pub fn search_with(&self, criteria: &SearchCriteria) -> Result<Outcome<Vec<Property>>> {
        Search::new(self, criteria.clone()).collect()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub(crate) fn shortlist(&self) -> &ShortlistManager {
        &self.shortlist
    }
}

impl Default for ListingDB {
    fn default() -> Self {
        Self::new()
    }
}
