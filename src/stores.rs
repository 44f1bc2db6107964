use crate::db::ListingDB;
use crate::error::Result;
use crate::search::{self, Search, SearchCriteria};
use crate::types::{NewProperty, Property, ShortlistEntry, Status};

// ============ PROPERTY STORE ============

/// Borrowing wrapper for listing operations.
pub struct PropertyStore<'db>(&'db ListingDB);

impl<'db> PropertyStore<'db> {
    pub(crate) fn new(db: &'db ListingDB) -> Self {
        Self(db)
    }

    /// Create a listing owned by `owner_id`
    pub fn add(&self, owner_id: &str, details: NewProperty) -> Result<Property> {
        self.0.catalog().add_property(owner_id, details)
    }

    /// Change status; only the owner may, and only to a different status
    pub fn set_status(&self, property_id: &str, status: Status, requester_id: &str) -> Result<()> {
        self.0.catalog().update_status(property_id, status, requester_id)
    }

    pub fn get(&self, property_id: &str) -> Option<Property> {
        self.0.catalog().get(property_id)
    }

    /// Available listings of an owner, newest first
    pub fn owned_by(&self, owner_id: &str) -> Vec<Property> {
        self.0.catalog().list_by_owner(owner_id)
    }

    /// Total listings ever created
    pub fn count(&self) -> usize {
        self.0.catalog().len()
    }

    // --- Query entry point ---

    /// Start a search with default criteria (Available, by price, page 1)
    pub fn search(&self) -> Search<'db> {
        Search::new(self.0, SearchCriteria::default())
    }
}

// ============ SHORTLIST STORE ============

/// Borrowing wrapper for per-user shortlists.
pub struct ShortlistStore<'db>(&'db ListingDB);

impl<'db> ShortlistStore<'db> {
    pub(crate) fn new(db: &'db ListingDB) -> Self {
        Self(db)
    }

    pub fn add(&self, user_id: &str, property_id: &str) -> Result<ShortlistEntry> {
        self.0.shortlist().shortlist(self.0.catalog(), user_id, property_id)
    }

    pub fn remove(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.0.shortlist().unshortlist(user_id, property_id)
    }

    /// Available shortlisted listings, most recently shortlisted first
    pub fn list(&self, user_id: &str) -> Vec<Property> {
        search::shortlisted(self.0, user_id)
    }

    /// Raw stored entries, oldest first, Sold listings included
    pub fn raw_entries(&self, user_id: &str) -> Vec<ShortlistEntry> {
        self.0.shortlist().entries(user_id)
    }
}
