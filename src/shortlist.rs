//! Shortlist Manager
//!
//! Per-user ordered lists of shortlisted property ids. Sharded with
//! `DashMap`: a user's list is only mutated while its shard entry is held,
//! independent of the catalog lock.
//!
//! A user's list is created lazily on the first shortlist and is never
//! pruned, even after its last entry is removed.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::error::{CatalogError, Result};
use crate::types::{PropertyId, ShortlistEntry};

#[derive(Debug, Default)]
pub struct ShortlistManager {
    lists: DashMap<String, Vec<ShortlistEntry>>,
}

impl ShortlistManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `property_id` to `user_id`'s list, stamped with the current time.
    pub fn shortlist(&self, catalog: &CatalogStore, user_id: &str, property_id: &str) -> Result<ShortlistEntry> {
        // Listings are never deleted, so existence cannot change after this check.
        if !catalog.contains(property_id) {
            debug!(user_id, property_id, kind = "not_found", "shortlist rejected");
            return Err(CatalogError::NotFound(property_id.to_string()));
        }

        let mut list = self.lists.entry(user_id.to_string()).or_default();
        if list.iter().any(|e| e.property_id == property_id) {
            debug!(user_id, property_id, kind = "already_shortlisted", "shortlist rejected");
            return Err(CatalogError::AlreadyShortlisted(property_id.to_string()));
        }

        let entry = ShortlistEntry {
            shortlisted_at: Utc::now(),
            property_id: property_id.to_string(),
        };
        // Sorted by time; equal stamps keep insertion order.
        let pos = list.partition_point(|e| e.shortlisted_at <= entry.shortlisted_at);
        list.insert(pos, entry.clone());

        debug!(user_id, property_id, size = list.len(), "property shortlisted");
        Ok(entry)
    }

    pub fn unshortlist(&self, user_id: &str, property_id: &str) -> Result<()> {
        let Some(mut list) = self.lists.get_mut(user_id) else {
            debug!(user_id, property_id, kind = "empty_shortlist", "unshortlist rejected");
            return Err(CatalogError::EmptyShortlist);
        };
        let Some(pos) = list.iter().position(|e| e.property_id == property_id) else {
            debug!(user_id, property_id, kind = "not_in_shortlist", "unshortlist rejected");
            return Err(CatalogError::NotInShortlist(property_id.to_string()));
        };
        list.remove(pos);

        debug!(user_id, property_id, size = list.len(), "property unshortlisted");
        Ok(())
    }

    /// Stored entries in shortlist-time order, Sold listings included.
    pub fn entries(&self, user_id: &str) -> Vec<ShortlistEntry> {
        self.lists.get(user_id).map(|l| l.value().clone()).unwrap_or_default()
    }

    /// Shortlisted ids, most recent first.
    pub fn ids_newest_first(&self, user_id: &str) -> Vec<PropertyId> {
        self.lists
            .get(user_id)
            .map(|l| l.iter().rev().map(|e| e.property_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn has_list(&self, user_id: &str) -> bool {
        self.lists.contains_key(user_id)
    }
}
