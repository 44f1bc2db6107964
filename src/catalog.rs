//! Catalog Store
//!
//! Owns the canonical property records together with both secondary
//! indices behind one `parking_lot::RwLock`. Writers (create, status
//! change) take the write lock, so records and indices always move
//! together; readers share the read lock and never see a half-applied
//! mutation.
//!
//! Records live in an append-only arena: `property_<n>` sits at slot
//! `n - 1`. Nothing is ever deleted.

use ahash::AHashMap;
use chrono::Utc;
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::index::{Indices, ListingIndex};
use crate::types::{NewProperty, Property, PropertyId, Status};

/// Everything guarded by the catalog lock.
#[derive(Debug, Default)]
pub struct CatalogState {
    properties: Vec<Property>,
    by_id: AHashMap<PropertyId, u32>,
    indices: Indices,
}

impl CatalogState {
    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[inline]
    pub fn at(&self, slot: u32) -> &Property {
        &self.properties[slot as usize]
    }

    pub fn slot_of(&self, id: &str) -> Option<u32> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.slot_of(id).map(|slot| self.at(slot))
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    /// True when both indices hold exactly the Available listings, the
    /// price index in (price, id) order.
    pub fn indices_consistent(&self) -> bool {
        let mut expected: Vec<(f64, &str)> = self
            .properties
            .iter()
            .filter(|p| p.is_available())
            .map(|p| (p.price, p.id.as_str()))
            .collect();
        expected.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        let actual: Vec<(f64, &str)> = self
            .indices
            .price
            .entries()
            .iter()
            .map(|e| (e.price, e.id.as_str()))
            .collect();
        if expected != actual {
            return false;
        }

        if self.indices.location.count() != expected.len() {
            return false;
        }
        self.properties.iter().enumerate().all(|(slot, p)| {
            let listed = self.indices.location.lookup(&p.location).contains(&(slot as u32));
            listed == p.is_available()
        })
    }
}

pub struct CatalogStore {
    state: RwLock<CatalogState>,
    max_location_len: usize,
}

impl CatalogStore {
    pub fn new(max_location_len: usize) -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
            max_location_len,
        }
    }

    /// Shared read access to records and indices.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read()
    }

    /// Create a listing owned by `owner_id`. Always starts Available.
    pub fn add_property(&self, owner_id: &str, details: NewProperty) -> Result<Property> {
        details.validate(self.max_location_len)?;

        let mut state = self.state.write();
        let slot = state.properties.len() as u32;
        let property = Property {
            id: format!("property_{}", slot + 1),
            owner_id: owner_id.to_string(),
            location: details.location,
            price: details.price,
            property_type: details.property_type,
            status: Status::Available,
            created_at: Utc::now(),
            description: details.description,
            amenities: details.amenities,
        };

        state.by_id.insert(property.id.clone(), slot);
        state.indices.insert(slot, &property);
        state.properties.push(property.clone());

        debug!(
            property_id = %property.id,
            owner = %property.owner_id,
            location = %property.location,
            price = property.price,
            "property added"
        );
        Ok(property)
    }

    /// Move a listing between Available and Sold. Only the owner may do so,
    /// and a request for the current status is rejected as a no-op.
    pub fn update_status(&self, property_id: &str, status: Status, requester_id: &str) -> Result<()> {
        let mut state = self.state.write();
        let CatalogState { properties, by_id, indices } = &mut *state;

        let Some(&slot) = by_id.get(property_id) else {
            debug!(property_id, kind = "not_found", "status update rejected");
            return Err(CatalogError::NotFound(property_id.to_string()));
        };
        let property = &mut properties[slot as usize];

        if property.owner_id != requester_id {
            debug!(property_id, requester_id, kind = "unauthorized", "status update rejected");
            return Err(CatalogError::Unauthorized {
                property_id: property_id.to_string(),
                requester: requester_id.to_string(),
            });
        }
        if property.status == status {
            debug!(property_id, %status, kind = "no_op", "status update rejected");
            return Err(CatalogError::NoOp(status));
        }

        match (property.status, status) {
            (Status::Available, Status::Sold) => indices.remove(slot, property),
            (Status::Sold, Status::Available) => indices.insert(slot, property),
            _ => {}
        }
        property.status = status;

        debug!(property_id, %status, "property status updated");
        Ok(())
    }

    /// Available listings of `owner_id`, newest first.
    pub fn list_by_owner(&self, owner_id: &str) -> Vec<Property> {
        let state = self.state.read();
        let mut owned: Vec<(u32, &Property)> = state
            .properties
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner_id == owner_id && p.is_available())
            .map(|(slot, p)| (slot as u32, p))
            .collect();
        // Equal timestamps fall back to creation order
        owned.sort_by(|(sa, a), (sb, b)| b.created_at.cmp(&a.created_at).then_with(|| sb.cmp(sa)));
        owned.into_iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn get(&self, property_id: &str) -> Option<Property> {
        self.state.read().get(property_id).cloned()
    }

    pub fn contains(&self, property_id: &str) -> bool {
        self.state.read().by_id.contains_key(property_id)
    }

    pub fn len(&self) -> usize {
        self.state.read().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listings currently in the price index.
    pub fn available_count(&self) -> usize {
        self.state.read().indices.price.count()
    }

    pub fn indices_consistent(&self) -> bool {
        self.state.read().indices_consistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn store() -> CatalogStore {
        CatalogStore::new(1024)
    }

    #[test]
    fn test_ids_are_sequential() {
        let catalog = store();
        let a = catalog.add_property("user_1", NewProperty::new("NY", 5000.0, "Apartment")).unwrap();
        let b = catalog.add_property("user_2", NewProperty::new("LA", 100.0, "Villa")).unwrap();
        assert_eq!(a.id, "property_1");
        assert_eq!(b.id, "property_2");
        assert_eq!(a.status, Status::Available);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_invalid_price_leaves_catalog_untouched() {
        let catalog = store();
        let err = catalog.add_property("user_1", NewProperty::new("NY", 0.0, "Flat")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(catalog.is_empty());
        assert_eq!(catalog.available_count(), 0);
    }

    #[test]
    fn test_status_transitions_move_index_entries() {
        let catalog = store();
        let p = catalog.add_property("user_1", NewProperty::new("NY", 5000.0, "Flat")).unwrap();
        assert_eq!(catalog.available_count(), 1);

        catalog.update_status(&p.id, Status::Sold, "user_1").unwrap();
        assert_eq!(catalog.available_count(), 0);
        assert!(catalog.read().indices().location.lookup("NY").is_empty());
        assert!(catalog.indices_consistent());

        catalog.update_status(&p.id, Status::Available, "user_1").unwrap();
        assert_eq!(catalog.available_count(), 1);
        assert!(catalog.indices_consistent());
    }

    #[test]
    fn test_update_status_error_order() {
        let catalog = store();
        let p = catalog.add_property("user_1", NewProperty::new("NY", 5000.0, "Flat")).unwrap();

        let missing = catalog.update_status("property_99", Status::Sold, "user_1").unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        // ownership is checked before the no-op rule
        let foreign = catalog.update_status(&p.id, Status::Available, "user_2").unwrap_err();
        assert_eq!(foreign.kind(), ErrorKind::Unauthorized);

        let same = catalog.update_status(&p.id, Status::Available, "user_1").unwrap_err();
        assert_eq!(same, CatalogError::NoOp(Status::Available));
    }

    #[test]
    fn test_list_by_owner_newest_first() {
        let catalog = store();
        for i in 0..3 {
            catalog.add_property("user_1", NewProperty::new("NY", 100.0 + i as f64, "Flat")).unwrap();
        }
        catalog.add_property("user_2", NewProperty::new("NY", 1.0, "Flat")).unwrap();

        let ids: Vec<String> = catalog.list_by_owner("user_1").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["property_3", "property_2", "property_1"]);

        catalog.update_status("property_2", Status::Sold, "user_1").unwrap();
        let ids: Vec<String> = catalog.list_by_owner("user_1").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["property_3", "property_1"]);
        assert!(catalog.list_by_owner("nobody").is_empty());
    }
}
