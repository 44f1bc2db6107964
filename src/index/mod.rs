//! Secondary Index Module
//!
//! Indices over the Available listings, kept in lockstep with the catalog.
//!
//! Design:
//! - PriceIndex: sorted vector of (price, id), O(log n) range bounds
//! - LocationIndex: location -> slots, insertion order kept per bucket
//! - No internal locking: mutated only under the catalog write lock,
//!   read under its read lock

mod location_index;
mod price_index;

pub use location_index::LocationIndex;
pub use price_index::{PriceEntry, PriceIndex};

use crate::types::Property;

/// Secondary index over catalog slots
pub trait ListingIndex {
    /// Add a property stored at `slot`
    fn insert(&mut self, slot: u32, property: &Property);

    /// Remove a property stored at `slot`. Returns false if it was not indexed.
    fn remove(&mut self, slot: u32, property: &Property) -> bool;

    /// Get index name
    fn name(&self) -> &str;

    /// Get indexed count
    fn count(&self) -> usize;
}

/// Both secondary indices, updated together.
#[derive(Debug, Default)]
pub struct Indices {
    pub price: PriceIndex,
    pub location: LocationIndex,
}

impl Indices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: u32, property: &Property) {
        self.price.insert(slot, property);
        self.location.insert(slot, property);
    }

    pub fn remove(&mut self, slot: u32, property: &Property) {
        let in_price = self.price.remove(slot, property);
        let in_location = self.location.remove(slot, property);
        if !(in_price && in_location) {
            tracing::debug!(
                property_id = %property.id,
                in_price,
                in_location,
                "index removal found a missing entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use chrono::Utc;

    fn listing(n: u32, location: &str, price: f64, status: Status) -> Property {
        Property {
            id: format!("property_{}", n),
            owner_id: "user_1".into(),
            location: location.into(),
            price,
            property_type: "Flat".into(),
            status,
            created_at: Utc::now(),
            description: String::new(),
            amenities: Vec::new(),
        }
    }

    #[test]
    fn test_indices_lockstep() {
        let mut idx = Indices::new();
        let a = listing(1, "NY", 5000.0, Status::Available);
        let b = listing(2, "NY", 9600.0, Status::Available);
        idx.insert(0, &a);
        idx.insert(1, &b);
        assert_eq!(idx.price.count(), 2);
        assert_eq!(idx.location.lookup("NY"), &[0, 1]);

        idx.remove(0, &a);
        assert_eq!(idx.price.count(), 1);
        assert_eq!(idx.location.lookup("NY"), &[1]);

        idx.remove(1, &b);
        assert_eq!(idx.price.count(), 0);
        assert_eq!(idx.location.bucket_count(), 0);
    }
}
