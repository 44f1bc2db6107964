//! Location Index for O(1) Equality Lookups
//!
//! location -> catalog slots. Buckets keep insertion order and are
//! dropped as soon as they empty.

use super::ListingIndex;
use crate::types::Property;
use ahash::AHashMap;
use smallvec::SmallVec;

#[derive(Debug, Default)]
pub struct LocationIndex {
    buckets: AHashMap<String, SmallVec<[u32; 8]>>,
    count: usize,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots at `location`, in insertion order. Empty if unknown.
    pub fn lookup(&self, location: &str) -> &[u32] {
        self.buckets.get(location).map(|b| b.as_slice()).unwrap_or(&[])
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl ListingIndex for LocationIndex {
    fn insert(&mut self, slot: u32, property: &Property) {
        let bucket = self.buckets.entry(property.location.clone()).or_default();
        if !bucket.contains(&slot) {
            bucket.push(slot);
            self.count += 1;
        }
    }

    fn remove(&mut self, slot: u32, property: &Property) -> bool {
        let Some(bucket) = self.buckets.get_mut(&property.location) else {
            return false;
        };
        // Order-preserving removal
        let Some(pos) = bucket.iter().position(|&s| s == slot) else {
            return false;
        };
        bucket.remove(pos);
        self.count -= 1;
        if bucket.is_empty() {
            self.buckets.remove(&property.location);
        }
        true
    }

    fn name(&self) -> &str {
        "location_index"
    }

    fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use chrono::Utc;

    fn at(n: u32, location: &str) -> Property {
        Property {
            id: format!("property_{}", n + 1),
            owner_id: "user_1".into(),
            location: location.into(),
            price: 1.0,
            property_type: "Villa".into(),
            status: Status::Available,
            created_at: Utc::now(),
            description: String::new(),
            amenities: Vec::new(),
        }
    }

    #[test]
    fn test_location_index_basic() {
        let mut idx = LocationIndex::new();
        idx.insert(0, &at(0, "Washington"));
        idx.insert(1, &at(1, "Washington"));
        idx.insert(2, &at(2, "New York"));

        assert_eq!(idx.lookup("Washington"), &[0, 1]);
        assert_eq!(idx.lookup("New York"), &[2]);
        assert!(idx.lookup("Jakarta").is_empty());
        assert_eq!(idx.count(), 3);
    }

    #[test]
    fn test_removal_keeps_order_and_prunes() {
        let mut idx = LocationIndex::new();
        for n in 0..4 {
            idx.insert(n, &at(n, "NY"));
        }
        assert!(idx.remove(1, &at(1, "NY")));
        assert_eq!(idx.lookup("NY"), &[0, 2, 3]);

        for n in [0, 2, 3] {
            idx.remove(n, &at(n, "NY"));
        }
        assert_eq!(idx.bucket_count(), 0);
        assert_eq!(idx.count(), 0);
        assert!(!idx.remove(0, &at(0, "NY")));
    }

    #[test]
    fn test_reinsert_appends_to_end() {
        let mut idx = LocationIndex::new();
        idx.insert(0, &at(0, "NY"));
        idx.insert(1, &at(1, "NY"));
        idx.remove(0, &at(0, "NY"));
        idx.insert(0, &at(0, "NY"));
        assert_eq!(idx.lookup("NY"), &[1, 0]);
    }
}
