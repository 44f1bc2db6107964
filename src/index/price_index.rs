//! Price Index for O(log n) Range Queries
//!
//! Cache-friendly sorted array with binary search, ordered by
//! (price, property id).

use super::ListingIndex;
use crate::types::{Property, PropertyId};
use std::cmp::Ordering;

/// Entry in the sorted index
#[derive(Clone, Debug, PartialEq)]
pub struct PriceEntry {
    pub price: f64,
    pub id: PropertyId,
    pub slot: u32,
}

impl PriceEntry {
    #[inline]
    fn cmp_key(&self, price: f64, id: &str) -> Ordering {
        self.price.total_cmp(&price).then_with(|| self.id.as_str().cmp(id))
    }
}

/// Range index using sorted array + binary search
#[derive(Debug, Default)]
pub struct PriceIndex {
    data: Vec<PriceEntry>,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// First position with price >= min
    fn lower_bound(data: &[PriceEntry], min: f64) -> usize {
        data.partition_point(|e| e.price < min)
    }

    /// First position with price > max
    fn upper_bound(data: &[PriceEntry], max: f64) -> usize {
        data.partition_point(|e| e.price <= max)
    }

    /// Entries with min <= price <= max (both inclusive). Open bounds are unbounded.
    pub fn lookup_range(&self, min: Option<f64>, max: Option<f64>) -> &[PriceEntry] {
        let start = min.map_or(0, |m| Self::lower_bound(&self.data, m));
        let end = max.map_or(self.data.len(), |m| Self::upper_bound(&self.data, m));
        if start >= end {
            return &[];
        }
        &self.data[start..end]
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.data
    }

    pub fn contains(&self, price: f64, id: &str) -> bool {
        self.data.binary_search_by(|e| e.cmp_key(price, id)).is_ok()
    }
}

impl ListingIndex for PriceIndex {
    fn insert(&mut self, slot: u32, property: &Property) {
        match self.data.binary_search_by(|e| e.cmp_key(property.price, &property.id)) {
            Ok(_) => {}
            Err(pos) => self.data.insert(
                pos,
                PriceEntry { price: property.price, id: property.id.clone(), slot },
            ),
        }
    }

    fn remove(&mut self, _slot: u32, property: &Property) -> bool {
        match self.data.binary_search_by(|e| e.cmp_key(property.price, &property.id)) {
            Ok(pos) => {
                self.data.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "price_index"
    }

    fn count(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use chrono::Utc;

    fn listing(id: &str, price: f64) -> Property {
        Property {
            id: id.into(),
            owner_id: "user_1".into(),
            location: "NY".into(),
            price,
            property_type: "Flat".into(),
            status: Status::Available,
            created_at: Utc::now(),
            description: String::new(),
            amenities: Vec::new(),
        }
    }

    fn ids(entries: &[PriceEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_price_insert_lookup() {
        let mut idx = PriceIndex::new();
        idx.insert(0, &listing("property_1", 100.0));
        idx.insert(1, &listing("property_2", 200.0));
        idx.insert(2, &listing("property_3", 300.0));

        let result = idx.lookup_range(Some(150.0), Some(250.0));
        assert_eq!(ids(result), vec!["property_2"]);
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let mut idx = PriceIndex::new();
        idx.insert(0, &listing("property_1", 5000.0));
        idx.insert(1, &listing("property_2", 9600.0));
        idx.insert(2, &listing("property_3", 10000.0));

        assert_eq!(idx.lookup_range(Some(5000.0), Some(10000.0)).len(), 3);
        assert_eq!(ids(idx.lookup_range(Some(6000.0), None)), vec!["property_2", "property_3"]);
        assert_eq!(ids(idx.lookup_range(None, Some(5000.0))), vec!["property_1"]);
        assert!(idx.lookup_range(Some(20000.0), None).is_empty());
        assert!(idx.lookup_range(Some(9000.0), Some(8000.0)).is_empty());
    }

    #[test]
    fn test_equal_price_tie_break_by_id() {
        let mut idx = PriceIndex::new();
        idx.insert(2, &listing("property_3", 100.0));
        idx.insert(0, &listing("property_1", 100.0));
        idx.insert(1, &listing("property_2", 100.0));

        assert_eq!(ids(idx.entries()), vec!["property_1", "property_2", "property_3"]);
        assert_eq!(idx.lookup_range(Some(100.0), Some(100.0)).len(), 3);
    }

    #[test]
    fn test_price_remove() {
        let mut idx = PriceIndex::new();
        let a = listing("property_1", 100.0);
        let b = listing("property_2", 200.0);
        idx.insert(0, &a);
        idx.insert(1, &b);

        assert!(idx.remove(0, &a));
        assert_eq!(idx.count(), 1);
        assert!(!idx.contains(100.0, "property_1"));

        // absent entry is a no-op
        assert!(!idx.remove(0, &a));
        assert_eq!(idx.count(), 1);
    }

    #[test]
    fn test_duplicate_insert_ignored() {
        let mut idx = PriceIndex::new();
        let a = listing("property_1", 100.0);
        idx.insert(0, &a);
        idx.insert(0, &a);
        assert_eq!(idx.count(), 1);
    }
}
