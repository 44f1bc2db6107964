//! Tests for M5: Index invariants under random operation sequences
//!
//! Generates random create / status-change sequences and checks the
//! indices and search results against a brute-force model.

use listingdb::{ListingDB, NewProperty, Status};
use proptest::prelude::*;

const LOCATIONS: [&str; 3] = ["NY", "LA", "Jakarta"];
const OWNERS: [&str; 2] = ["user_1", "user_2"];

#[derive(Debug, Clone)]
enum Operation {
    Add { owner: usize, location: usize, price: u32 },
    SetStatus { target: usize, sold: bool, requester: usize },
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0..OWNERS.len(), 0..LOCATIONS.len(), 1u32..50)
            .prop_map(|(owner, location, price)| Operation::Add { owner, location, price: price * 100 }),
        (0usize..64, any::<bool>(), 0..OWNERS.len())
            .prop_map(|(target, sold, requester)| Operation::SetStatus { target, sold, requester }),
    ]
}

fn apply(db: &ListingDB, op: &Operation) {
    match *op {
        Operation::Add { owner, location, price } => {
            db.properties()
                .add(OWNERS[owner], NewProperty::new(LOCATIONS[location], price as f64, "Flat"))
                .unwrap();
        }
        Operation::SetStatus { target, sold, requester } => {
            let count = db.properties().count();
            if count == 0 {
                return;
            }
            let id = format!("property_{}", target % count + 1);
            let status = if sold { Status::Sold } else { Status::Available };
            // rejections (foreign owner, no-op) are part of the sequence
            let _ = db.properties().set_status(&id, status, OWNERS[requester]);
        }
    }
}

proptest! {
    #[test]
    fn test_price_index_tracks_available_set(ops in proptest::collection::vec(operation_strategy(), 1..80)) {
        let db = ListingDB::new();
        for op in &ops {
            apply(&db, op);
            prop_assert!(db.catalog().indices_consistent());
        }
    }

    #[test]
    fn test_price_range_matches_brute_force(
        ops in proptest::collection::vec(operation_strategy(), 1..80),
        lo in 0u32..5000,
        width in 0u32..5000,
    ) {
        let db = ListingDB::new();
        for op in &ops {
            apply(&db, op);
        }
        let (lo, hi) = (lo as f64, (lo + width) as f64);

        let mut expected: Vec<(f64, String)> = (1..=db.properties().count())
            .filter_map(|n| db.properties().get(&format!("property_{}", n)))
            .filter(|p| p.status == Status::Available && p.price >= lo && p.price <= hi)
            .map(|p| (p.price, p.id))
            .collect();
        expected.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let outcome = db.properties().search().price_between(lo, hi).limit(100).collect().unwrap();
        let actual: Vec<(f64, String)> = outcome.data.into_iter().map(|p| (p.price, p.id)).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_unfiltered_search_pages_cover_available_set(
        ops in proptest::collection::vec(operation_strategy(), 1..80),
        limit in 1usize..7,
    ) {
        let db = ListingDB::new();
        for op in &ops {
            apply(&db, op);
        }
        let available = db.catalog().available_count();

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let outcome = db.properties().search().limit(limit).page(page).collect().unwrap();
            if outcome.data.is_empty() {
                break;
            }
            prop_assert!(outcome.data.len() <= limit);
            seen.extend(outcome.data.into_iter().map(|p| p.id));
            page += 1;
        }
        prop_assert_eq!(seen.len(), available);
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), seen.len());
    }
}
