// ListingDB v0.1.0 - In-Memory Property Listing Catalog
// Price/location indices, filtered search, per-user shortlists

pub mod types;
pub mod error;
pub mod config;
pub mod index;
pub mod catalog;
pub mod shortlist;
pub mod search;
pub mod stores;
pub mod db;

// Re-export main types
pub use db::ListingDB;
pub use types::{NewProperty, Property, PropertyId, ShortlistEntry, SortKey, Status, Outcome, Trace, Plan, Step};
pub use error::{CatalogError, ErrorKind, ValidationError};
pub use config::CatalogConfig;
pub use search::{Search, SearchCriteria};
pub use stores::{PropertyStore, ShortlistStore};
