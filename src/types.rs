use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub type PropertyId = String;

/// Listing lifecycle state. Closed set; anything else is rejected at the boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Available,
    Sold,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Sold => "Sold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Status::Available),
            "Sold" => Ok(Status::Sold),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Field used to order search results.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Timestamp,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Timestamp => "timestamp",
        }
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(SortKey::Price),
            "timestamp" => Ok(SortKey::Timestamp),
            other => Err(ValidationError::UnknownSortKey(other.to_string())),
        }
    }
}

/// A listing record. Everything except `status` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "property_id")]
    pub id: PropertyId,
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub location: String,
    pub price: f64,
    pub property_type: String,
    pub status: Status,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl Property {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }
}

/// Caller-supplied details for a new listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub location: String,
    pub price: f64,
    pub property_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl NewProperty {
    pub fn new(location: &str, price: f64, property_type: &str) -> Self {
        Self {
            location: location.to_string(),
            price,
            property_type: property_type.to_string(),
            description: String::new(),
            amenities: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn amenities(mut self, amenities: &[&str]) -> Self {
        self.amenities = amenities.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Price must be finite and > 0. NaN is rejected so the price index stays totally ordered.
    pub fn validate(&self, max_location_len: usize) -> Result<(), ValidationError> {
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err(ValidationError::NonPositivePrice(self.price));
        }
        if self.location.is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        if self.location.len() > max_location_len {
            return Err(ValidationError::LocationTooLong { max: max_location_len });
        }
        Ok(())
    }
}

/// One row of a user's shortlist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlistEntry {
    pub shortlisted_at: DateTime<Utc>,
    pub property_id: PropertyId,
}

// ============ SEARCH PIPELINE TYPES ============

/// A single stage of a search plan.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    PriceRange(Option<f64>, Option<f64>),
    Location(String),
    PropertyType(String),
    Status(Status),
    Sort(SortKey, bool),              // key, descending
    Paginate(usize, usize),           // page, limit
}

impl Step {
    pub fn atom(&self) -> &'static str {
        match self {
            Step::PriceRange(..) => "price_range",
            Step::Location(_) => "location",
            Step::PropertyType(_) => "property_type",
            Step::Status(_) => "status",
            Step::Sort(..) => "sort",
            Step::Paginate(..) => "paginate",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Step::PriceRange(min, max) => serde_json::json!({ "op": "price_range", "min": min, "max": max }),
            Step::Location(loc) => serde_json::json!({ "op": "location", "value": loc }),
            Step::PropertyType(t) => serde_json::json!({ "op": "property_type", "value": t }),
            Step::Status(s) => serde_json::json!({ "op": "status", "value": s.as_str() }),
            Step::Sort(key, desc) => serde_json::json!({ "op": "sort", "key": key.as_str(), "descending": desc }),
            Step::Paginate(page, limit) => serde_json::json!({ "op": "paginate", "page": page, "limit": limit }),
        }
    }
}

/// Execution trace for observability
#[derive(Clone, Debug)]
pub struct StepReport {
    pub atom: String,
    pub input_size: usize,
    pub output_size: usize,
    pub index_used: String,
    pub time_us: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Trace {
    pub steps: Vec<StepReport>,
    pub total_us: u64,
}

/// Every search returns Outcome<T> — data + trace
#[derive(Clone, Debug)]
pub struct Outcome<T> {
    pub data: T,
    pub trace: Trace,
}

/// Plan type returned by explain()
#[derive(Clone, Debug)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Trace {
    /// Name of the index (or "scan") that served a given stage.
    pub fn index_for(&self, atom: &str) -> Option<&str> {
        self.steps.iter().find(|s| s.atom == atom).map(|s| s.index_used.as_str())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "steps": self.steps.iter().map(|s| serde_json::json!({
                "atom": s.atom,
                "input_size": s.input_size,
                "output_size": s.output_size,
                "index_used": s.index_used,
                "time_us": s.time_us
            })).collect::<Vec<_>>(),
            "total_us": self.total_us
        })
    }
}

impl Outcome<Vec<Property>> {
    pub fn to_json_response(&self) -> serde_json::Value {
        serde_json::json!({
            "data": self.data,
            "trace": self.trace.to_json()
        })
    }
}
