use crate::catalog::CatalogState;
use crate::config::CatalogConfig;
use crate::db::ListingDB;
use crate::error::{Result, ValidationError};
use crate::index::ListingIndex;
use crate::types::{Outcome, Plan, Property, SortKey, Status, Step, StepReport, Trace};
use rayon::prelude::*;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;

/// Filter, sort and page parameters of one search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub status: Status,
    pub sort_key: SortKey,
    pub descending: bool,
    pub page: usize,
    /// Falls back to `CatalogConfig::default_limit`
    pub limit: Option<usize>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            location: None,
            property_type: None,
            status: Status::Available,
            sort_key: SortKey::Price,
            descending: false,
            page: 1,
            limit: None,
        }
    }
}

impl SearchCriteria {
    /// Effective page size, validated against the configured bounds.
    pub fn resolve_limit(&self, config: &CatalogConfig) -> std::result::Result<usize, ValidationError> {
        let limit = self.limit.unwrap_or(config.default_limit);
        if limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        if let Some(max) = config.max_limit {
            if limit > max {
                return Err(ValidationError::LimitTooLarge { got: limit, max });
            }
        }
        if self.page == 0 {
            return Err(ValidationError::ZeroPage);
        }
        // NaN would read as "unbounded" on the index path and "no match" on a scan
        for (field, bound) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(value) = bound.filter(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteBound { field, value });
            }
        }
        Ok(limit)
    }

    // Empty strings mean "no filter", as a blank query parameter does.
    fn location_filter(&self) -> Option<&str> {
        self.location.as_deref().filter(|s| !s.is_empty())
    }

    fn type_filter(&self) -> Option<&str> {
        self.property_type.as_deref().filter(|s| !s.is_empty())
    }

    fn plan(&self, limit: usize) -> Vec<Step> {
        let mut steps = vec![Step::PriceRange(self.min_price, self.max_price)];
        if let Some(loc) = self.location_filter() {
            steps.push(Step::Location(loc.to_string()));
        }
        if let Some(t) = self.type_filter() {
            steps.push(Step::PropertyType(t.to_string()));
        }
        steps.push(Step::Status(self.status));
        steps.push(Step::Sort(self.sort_key, self.descending));
        steps.push(Step::Paginate(self.page, limit));
        steps
    }
}

/// Fluent search over a catalog snapshot.
pub struct Search<'db> {
    db: &'db ListingDB,
    criteria: SearchCriteria,
}

impl<'db> Search<'db> {
    pub(crate) fn new(db: &'db ListingDB, criteria: SearchCriteria) -> Self {
        Self { db, criteria }
    }

    pub fn min_price(mut self, min: f64) -> Self {
        self.criteria.min_price = Some(min);
        self
    }
    pub fn max_price(mut self, max: f64) -> Self {
        self.criteria.max_price = Some(max);
        self
    }
    /// Inclusive on both ends.
    pub fn price_between(self, lo: f64, hi: f64) -> Self {
        self.min_price(lo).max_price(hi)
    }
    pub fn location(mut self, location: &str) -> Self {
        self.criteria.location = Some(location.to_string());
        self
    }
    pub fn property_type(mut self, property_type: &str) -> Self {
        self.criteria.property_type = Some(property_type.to_string());
        self
    }
    pub fn status(mut self, status: Status) -> Self {
        self.criteria.status = status;
        self
    }
    pub fn sort(mut self, key: SortKey, descending: bool) -> Self {
        self.criteria.sort_key = key;
        self.criteria.descending = descending;
        self
    }
    pub fn page(mut self, page: usize) -> Self {
        self.criteria.page = page;
        self
    }
    pub fn limit(mut self, limit: usize) -> Self {
        self.criteria.limit = Some(limit);
        self
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn explain(&self) -> Plan {
        let limit = self.criteria.limit.unwrap_or(self.db.config().default_limit);
        Plan { steps: self.criteria.plan(limit) }
    }

    pub fn collect(self) -> Result<Outcome<Vec<Property>>> {
        let config = self.db.config();
        let limit = self.criteria.resolve_limit(config)?;
        let state = self.db.catalog().read();
        let mut trace = Trace::default();
        let total_start = Instant::now();

        let candidates = filter_candidates(&state, &self.criteria, config, &mut trace);

        let step_start = Instant::now();
        let mut hits: Vec<&Property> = candidates.iter().map(|slot| state.at(slot)).collect();
        sort_hits(&mut hits, self.criteria.sort_key, self.criteria.descending);
        report(&mut trace, "sort", hits.len(), hits.len(), "memory", step_start);

        let step_start = Instant::now();
        let input = hits.len();
        let skip = (self.criteria.page - 1).saturating_mul(limit);
        let data: Vec<Property> = hits.into_iter().skip(skip).take(limit).cloned().collect();
        report(&mut trace, "paginate", input, data.len(), "memory", step_start);

        trace.total_us = total_start.elapsed().as_micros() as u64;
        Ok(Outcome { data, trace })
    }

    /// Number of matches before pagination.
    pub fn count(self) -> Result<Outcome<usize>> {
        let config = self.db.config();
        self.criteria.resolve_limit(config)?;
        let state = self.db.catalog().read();
        let mut trace = Trace::default();
        let total_start = Instant::now();
        let candidates = filter_candidates(&state, &self.criteria, config, &mut trace);
        trace.total_us = total_start.elapsed().as_micros() as u64;
        Ok(Outcome { data: candidates.len() as usize, trace })
    }
}

fn report(trace: &mut Trace, atom: &str, input_size: usize, output_size: usize, index_used: &str, start: Instant) {
    let time_us = start.elapsed().as_micros() as u64;
    tracing::trace!(atom, input_size, output_size, index_used, time_us, "search step");
    trace.steps.push(StepReport {
        atom: atom.to_string(),
        input_size,
        output_size,
        index_used: index_used.to_string(),
        time_us,
    });
}

/// Candidate slots after the price, location, type and status stages.
///
/// The indices only track Available listings, so they can serve a search
/// only when that is the requested status; anything else scans the catalog.
fn filter_candidates(state: &CatalogState, criteria: &SearchCriteria, config: &CatalogConfig, trace: &mut Trace) -> RoaringBitmap {
    let use_index = criteria.status == Status::Available;
    let total = state.properties().len();

    // price_range
    let step_start = Instant::now();
    let (mut candidates, index_used) = if use_index {
        let price = &state.indices().price;
        let bm: RoaringBitmap = price
            .lookup_range(criteria.min_price, criteria.max_price)
            .iter()
            .map(|e| e.slot)
            .collect();
        (bm, price.name())
    } else {
        let (min, max) = (criteria.min_price, criteria.max_price);
        let in_range = |p: &Property| min.map_or(true, |m| p.price >= m) && max.map_or(true, |m| p.price <= m);
        scan(state, config, in_range)
    };
    report(trace, "price_range", total, candidates.len() as usize, index_used, step_start);

    // location
    if let Some(location) = criteria.location_filter() {
        let step_start = Instant::now();
        let input = candidates.len() as usize;
        let index_used = if use_index {
            let index = &state.indices().location;
            let bucket: RoaringBitmap = index.lookup(location).iter().copied().collect();
            candidates &= bucket;
            index.name()
        } else {
            candidates = retain(state, &candidates, |p| p.location == location);
            "filter"
        };
        report(trace, "location", input, candidates.len() as usize, index_used, step_start);
    }

    // property_type
    if let Some(property_type) = criteria.type_filter() {
        let step_start = Instant::now();
        let input = candidates.len() as usize;
        candidates = retain(state, &candidates, |p| p.property_type == property_type);
        report(trace, "property_type", input, candidates.len() as usize, "filter", step_start);
    }

    // status
    let step_start = Instant::now();
    let input = candidates.len() as usize;
    candidates = retain(state, &candidates, |p| p.status == criteria.status);
    report(trace, "status", input, candidates.len() as usize, "filter", step_start);

    candidates
}

/// Full catalog scan. Runs on the rayon pool once the catalog passes the configured size.
fn scan<F>(state: &CatalogState, config: &CatalogConfig, pred: F) -> (RoaringBitmap, &'static str)
where
    F: Fn(&Property) -> bool + Sync,
{
    let properties = state.properties();
    if properties.len() > config.parallel_scan_threshold {
        let slots: Vec<u32> = properties
            .par_iter()
            .enumerate()
            .filter(|&(_, p)| pred(p))
            .map(|(slot, _)| slot as u32)
            .collect();
        (slots.into_iter().collect(), "parallel_scan")
    } else {
        let bm = properties
            .iter()
            .enumerate()
            .filter(|&(_, p)| pred(p))
            .map(|(slot, _)| slot as u32)
            .collect();
        (bm, "scan")
    }
}

fn retain<F>(state: &CatalogState, candidates: &RoaringBitmap, pred: F) -> RoaringBitmap
where
    F: Fn(&Property) -> bool,
{
    candidates.iter().filter(|&slot| pred(state.at(slot))).collect()
}

/// Order by the chosen key, ties broken by ascending id regardless of direction.
fn sort_hits(hits: &mut [&Property], key: SortKey, descending: bool) {
    hits.sort_unstable_by(|a, b| {
        let primary = match key {
            SortKey::Price => a.price.total_cmp(&b.price),
            SortKey::Timestamp => a.created_at.cmp(&b.created_at),
        };
        let primary = if descending { primary.reverse() } else { primary };
        match primary {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        }
    });
}

/// Available shortlisted listings of `user_id`, most recently shortlisted first.
/// Sold entries are skipped but stay in the stored list.
pub fn shortlisted(db: &ListingDB, user_id: &str) -> Vec<Property> {
    let ids = db.shortlist().ids_newest_first(user_id);
    if ids.is_empty() {
        return Vec::new();
    }
    let state = db.catalog().read();
    ids.iter()
        .filter_map(|id| state.get(id))
        .filter(|p| p.is_available())
        .cloned()
        .collect()
}
