//! Property management system client contract.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use villakit_core::{DomainError, DomainResult, PropertyId};

/// Property facts as the PMS reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFacts {
    pub id: PropertyId,
    /// Default nightly rate when the availability feed supplies none.
    pub base_rate: f64,
    pub bedrooms: u32,
    pub sleeps: u32,
    pub village: String,
}

/// One calendar night of availability data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityDay {
    pub date: NaiveDate,
    /// Feed-supplied nightly rate; `None` falls back to the base rate.
    pub rate: Option<f64>,
    pub available: bool,
    pub minimum_stay: Option<u32>,
}

/// Client for the external PMS.
///
/// Failures propagate: pricing without availability data cannot produce a
/// trustworthy quote, so callers surface these errors instead of degrading.
#[async_trait]
pub trait PmsClient: Send + Sync {
    /// Fetch property facts. Unknown properties are a [`DomainError::NotFound`].
    async fn property(&self, id: PropertyId) -> DomainResult<PropertyFacts>;

    /// Fetch per-night availability for `[from, to)`.
    ///
    /// Days absent from the result are treated by callers as available at
    /// the base rate.
    async fn availability(
        &self,
        id: PropertyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<AvailabilityDay>>;
}

/// In-memory PMS for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPms {
    properties: Mutex<HashMap<PropertyId, PropertyFacts>>,
    calendars: Mutex<HashMap<PropertyId, Vec<AvailabilityDay>>>,
}

impl InMemoryPms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_property(&self, facts: PropertyFacts) {
        lock(&self.properties).insert(facts.id, facts);
    }

    pub fn set_calendar(&self, id: PropertyId, days: Vec<AvailabilityDay>) {
        lock(&self.calendars).insert(id, days);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl PmsClient for InMemoryPms {
    async fn property(&self, id: PropertyId) -> DomainResult<PropertyFacts> {
        lock(&self.properties)
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("property {id}")))
    }

    async fn availability(
        &self,
        id: PropertyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<AvailabilityDay>> {
        // Property must exist even when no calendar has been seeded.
        if !lock(&self.properties).contains_key(&id) {
            return Err(DomainError::not_found(format!("property {id}")));
        }
        let days = lock(&self.calendars)
            .get(&id)
            .map(|days| {
                days.iter()
                    .filter(|d| d.date >= from && d.date < to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(days)
    }
}
