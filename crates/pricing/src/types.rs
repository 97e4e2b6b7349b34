//! Shared pricing types.

use core::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use villakit_core::{DomainError, DomainResult, PropertyId};
use villakit_integrations::PropertyFacts;

/// A recurring calendar position (`MM-DD`), year-agnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl FromStr for MonthDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .split_once('-')
            .ok_or_else(|| DomainError::validation(format!("expected MM-DD, got {s:?}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| DomainError::validation(format!("bad month in {s:?}")))?;
        let day: u32 = day
            .parse()
            .map_err(|_| DomainError::validation(format!("bad day in {s:?}")))?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(DomainError::validation(format!("out-of-range MM-DD {s:?}")));
        }
        Ok(Self { month, day })
    }
}

impl TryFrom<String> for MonthDay {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

impl core::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// A named stretch of the calendar with a rate multiplier.
///
/// `start > end` means the season wraps through December 31 (e.g. a holiday
/// season running 11-15 through 01-05).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDefinition {
    pub id: String,
    pub name: String,
    pub start: MonthDay,
    pub end: MonthDay,
    pub multiplier: f64,
    pub minimum_stay: Option<u32>,
}

impl SeasonDefinition {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = MonthDay::of(date);
        if self.start <= self.end {
            self.start <= md && md <= self.end
        } else {
            md >= self.start || md <= self.end
        }
    }
}

/// Season lookup. When definitions overlap, the first match in list order
/// wins, deterministically.
pub fn matching_season(seasons: &[SeasonDefinition], date: NaiveDate) -> Option<&SeasonDefinition> {
    seasons.iter().find(|s| s.contains(date))
}

/// External demand signal on a specific date, distinct from the occupancy
/// tiers: `Surge` nudges the rate +15%, `Soft` −10%.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandSignal {
    Surge,
    Soft,
}

/// One date's occupancy facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyDay {
    pub date: NaiveDate,
    /// Share of comparable inventory already booked, in `[0, 1]`.
    pub occupancy_rate: f64,
    pub demand: Option<DemandSignal>,
}

/// Read-only snapshot a single pricing calculation runs against.
///
/// Built fresh per request and never shared across requests; any caching of
/// these facts belongs to the external collaborators.
#[derive(Debug, Clone)]
pub struct PricingContext {
    pub property: PropertyFacts,
    pub occupancy: Vec<OccupancyDay>,
    pub seasons: Vec<SeasonDefinition>,
}

impl PricingContext {
    pub fn occupancy_for(&self, date: NaiveDate) -> Option<&OccupancyDay> {
        self.occupancy.iter().find(|o| o.date == date)
    }
}

/// A quote request for one stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub property_id: PropertyId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: Option<u32>,
    pub promo_code: Option<String>,
}

impl PricingRequest {
    /// Inverted or zero-night stays are rejected, never silently corrected.
    pub fn validate(&self) -> DomainResult<()> {
        if self.check_out <= self.check_in {
            return Err(DomainError::validation(format!(
                "check_out {} must be after check_in {}",
                self.check_out, self.check_in
            )));
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// What kind of rule produced an adjustment. Aggregation merges per kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Seasonal,
    Occupancy,
    LengthOfStay,
    LastMinute,
    EarlyBird,
    Demand,
    Weekend,
}

/// A named, signed currency delta applied to a nightly rate
/// (negative = discount).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub kind: AdjustmentKind,
    pub name: String,
    pub percentage: Option<f64>,
    pub applied: f64,
}

/// The priced outcome of one calendar night in `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    /// `base_rate` plus every applied adjustment, rounded once at the end.
    pub rate: f64,
    pub base_rate: f64,
    pub adjustments: Vec<PriceAdjustment>,
    pub available: bool,
    pub minimum_stay: Option<u32>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Flat,
    Percentage,
    PerNight,
    PerPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub name: String,
    pub kind: FeeKind,
    /// Configured amount: a currency value, or a fraction for `Percentage`.
    pub amount: f64,
    /// Resolved currency value for this quote.
    pub calculated: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub code: String,
    pub name: String,
    pub savings: f64,
}

/// A disposable quote, not a binding contract: re-quoting after `expires_at`
/// must recompute from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    pub property_id: PropertyId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub nightly_rates: Vec<NightlyRate>,
    /// Nightly adjustments merged per kind (first occurrence's name wins).
    pub adjustments: Vec<PriceAdjustment>,
    pub subtotal: f64,
    pub fees: Vec<Fee>,
    pub taxes: f64,
    pub discount: Option<Discount>,
    pub total_amount: f64,
    pub calculated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
