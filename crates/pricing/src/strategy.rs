//! Pricing strategy seam.

use chrono::NaiveDate;

use crate::types::{PriceAdjustment, PricingContext, PricingRequest};

/// Everything a strategy may look at for one night of one request.
#[derive(Debug)]
pub struct StrategyInput<'a> {
    pub request: &'a PricingRequest,
    pub date: NaiveDate,
    /// The rate after every lower-priority strategy has applied. Strategies
    /// compute against this, not the original base rate; the ordering is
    /// load-bearing for the default configuration.
    pub current_rate: f64,
    /// Total nights in the stay (length-of-stay rules are per request).
    pub nights: u32,
    /// Whole days between the quote date and check-in; negative once past.
    pub days_until_check_in: i64,
    pub context: &'a PricingContext,
}

/// A pluggable pricing rule producing adjustments against the running rate.
///
/// Strategies are pure over their input: no clock reads, no I/O, no state.
pub trait PricingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ascending execution order; lower priorities run first.
    fn priority(&self) -> u32;

    fn calculate(&self, input: &StrategyInput<'_>) -> Vec<PriceAdjustment>;
}
