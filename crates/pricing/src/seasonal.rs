//! Seasonal multiplier strategy.

use villakit_core::round_cents;

use crate::strategy::{PricingStrategy, StrategyInput};
use crate::types::{AdjustmentKind, PriceAdjustment, matching_season};

/// Applies the matching season's rate multiplier. Runs first so that
/// occupancy and demand rules compound on top of the seasonal rate.
#[derive(Debug, Default)]
pub struct SeasonalStrategy;

impl PricingStrategy for SeasonalStrategy {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn calculate(&self, input: &StrategyInput<'_>) -> Vec<PriceAdjustment> {
        let Some(season) = matching_season(&input.context.seasons, input.date) else {
            return Vec::new();
        };
        if (season.multiplier - 1.0).abs() < f64::EPSILON {
            return Vec::new();
        }
        vec![PriceAdjustment {
            kind: AdjustmentKind::Seasonal,
            name: season.name.clone(),
            percentage: Some((season.multiplier - 1.0) * 100.0),
            applied: round_cents(input.current_rate * (season.multiplier - 1.0)),
        }]
    }
}
