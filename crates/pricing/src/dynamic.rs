//! Lead-time and demand-signal pricing.

use villakit_core::round_cents;

use crate::strategy::{PricingStrategy, StrategyInput};
use crate::types::{AdjustmentKind, DemandSignal, PriceAdjustment};

/// Lead-time discounts (last-minute and early-bird) plus a per-date demand
/// nudge. Runs last, so the nudge compounds on seasonal and occupancy
/// effects; both this and [`OccupancyStrategy`](crate::OccupancyStrategy)
/// may fire in the same calculation, which is intentional layering.
#[derive(Debug, Default)]
pub struct DynamicStrategy;

/// Last-minute discount percentage for stays at most 7 days out: scales
/// linearly from 0% (7 days) to 21% (day of), capped at 25%.
fn last_minute_percent(days_until_check_in: i64) -> f64 {
    ((7 - days_until_check_in) * 3).min(25) as f64
}

impl PricingStrategy for DynamicStrategy {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn priority(&self) -> u32 {
        30
    }

    fn calculate(&self, input: &StrategyInput<'_>) -> Vec<PriceAdjustment> {
        let mut adjustments = Vec::new();
        let days = input.days_until_check_in;

        if (0..=7).contains(&days) {
            let percent = last_minute_percent(days);
            if percent > 0.0 {
                adjustments.push(PriceAdjustment {
                    kind: AdjustmentKind::LastMinute,
                    name: "last-minute".to_string(),
                    percentage: Some(-percent),
                    applied: -round_cents(input.current_rate * percent / 100.0),
                });
            }
        } else if days >= 90 {
            adjustments.push(PriceAdjustment {
                kind: AdjustmentKind::EarlyBird,
                name: "early bird".to_string(),
                percentage: Some(-5.0),
                applied: -round_cents(input.current_rate * 0.05),
            });
        }

        if let Some(day) = input.context.occupancy_for(input.date) {
            if let Some(signal) = day.demand {
                let fraction = match signal {
                    DemandSignal::Surge => 0.15,
                    DemandSignal::Soft => -0.10,
                };
                adjustments.push(PriceAdjustment {
                    kind: AdjustmentKind::Demand,
                    name: match signal {
                        DemandSignal::Surge => "demand surge".to_string(),
                        DemandSignal::Soft => "soft demand".to_string(),
                    },
                    percentage: Some(fraction * 100.0),
                    applied: round_cents(input.current_rate * fraction),
                });
            }
        }

        adjustments
    }
}
