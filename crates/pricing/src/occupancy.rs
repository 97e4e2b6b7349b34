//! Occupancy-driven demand tiers and length-of-stay discounts.

use villakit_core::round_cents;

use crate::strategy::{PricingStrategy, StrategyInput};
use crate::types::{AdjustmentKind, PriceAdjustment};

/// Maps a date's occupancy rate to one of five demand tiers, and grants a
/// length-of-stay discount for longer bookings.
#[derive(Debug, Default)]
pub struct OccupancyStrategy;

/// Demand tier for an occupancy rate in `[0, 1]`.
fn demand_tier(occupancy_rate: f64) -> (&'static str, f64) {
    if occupancy_rate < 0.25 {
        ("very_low", 0.7)
    } else if occupancy_rate < 0.5 {
        ("low", 0.85)
    } else if occupancy_rate < 0.75 {
        ("moderate", 1.0)
    } else if occupancy_rate < 0.9 {
        ("high", 1.25)
    } else {
        ("very_high", 1.5)
    }
}

/// Length-of-stay discount. Highest matching bracket only; the thresholds
/// never stack.
fn stay_discount(nights: u32) -> Option<(f64, &'static str)> {
    if nights >= 28 {
        Some((0.20, "28+ night stay"))
    } else if nights >= 14 {
        Some((0.15, "14+ night stay"))
    } else if nights >= 7 {
        Some((0.10, "7+ night stay"))
    } else {
        None
    }
}

impl PricingStrategy for OccupancyStrategy {
    fn name(&self) -> &'static str {
        "occupancy"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn calculate(&self, input: &StrategyInput<'_>) -> Vec<PriceAdjustment> {
        let mut adjustments = Vec::new();

        if let Some(day) = input.context.occupancy_for(input.date) {
            let (tier, multiplier) = demand_tier(day.occupancy_rate);
            if (multiplier - 1.0).abs() >= f64::EPSILON {
                adjustments.push(PriceAdjustment {
                    kind: AdjustmentKind::Occupancy,
                    name: format!("{tier} demand"),
                    percentage: Some((multiplier - 1.0) * 100.0),
                    applied: round_cents(input.current_rate * (multiplier - 1.0)),
                });
            }
        }

        if let Some((fraction, label)) = stay_discount(input.nights) {
            adjustments.push(PriceAdjustment {
                kind: AdjustmentKind::LengthOfStay,
                name: label.to_string(),
                percentage: Some(-fraction * 100.0),
                applied: -round_cents(input.current_rate * fraction),
            });
        }

        adjustments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DemandSignal, OccupancyDay, PricingContext, PricingRequest};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use villakit_core::PropertyId;
    use villakit_integrations::PropertyFacts;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 4).unwrap()
    }

    fn context(occupancy_rate: Option<f64>) -> PricingContext {
        PricingContext {
            property: PropertyFacts {
                id: PropertyId::new(),
                base_rate: 100.0,
                bedrooms: 2,
                sleeps: 4,
                village: "Samoëns".to_string(),
            },
            occupancy: occupancy_rate
                .map(|rate| {
                    vec![OccupancyDay {
                        date: date(),
                        occupancy_rate: rate,
                        demand: None::<DemandSignal>,
                    }]
                })
                .unwrap_or_default(),
            seasons: Vec::new(),
        }
    }

    fn request() -> PricingRequest {
        PricingRequest {
            property_id: PropertyId::new(),
            check_in: date(),
            check_out: date() + chrono::Duration::days(3),
            guests: None,
            promo_code: None,
        }
    }

    fn run(ctx: &PricingContext, nights: u32, rate: f64) -> Vec<PriceAdjustment> {
        let req = request();
        OccupancyStrategy.calculate(&StrategyInput {
            request: &req,
            date: date(),
            current_rate: rate,
            nights,
            days_until_check_in: 30,
            context: ctx,
        })
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(demand_tier(0.0), ("very_low", 0.7));
        assert_eq!(demand_tier(0.24), ("very_low", 0.7));
        assert_eq!(demand_tier(0.25), ("low", 0.85));
        assert_eq!(demand_tier(0.5), ("moderate", 1.0));
        assert_eq!(demand_tier(0.75), ("high", 1.25));
        assert_eq!(demand_tier(0.9), ("very_high", 1.5));
        assert_eq!(demand_tier(1.0), ("very_high", 1.5));
    }

    #[test]
    fn moderate_occupancy_emits_no_tier_adjustment() {
        let adjustments = run(&context(Some(0.6)), 3, 100.0);
        assert!(adjustments.is_empty());
    }

    #[test]
    fn very_high_occupancy_raises_the_rate() {
        let adjustments = run(&context(Some(0.95)), 3, 200.0);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].kind, AdjustmentKind::Occupancy);
        assert_eq!(adjustments[0].applied, 100.0);
        assert_eq!(adjustments[0].name, "very_high demand");
    }

    #[test]
    fn stay_discount_uses_highest_bracket_only() {
        assert_eq!(stay_discount(6), None);
        assert_eq!(stay_discount(7), Some((0.10, "7+ night stay")));
        assert_eq!(stay_discount(14), Some((0.15, "14+ night stay")));
        assert_eq!(stay_discount(27), Some((0.15, "14+ night stay")));
        assert_eq!(stay_discount(28), Some((0.20, "28+ night stay")));

        let adjustments = run(&context(None), 30, 100.0);
        let stay: Vec<_> = adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::LengthOfStay)
            .collect();
        assert_eq!(stay.len(), 1);
        assert_eq!(stay[0].applied, -20.0);
    }

    #[test]
    fn missing_occupancy_data_reads_as_moderate() {
        let adjustments = run(&context(None), 3, 100.0);
        assert!(adjustments.is_empty());
    }

    proptest! {
        #[test]
        fn tier_multiplier_is_one_of_five(rate in 0.0f64..=1.0) {
            let (_, multiplier) = demand_tier(rate);
            prop_assert!([0.7, 0.85, 1.0, 1.25, 1.5].contains(&multiplier));
        }

        #[test]
        fn tier_multiplier_is_monotone(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(demand_tier(lo).1 <= demand_tier(hi).1);
        }
    }
}
