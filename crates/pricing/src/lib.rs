//! `villakit-pricing` — the nightly-rate computation pipeline.
//!
//! A quote is computed per calendar night: the Track-supplied (or base) rate
//! flows through the registered strategies in ascending priority order, each
//! strategy emitting signed adjustments against the *running* rate, followed
//! by the unconditional weekend premium. Nightly rates are then aggregated
//! into a time-boxed [`PricingResponse`] with fees, taxes, and an optional
//! promo discount.
//!
//! The engine keeps no state between requests; every calculation builds a
//! fresh [`PricingContext`] from external facts.

pub mod dynamic;
pub mod engine;
pub mod fees;
pub mod occupancy;
pub mod promo;
pub mod seasonal;
pub mod strategy;
pub mod types;

pub use dynamic::DynamicStrategy;
pub use engine::{
    DemandSource, NoDemandData, PricingConfig, PricingEngine, RateRefresher, default_seasons,
};
pub use fees::{FeeDefinition, FeeSchedule};
pub use occupancy::OccupancyStrategy;
pub use promo::{PromoBenefit, PromoDefinition, PromoResolver, StaticPromoTable};
pub use seasonal::SeasonalStrategy;
pub use strategy::{PricingStrategy, StrategyInput};
pub use types::{
    AdjustmentKind, DemandSignal, Discount, Fee, FeeKind, MonthDay, NightlyRate, OccupancyDay,
    PriceAdjustment, PricingContext, PricingRequest, PricingResponse, SeasonDefinition,
    matching_season,
};
