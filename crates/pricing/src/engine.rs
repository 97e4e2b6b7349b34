//! The pricing engine: strategy composition, fees, taxes, promos.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use tracing::debug;

use villakit_core::{DomainResult, PropertyId, round_cents};
use villakit_integrations::{AvailabilityDay, PmsClient};

use crate::dynamic::DynamicStrategy;
use crate::fees::FeeSchedule;
use crate::occupancy::OccupancyStrategy;
use crate::promo::{PromoResolver, StaticPromoTable};
use crate::seasonal::SeasonalStrategy;
use crate::strategy::{PricingStrategy, StrategyInput};
use crate::types::{
    AdjustmentKind, Discount, MonthDay, NightlyRate, OccupancyDay, PriceAdjustment,
    PricingContext, PricingRequest, PricingResponse, SeasonDefinition, matching_season,
};

/// Source of occupancy facts. Like availability, this is external data
/// supplied to the core, not computed by it.
pub trait DemandSource: Send + Sync {
    fn occupancy(
        &self,
        property_id: PropertyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<OccupancyDay>;
}

/// No demand data: every date reads as moderate occupancy with no signal.
#[derive(Debug, Default)]
pub struct NoDemandData;

impl DemandSource for NoDemandData {
    fn occupancy(
        &self,
        _property_id: PropertyId,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Vec<OccupancyDay> {
        Vec::new()
    }
}

/// Engine-wide knobs. Quotes are valid for 24 hours by default.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub tax_rate: f64,
    /// Unconditional Saturday/Sunday premium applied after all strategies.
    pub weekend_premium: f64,
    pub quote_validity: Duration,
    pub seasons: Vec<SeasonDefinition>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: 0.12,
            weekend_premium: 0.10,
            quote_validity: Duration::hours(24),
            seasons: default_seasons(),
        }
    }
}

/// Default season calendar. Covers the whole year; exactly one season
/// matches any date.
pub fn default_seasons() -> Vec<SeasonDefinition> {
    let season = |id: &str, name: &str, start, end, multiplier, minimum_stay| SeasonDefinition {
        id: id.to_string(),
        name: name.to_string(),
        start,
        end,
        multiplier,
        minimum_stay,
    };
    vec![
        season(
            "low_winter",
            "Low Winter",
            MonthDay::new(1, 6),
            MonthDay::new(3, 31),
            0.8,
            None,
        ),
        season(
            "spring",
            "Spring",
            MonthDay::new(4, 1),
            MonthDay::new(6, 14),
            1.0,
            None,
        ),
        season(
            "peak_summer",
            "Peak Summer",
            MonthDay::new(6, 15),
            MonthDay::new(8, 31),
            1.5,
            Some(7),
        ),
        season(
            "fall_shoulder",
            "Fall Shoulder",
            MonthDay::new(9, 1),
            MonthDay::new(11, 14),
            1.0,
            None,
        ),
        // Wraps through December 31.
        season(
            "holiday_winter",
            "Holiday Winter",
            MonthDay::new(11, 15),
            MonthDay::new(1, 5),
            1.35,
            Some(3),
        ),
    ]
}

/// Recalculation hook the orchestrator fires when bookings change the
/// demand picture around a property.
#[async_trait]
pub trait RateRefresher: Send + Sync {
    async fn refresh_surrounding_rates(
        &self,
        property_id: PropertyId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<()>;
}

/// Computes authoritative stay quotes from external facts and registered
/// strategies. Stateless across requests.
pub struct PricingEngine {
    pms: Arc<dyn PmsClient>,
    demand: Arc<dyn DemandSource>,
    promos: Arc<dyn PromoResolver>,
    fees: FeeSchedule,
    config: PricingConfig,
    strategies: Vec<Box<dyn PricingStrategy>>,
}

impl PricingEngine {
    /// Engine with the default strategy set (Seasonal=10, Occupancy=20,
    /// Dynamic=30), standard fees, and the built-in promo table.
    pub fn new(pms: Arc<dyn PmsClient>, demand: Arc<dyn DemandSource>) -> Self {
        let mut engine = Self {
            pms,
            demand,
            promos: Arc::new(StaticPromoTable::standard()),
            fees: FeeSchedule::standard(),
            config: PricingConfig::default(),
            strategies: Vec::new(),
        };
        engine.register_strategy(Box::new(SeasonalStrategy));
        engine.register_strategy(Box::new(OccupancyStrategy));
        engine.register_strategy(Box::new(DynamicStrategy));
        engine
    }

    pub fn with_config(mut self, config: PricingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_promos(mut self, promos: Arc<dyn PromoResolver>) -> Self {
        self.promos = promos;
        self
    }

    /// Add a strategy. The list is kept sorted by ascending priority here,
    /// once at registration, not per request.
    pub fn register_strategy(&mut self, strategy: Box<dyn PricingStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
    }

    /// Compute the authoritative quote for one stay.
    ///
    /// Fails with a validation error on inverted dates and a not-found
    /// error for properties unknown to the PMS; PMS failures propagate.
    pub async fn calculate_pricing(
        &self,
        request: &PricingRequest,
    ) -> DomainResult<PricingResponse> {
        request.validate()?;
        let nights = request.nights() as u32;

        // All external facts are fetched up front, never per night.
        let property = self.pms.property(request.property_id).await?;
        let calendar = self
            .pms
            .availability(request.property_id, request.check_in, request.check_out)
            .await?;
        let by_date: HashMap<NaiveDate, AvailabilityDay> =
            calendar.into_iter().map(|d| (d.date, d)).collect();
        let occupancy =
            self.demand
                .occupancy(request.property_id, request.check_in, request.check_out);

        let context = PricingContext {
            property: property.clone(),
            occupancy,
            seasons: self.config.seasons.clone(),
        };
        let days_until_check_in = (request.check_in - Utc::now().date_naive()).num_days();

        let mut nightly_rates = Vec::with_capacity(nights as usize);
        for date in request.check_in.iter_days().take(nights as usize) {
            let day = by_date.get(&date);
            let base_rate = day.and_then(|d| d.rate).unwrap_or(property.base_rate);
            let mut running = base_rate;
            let mut adjustments = Vec::new();

            for strategy in &self.strategies {
                let input = StrategyInput {
                    request,
                    date,
                    current_rate: running,
                    nights,
                    days_until_check_in,
                    context: &context,
                };
                for adjustment in strategy.calculate(&input) {
                    running += adjustment.applied;
                    adjustments.push(adjustment);
                }
            }

            if is_weekend(date) {
                let premium = round_cents(running * self.config.weekend_premium);
                running += premium;
                adjustments.push(PriceAdjustment {
                    kind: AdjustmentKind::Weekend,
                    name: "weekend premium".to_string(),
                    percentage: Some(self.config.weekend_premium * 100.0),
                    applied: premium,
                });
            }

            let minimum_stay = day.and_then(|d| d.minimum_stay).or_else(|| {
                matching_season(&context.seasons, date).and_then(|s| s.minimum_stay)
            });
            nightly_rates.push(NightlyRate {
                date,
                rate: round_cents(running),
                base_rate,
                adjustments,
                available: day.is_none_or(|d| d.available),
                minimum_stay,
            });
        }

        let subtotal = round_cents(nightly_rates.iter().map(|n| n.rate).sum());
        let guests = request.guests.unwrap_or(2);
        let fees = self.fees.compute(subtotal, nights, guests);
        let fee_total: f64 = fees.iter().map(|f| f.calculated).sum();
        let taxes = round_cents(self.config.tax_rate * (subtotal + fee_total));

        // Unknown codes degrade silently to "no discount applied".
        let discount = request
            .promo_code
            .as_deref()
            .and_then(|code| self.promos.resolve(code))
            .map(|promo| {
                let cap = subtotal + fee_total + taxes;
                Discount {
                    savings: promo.savings(subtotal).min(cap),
                    code: promo.code,
                    name: promo.name,
                }
            });
        let savings = discount.as_ref().map_or(0.0, |d| d.savings);

        let total_amount = round_cents(subtotal + fee_total + taxes - savings).max(0.0);
        let adjustments = aggregate_adjustments(&nightly_rates);
        let calculated_at = Utc::now();

        Ok(PricingResponse {
            property_id: request.property_id,
            check_in: request.check_in,
            check_out: request.check_out,
            nights,
            nightly_rates,
            adjustments,
            subtotal,
            fees,
            taxes,
            discount,
            total_amount,
            calculated_at,
            expires_at: calculated_at + self.config.quote_validity,
        })
    }

    /// Advisory nightly price for display surfaces.
    ///
    /// A deliberately independent heuristic (season x weekend x lead time);
    /// it never feeds the authoritative quote's adjustment list.
    pub async fn recommended_price(
        &self,
        property_id: PropertyId,
        date: NaiveDate,
    ) -> DomainResult<f64> {
        let property = self.pms.property(property_id).await?;
        let mut rate = property.base_rate;
        if let Some(season) = matching_season(&self.config.seasons, date) {
            rate *= season.multiplier;
        }
        if is_weekend(date) {
            rate *= 1.0 + self.config.weekend_premium;
        }
        let days_out = (date - Utc::now().date_naive()).num_days();
        if (0..=7).contains(&days_out) {
            let percent = ((7 - days_out) * 3).min(25) as f64;
            rate *= 1.0 - percent / 100.0;
        } else if days_out >= 90 {
            rate *= 0.95;
        }
        Ok(round_cents(rate))
    }
}

#[async_trait]
impl RateRefresher for PricingEngine {
    async fn refresh_surrounding_rates(
        &self,
        property_id: PropertyId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<()> {
        // Advisory rates for a window around the stay; where they are
        // displayed is a concern of the surfaces consuming them.
        let mut date = check_in - Duration::days(3);
        let until = check_out + Duration::days(3);
        while date <= until {
            let rate = self.recommended_price(property_id, date).await?;
            debug!(property = %property_id, %date, rate, "refreshed advisory rate");
            date += Duration::days(1);
        }
        Ok(())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Merge nightly adjustments per kind: `applied` sums, the first
/// occurrence's name and percentage win.
fn aggregate_adjustments(nightly_rates: &[NightlyRate]) -> Vec<PriceAdjustment> {
    let mut merged: Vec<PriceAdjustment> = Vec::new();
    for adjustment in nightly_rates.iter().flat_map(|n| &n.adjustments) {
        match merged.iter_mut().find(|m| m.kind == adjustment.kind) {
            Some(existing) => existing.applied += adjustment.applied,
            None => merged.push(adjustment.clone()),
        }
    }
    for adjustment in &mut merged {
        adjustment.applied = round_cents(adjustment.applied);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promo::{PromoBenefit, PromoDefinition};
    use crate::types::DemandSignal;
    use villakit_integrations::{InMemoryPms, PropertyFacts};

    fn assert_money(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn seeded_pms(base_rate: f64) -> (Arc<InMemoryPms>, PropertyId) {
        let pms = Arc::new(InMemoryPms::new());
        let id = PropertyId::new();
        pms.upsert_property(PropertyFacts {
            id,
            base_rate,
            bedrooms: 3,
            sleeps: 6,
            village: "Montriond".to_string(),
        });
        (pms, id)
    }

    fn all_year_season(name: &str, multiplier: f64, minimum_stay: Option<u32>) -> PricingConfig {
        PricingConfig {
            seasons: vec![SeasonDefinition {
                id: name.to_lowercase().replace(' ', "_"),
                name: name.to_string(),
                start: MonthDay::new(1, 1),
                end: MonthDay::new(12, 31),
                multiplier,
                minimum_stay,
            }],
            ..PricingConfig::default()
        }
    }

    fn no_seasons() -> PricingConfig {
        PricingConfig {
            seasons: Vec::new(),
            ..PricingConfig::default()
        }
    }

    /// First `target` weekday at least `days_out` days from today. Keeps the
    /// stay 8..90 days out so lead-time rules stay silent.
    fn next_weekday(target: Weekday, days_out: i64) -> NaiveDate {
        let mut date = Utc::now().date_naive() + Duration::days(days_out);
        while date.weekday() != target {
            date += Duration::days(1);
        }
        date
    }

    fn request(property_id: PropertyId, check_in: NaiveDate, nights: i64) -> PricingRequest {
        PricingRequest {
            property_id,
            check_in,
            check_out: check_in + Duration::days(nights),
            guests: None,
            promo_code: None,
        }
    }

    struct UnreachablePms;

    #[async_trait]
    impl PmsClient for UnreachablePms {
        async fn property(&self, _id: PropertyId) -> DomainResult<PropertyFacts> {
            Err(villakit_core::DomainError::integration(
                "pms gateway unreachable",
            ))
        }

        async fn availability(
            &self,
            _id: PropertyId,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> DomainResult<Vec<AvailabilityDay>> {
            Err(villakit_core::DomainError::integration(
                "pms gateway unreachable",
            ))
        }
    }

    struct FixedDemand {
        occupancy_rate: f64,
        demand: Option<DemandSignal>,
    }

    impl DemandSource for FixedDemand {
        fn occupancy(
            &self,
            _property_id: PropertyId,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Vec<OccupancyDay> {
            from.iter_days()
                .take_while(|d| *d < to)
                .map(|date| OccupancyDay {
                    date,
                    occupancy_rate: self.occupancy_rate,
                    demand: self.demand,
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn inverted_and_zero_night_requests_are_validation_errors() {
        let (pms, id) = seeded_pms(300.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData));
        let check_in = next_weekday(Weekday::Mon, 10);

        let zero = request(id, check_in, 0);
        assert!(matches!(
            engine.calculate_pricing(&zero).await,
            Err(villakit_core::DomainError::Validation(_))
        ));

        let inverted = request(id, check_in, -2);
        assert!(matches!(
            engine.calculate_pricing(&inverted).await,
            Err(villakit_core::DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_property_is_not_found() {
        let (pms, _) = seeded_pms(300.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData));
        let req = request(PropertyId::new(), next_weekday(Weekday::Mon, 10), 3);
        assert!(matches!(
            engine.calculate_pricing(&req).await,
            Err(villakit_core::DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn pms_failure_propagates_out_of_the_quote() {
        // No availability data, no trustworthy quote; the error must not
        // degrade into an empty or base-rate response.
        let engine = PricingEngine::new(Arc::new(UnreachablePms), Arc::new(NoDemandData));
        let req = request(PropertyId::new(), next_weekday(Weekday::Mon, 10), 3);
        assert!(matches!(
            engine.calculate_pricing(&req).await,
            Err(villakit_core::DomainError::Integration(_))
        ));
    }

    #[tokio::test]
    async fn peak_summer_week_at_three_hundred_a_night() {
        let (pms, id) = seeded_pms(300.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData))
            .with_config(all_year_season("Peak Summer", 1.5, Some(7)));

        // 8..90 days out: lead-time rules silent. A 7-night stay always
        // contains exactly one Saturday and one Sunday.
        let req = request(id, next_weekday(Weekday::Mon, 10), 7);
        let quote = engine.calculate_pricing(&req).await.unwrap();

        assert_eq!(quote.nights, 7);
        assert_eq!(quote.nightly_rates.len(), 7);

        for night in &quote.nightly_rates {
            assert_eq!(night.base_rate, 300.0);
            assert_eq!(night.minimum_stay, Some(7));
            let expected = if is_weekend(night.date) { 445.5 } else { 405.0 };
            assert_money(night.rate, expected);
        }

        // Seasonal fires before the length-of-stay discount: 300 -> 450,
        // then -10% of the running 450.
        let seasonal: Vec<_> = quote
            .adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Seasonal)
            .collect();
        assert_eq!(seasonal.len(), 1);
        assert_money(seasonal[0].applied, 1050.0);
        assert_eq!(seasonal[0].name, "Peak Summer");

        let stay: Vec<_> = quote
            .adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::LengthOfStay)
            .collect();
        assert_eq!(stay.len(), 1);
        assert_money(stay[0].applied, -315.0);

        assert_money(quote.subtotal, 2916.0);
        let fee_total: f64 = quote.fees.iter().map(|f| f.calculated).sum();
        assert_money(quote.total_amount, quote.subtotal + fee_total + quote.taxes);
    }

    #[tokio::test]
    async fn welcome10_reduces_the_total_by_exactly_the_savings() {
        let (pms, id) = seeded_pms(250.0);
        let engine = PricingEngine::new(Arc::clone(&pms) as Arc<dyn PmsClient>, Arc::new(NoDemandData))
            .with_config(no_seasons());

        // Monday through Friday: four weekday nights, subtotal 1000.
        let check_in = next_weekday(Weekday::Mon, 10);
        let plain = request(id, check_in, 4);
        let mut with_promo = plain.clone();
        with_promo.promo_code = Some("WELCOME10".to_string());

        let base_quote = engine.calculate_pricing(&plain).await.unwrap();
        let promo_quote = engine.calculate_pricing(&with_promo).await.unwrap();

        assert_money(base_quote.subtotal, 1000.0);
        assert_money(promo_quote.subtotal, 1000.0);

        let discount = promo_quote.discount.as_ref().unwrap();
        assert_money(discount.savings, 100.0);
        assert_eq!(discount.code, "WELCOME10");

        // Taxes are computed on the pre-discount taxable amount; the
        // discount lands after tax.
        assert_money(promo_quote.taxes, base_quote.taxes);
        assert_money(base_quote.total_amount - promo_quote.total_amount, 100.0);
    }

    #[tokio::test]
    async fn unknown_promo_code_is_silently_ignored() {
        let (pms, id) = seeded_pms(250.0);
        let engine =
            PricingEngine::new(pms, Arc::new(NoDemandData)).with_config(no_seasons());

        let mut req = request(id, next_weekday(Weekday::Mon, 10), 4);
        req.promo_code = Some("TOTALLY-BOGUS".to_string());
        let quote = engine.calculate_pricing(&req).await.unwrap();

        assert!(quote.discount.is_none());
        assert_money(quote.subtotal, 1000.0);
    }

    #[tokio::test]
    async fn oversized_flat_discount_floors_the_total_at_zero() {
        let (pms, id) = seeded_pms(100.0);
        let promos = StaticPromoTable::new(vec![PromoDefinition {
            code: "COMP".to_string(),
            name: "Comped stay".to_string(),
            benefit: PromoBenefit::FlatAmount(99_999.0),
        }]);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData))
            .with_config(no_seasons())
            .with_promos(Arc::new(promos));

        let mut req = request(id, next_weekday(Weekday::Mon, 10), 1);
        req.promo_code = Some("COMP".to_string());
        let quote = engine.calculate_pricing(&req).await.unwrap();
        assert_eq!(quote.total_amount, 0.0);
    }

    #[tokio::test]
    async fn weekend_premium_applies_after_all_strategies() {
        let (pms, id) = seeded_pms(100.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData))
            .with_config(all_year_season("High", 1.5, None));

        let req = request(id, next_weekday(Weekday::Sat, 10), 1);
        let quote = engine.calculate_pricing(&req).await.unwrap();

        // (100 + 50) * 1.10, premium on the post-strategy running rate.
        assert_money(quote.nightly_rates[0].rate, 165.0);
        let weekend = quote
            .adjustments
            .iter()
            .find(|a| a.kind == AdjustmentKind::Weekend)
            .unwrap();
        assert_money(weekend.applied, 15.0);
    }

    #[tokio::test]
    async fn feed_rate_overrides_base_and_availability_flag_carries_through() {
        let (pms, id) = seeded_pms(300.0);
        let check_in = next_weekday(Weekday::Mon, 10);
        pms.set_calendar(
            id,
            vec![AvailabilityDay {
                date: check_in,
                rate: Some(200.0),
                available: false,
                minimum_stay: Some(2),
            }],
        );
        let engine = PricingEngine::new(Arc::clone(&pms) as Arc<dyn PmsClient>, Arc::new(NoDemandData))
            .with_config(no_seasons());

        let quote = engine
            .calculate_pricing(&request(id, check_in, 1))
            .await
            .unwrap();
        let night = &quote.nightly_rates[0];
        assert_eq!(night.base_rate, 200.0);
        assert_money(night.rate, 200.0);
        assert!(!night.available);
        assert_eq!(night.minimum_stay, Some(2));
    }

    #[tokio::test]
    async fn occupancy_and_demand_signal_layer_on_the_running_rate() {
        let (pms, id) = seeded_pms(100.0);
        let demand = FixedDemand {
            occupancy_rate: 0.95,
            demand: Some(DemandSignal::Surge),
        };
        let engine = PricingEngine::new(pms, Arc::new(demand)).with_config(no_seasons());

        let req = request(id, next_weekday(Weekday::Mon, 10), 1);
        let quote = engine.calculate_pricing(&req).await.unwrap();

        // 100 -> +50 (very_high tier) -> +15% of the running 150.
        let night = &quote.nightly_rates[0];
        assert_money(night.rate, 172.5);
        assert_eq!(night.adjustments[0].kind, AdjustmentKind::Occupancy);
        assert_eq!(night.adjustments[1].kind, AdjustmentKind::Demand);
        assert_money(night.adjustments[1].applied, 22.5);
    }

    #[tokio::test]
    async fn identical_requests_produce_identical_quotes() {
        let (pms, id) = seeded_pms(275.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData))
            .with_config(all_year_season("Steady", 1.2, None));

        let req = request(id, next_weekday(Weekday::Wed, 12), 9);
        let first = engine.calculate_pricing(&req).await.unwrap();
        let second = engine.calculate_pricing(&req).await.unwrap();

        assert_eq!(first.nightly_rates, second.nightly_rates);
        assert_money(first.total_amount, second.total_amount);
    }

    #[tokio::test]
    async fn quotes_expire_after_twenty_four_hours() {
        let (pms, id) = seeded_pms(300.0);
        let engine =
            PricingEngine::new(pms, Arc::new(NoDemandData)).with_config(no_seasons());
        let quote = engine
            .calculate_pricing(&request(id, next_weekday(Weekday::Mon, 10), 2))
            .await
            .unwrap();
        assert_eq!(quote.expires_at - quote.calculated_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn totals_stay_non_negative_across_configurations() {
        let (pms, id) = seeded_pms(35.0);
        let engine = PricingEngine::new(
            Arc::clone(&pms) as Arc<dyn PmsClient>,
            Arc::new(FixedDemand {
                occupancy_rate: 0.1,
                demand: Some(DemandSignal::Soft),
            }),
        )
        .with_config(all_year_season("Discounted", 0.8, None));

        for nights in [1, 7, 14, 28, 30] {
            let req = request(id, next_weekday(Weekday::Mon, 10), nights);
            let quote = engine.calculate_pricing(&req).await.unwrap();
            assert_eq!(quote.nights as i64, nights);
            assert_eq!(quote.nightly_rates.len() as i64, nights);
            assert!(quote.total_amount >= 0.0, "negative total for {nights} nights");
        }
    }

    #[tokio::test]
    async fn recommended_price_is_season_times_weekend_times_lead_time() {
        let (pms, id) = seeded_pms(100.0);
        let engine = PricingEngine::new(pms, Arc::new(NoDemandData))
            .with_config(all_year_season("High", 1.5, None));

        let saturday = next_weekday(Weekday::Sat, 100);
        let rate = engine.recommended_price(id, saturday).await.unwrap();
        // 100 * 1.5 * 1.10 * 0.95 (early bird).
        assert_money(rate, 156.75);
    }

    #[tokio::test]
    async fn refresh_surrounding_rates_covers_the_stay_window() {
        let (pms, id) = seeded_pms(120.0);
        let engine =
            PricingEngine::new(pms, Arc::new(NoDemandData)).with_config(no_seasons());
        let check_in = next_weekday(Weekday::Mon, 20);
        engine
            .refresh_surrounding_rates(id, check_in, check_in + Duration::days(5))
            .await
            .unwrap();
    }
}
