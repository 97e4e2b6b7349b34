//! Promo-code resolution.
//!
//! Unknown codes are not errors: an invalid promo must never block a
//! booking, so resolution simply yields no discount.

use villakit_core::round_cents;

/// What a promo code grants.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PromoBenefit {
    /// Percentage of the quote subtotal (e.g. `10.0` for 10%).
    PercentOfSubtotal(f64),
    /// Fixed currency amount.
    FlatAmount(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromoDefinition {
    pub code: String,
    pub name: String,
    pub benefit: PromoBenefit,
}

impl PromoDefinition {
    /// Currency savings against a given subtotal (uncapped; the engine caps
    /// against the taxable total so quotes never go negative).
    pub fn savings(&self, subtotal: f64) -> f64 {
        match self.benefit {
            PromoBenefit::PercentOfSubtotal(percent) => round_cents(subtotal * percent / 100.0),
            PromoBenefit::FlatAmount(amount) => amount,
        }
    }
}

/// Promo lookup seam; an external code table can be injected in place of the
/// built-in one.
pub trait PromoResolver: Send + Sync {
    fn resolve(&self, code: &str) -> Option<PromoDefinition>;
}

/// Fixed in-crate code table.
#[derive(Debug, Clone, Default)]
pub struct StaticPromoTable {
    codes: Vec<PromoDefinition>,
}

impl StaticPromoTable {
    pub fn new(codes: Vec<PromoDefinition>) -> Self {
        Self { codes }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            PromoDefinition {
                code: "WELCOME10".to_string(),
                name: "Welcome discount".to_string(),
                benefit: PromoBenefit::PercentOfSubtotal(10.0),
            },
            PromoDefinition {
                code: "RETURN5".to_string(),
                name: "Returning guest".to_string(),
                benefit: PromoBenefit::PercentOfSubtotal(5.0),
            },
            PromoDefinition {
                code: "WINTER50".to_string(),
                name: "Winter getaway".to_string(),
                benefit: PromoBenefit::FlatAmount(50.0),
            },
        ])
    }
}

impl PromoResolver for StaticPromoTable {
    fn resolve(&self, code: &str) -> Option<PromoDefinition> {
        self.codes
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
            .cloned()
    }
}
