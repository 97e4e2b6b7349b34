//! Fee schedule and fee math.

use villakit_core::round_cents;

use crate::types::{Fee, FeeKind};

/// One configured fee line.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeDefinition {
    pub name: String,
    pub kind: FeeKind,
    /// Currency amount, or a fraction of the subtotal for [`FeeKind::Percentage`].
    pub amount: f64,
}

/// The fees attached to every quote.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeSchedule {
    definitions: Vec<FeeDefinition>,
}

impl FeeSchedule {
    pub fn new(definitions: Vec<FeeDefinition>) -> Self {
        Self { definitions }
    }

    /// Cleaning (flat), service (5% of subtotal), damage protection (flat).
    pub fn standard() -> Self {
        Self::new(vec![
            FeeDefinition {
                name: "cleaning".to_string(),
                kind: FeeKind::Flat,
                amount: 150.0,
            },
            FeeDefinition {
                name: "service".to_string(),
                kind: FeeKind::Percentage,
                amount: 0.05,
            },
            FeeDefinition {
                name: "damage protection".to_string(),
                kind: FeeKind::Flat,
                amount: 45.0,
            },
        ])
    }

    /// Resolve every fee line against one quote.
    pub fn compute(&self, subtotal: f64, nights: u32, guests: u32) -> Vec<Fee> {
        self.definitions
            .iter()
            .map(|def| {
                let calculated = match def.kind {
                    FeeKind::Flat => def.amount,
                    FeeKind::Percentage => round_cents(subtotal * def.amount),
                    FeeKind::PerNight => round_cents(def.amount * f64::from(nights)),
                    FeeKind::PerPerson => round_cents(def.amount * f64::from(guests)),
                };
                Fee {
                    name: def.name.clone(),
                    kind: def.kind,
                    amount: def.amount,
                    calculated,
                }
            })
            .collect()
    }
}
