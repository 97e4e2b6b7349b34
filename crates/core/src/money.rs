//! Currency helpers.
//!
//! All nightly rates, fees, and totals are plain `f64` amounts in the
//! property's currency. Rounding to two decimal places happens once, at the
//! end of a computation, never per intermediate step.

/// Round a currency amount to two decimal places.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
