//! The cost and variance calculation engine.
//!
//! Everything in this module is pure computation: functions take plain
//! values or borrowed entity models and return breakdown structs. Reading
//! current prices, settings and policies, and persisting the resulting
//! snapshots, is the job of the service layer.

pub mod overhead;
pub mod standard;
pub mod variance;
pub mod yields;

use rust_decimal::{Decimal, RoundingStrategy};

pub use overhead::{allocate_overhead, OverheadMethod, OverheadPolicy};
pub use standard::{cost_standard, CostStandardBreakdown, RecipeCostLine, RoundedCostBreakdown};
pub use variance::{variance, ActualCosts, CategoryVariance, VarianceBreakdown, VarianceClass};
pub use yields::compute_yield;

/// Rounds a monetary value to 2 decimal places for presentation.
/// Intermediate values keep full precision; only DTO boundaries round.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round_money_is_half_away_from_zero() {
        assert_eq!(round_money(dec!(9.589041)), dec!(9.59));
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(100)), dec!(100.00));
    }
}
