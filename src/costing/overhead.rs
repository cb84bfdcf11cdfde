use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::entities::overhead_config;

/// How indirect costs are distributed onto a costing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverheadMethod {
    /// Overhead proportional to labor cost
    PercentageLabor,
    /// Overhead proportional to material cost
    PercentageMaterial,
    /// Flat amount per unit being costed
    PerUnit,
}

impl OverheadMethod {
    /// Lenient parse of the stored method string. Unknown values behave
    /// like an absent configuration (overhead of zero), never an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage_labor" => Some(Self::PercentageLabor),
            "percentage_material" => Some(Self::PercentageMaterial),
            "per_unit" => Some(Self::PerUnit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PercentageLabor => "percentage_labor",
            Self::PercentageMaterial => "percentage_material",
            Self::PerUnit => "per_unit",
        }
    }
}

/// The overhead policy in force for a calculation: a method plus its rate.
/// For the percentage methods the rate is a percentage (0-100); for
/// `PerUnit` it is a flat currency amount per unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverheadPolicy {
    pub method: OverheadMethod,
    pub rate: Decimal,
}

impl OverheadPolicy {
    pub fn new(method: OverheadMethod, rate: Decimal) -> Self {
        Self { method, rate }
    }

    /// Builds a policy from a stored config row; `None` when the stored
    /// method string is unrecognized.
    pub fn from_config(config: &overhead_config::Model) -> Option<Self> {
        OverheadMethod::parse(&config.allocation_method)
            .map(|method| Self::new(method, config.allocation_rate))
    }
}

/// Maps (labor cost, material cost, unit count) to an overhead amount under
/// the given policy. Absence of a policy is a valid "no overhead tracked
/// yet" state and yields zero.
///
/// `unit_count` is the count of units being costed: the batch size when
/// costing a standard, the portions produced when costing a production run.
pub fn allocate_overhead(
    policy: Option<&OverheadPolicy>,
    labor_cost: Decimal,
    material_cost: Decimal,
    unit_count: Decimal,
) -> Decimal {
    let Some(policy) = policy else {
        return Decimal::ZERO;
    };

    match policy.method {
        OverheadMethod::PercentageLabor => labor_cost * (policy.rate / dec!(100)),
        OverheadMethod::PercentageMaterial => material_cost * (policy.rate / dec!(100)),
        OverheadMethod::PerUnit => policy.rate * unit_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_independent() {
        let labor = dec!(1000);
        let material = dec!(2000);
        let units = dec!(5);

        let labor_pct = OverheadPolicy::new(OverheadMethod::PercentageLabor, dec!(10));
        assert_eq!(
            allocate_overhead(Some(&labor_pct), labor, material, units),
            dec!(100)
        );

        let material_pct = OverheadPolicy::new(OverheadMethod::PercentageMaterial, dec!(10));
        assert_eq!(
            allocate_overhead(Some(&material_pct), labor, material, units),
            dec!(200)
        );

        let per_unit = OverheadPolicy::new(OverheadMethod::PerUnit, dec!(10));
        assert_eq!(
            allocate_overhead(Some(&per_unit), labor, material, units),
            dec!(50)
        );
    }

    #[test]
    fn missing_policy_is_zero_overhead() {
        assert_eq!(
            allocate_overhead(None, dec!(1000), dec!(2000), dec!(5)),
            Decimal::ZERO
        );
    }

    #[test]
    fn unknown_method_string_parses_to_none() {
        assert_eq!(OverheadMethod::parse("percentage_revenue"), None);
        assert_eq!(OverheadMethod::parse(""), None);
        assert_eq!(
            OverheadMethod::parse("per_unit"),
            Some(OverheadMethod::PerUnit)
        );
    }

    #[test]
    fn method_round_trips_through_str() {
        for method in [
            OverheadMethod::PercentageLabor,
            OverheadMethod::PercentageMaterial,
            OverheadMethod::PerUnit,
        ] {
            assert_eq!(OverheadMethod::parse(method.as_str()), Some(method));
        }
    }
}
