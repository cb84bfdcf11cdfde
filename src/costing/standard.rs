use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::costing::overhead::{allocate_overhead, OverheadPolicy};
use crate::costing::round_money;
use crate::entities::{menu_item, raw_material};
use crate::errors::ServiceError;

/// One recipe line joined with its material, as read by the service layer.
#[derive(Debug, Clone)]
pub struct RecipeCostLine<'a> {
    pub material: &'a raw_material::Model,
    pub quantity: Decimal,
}

/// Full-precision result of a cost standard calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostStandardBreakdown {
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub total_cost: Decimal,
    pub cost_per_portion: Decimal,
    pub standard_portion: i32,
}

/// 2-decimal view of a breakdown for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedCostBreakdown {
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub total_cost: Decimal,
    pub cost_per_portion: Decimal,
    pub standard_portion: i32,
}

impl CostStandardBreakdown {
    pub fn rounded(&self) -> RoundedCostBreakdown {
        RoundedCostBreakdown {
            material_cost: round_money(self.material_cost),
            labor_cost: round_money(self.labor_cost),
            overhead_cost: round_money(self.overhead_cost),
            total_cost: round_money(self.total_cost),
            cost_per_portion: round_money(self.cost_per_portion),
            standard_portion: self.standard_portion,
        }
    }
}

/// Computes the standard cost for one batch (`standard_portion` portions)
/// of a menu item.
///
/// Material cost sums `quantity * yield-adjusted price` over the recipe,
/// where the yield-adjusted price is `current_price / (yield_percentage /
/// 100)`. An empty recipe is a valid zero material cost. A material with a
/// non-positive yield percentage makes the division undefined and is
/// rejected as `InvalidMaterialYield`.
pub fn cost_standard(
    item: &menu_item::Model,
    lines: &[RecipeCostLine<'_>],
    labor_rate_per_hour: Decimal,
    policy: Option<&OverheadPolicy>,
) -> Result<CostStandardBreakdown, ServiceError> {
    if item.standard_portion <= 0 {
        return Err(ServiceError::InvalidInput(format!(
            "standard_portion must be greater than zero, got {}",
            item.standard_portion
        )));
    }

    let mut material_cost = Decimal::ZERO;
    for line in lines {
        let material = line.material;
        if material.yield_percentage <= Decimal::ZERO {
            return Err(ServiceError::InvalidMaterialYield {
                material_id: material.id,
                code: material.code.clone(),
            });
        }
        let yield_adjusted_price = material.current_price / (material.yield_percentage / dec!(100));
        material_cost += line.quantity * yield_adjusted_price;
    }

    let labor_cost = item.standard_labor_hours * labor_rate_per_hour;

    let portions = Decimal::from(item.standard_portion);
    let overhead_cost = allocate_overhead(policy, labor_cost, material_cost, portions);

    let total_cost = material_cost + labor_cost + overhead_cost;
    let cost_per_portion = total_cost / portions;

    Ok(CostStandardBreakdown {
        material_cost,
        labor_cost,
        overhead_cost,
        total_cost,
        cost_per_portion,
        standard_portion: item.standard_portion,
    })
}
