//! End-to-end exercise of the calculation engine: recipe lines through
//! standard costing into variance analysis, without touching a database.

use chrono::Utc;
use foodcost_api::costing::{
    allocate_overhead, cost_standard, round_money, variance, ActualCosts, OverheadMethod,
    OverheadPolicy, RecipeCostLine, VarianceClass,
};
use foodcost_api::entities::{cost_standard as cost_standard_entity, menu_item, raw_material};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn material(id: i64, code: &str, price: Decimal, yield_pct: Decimal) -> raw_material::Model {
    raw_material::Model {
        id,
        code: code.to_string(),
        name: format!("Material {}", code),
        unit: "kg".to_string(),
        category: None,
        current_price: price,
        yield_percentage: yield_pct,
        supplier_id: None,
        notes: None,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn item(standard_portion: i32, labor_hours: Decimal) -> menu_item::Model {
    menu_item::Model {
        id: 1,
        code: "MI-001".to_string(),
        name: "Braised Short Rib".to_string(),
        category: Some("mains".to_string()),
        standard_portion,
        standard_portion_unit: "portion".to_string(),
        standard_labor_hours: labor_hours,
        is_active: true,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[test]
fn standard_then_variance_round_trip() {
    // One batch yields 10 portions. Beef trims to 80%, onions to 90%.
    let beef = material(1, "BEEF", dec!(120.00), dec!(80));
    let onion = material(2, "ONION", dec!(8.00), dec!(90));
    let lines = vec![
        RecipeCostLine {
            material: &beef,
            quantity: dec!(4),
        },
        RecipeCostLine {
            material: &onion,
            quantity: dec!(2),
        },
    ];

    let policy = OverheadPolicy::new(OverheadMethod::PercentageLabor, dec!(25));
    let breakdown = cost_standard(&item(10, dec!(3)), &lines, dec!(40), Some(&policy)).unwrap();

    // Material: 4 * (120 / 0.8) + 2 * (8 / 0.9)
    let expected_material = dec!(600) + dec!(16) / dec!(0.9);
    assert_eq!(breakdown.material_cost, expected_material);
    assert_eq!(breakdown.labor_cost, dec!(120));
    assert_eq!(breakdown.overhead_cost, dec!(30));
    assert_eq!(
        breakdown.total_cost,
        expected_material + dec!(120) + dec!(30)
    );
    assert_eq!(
        breakdown.cost_per_portion,
        breakdown.total_cost / dec!(10)
    );

    // Persisted snapshot of those figures, as the service layer would store it
    let standard = cost_standard_entity::Model {
        id: 1,
        menu_item_id: 1,
        effective_date: Utc::now().into(),
        material_cost: breakdown.material_cost,
        labor_cost: breakdown.labor_cost,
        overhead_cost: breakdown.overhead_cost,
        total_cost: breakdown.total_cost,
        cost_per_portion: breakdown.cost_per_portion,
        created_at: Utc::now().into(),
    };

    // A production run of 10 portions that came in under standard
    let actual_material = breakdown.material_cost - dec!(50);
    let actual_labor = dec!(110);
    let actual_overhead = allocate_overhead(
        Some(&policy),
        actual_labor,
        actual_material,
        dec!(10),
    );

    let result = variance(
        &standard,
        &ActualCosts {
            material: actual_material,
            labor: actual_labor,
            overhead: actual_overhead,
        },
        10,
    );

    assert_eq!(result.standard_total_cost, breakdown.total_cost);
    assert!(result.total_variance < Decimal::ZERO);
    assert_eq!(result.classification, VarianceClass::Favorable);
    assert_eq!(
        result.variance_percentage,
        result.total_variance / result.standard_total_cost * dec!(100)
    );
}

#[test]
fn over_spend_is_unfavorable_at_presentation_precision() {
    let standard = cost_standard_entity::Model {
        id: 1,
        menu_item_id: 1,
        effective_date: Utc::now().into(),
        material_cost: dec!(50),
        labor_cost: dec!(20),
        overhead_cost: dec!(10),
        total_cost: dec!(80),
        cost_per_portion: dec!(8),
        created_at: Utc::now().into(),
    };

    let result = variance(
        &standard,
        &ActualCosts {
            material: dec!(55),
            labor: dec!(30),
            overhead: Decimal::ZERO,
        },
        10,
    );

    // 85 actual against 80 standard
    assert_eq!(result.total_variance, dec!(5));
    assert_eq!(result.classification, VarianceClass::Unfavorable);
    assert_eq!(round_money(result.variance_percentage), dec!(6.25));
}
