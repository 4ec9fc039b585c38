//! Operation bonus: unit pricing, class coefficients, efficiency add-on.

use premium_core::{
    calculator::PremiumCalculator,
    input::CalculationInput,
    result::LineKind,
};

fn assert_money(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn operator_worked_example_pays_600() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("operator")
        .with_salary(0.0, 0.0)
        .with_operation(5, 10.0) // SIM type 1, 50 RUB/pc, class 2
        .with_team_coefficient("service", 95.0);

    let result = calc.calculate(&input).unwrap();

    assert_money(result.operation_bonus, 600.0, "operation bonus");
    assert_money(result.kpi_bonus, 0.0, "kpi bonus");
    assert_money(result.total_premium, 600.0, "total");

    let line = &result.operation_lines[0];
    assert_eq!(line.kind, LineKind::Operation { operation_id: 5 });
    assert_money(line.base_amount, 500.0, "base amount");
    assert_eq!(line.coefficient, 1.2);
    assert_money(line.final_amount, 600.0, "final amount");
}

#[test]
fn percent_operations_use_quantity_as_monetary_base() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("operator").with_operation(1, 25_000.0);

    let result = calc.calculate(&input).unwrap();

    // 3% of 25 000, service score absent -> coefficient 1.0
    assert_money(result.operation_bonus, 750.0, "retail bonus");
    assert_eq!(result.operation_lines[0].coefficient, 1.0);
}

#[test]
fn speed_classes_use_supplied_coefficients() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("chief_specialist")
        .with_operation(17, 40.0) // 5 RUB/pc, class 3
        .with_operation(21, 30.0) // 2 RUB/pc, class 4
        .with_team_coefficient("speed_reception", 0.5)
        .with_team_coefficient("speed_delivery", 1.5);

    let result = calc.calculate(&input).unwrap();

    assert_money(result.operation_lines[0].final_amount, 100.0, "reception");
    assert_money(result.operation_lines[1].final_amount, 90.0, "delivery");
    assert_money(result.operation_bonus, 190.0, "subtotal");
}

#[test]
fn class_one_ignores_team_coefficients() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("operator")
        .with_operation(11, 2.0) // pensioner acquisition, 300 RUB, class 1
        .with_team_coefficient("service", 99.0)
        .with_team_coefficient("speed_reception", 1.5);

    let result = calc.calculate(&input).unwrap();
    assert_money(result.operation_bonus, 600.0, "class 1 bonus");
}

#[test]
fn efficiency_at_exactly_100_adds_30_percent() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("operator")
        .with_operation(11, 2.0)
        .with_team_coefficient("efficiency", 100.0);

    let result = calc.calculate(&input).unwrap();

    assert_money(result.operation_bonus, 780.0, "with efficiency");
    let last = result.operation_lines.last().unwrap();
    assert_eq!(last.kind, LineKind::Efficiency);
    assert_money(last.final_amount, 180.0, "efficiency line");
    assert_eq!(last.quantity, 100.0);
}

#[test]
fn efficiency_just_below_100_adds_nothing() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("operator")
        .with_operation(11, 2.0)
        .with_team_coefficient("efficiency", 99.99);

    let result = calc.calculate(&input).unwrap();

    assert_money(result.operation_bonus, 600.0, "no efficiency");
    assert!(result
        .operation_lines
        .iter()
        .all(|l| l.kind != LineKind::Efficiency));
}

#[test]
fn unknown_and_zero_operations_are_skipped() {
    let calc = PremiumCalculator::builtin();
    let baseline = calc
        .calculate(&CalculationInput::new("operator").with_operation(5, 10.0))
        .unwrap();

    let input = CalculationInput::new("operator")
        .with_operation(5, 10.0)
        .with_operation(999, 40.0)
        .with_operation(6, 0.0)
        .with_team_coefficient("mystery", 3.0);
    let result = calc.calculate(&input).unwrap();

    assert_money(result.operation_bonus, baseline.operation_bonus, "subtotal");
    assert_eq!(result.operation_lines.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn lines_follow_operation_id_order() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("chief_specialist")
        .with_operation(21, 1.0)
        .with_operation(3, 100.0)
        .with_operation(12, 4.0);

    let result = calc.calculate(&input).unwrap();
    let ids: Vec<_> = result
        .operation_lines
        .iter()
        .filter_map(|l| match l.kind {
            LineKind::Operation { operation_id } => Some(operation_id),
            _ => None,
        })
        .collect();
    assert_eq!(ids, vec![3, 12, 21]);
}

#[test]
fn subordinates_bonus_is_added_after_efficiency() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("nops_management")
        .with_operation(11, 1.0)
        .with_team_coefficient("efficiency", 100.0)
        .with_subordinates_bonus(5_000.0);

    let result = calc.calculate(&input).unwrap();

    // 300 + 30% efficiency (90) + 5 000 flat
    assert_money(result.operation_bonus, 5_390.0, "operation bonus");
    let kinds: Vec<_> = result.operation_lines.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LineKind::Operation { operation_id: 11 },
            LineKind::Efficiency,
            LineKind::Subordinates,
        ]
    );
    let sub = result.operation_lines.last().unwrap();
    assert_eq!(sub.coefficient, 1.0);
    assert_money(sub.final_amount, 5_000.0, "subordinates line");
}

#[test]
fn zero_subordinates_bonus_adds_no_line() {
    let calc = PremiumCalculator::builtin();
    let input = CalculationInput::new("nops_management").with_subordinates_bonus(0.0);

    let result = calc.calculate(&input).unwrap();
    assert!(result.operation_lines.is_empty());
    assert_eq!(result.total_premium, 0.0);
}
