//! End-to-end calculations: aggregation, errors, determinism.

use premium_core::{
    calculator::{calculate, PremiumCalculator},
    config::PremiumConfig,
    error::CalcError,
    input::CalculationInput,
    pvz::{PvzRating, PvzSchedule},
};

fn nops_management_month() -> CalculationInput {
    CalculationInput::new("nops_management")
        .with_salary(45_000.0, 1.0)
        .with_operation(11, 3.0)   // 900
        .with_operation(12, 150.0) // 750
        .with_operation(13, 200.0) // 7 500 from PVZ tables
        .with_kpi("revenue", 104.0)
        .with_kpi("csi", 96.0)
        .with_kpi("online_rpo", 88.0)
        .with_kpi("co1_co2", 112.0)
        .with_subordinates_bonus(5_000.0)
        .with_pvz(PvzSchedule::Full, PvzRating::Perfect)
}

#[test]
fn total_is_operations_plus_kpi() {
    let calc = PremiumCalculator::builtin();
    let result = calc.calculate(&nops_management_month()).unwrap();

    // pool = 9 000: revenue 0.6×0.30, csi 1.0×0.40, online 0.1×0.15, co1 1.0×0.15
    let expected_kpi = 9_000.0 * (0.18 + 0.40 + 0.015 + 0.15);
    let expected_ops = 900.0 + 750.0 + 7_500.0 + 5_000.0;

    assert!((result.kpi_bonus - expected_kpi).abs() < 1e-6, "kpi {}", result.kpi_bonus);
    assert!((result.operation_bonus - expected_ops).abs() < 1e-6, "ops {}", result.operation_bonus);
    assert_eq!(result.total_premium, result.operation_bonus + result.kpi_bonus);
    assert_eq!(result.real_salary, 45_000.0);
    assert_eq!(result.position_name, "Office head with operators");
}

#[test]
fn unknown_position_is_a_configuration_error() {
    let calc = PremiumCalculator::builtin();
    let err = calc
        .calculate(&CalculationInput::new("night_watchman"))
        .unwrap_err();

    match &err {
        CalcError::PositionNotFound { position_id } => assert_eq!(position_id, "night_watchman"),
        other => panic!("expected PositionNotFound, got {other:?}"),
    }
    assert!(err.is_configuration());
}

#[test]
fn identical_inputs_give_identical_results() {
    let calc = PremiumCalculator::builtin();
    let input = nops_management_month()
        .with_team_coefficient("efficiency", 105.0)
        .with_team_coefficient("service", 91.0);

    let a = calc.calculate(&input).unwrap();
    let b = calc.calculate(&input).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.total_premium.to_bits(), b.total_premium.to_bits());
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn free_function_matches_calculator() {
    let config = PremiumConfig::builtin();
    let input = nops_management_month();

    let direct = calculate(&config, &input).unwrap();
    let via_calc = PremiumCalculator::new(config).calculate(&input).unwrap();

    assert_eq!(direct, via_calc);
}

#[test]
fn input_parses_from_json() {
    let input = CalculationInput::from_json(
        r#"{
            "position_id": "nops_operational",
            "base_salary": 50000,
            "position_rate": 0.5,
            "operations": { "5": 10, "13": 60 },
            "kpi": { "revenue": 101.5 },
            "pvz": { "schedule": "schedule_2", "rating": "high" }
        }"#,
    )
    .unwrap();

    assert_eq!(input.operations.get(&13), Some(&60.0));
    assert_eq!(input.pvz.schedule, PvzSchedule::Schedule2);
    assert_eq!(input.pvz.rating, PvzRating::High);
    assert_eq!(input.subordinates_bonus, None);
    assert!(input.team_coefficients.is_empty());

    let bad = CalculationInput::from_json(r#"{ "base_salary": 1 }"#);
    assert!(matches!(bad, Err(CalcError::Serialization(_))));
}

#[test]
fn result_serializes_line_kinds_with_tags() {
    let calc = PremiumCalculator::builtin();
    let result = calc.calculate(&nops_management_month()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["operation_lines"][0]["kind"]["kind"], "operation");
    assert_eq!(json["operation_lines"][0]["kind"]["operation_id"], 11);
    assert_eq!(json["operation_lines"][3]["kind"]["kind"], "subordinates");
}
