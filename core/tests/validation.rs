//! Input validation ahead of calculation.

use premium_core::{
    config::PremiumConfig,
    error::CalcError,
    input::CalculationInput,
    validation::validate_input,
};

fn field_of(err: CalcError) -> String {
    match err {
        CalcError::Validation { field, .. } => field,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn clean_input_has_no_warnings() {
    let config = PremiumConfig::builtin();
    let input = CalculationInput::new("nops_operational")
        .with_salary(50_000.0, 0.5)
        .with_operation(5, 10.0)
        .with_kpi("revenue", 101.0)
        .with_team_coefficient("efficiency", 100.0);

    assert!(validate_input(&config, &input).unwrap().is_empty());
}

#[test]
fn negative_values_are_rejected() {
    let config = PremiumConfig::builtin();

    let salary = CalculationInput::new("operator").with_salary(-1.0, 1.0);
    assert_eq!(field_of(validate_input(&config, &salary).unwrap_err()), "base_salary");

    let quantity = CalculationInput::new("operator").with_operation(5, -3.0);
    assert_eq!(field_of(validate_input(&config, &quantity).unwrap_err()), "operations.5");

    let coeff = CalculationInput::new("operator").with_team_coefficient("service", -10.0);
    assert_eq!(
        field_of(validate_input(&config, &coeff).unwrap_err()),
        "team_coefficients.service"
    );

    let bonus = CalculationInput::new("nops_management").with_subordinates_bonus(-500.0);
    assert_eq!(field_of(validate_input(&config, &bonus).unwrap_err()), "subordinates_bonus");
}

#[test]
fn kpi_percent_is_capped_at_200() {
    let config = PremiumConfig::builtin();

    let ok = CalculationInput::new("admin").with_kpi("csi", 200.0);
    assert!(validate_input(&config, &ok).is_ok());

    let too_high = CalculationInput::new("admin").with_kpi("csi", 200.5);
    assert_eq!(field_of(validate_input(&config, &too_high).unwrap_err()), "kpi.csi");
}

#[test]
fn position_rate_must_be_on_the_grid() {
    let config = PremiumConfig::builtin();

    for rate in [0.0, 0.3, 0.7, 1.0, 1.3] {
        let input = CalculationInput::new("postman").with_salary(30_000.0, rate);
        assert!(validate_input(&config, &input).is_ok(), "rate {rate}");
    }

    let off_grid = CalculationInput::new("postman").with_salary(30_000.0, 0.45);
    assert_eq!(field_of(validate_input(&config, &off_grid).unwrap_err()), "position_rate");
}

#[test]
fn non_finite_numbers_are_rejected() {
    let config = PremiumConfig::builtin();
    let input = CalculationInput::new("operator").with_operation(1, f64::NAN);
    assert!(validate_input(&config, &input).is_err());
}

#[test]
fn implausible_quantities_only_warn() {
    let config = PremiumConfig::builtin();
    let input = CalculationInput::new("operator")
        .with_operation(5, 25.0) // usual maximum 20
        .with_operation(999, 1_000.0);

    let warnings = validate_input(&config, &input).unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("SIM card, type 1"));
}

#[test]
fn money_and_monthly_total_quantities_do_not_warn() {
    let config = PremiumConfig::builtin();
    let input = CalculationInput::new("nops_management")
        .with_operation(1, 25_000.0) // retail revenue in roubles
        .with_operation(13, 200.0); // PVZ services for the month

    assert!(validate_input(&config, &input).unwrap().is_empty());
}

#[test]
fn score_coefficients_are_capped_at_200() {
    let config = PremiumConfig::builtin();

    let ok = CalculationInput::new("operator")
        .with_team_coefficient("service", 200.0)
        .with_team_coefficient("efficiency", 200.0);
    assert!(validate_input(&config, &ok).is_ok());

    let efficiency = CalculationInput::new("operator").with_team_coefficient("efficiency", 5_000.0);
    assert_eq!(
        field_of(validate_input(&config, &efficiency).unwrap_err()),
        "team_coefficients.efficiency"
    );

    let service = CalculationInput::new("operator").with_team_coefficient("service", 200.5);
    assert_eq!(
        field_of(validate_input(&config, &service).unwrap_err()),
        "team_coefficients.service"
    );
}

#[test]
fn speed_coefficients_must_be_resolved_values() {
    let config = PremiumConfig::builtin();

    for value in [1.5, 0.5, 1.0] {
        let input = CalculationInput::new("operator")
            .with_team_coefficient("speed_reception", value)
            .with_team_coefficient("speed_delivery", value);
        assert!(validate_input(&config, &input).is_ok(), "value {value}");
    }

    // Raw minutes instead of a coefficient.
    let minutes = CalculationInput::new("operator")
        .with_operation(17, 40.0)
        .with_team_coefficient("speed_reception", 3.5);
    assert_eq!(
        field_of(validate_input(&config, &minutes).unwrap_err()),
        "team_coefficients.speed_reception"
    );

    let delivery = CalculationInput::new("operator").with_team_coefficient("speed_delivery", 2.0);
    assert_eq!(
        field_of(validate_input(&config, &delivery).unwrap_err()),
        "team_coefficients.speed_delivery"
    );
}
