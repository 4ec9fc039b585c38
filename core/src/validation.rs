//! Input validation, run by callers before calculating.
//!
//! The calculator itself assumes validated, non-negative input. Hard
//! violations are returned as `CalcError::Validation`; implausible but
//! legal values come back as soft warnings.

use crate::{
    coefficients::{EFFICIENCY, SERVICE, SPEED_DELIVERY, SPEED_RECEPTION},
    config::{AmountType, PremiumConfig},
    error::{CalcError, CalcResult},
    input::CalculationInput,
};

pub const KPI_PERCENT_MAX: f64 = 200.0;

/// Upper bound for score and percent team coefficients.
pub const COEFFICIENT_PERCENT_MAX: f64 = 200.0;

/// Tolerance when matching a position rate against the allowed list.
const RATE_EPSILON: f64 = 1e-9;

fn reject(field: impl Into<String>, reason: impl Into<String>) -> CalcError {
    CalcError::Validation {
        field:  field.into(),
        reason: reason.into(),
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(reject(field, format!("{value} is not a finite number")));
    }
    if value < 0.0 {
        return Err(reject(field, format!("{value} is negative")));
    }
    Ok(())
}

/// Validate an input against the catalog.
/// Returns soft warnings on success.
pub fn validate_input(config: &PremiumConfig, input: &CalculationInput) -> CalcResult<Vec<String>> {
    let mut warnings = Vec::new();

    non_negative("base_salary", input.base_salary)?;
    non_negative("position_rate", input.position_rate)?;
    if input.position_rate > 0.0
        && !config
            .rules
            .position_rates
            .iter()
            .any(|rate| (rate - input.position_rate).abs() < RATE_EPSILON)
    {
        return Err(reject(
            "position_rate",
            format!("{} is not an allowed position rate", input.position_rate),
        ));
    }

    for (&op_id, &quantity) in &input.operations {
        non_negative(format!("operations.{op_id}"), quantity)?;
        let Some(op) = config.operations.get(&op_id) else {
            continue;
        };
        // Percent and formula quantities are money or monthly totals.
        if op.amount_type != AmountType::Fixed {
            continue;
        }
        if let Some(max) = op.max_reasonable {
            if quantity > max {
                warnings.push(format!(
                    "{}: quantity {quantity} exceeds the usual maximum of {max}",
                    op.name
                ));
            }
        }
    }

    for (kpi_id, &percent) in &input.kpi {
        non_negative(format!("kpi.{kpi_id}"), percent)?;
        if percent > KPI_PERCENT_MAX {
            return Err(reject(
                format!("kpi.{kpi_id}"),
                format!("{percent}% is above {KPI_PERCENT_MAX}%"),
            ));
        }
    }

    let speed = &config.rules.speed;
    let speed_values = [speed.met, speed.missed, speed.not_applicable];
    for (coeff_id, &value) in &input.team_coefficients {
        let field = format!("team_coefficients.{coeff_id}");
        non_negative(field.as_str(), value)?;
        match coeff_id.as_str() {
            SERVICE | EFFICIENCY if value > COEFFICIENT_PERCENT_MAX => {
                return Err(reject(field, format!("{value} is above {COEFFICIENT_PERCENT_MAX}")));
            }
            SPEED_RECEPTION | SPEED_DELIVERY if !speed_values.contains(&value) => {
                return Err(reject(
                    field,
                    format!(
                        "{value} is not a speed coefficient (expected {}, {} or {}); convert minutes first",
                        speed.met, speed.missed, speed.not_applicable
                    ),
                ));
            }
            _ => {}
        }
    }

    if let Some(amount) = input.subordinates_bonus {
        non_negative("subordinates_bonus", amount)?;
    }

    if !warnings.is_empty() {
        log::debug!("validation: {} soft warnings for '{}'", warnings.len(), input.position_id);
    }

    Ok(warnings)
}
