//! The premium calculator.
//!
//! CALCULATION ORDER (fixed):
//!   1. Resolve team coefficients
//!   2. Operation bonus, then efficiency add-on
//!   3. Subordinates bonus (after efficiency, never scaled)
//!   4. KPI bonus (positions with KPIs only)
//!
//! RULES:
//!   - The calculator holds only the immutable catalog.
//!   - Everything a calculation needs arrives in its input.
//!   - Identical inputs give identical results.

use crate::{
    coefficients::ResolvedCoefficients,
    config::PremiumConfig,
    error::CalcResult,
    input::CalculationInput,
    kpi::compute_kpi_bonus,
    operations::compute_operation_bonus,
    result::{CalculationResult, LineKind, OperationLine},
};

pub struct PremiumCalculator {
    config: PremiumConfig,
}

impl PremiumCalculator {
    pub fn new(config: PremiumConfig) -> Self {
        Self { config }
    }

    /// Calculator over the built-in production catalog.
    pub fn builtin() -> Self {
        Self::new(PremiumConfig::builtin())
    }

    /// Calculator over a catalog loaded from a data directory.
    pub fn from_data_dir(data_dir: &str) -> CalcResult<Self> {
        Ok(Self::new(PremiumConfig::load(data_dir)?))
    }

    pub fn config(&self) -> &PremiumConfig {
        &self.config
    }

    pub fn calculate(&self, input: &CalculationInput) -> CalcResult<CalculationResult> {
        calculate(&self.config, input)
    }
}

pub fn calculate(config: &PremiumConfig, input: &CalculationInput) -> CalcResult<CalculationResult> {
    let position = config.position(&input.position_id)?;

    let coefficients = ResolvedCoefficients::resolve(&config.rules, &input.team_coefficients);
    let mut operations = compute_operation_bonus(config, input, &coefficients);

    if let Some(amount) = input.subordinates_bonus.filter(|&a| a > 0.0) {
        if !position.has_team_bonus {
            log::debug!(
                "calculator: subordinates bonus given for '{}', which has no team bonus",
                position.id
            );
        }
        operations.subtotal += amount;
        operations.lines.push(OperationLine {
            kind: LineKind::Subordinates,
            name: "Subordinates bonus".into(),
            emoji: "👥".into(),
            rate_label: format!("{amount} RUB"),
            quantity: 1.0,
            base_amount: amount,
            coefficient: 1.0,
            final_amount: amount,
        });
    }

    let kpi = compute_kpi_bonus(config, position, input);

    let real_salary = if input.base_salary > 0.0 && input.position_rate > 0.0 {
        input.base_salary * input.position_rate
    } else {
        0.0
    };
    let total_premium = operations.subtotal + kpi.subtotal;

    log::info!(
        "calculator: {} total={total_premium:.2} operations={:.2} kpi={:.2} warnings={}",
        position.id,
        operations.subtotal,
        kpi.subtotal,
        kpi.warnings.len()
    );

    Ok(CalculationResult {
        position_id: position.id.clone(),
        position_name: position.name.clone(),
        base_salary: input.base_salary,
        position_rate: input.position_rate,
        real_salary,
        total_premium,
        operation_bonus: operations.subtotal,
        kpi_bonus: kpi.subtotal,
        operation_lines: operations.lines,
        kpi_lines: kpi.lines,
        warnings: kpi.warnings,
    })
}
