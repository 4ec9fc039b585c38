//! Operation bonus: per-operation amounts, class coefficients and the
//! efficiency add-on.

use crate::{
    coefficients::{OperationClass, ResolvedCoefficients},
    config::{AmountType, OperationConfig, PremiumConfig},
    input::CalculationInput,
    result::{LineKind, OperationLine},
    types::Money,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationBreakdown {
    pub subtotal: Money,
    pub lines:    Vec<OperationLine>,
}

fn base_amount(config: &PremiumConfig, op: &OperationConfig, input: &CalculationInput, quantity: f64) -> Money {
    match op.amount_type {
        AmountType::Fixed | AmountType::Percent => quantity * op.value,
        AmountType::Formula => {
            if op.id == config.rules.pvz.operation_id {
                config.rules.pvz.bonus(quantity, &input.pvz).total
            } else {
                log::warn!("operations: no formula registered for operation {}", op.id);
                0.0
            }
        }
    }
}

pub fn compute_operation_bonus(
    config: &PremiumConfig,
    input: &CalculationInput,
    coefficients: &ResolvedCoefficients,
) -> OperationBreakdown {
    let mut breakdown = OperationBreakdown::default();

    for (&op_id, &quantity) in &input.operations {
        if quantity <= 0.0 {
            continue;
        }
        let Some(op) = config.operations.get(&op_id) else {
            log::debug!("operations: skipping unknown operation {op_id}");
            continue;
        };

        let base = base_amount(config, op, input, quantity);
        // Formula amounts come from their own tables and are never scaled.
        let coefficient = match op.amount_type {
            AmountType::Formula => 1.0,
            _ => coefficients.for_class(op.operation_class),
        };
        let final_amount = base * coefficient;
        breakdown.subtotal += final_amount;

        log::debug!(
            "operations: #{op_id} {} qty={quantity} base={base:.2} class={} coeff={coefficient} final={final_amount:.2}",
            op.name, op.operation_class
        );

        breakdown.lines.push(OperationLine {
            kind: LineKind::Operation { operation_id: op_id },
            name: op.name.clone(),
            emoji: op.emoji.clone(),
            rate_label: op.rate_label.clone(),
            quantity,
            base_amount: base,
            coefficient,
            final_amount,
        });
    }

    if let Some(share) = coefficients.efficiency_share {
        let bonus = breakdown.subtotal * share;
        breakdown.subtotal += bonus;
        breakdown.lines.push(OperationLine {
            kind: LineKind::Efficiency,
            name: "Office efficiency bonus".into(),
            emoji: "📈".into(),
            rate_label: format!("{:.0}% of operations", share * 100.0),
            quantity: coefficients.efficiency,
            base_amount: 0.0,
            coefficient: 1.0,
            final_amount: bonus,
        });
        log::debug!(
            "operations: efficiency {}% adds {bonus:.2}",
            coefficients.efficiency
        );
    }

    breakdown
}

/// Operation lines for a class, for callers that group the breakdown.
pub fn lines_of_class<'a>(
    config: &'a PremiumConfig,
    lines: &'a [OperationLine],
    class: OperationClass,
) -> impl Iterator<Item = &'a OperationLine> + 'a {
    lines.iter().filter(move |line| match line.kind {
        LineKind::Operation { operation_id } => config
            .operations
            .get(&operation_id)
            .is_some_and(|op| op.operation_class == class),
        _ => false,
    })
}
