//! KPI bonus.
//!
//! The pool is a fixed share of real salary. It is paid out per KPI as
//! `pool × weight × coefficient`, where the coefficient comes from the
//! KPI's threshold ladder. Nothing is paid when the gate KPI (revenue)
//! is below its threshold.

use crate::{
    config::{PositionConfig, PremiumConfig},
    error::CalcError,
    input::CalculationInput,
    result::KpiLine,
    types::Money,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiBreakdown {
    pub pool:     Money,
    pub subtotal: Money,
    pub lines:    Vec<KpiLine>,
    pub warnings: Vec<String>,
}

/// Salary the KPI pool is based on. Falls back to a fixed base when
/// either salary or rate was not given.
pub fn kpi_salary_base(config: &PremiumConfig, base_salary: Money, position_rate: f64) -> Money {
    if base_salary > 0.0 && position_rate > 0.0 {
        base_salary * position_rate
    } else {
        config.rules.kpi_pool.fallback_salary
    }
}

pub fn compute_kpi_bonus(
    config: &PremiumConfig,
    position: &PositionConfig,
    input: &CalculationInput,
) -> KpiBreakdown {
    let mut breakdown = KpiBreakdown::default();

    if !position.has_kpi() || input.kpi.is_empty() {
        return breakdown;
    }

    let rule = &config.rules.kpi_pool;
    let salary = kpi_salary_base(config, input.base_salary, input.position_rate);
    breakdown.pool = salary * rule.pool_share;

    let gate = input.kpi.get(&rule.gate_kpi).copied().unwrap_or(0.0);
    if gate < rule.gate_percent {
        log::warn!(
            "kpi: {} {gate}% below {}% gate for '{}', KPI bonus withheld",
            rule.gate_kpi, rule.gate_percent, position.id
        );
        breakdown.warnings.push(format!(
            "⚠️ Revenue {gate}% < {}%: KPI bonus is not paid",
            rule.gate_percent
        ));
        return breakdown;
    }

    let Some(weights) = &position.kpi_weights else {
        let err = CalcError::MissingKpiWeights {
            position_id: position.id.clone(),
        };
        log::warn!("kpi: {err}");
        breakdown.warnings.push(format!("⚠️ {err}"));
        return breakdown;
    };

    for kpi_id in &position.kpi {
        let Some(&percent) = input.kpi.get(kpi_id) else {
            continue;
        };
        if percent <= 0.0 {
            continue;
        }
        let Some(&weight) = weights.get(kpi_id) else {
            continue;
        };
        let Some(ladder) = config.kpi_ladder(kpi_id) else {
            log::debug!("kpi: no ladder for '{kpi_id}', skipping");
            continue;
        };

        let coefficient = ladder.resolve(percent);
        let bonus = breakdown.pool * weight * coefficient;
        breakdown.subtotal += bonus;

        let (name, emoji) = config
            .kpis
            .get(kpi_id)
            .map(|k| (k.name.clone(), k.emoji.clone()))
            .unwrap_or_else(|| (kpi_id.clone(), "📊".into()));

        log::debug!(
            "kpi: {kpi_id} {percent}% weight={weight} coeff={coefficient} bonus={bonus:.2}"
        );

        breakdown.lines.push(KpiLine {
            kpi_id: kpi_id.clone(),
            name,
            emoji,
            percent,
            weight,
            coefficient,
            pool: breakdown.pool,
            bonus,
        });
    }

    for kpi_id in input.kpi.keys() {
        if !position.kpi.contains(kpi_id) {
            log::debug!("kpi: '{kpi_id}' not applicable to '{}', ignored", position.id);
        }
    }

    breakdown
}
