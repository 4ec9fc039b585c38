use crate::types::{KpiId, Money, OperationId, PositionId};
use serde::{Deserialize, Serialize};

/// What produced an operation detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Operation { operation_id: OperationId },
    Efficiency,
    Subordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationLine {
    pub kind:         LineKind,
    pub name:         String,
    pub emoji:        String,
    pub rate_label:   String,
    /// Units or monetary base; the efficiency percent for the efficiency line.
    pub quantity:     f64,
    pub base_amount:  Money,
    pub coefficient:  f64,
    pub final_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiLine {
    pub kpi_id:      KpiId,
    pub name:        String,
    pub emoji:       String,
    pub percent:     f64,
    pub weight:      f64,
    pub coefficient: f64,
    /// KPI pool the line was computed from.
    pub pool:        Money,
    pub bonus:       Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub position_id:     PositionId,
    pub position_name:   String,
    pub base_salary:     Money,
    pub position_rate:   f64,
    /// Base salary × position rate; zero when either was not given.
    pub real_salary:     Money,
    pub total_premium:   Money,
    /// Operations, efficiency bonus and subordinates bonus.
    pub operation_bonus: Money,
    pub kpi_bonus:       Money,
    pub operation_lines: Vec<OperationLine>,
    pub kpi_lines:       Vec<KpiLine>,
    pub warnings:        Vec<String>,
}
