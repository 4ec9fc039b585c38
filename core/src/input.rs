//! The calculation input record.
//!
//! Built fresh for each calculation and owned by that call. Maps are
//! ordered so that detail lines come out in a stable order.

use crate::{
    error::CalcResult,
    pvz::{PvzParams, PvzRating, PvzSchedule},
    types::{CoefficientId, KpiId, Money, OperationId, PositionId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub position_id:        PositionId,
    #[serde(default)]
    pub base_salary:        Money,
    /// Fraction of a full-time position, e.g. 0.5. Zero means not given.
    #[serde(default)]
    pub position_rate:      f64,
    /// Operation id -> quantity (units, or a monetary base for percent
    /// operations).
    #[serde(default)]
    pub operations:         BTreeMap<OperationId, f64>,
    /// KPI id -> attainment percent.
    #[serde(default)]
    pub kpi:                BTreeMap<KpiId, f64>,
    /// Team coefficient id -> raw value. Speed coefficients are expected
    /// already resolved (1.5 / 0.5 / 1.0).
    #[serde(default)]
    pub team_coefficients:  BTreeMap<CoefficientId, f64>,
    #[serde(default)]
    pub subordinates_bonus: Option<Money>,
    #[serde(default)]
    pub pvz:                PvzParams,
}

impl CalculationInput {
    pub fn new(position_id: impl Into<PositionId>) -> Self {
        Self {
            position_id: position_id.into(),
            ..Self::default()
        }
    }

    /// Parse an input record from JSON.
    pub fn from_json(content: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &str) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn with_salary(mut self, base_salary: Money, position_rate: f64) -> Self {
        self.base_salary = base_salary;
        self.position_rate = position_rate;
        self
    }

    pub fn with_operation(mut self, id: OperationId, quantity: f64) -> Self {
        self.operations.insert(id, quantity);
        self
    }

    pub fn with_kpi(mut self, id: impl Into<KpiId>, percent: f64) -> Self {
        self.kpi.insert(id.into(), percent);
        self
    }

    pub fn with_team_coefficient(mut self, id: impl Into<CoefficientId>, value: f64) -> Self {
        self.team_coefficients.insert(id.into(), value);
        self
    }

    pub fn with_subordinates_bonus(mut self, amount: Money) -> Self {
        self.subordinates_bonus = Some(amount);
        self
    }

    pub fn with_pvz(mut self, schedule: PvzSchedule, rating: PvzRating) -> Self {
        self.pvz = PvzParams { schedule, rating };
        self
    }
}
