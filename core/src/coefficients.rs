//! Team coefficients and the operation classes they modify.
//!
//! Class 1 operations are paid as-is. Class 2 is scaled by the service
//! coefficient (resolved from the service score ladder). Classes 3 and 4
//! are scaled by the reception and delivery speed coefficients, which the
//! caller supplies already resolved (see [`SpeedNorms`]).

use crate::{config::RulesConfig, types::CoefficientId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SERVICE: &str = "service";
pub const SPEED_RECEPTION: &str = "speed_reception";
pub const SPEED_DELIVERY: &str = "speed_delivery";
pub const EFFICIENCY: &str = "efficiency";

/// Which team coefficient scales an operation. Serialized as 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OperationClass {
    Plain,
    Service,
    ReceptionSpeed,
    DeliverySpeed,
}

impl TryFrom<u8> for OperationClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OperationClass::Plain),
            2 => Ok(OperationClass::Service),
            3 => Ok(OperationClass::ReceptionSpeed),
            4 => Ok(OperationClass::DeliverySpeed),
            other => Err(format!("operation class must be 1-4, got {other}")),
        }
    }
}

impl From<OperationClass> for u8 {
    fn from(class: OperationClass) -> u8 {
        match class {
            OperationClass::Plain          => 1,
            OperationClass::Service        => 2,
            OperationClass::ReceptionSpeed => 3,
            OperationClass::DeliverySpeed  => 4,
        }
    }
}

impl fmt::Display for OperationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// How the raw value of a team coefficient is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientKind {
    /// Points, e.g. a CSI score.
    Score,
    /// Minutes per service.
    Time,
    /// Percent of a plan.
    Percent,
}

/// Speed norms used to turn average service time into a coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedNorms {
    pub reception_minutes: f64,
    pub delivery_minutes:  f64,
    pub met:               f64,
    pub missed:            f64,
    pub not_applicable:    f64,
}

impl SpeedNorms {
    fn resolve(&self, minutes: Option<f64>, norm: f64) -> f64 {
        match minutes {
            None => self.not_applicable,
            Some(m) if m <= 0.0 => self.not_applicable,
            Some(m) if m < norm => self.met,
            Some(_) => self.missed,
        }
    }

    /// Coefficient for class 3 operations. Zero or absent time means the
    /// norm does not apply.
    pub fn reception_coefficient(&self, minutes: Option<f64>) -> f64 {
        self.resolve(minutes, self.reception_minutes)
    }

    /// Coefficient for class 4 operations.
    pub fn delivery_coefficient(&self, minutes: Option<f64>) -> f64 {
        self.resolve(minutes, self.delivery_minutes)
    }
}

/// Extra share of the operation subtotal paid when the office meets its
/// revenue plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRule {
    /// Plan attainment percent at which the bonus applies (inclusive).
    pub threshold:   f64,
    pub bonus_share: f64,
}

impl EfficiencyRule {
    pub fn share_for(&self, percent: f64) -> Option<f64> {
        (percent >= self.threshold).then_some(self.bonus_share)
    }
}

/// Team coefficients resolved for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCoefficients {
    pub service:          f64,
    pub speed_reception:  f64,
    pub speed_delivery:   f64,
    /// Raw efficiency percent and the share it unlocks, if any.
    pub efficiency:       f64,
    pub efficiency_share: Option<f64>,
}

impl ResolvedCoefficients {
    pub fn resolve(rules: &RulesConfig, raw: &BTreeMap<CoefficientId, f64>) -> Self {
        let service_score = raw.get(SERVICE).copied().unwrap_or(0.0);
        let efficiency = raw.get(EFFICIENCY).copied().unwrap_or(0.0);

        let resolved = Self {
            service:          rules.service_ladder.resolve(service_score),
            speed_reception:  raw.get(SPEED_RECEPTION).copied().unwrap_or(rules.speed.not_applicable),
            speed_delivery:   raw.get(SPEED_DELIVERY).copied().unwrap_or(rules.speed.not_applicable),
            efficiency,
            efficiency_share: rules.efficiency.share_for(efficiency),
        };

        for id in raw.keys() {
            if ![SERVICE, SPEED_RECEPTION, SPEED_DELIVERY, EFFICIENCY].contains(&id.as_str()) {
                log::debug!("coefficients: ignoring unknown team coefficient '{id}'");
            }
        }

        resolved
    }

    pub fn for_class(&self, class: OperationClass) -> f64 {
        match class {
            OperationClass::Plain          => 1.0,
            OperationClass::Service        => self.service,
            OperationClass::ReceptionSpeed => self.speed_reception,
            OperationClass::DeliverySpeed  => self.speed_delivery,
        }
    }
}
