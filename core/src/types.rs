//! Shared primitive types used across the calculator.

/// Amount in currency units (roubles).
pub type Money = f64;

/// Stable key of a position profile, e.g. `"operator"`.
pub type PositionId = String;

/// Numeric id of an operation in the operation catalog.
pub type OperationId = u32;

/// Stable key of a KPI, e.g. `"revenue"`.
pub type KpiId = String;

/// Stable key of a team coefficient, e.g. `"service"`.
pub type CoefficientId = String;
