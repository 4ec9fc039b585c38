//! Premium calculation engine for postal-service staff.
//!
//! Pure functions over an immutable catalog: a [`input::CalculationInput`]
//! goes in, a [`result::CalculationResult`] with a full breakdown comes out.

pub mod calculator;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod input;
pub mod kpi;
pub mod ladder;
pub mod operations;
pub mod pvz;
pub mod result;
pub mod types;
pub mod validation;
