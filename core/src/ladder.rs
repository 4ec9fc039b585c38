//! Ordered threshold tables.
//!
//! A ladder is a list of `(min, value)` steps sorted by `min` descending,
//! evaluated top-down: the first step whose `min` the input reaches wins.
//! Inputs below every step resolve to `floor`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderStep {
    pub min:   f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    pub steps: Vec<LadderStep>,
    pub floor: f64,
}

impl ThresholdLadder {
    pub fn new(steps: &[(f64, f64)], floor: f64) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(min, value)| LadderStep { min, value })
                .collect(),
            floor,
        }
    }

    /// Resolve `input` to the value of the first step it reaches.
    pub fn resolve(&self, input: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| input >= step.min)
            .map(|step| step.value)
            .unwrap_or(self.floor)
    }

    /// Steps must be strictly descending by `min` for top-down evaluation
    /// to pick the highest tier reached.
    pub fn is_descending(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].min > w[1].min)
    }
}
