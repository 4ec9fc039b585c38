//! WB pickup-point (PVZ) bonus.
//!
//! The PVZ operation is not priced per unit. Its monthly quantity selects a
//! bucket, and the bonus is the sum of two table lookups:
//!   - WB1: bucket × work schedule category
//!   - WB2: bucket × pickup-point rating band
//!
//! The result is never scaled by a team coefficient.

use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work schedule category of the pickup point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PvzSchedule {
    /// Meets neither planned schedule.
    #[serde(rename = "non_compliant")]
    NonCompliant,
    /// 7 days a week, 11 hours a day.
    #[default]
    #[serde(rename = "schedule_1")]
    Schedule1,
    /// At least 5 days a week, 6 hours a day, open until 20:00 or later.
    #[serde(rename = "schedule_2")]
    Schedule2,
    /// Meets both planned schedules.
    #[serde(rename = "full")]
    Full,
}

impl PvzSchedule {
    pub const ALL: [PvzSchedule; 4] = [
        PvzSchedule::NonCompliant,
        PvzSchedule::Schedule1,
        PvzSchedule::Schedule2,
        PvzSchedule::Full,
    ];

    pub fn column(self) -> usize {
        match self {
            PvzSchedule::NonCompliant => 0,
            PvzSchedule::Schedule1    => 1,
            PvzSchedule::Schedule2    => 2,
            PvzSchedule::Full         => 3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PvzSchedule::NonCompliant => "non_compliant",
            PvzSchedule::Schedule1    => "schedule_1",
            PvzSchedule::Schedule2    => "schedule_2",
            PvzSchedule::Full         => "full",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PvzSchedule::NonCompliant => "Does not meet planned schedules",
            PvzSchedule::Schedule1    => "Schedule 1: 7 days, 11 hours",
            PvzSchedule::Schedule2    => "Schedule 2: 5+ days, 6 hours, until 20:00",
            PvzSchedule::Full         => "Meets both schedules",
        }
    }
}

impl fmt::Display for PvzSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PvzSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PvzSchedule::ALL
            .into_iter()
            .find(|schedule| schedule.key() == s)
            .ok_or_else(|| format!("Unknown PVZ schedule: {s}"))
    }
}

/// Rating band of the pickup point for the month.
/// Deserializes from a band key or a raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RatingRepr")]
pub enum PvzRating {
    /// Rating below 4.9.
    Below,
    /// No rating was published for the month.
    Absent,
    /// 4.9 <= rating < 5.0
    High,
    /// Rating of exactly 5.0.
    #[default]
    Perfect,
}

impl PvzRating {
    pub const ALL: [PvzRating; 4] = [
        PvzRating::Below,
        PvzRating::Absent,
        PvzRating::High,
        PvzRating::Perfect,
    ];

    /// Classify a raw score. Callers encode "no rating" as any positive
    /// score under 4.9 (conventionally 0.1) and "below 4.9" as zero.
    pub fn from_score(score: f64) -> Self {
        if score >= 5.0 {
            PvzRating::Perfect
        } else if score >= 4.9 {
            PvzRating::High
        } else if score > 0.0 {
            PvzRating::Absent
        } else {
            PvzRating::Below
        }
    }

    pub fn column(self) -> usize {
        match self {
            PvzRating::Below   => 0,
            PvzRating::Absent  => 1,
            PvzRating::High    => 2,
            PvzRating::Perfect => 3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PvzRating::Below   => "below",
            PvzRating::Absent  => "absent",
            PvzRating::High    => "high",
            PvzRating::Perfect => "perfect",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PvzRating::Below   => "Rating < 4.9",
            PvzRating::Absent  => "No rating",
            PvzRating::High    => "Rating 4.9-4.99",
            PvzRating::Perfect => "Rating = 5.0",
        }
    }
}

impl fmt::Display for PvzRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PvzRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rating) = PvzRating::ALL.into_iter().find(|r| r.key() == s) {
            return Ok(rating);
        }
        s.parse::<f64>()
            .map(PvzRating::from_score)
            .map_err(|_| format!("Unknown PVZ rating: {s}"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingRepr {
    Score(f64),
    Key(String),
}

impl TryFrom<RatingRepr> for PvzRating {
    type Error = String;

    fn try_from(repr: RatingRepr) -> Result<Self, Self::Error> {
        match repr {
            RatingRepr::Score(score) => Ok(PvzRating::from_score(score)),
            RatingRepr::Key(key) => key.parse(),
        }
    }
}

/// Schedule and rating of the pickup point, supplied with each calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PvzParams {
    #[serde(default)]
    pub schedule: PvzSchedule,
    #[serde(default)]
    pub rating:   PvzRating,
}

/// Lookup tables for the PVZ operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvzTables {
    /// Operation id priced by these tables.
    pub operation_id:     u32,
    /// Inclusive upper bounds of the first three quantity buckets.
    /// Anything above the last bound lands in the fourth bucket.
    pub bucket_limits:    [u32; 3],
    /// WB1 amounts, `[bucket][schedule]`.
    pub schedule_amounts: [[Money; 4]; 4],
    /// WB2 amounts, `[bucket][rating]`.
    pub rating_amounts:   [[Money; 4]; 4],
}

impl PvzTables {
    pub fn bucket(&self, quantity: u32) -> usize {
        self.bucket_limits
            .iter()
            .position(|&limit| quantity <= limit)
            .unwrap_or(self.bucket_limits.len())
    }

    pub fn bonus(&self, quantity: f64, params: &PvzParams) -> PvzBreakdown {
        // Monthly service count; fractional input is truncated.
        let whole = quantity.trunc();
        if !(whole > 0.0) {
            return PvzBreakdown::default();
        }

        let bucket = self.bucket(whole.min(u32::MAX as f64) as u32);
        let wb1 = self.schedule_amounts[bucket][params.schedule.column()];
        let wb2 = self.rating_amounts[bucket][params.rating.column()];

        log::debug!(
            "pvz: quantity={whole} bucket={bucket} schedule={} rating={} wb1={wb1} wb2={wb2}",
            params.schedule, params.rating
        );

        PvzBreakdown {
            bucket: Some(bucket),
            wb1,
            wb2,
            total: wb1 + wb2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PvzBreakdown {
    /// `None` when the quantity was zero.
    pub bucket: Option<usize>,
    pub wb1:    Money,
    pub wb2:    Money,
    pub total:  Money,
}
