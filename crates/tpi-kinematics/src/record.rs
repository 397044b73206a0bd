//! Records produced by the external gear-set solver.
//!
//! The solver reports one set per line as a bracketed list
//! `[P, I, M, N, Q, O, Z]`, where `Z` is the effective output teeth rounded
//! to six decimals. The spindle size is not part of the record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use tpi_types::{Gear, TrainTeeth};

use crate::effective::effective_teeth;
use crate::error::KinematicsError;

/// `Z` is printed with six decimals, so it may be off by half a unit there.
const REPORTED_PRECISION: f64 = 5e-7 + 1e-9;

const RECORD_GEARS: [Gear; 6] = [
    Gear::Input,
    Gear::Inch,
    Gear::Third,
    Gear::Fourth,
    Gear::Idler,
    Gear::Output,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverRecord {
    pub input: u32,
    pub inch: u32,
    pub third: u32,
    pub fourth: u32,
    pub idler: u32,
    pub output: u32,
    /// Effective output teeth as claimed by the solver.
    pub effective_teeth: f64,
}

impl SolverRecord {
    pub fn parse(line: &str) -> Result<Self, KinematicsError> {
        let values: Vec<f64> = serde_json::from_str(line.trim())?;
        if values.len() != RECORD_GEARS.len() + 1 {
            return Err(KinematicsError::RecordLength {
                found: values.len(),
            });
        }
        let mut counts = [0u32; 6];
        for ((slot, gear), value) in counts.iter_mut().zip(RECORD_GEARS).zip(&values) {
            *slot = tooth_count(gear, *value)?;
        }
        let [input, inch, third, fourth, idler, output] = counts;
        Ok(Self {
            input,
            inch,
            third,
            fourth,
            idler,
            output,
            effective_teeth: values[6],
        })
    }

    /// The full tooth set once the spindle gear is known.
    pub fn teeth(&self, spindle: u32) -> TrainTeeth {
        TrainTeeth {
            spindle,
            input: self.input,
            inch: self.inch,
            third: self.third,
            fourth: self.fourth,
            idler: self.idler,
            output: self.output,
        }
    }

    /// Recompute the effective teeth from the record's sizes and compare with
    /// the solver's claim.
    pub fn cross_check(&self, spindle: u32) -> CrossCheck {
        let teeth = self.teeth(spindle);
        let computed = effective_teeth(&teeth);
        CrossCheck {
            claimed: self.effective_teeth,
            computed,
            closed: teeth.is_closed(),
            matches: (computed - self.effective_teeth).abs() <= REPORTED_PRECISION,
        }
    }
}

impl FromStr for SolverRecord {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SolverRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}, {}, {}, {:?}]",
            self.input,
            self.inch,
            self.third,
            self.fourth,
            self.idler,
            self.output,
            self.effective_teeth
        )
    }
}

fn tooth_count(gear: Gear, value: f64) -> Result<u32, KinematicsError> {
    if !value.is_finite() || value < 0.5 {
        return Err(KinematicsError::NonPositiveRecordValue { gear, value });
    }
    let rounded = value.round();
    if rounded > u32::MAX as f64 {
        return Err(KinematicsError::InvalidRecordValue { gear, value });
    }
    if rounded != value {
        warn!(%gear, value, rounded, "non-integral tooth count in solver record");
    }
    Ok(rounded as u32)
}

/// Outcome of comparing a solver record with the kinematic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossCheck {
    pub claimed: f64,
    pub computed: f64,
    /// The record's idler and output satisfy the closure relations.
    pub closed: bool,
    /// Claimed and computed effective teeth agree to the reported precision.
    pub matches: bool,
}

impl CrossCheck {
    pub fn is_consistent(&self) -> bool {
        self.closed && self.matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solver_line() {
        let record = SolverRecord::parse("[140, 127, 40, 35, 132, 64, 44.45]").unwrap();
        assert_eq!(record.input, 140);
        assert_eq!(record.output, 64);
        assert_eq!(record.effective_teeth, 44.45);
        assert_eq!(record.teeth(56), TrainTeeth::derive(56, 140, 127, 40, 35).unwrap());
    }

    #[test]
    fn test_display_matches_solver_format() {
        let line = "[140, 127, 40, 35, 132, 64, 44.45]";
        let record: SolverRecord = line.parse().unwrap();
        assert_eq!(record.to_string(), line);
    }

    #[test]
    fn test_cross_check_reference() {
        let record = SolverRecord::parse("[140, 127, 40, 35, 132, 64, 44.45]").unwrap();
        let check = record.cross_check(56);
        assert!(check.is_consistent(), "{:?}", check);
    }

    #[test]
    fn test_cross_check_wrong_claim() {
        let record = SolverRecord::parse("[140, 127, 40, 35, 132, 64, 44.451]").unwrap();
        let check = record.cross_check(56);
        assert!(check.closed);
        assert!(!check.matches);
    }

    #[test]
    fn test_cross_check_wrong_spindle() {
        let record = SolverRecord::parse("[140, 127, 40, 35, 132, 64, 44.45]").unwrap();
        assert!(!record.cross_check(60).closed);
    }

    #[test]
    fn test_rounds_non_integral_counts() {
        let record = SolverRecord::parse("[140.0, 127, 40, 35.2, 132, 64, 44.45]").unwrap();
        assert_eq!(record.input, 140);
        assert_eq!(record.fourth, 35);
    }

    #[test]
    fn test_accepts_largest_tooth_count() {
        let record = SolverRecord::parse("[140, 127, 40, 35, 132, 4294967295, 1.0]").unwrap();
        assert_eq!(record.output, u32::MAX);
    }

    #[test]
    fn test_rejects_bad_records() {
        assert!(matches!(
            SolverRecord::parse("[140, 127, 40, 35, 132, 64]"),
            Err(KinematicsError::RecordLength { found: 6 })
        ));
        assert!(matches!(
            SolverRecord::parse("[140, 127, 0, 35, 132, 64, 1.0]"),
            Err(KinematicsError::NonPositiveRecordValue {
                gear: Gear::Third,
                ..
            })
        ));
        assert!(matches!(
            SolverRecord::parse("[1e12, 127, 40, 35, 132, 64, 44.45]"),
            Err(KinematicsError::InvalidRecordValue {
                gear: Gear::Input,
                ..
            })
        ));
        assert!(matches!(
            SolverRecord::parse("140, 127"),
            Err(KinematicsError::MalformedRecord(_))
        ));
    }
}
