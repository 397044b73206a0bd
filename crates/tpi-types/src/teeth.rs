use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gear::Gear;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeethError {
    #[error("Gear {gear} would need {value} teeth")]
    NonPositive { gear: Gear, value: i64 },
    #[error("Gear {gear} would need {value} teeth, more than a tooth count can hold")]
    TooLarge { gear: Gear, value: i64 },
}

/// Tooth counts of every gear in the train.
///
/// Fixed for the lifetime of a simulation. The idler and output sizes are
/// determined by the others through the center-distance closure; use
/// [`TrainTeeth::derive`] to build a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainTeeth {
    pub spindle: u32,
    pub input: u32,
    pub inch: u32,
    pub third: u32,
    pub fourth: u32,
    pub idler: u32,
    pub output: u32,
}

impl TrainTeeth {
    /// Build a closed set from the five independent sizes.
    ///
    /// `Q = I + M - N` and `O = P + S - Q`.
    pub fn derive(
        spindle: u32,
        input: u32,
        inch: u32,
        third: u32,
        fourth: u32,
    ) -> Result<Self, TeethError> {
        let idler = tooth_count(Gear::Idler, closure_idler(inch, third, fourth))?;
        let output = tooth_count(Gear::Output, closure_output(input, spindle, idler))?;
        Ok(Self {
            spindle,
            input,
            inch,
            third,
            fourth,
            idler,
            output,
        })
    }

    pub fn get(&self, gear: Gear) -> u32 {
        match gear {
            Gear::Spindle => self.spindle,
            Gear::Input => self.input,
            Gear::Inch => self.inch,
            Gear::Third => self.third,
            Gear::Fourth => self.fourth,
            Gear::Idler => self.idler,
            Gear::Output => self.output,
        }
    }

    /// Idler size the closure relation demands for this set.
    pub fn expected_idler(&self) -> i64 {
        closure_idler(self.inch, self.third, self.fourth)
    }

    /// Output size the closure relation demands for this set.
    pub fn expected_output(&self) -> i64 {
        closure_output(self.input, self.spindle, self.idler)
    }

    pub fn is_closed(&self) -> bool {
        self.expected_idler() == self.idler as i64 && self.expected_output() == self.output as i64
    }

    /// Solver ordering: `(P, I, M, N, Q, O)`.
    pub fn solver_tuple(&self) -> [u32; 6] {
        [
            self.input,
            self.inch,
            self.third,
            self.fourth,
            self.idler,
            self.output,
        ]
    }
}

fn tooth_count(gear: Gear, value: i64) -> Result<u32, TeethError> {
    if value <= 0 {
        return Err(TeethError::NonPositive { gear, value });
    }
    u32::try_from(value).map_err(|_| TeethError::TooLarge { gear, value })
}

fn closure_idler(inch: u32, third: u32, fourth: u32) -> i64 {
    inch as i64 + third as i64 - fourth as i64
}

fn closure_output(input: u32, spindle: u32, idler: u32) -> i64 {
    input as i64 + spindle as i64 - idler as i64
}
