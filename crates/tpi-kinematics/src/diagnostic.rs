use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use tpi_types::{Gear, TrainTeeth};

use crate::angles::GearTrain;
use crate::effective::is_inch_fractional;

/// Session summary for cross-checking a gear set against the solver's report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub teeth: TrainTeeth,
    pub effective_teeth: f64,
    pub inch_fractional: bool,
}

impl Diagnostic {
    pub fn new(train: &GearTrain) -> Self {
        let effective_teeth = train.effective_teeth();
        Self {
            teeth: *train.teeth(),
            effective_teeth,
            inch_fractional: is_inch_fractional(effective_teeth),
        }
    }

    /// Emit the line through the log.
    pub fn log(&self) {
        info!(
            effective_teeth = self.effective_teeth,
            inch_fractional = self.inch_fractional,
            "{}",
            self
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gear in Gear::ALL {
            write!(f, "{}={} ", gear.letter(), self.teeth.get(gear))?;
        }
        write!(
            f,
            "effective_teeth={:.6} inch_fractional={}",
            self.effective_teeth, self.inch_fractional
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KinematicsConfig;

    #[test]
    fn test_reference_line() {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let train = GearTrain::new(teeth, &KinematicsConfig::default()).unwrap();
        assert_eq!(
            Diagnostic::new(&train).to_string(),
            "S=56 P=140 I=127 M=40 N=35 Q=132 O=64 effective_teeth=44.450000 inch_fractional=true"
        );
    }
}
