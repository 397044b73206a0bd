use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use tpi_types::{Gear, TrainTeeth};

use crate::chain::{resolve_chain, GearKinematics, ResolvedChain};
use crate::config::KinematicsConfig;
use crate::effective::effective_teeth;
use crate::error::KinematicsError;
use crate::mesh::{mesh_residuals, MeshResidual};
use crate::validation::validate_train;

/// Rotation of every gear at one instant, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainAngles {
    pub spindle: f64,
    pub input: f64,
    pub inch: f64,
    pub third: f64,
    pub fourth: f64,
    pub idler: f64,
    pub output: f64,
}

impl TrainAngles {
    pub fn get(&self, gear: Gear) -> f64 {
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

    /// `(gear, angle)` pairs in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (Gear, f64)> + '_ {
        Gear::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

/// The three additive parts of a gear angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleTerms {
    /// Half-tooth turn applied to even flagged gears.
    pub mesh_offset: f64,
    /// Layout angle carried through the chain.
    pub layout_phase: f64,
    /// Drive angle times the signed ratio from the spindle.
    pub drive: f64,
}

impl AngleTerms {
    pub fn total(&self) -> f64 {
        self.mesh_offset + self.layout_phase + self.drive
    }

    /// The part that does not move with the drive.
    pub fn static_phase(&self) -> f64 {
        self.mesh_offset + self.layout_phase
    }
}

/// A gear set with its chain resolved, ready to be evaluated at any drive angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearTrain {
    teeth: TrainTeeth,
    layout_angle: f64,
    chain: ResolvedChain,
}

impl GearTrain {
    /// Validate `teeth` and resolve the train.
    ///
    /// Kinematic errors (zero teeth, broken closure) are rejected. Physical fit
    /// problems are logged and the train is still built.
    #[instrument(skip(config))]
    pub fn new(teeth: TrainTeeth, config: &KinematicsConfig) -> Result<Self, KinematicsError> {
        let report = validate_train(&teeth, &config.limits);
        if !report.is_valid() {
            return Err(KinematicsError::InvalidTrain {
                issues: report.errors,
            });
        }
        for issue in &report.warnings {
            warn!(code = ?issue.code, "{}", issue.detail);
        }
        let train = Self::unchecked(teeth, config.layout_angle);
        debug!(
            effective_teeth = effective_teeth(&teeth),
            output_ratio = train.chain.get(Gear::Output).ratio,
            "gear train resolved"
        );
        Ok(train)
    }

    /// Resolve without validation. Bad tooth counts give a mismeshed train
    /// (or non-finite angles for zero teeth) rather than an error.
    pub fn unchecked(teeth: TrainTeeth, layout_angle: f64) -> Self {
        Self {
            teeth,
            layout_angle,
            chain: resolve_chain(&teeth),
        }
    }

    pub fn teeth(&self) -> &TrainTeeth {
        &self.teeth
    }

    pub fn layout_angle(&self) -> f64 {
        self.layout_angle
    }

    pub fn kinematics(&self, gear: Gear) -> &GearKinematics {
        self.chain.get(gear)
    }

    pub fn angle_terms(&self, gear: Gear, drive_angle: f64) -> AngleTerms {
        let k = self.chain.get(gear);
        AngleTerms {
            mesh_offset: k.mesh_offset(),
            layout_phase: k.layout_phase(self.layout_angle),
            drive: k.drive_contribution(drive_angle),
        }
    }

    pub fn angle(&self, gear: Gear, drive_angle: f64) -> f64 {
        self.angle_terms(gear, drive_angle).total()
    }

    pub fn angles(&self, drive_angle: f64) -> TrainAngles {
        let a = |gear| self.angle(gear, drive_angle);
        TrainAngles {
            spindle: a(Gear::Spindle),
            input: a(Gear::Input),
            inch: a(Gear::Inch),
            third: a(Gear::Third),
            fourth: a(Gear::Fourth),
            idler: a(Gear::Idler),
            output: a(Gear::Output),
        }
    }

    /// Angle of the reference-tooth marker.
    ///
    /// The static phase is reduced to within one tooth pitch before the drive
    /// term is added, so the marker stays on the same physical tooth however
    /// many revolutions the drive has made.
    pub fn marker_angle(&self, gear: Gear, drive_angle: f64) -> f64 {
        let k = self.chain.get(gear);
        let terms = self.angle_terms(gear, drive_angle);
        terms.static_phase().rem_euclid(k.tooth_pitch()) + terms.drive
    }

    /// Drive travel that turns `gear` through exactly one revolution.
    pub fn drive_period(&self, gear: Gear) -> f64 {
        360.0 / self.chain.get(gear).ratio
    }

    /// Equivalent spindle gear size seen by the lathe: `S/P * I/M * N`.
    pub fn effective_teeth(&self) -> f64 {
        effective_teeth(&self.teeth)
    }

    /// Rolled-arc mismatch of every external mesh at `drive_angle`.
    pub fn mesh_residuals(&self, drive_angle: f64) -> Vec<MeshResidual> {
        mesh_residuals(self, drive_angle)
    }

    pub fn max_mesh_residual(&self, drive_angle: f64) -> f64 {
        self.mesh_residuals(drive_angle)
            .iter()
            .map(|r| r.residual.abs())
            .fold(0.0, f64::max)
    }
}

/// Angles of all gears for one drive angle.
///
/// Pure function of its inputs. The caller must supply a closed tooth set;
/// nothing is checked.
pub fn train_angles(teeth: &TrainTeeth, layout_angle: f64, drive_angle: f64) -> TrainAngles {
    GearTrain::unchecked(*teeth, layout_angle).angles(drive_angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reference() -> GearTrain {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        GearTrain::new(teeth, &KinematicsConfig::default()).unwrap()
    }

    #[test]
    fn test_spindle_follows_drive() {
        let train = reference();
        assert_eq!(train.angle(Gear::Spindle, 0.0), 0.0);
        assert_eq!(train.angle(Gear::Spindle, 725.0), 725.0);
    }

    #[test]
    fn test_input_turns_backwards() {
        let train = reference();
        let terms = train.angle_terms(Gear::Input, 10.0);
        assert_abs_diff_eq!(terms.drive, -4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(terms.mesh_offset, 180.0 / 140.0, epsilon = 1e-12);
        assert_eq!(terms.layout_phase, 0.0);
    }

    #[test]
    fn test_keyed_pairs_share_drive_term() {
        let train = reference();
        for drive in [-30.0, 0.0, 45.5, 1000.0] {
            assert_eq!(
                train.angle_terms(Gear::Input, drive).drive,
                train.angle_terms(Gear::Inch, drive).drive
            );
            assert_eq!(
                train.angle(Gear::Third, drive),
                train.angle(Gear::Fourth, drive)
            );
        }
    }

    #[test]
    fn test_angles_struct_matches_per_gear() {
        let train = reference();
        let angles = train.angles(33.0);
        for (gear, angle) in angles.iter() {
            assert_eq!(angle, train.angle(gear, 33.0));
        }
    }

    #[test]
    fn test_rejects_open_train() {
        let mut teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        teeth.idler = 130;
        let err = GearTrain::new(teeth, &KinematicsConfig::default()).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidTrain { .. }));
    }

    #[test]
    fn test_unchecked_zero_teeth_is_not_finite() {
        let mut teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        teeth.third = 0;
        let angles = train_angles(&teeth, 120.0, 10.0);
        assert!(!angles.third.is_finite());
        assert!(angles.spindle.is_finite());
    }

    #[test]
    fn test_marker_within_one_pitch_at_rest() {
        let train = reference();
        let marker = train.marker_angle(Gear::Output, 0.0);
        assert!((0.0..360.0 / 64.0).contains(&marker), "marker = {marker}");
        assert_eq!(train.marker_angle(Gear::Spindle, 0.0), 0.0);
    }
}
