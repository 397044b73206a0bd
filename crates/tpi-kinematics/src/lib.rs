//! Kinematic model of the TPI box gear train.
//!
//! Every gear angle is a pure function of the tooth counts, the layout angle
//! of the offset shaft and the spindle drive angle. Nothing here keeps state
//! between evaluations, so frames may be sampled in any order.

pub mod angles;
pub mod chain;
pub mod config;
pub mod diagnostic;
pub mod effective;
pub mod error;
pub mod feed;
pub mod layout;
pub mod mesh;
pub mod record;
pub mod validation;

pub use angles::{train_angles, AngleTerms, GearTrain, TrainAngles};
pub use chain::{mesh_sign, resolve_chain, Coupling, GearKinematics, ResolvedChain, Stage, TRAIN};
pub use config::{BanjoLimits, FitLimits, KinematicsConfig};
pub use diagnostic::Diagnostic;
pub use effective::{effective_teeth, is_inch_fractional, INCH_FRACTION};
pub use error::KinematicsError;
pub use feed::{feed_pitch, BanjoIssue, BanjoIssueCode, ChangeGears, Leadscrew, PitchUnit};
pub use layout::{center_distance, ShaftLayout};
pub use mesh::{external_meshes, MeshResidual};
pub use record::{CrossCheck, SolverRecord};
pub use validation::{validate_train, FitIssue, IssueCode, Severity, ValidationReport};

pub use tpi_types::{Gear, Shaft, TeethError, TrainTeeth};
