//! Rolled-arc consistency of the drive terms: two meshing gears must roll
//! equal arcs of their pitch circles.
//!
//! The drive terms are built from the chain ratios, so this residual is zero
//! for any tooth set, closed or not. It guards the sign and ratio bookkeeping
//! of the chain, not the tooth set. A set that cannot mesh shows up in
//! [`validate_train`](crate::validation::validate_train) and in
//! [`ShaftLayout::center_distance_errors`](crate::layout::ShaftLayout::center_distance_errors).

use serde::{Deserialize, Serialize};
use tpi_types::Gear;

use crate::angles::GearTrain;
use crate::chain::{Coupling, TRAIN};

/// Mismatch of one external mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshResidual {
    pub driver: Gear,
    pub driven: Gear,
    /// Arc mismatch since drive angle 0, in degrees of the driven gear.
    pub residual: f64,
}

/// `(driver, driven)` for every external mesh, in chain order.
pub fn external_meshes() -> impl Iterator<Item = (Gear, Gear)> {
    TRAIN.into_iter().filter_map(|stage| match stage.coupling {
        Coupling::Meshed { driver } => Some((driver, stage.gear)),
        _ => None,
    })
}

pub(crate) fn mesh_residuals(train: &GearTrain, drive_angle: f64) -> Vec<MeshResidual> {
    let rest = train.angles(0.0);
    let now = train.angles(drive_angle);
    external_meshes()
        .map(|(driver, driven)| {
            let za = train.teeth().get(driver) as f64;
            let zb = train.teeth().get(driven) as f64;
            let da = now.get(driver) - rest.get(driver);
            let db = now.get(driven) - rest.get(driven);
            MeshResidual {
                driver,
                driven,
                residual: (za * da + zb * db) / zb,
            }
        })
        .collect()
}
