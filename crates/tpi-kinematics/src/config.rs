//! Configuration for the TPI box model.

use serde::{Deserialize, Serialize};

/// Train-wide constants supplied once per session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Teeth on the lathe's fixed spindle gear.
    pub spindle_teeth: u32,
    /// Mounting angle of the offset shaft around the countershaft (degrees).
    pub layout_angle: f64,
    /// Gear module shared by every gear in the train (mm per tooth of pitch diameter).
    pub module: f64,
    /// Direction of the countershaft as seen from the spindle axis (degrees).
    pub countershaft_bearing: f64,
    /// Largest center-distance error (mm) still considered a correct mesh.
    pub center_tolerance: f64,
    /// Physical fit limits checked on construction.
    pub limits: FitLimits,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            spindle_teeth: 56,
            layout_angle: 120.0,
            module: 1.0,
            countershaft_bearing: -90.0,
            center_tolerance: 1e-6,
            limits: FitLimits::default(),
        }
    }
}

/// Size limits for a box that hangs behind a MW210V spindle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitLimits {
    /// Size difference (teeth) that keeps overlapping gears from snagging.
    pub no_snag: u32,
    /// Exclusive upper bound on the output gear; larger ones foul the lathe's B gear.
    pub max_output: u32,
    /// Exclusive upper bound on the input gear.
    pub max_input: u32,
    /// Exclusive upper bound on the third gear.
    pub max_third: u32,
    /// Smallest usable fourth gear.
    pub min_fourth: u32,
}

impl Default for FitLimits {
    fn default() -> Self {
        Self {
            no_snag: 4,
            max_output: 71,
            max_input: 171,
            max_third: 100,
            min_fourth: 20,
        }
    }
}

impl FitLimits {
    /// No physical limits; only kinematic errors are reported.
    pub fn unbounded() -> Self {
        Self {
            no_snag: 0,
            max_output: u32::MAX,
            max_input: u32::MAX,
            max_third: u32::MAX,
            min_fourth: 0,
        }
    }
}

/// Room on the MW210V change-gear banjo.
///
/// Every dimension is an equivalent size: the tooth count of a gear whose
/// pitch diameter equals that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanjoLimits {
    /// Space taken up by the spindle.
    pub spindle_diameter: u32,
    /// Space taken up by the leadscrew shaft.
    pub leadscrew_diameter: u32,
    /// Longest total center distance from leadscrew over bottom post to top post.
    pub max_centers: u32,
    /// Shortest outside dimension for A to reach the spindle gear.
    pub reach_dimension: u32,
    /// Clearance between the non-meshing A and C gears with both posts full.
    pub gear_clearance: u32,
}

impl Default for BanjoLimits {
    fn default() -> Self {
        Self {
            spindle_diameter: 56,
            leadscrew_diameter: 23,
            max_centers: 135,
            reach_dimension: 110,
            gear_clearance: 4,
        }
    }
}
