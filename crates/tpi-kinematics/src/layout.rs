//! Placement of the three shafts in the gear plane.
//!
//! The spindle axis is the origin. The countershaft sits one S–P center
//! distance away along the bearing angle; the offset shaft is swung around
//! the countershaft by the layout angle at the I–M center distance. The
//! idler runs free on the countershaft, so a closed tooth set gives correct
//! center distances for the N–Q and Q–O meshes without further placement.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use tpi_types::{Gear, Shaft, TrainTeeth};

use crate::config::KinematicsConfig;
use crate::mesh::external_meshes;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaftLayout {
    teeth: TrainTeeth,
    module: f64,
    spindle: Point2<f64>,
    countershaft: Point2<f64>,
    offset: Point2<f64>,
}

/// Center distance of an external mesh.
pub fn center_distance(module: f64, za: u32, zb: u32) -> f64 {
    module * (za as f64 + zb as f64) / 2.0
}

fn polar(length: f64, degrees: f64) -> Vector2<f64> {
    Rotation2::new(degrees.to_radians()) * Vector2::new(length, 0.0)
}

impl ShaftLayout {
    pub fn new(teeth: &TrainTeeth, module: f64, layout_angle: f64, countershaft_bearing: f64) -> Self {
        let spindle = Point2::origin();
        let countershaft = spindle
            + polar(
                center_distance(module, teeth.spindle, teeth.input),
                countershaft_bearing,
            );
        let offset = countershaft
            + polar(
                center_distance(module, teeth.inch, teeth.third),
                layout_angle,
            );
        Self {
            teeth: *teeth,
            module,
            spindle,
            countershaft,
            offset,
        }
    }

    pub fn from_config(teeth: &TrainTeeth, config: &KinematicsConfig) -> Self {
        Self::new(
            teeth,
            config.module,
            config.layout_angle,
            config.countershaft_bearing,
        )
    }

    pub fn shaft_center(&self, shaft: Shaft) -> Point2<f64> {
        match shaft {
            Shaft::Spindle => self.spindle,
            Shaft::Countershaft => self.countershaft,
            Shaft::Offset => self.offset,
        }
    }

    /// Center of `gear` in the gear plane, for a renderer to place the
    /// gear profile.
    pub fn center(&self, gear: Gear) -> Point2<f64> {
        self.shaft_center(gear.shaft())
    }

    /// Pitch radius of `gear`.
    pub fn pitch_radius(&self, gear: Gear) -> f64 {
        self.module * self.teeth.get(gear) as f64 / 2.0
    }

    /// Actual minus required center distance for every external mesh.
    pub fn center_distance_errors(&self) -> Vec<(Gear, Gear, f64)> {
        external_meshes()
            .map(|(a, b)| {
                let actual = nalgebra::distance(&self.center(a), &self.center(b));
                let required = center_distance(self.module, self.teeth.get(a), self.teeth.get(b));
                (a, b, actual - required)
            })
            .collect()
    }

    /// Largest absolute center-distance error over the external meshes.
    pub fn max_center_distance_error(&self) -> f64 {
        self.center_distance_errors()
            .into_iter()
            .map(|(_, _, err)| err.abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_countershaft_below_spindle() {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let layout = ShaftLayout::from_config(&teeth, &KinematicsConfig::default());
        let c = layout.shaft_center(Shaft::Countershaft);
        assert_abs_diff_eq!(c.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.y, -98.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closed_set_has_exact_center_distances() {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let layout = ShaftLayout::new(&teeth, 1.25, 120.0, -75.0);
        for (a, b, err) in layout.center_distance_errors() {
            assert!(err.abs() < 1e-9, "{a}-{b}: {err}");
        }
    }

    #[test]
    fn test_open_set_shows_center_error() {
        let mut teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        teeth.output = 60;
        let layout = ShaftLayout::new(&teeth, 1.0, 120.0, -90.0);
        let errors = layout.center_distance_errors();
        let (_, _, q_o) = errors[3];
        assert_abs_diff_eq!(q_o, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unclosed_set_misses_at_any_layout() {
        let teeth = TrainTeeth {
            spindle: 17,
            input: 3,
            inch: 200,
            third: 7,
            fourth: 91,
            idler: 5,
            output: 250,
        };
        let tolerance = KinematicsConfig::default().center_tolerance;
        for layout_angle in [0.0, 77.0, 200.0] {
            let layout = ShaftLayout::new(&teeth, 1.0, layout_angle, -90.0);
            let errors: Vec<f64> = layout
                .center_distance_errors()
                .into_iter()
                .map(|(_, _, err)| err)
                .collect();
            // N-Q: 103.5 - 48, Q-O: 10 - 127.5
            assert_abs_diff_eq!(errors[2], 55.5, epsilon = 1e-9);
            assert_abs_diff_eq!(errors[3], -117.5, epsilon = 1e-9);
            assert_abs_diff_eq!(layout.max_center_distance_error(), 117.5, epsilon = 1e-9);
            assert!(layout.max_center_distance_error() > tolerance);
        }
    }

    #[test]
    fn test_center_distance_of_huge_gears() {
        assert_abs_diff_eq!(
            center_distance(1.0, u32::MAX, u32::MAX),
            u32::MAX as f64,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_coaxial_gears_share_center() {
        let teeth = TrainTeeth::derive(56, 140, 127, 40, 35).unwrap();
        let layout = ShaftLayout::new(&teeth, 1.0, 120.0, -90.0);
        assert_eq!(layout.center(Gear::Spindle), layout.center(Gear::Output));
        assert_eq!(layout.center(Gear::Input), layout.center(Gear::Idler));
        assert_abs_diff_eq!(layout.pitch_radius(Gear::Inch), 63.5, epsilon = 1e-12);
    }
}
