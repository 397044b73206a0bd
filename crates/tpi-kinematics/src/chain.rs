//! Static description of the train and its resolution into per-gear
//! ratios and mesh counts.

use serde::{Deserialize, Serialize};
use tpi_types::{Gear, TrainTeeth};

/// How a gear receives its motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupling {
    /// Turned directly by the drive angle.
    Driver,
    /// External mesh with `driver`; reverses direction.
    Meshed { driver: Gear },
    /// Same shaft as `to`; identical angle.
    Keyed { to: Gear },
}

/// One entry of the train table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub gear: Gear,
    pub coupling: Coupling,
    /// Gear is turned half a tooth (when its count is even) so that a gap
    /// faces its driver's tooth at the mesh point.
    pub half_tooth: bool,
}

/// The TPI box, in chain order. A stage only refers to earlier stages.
pub const TRAIN: [Stage; 7] = [
    Stage {
        gear: Gear::Spindle,
        coupling: Coupling::Driver,
        half_tooth: false,
    },
    Stage {
        gear: Gear::Input,
        coupling: Coupling::Meshed {
            driver: Gear::Spindle,
        },
        half_tooth: true,
    },
    Stage {
        gear: Gear::Inch,
        coupling: Coupling::Keyed { to: Gear::Input },
        half_tooth: false,
    },
    Stage {
        gear: Gear::Third,
        coupling: Coupling::Meshed { driver: Gear::Inch },
        half_tooth: false,
    },
    Stage {
        gear: Gear::Fourth,
        coupling: Coupling::Keyed { to: Gear::Third },
        half_tooth: false,
    },
    Stage {
        gear: Gear::Idler,
        coupling: Coupling::Meshed {
            driver: Gear::Fourth,
        },
        half_tooth: true,
    },
    Stage {
        gear: Gear::Output,
        coupling: Coupling::Meshed { driver: Gear::Idler },
        half_tooth: false,
    },
];

/// The mesh whose driven gear sits on the offset shaft. Swinging that shaft
/// to the layout angle rolls the driven gear around its driver.
pub const LAYOUT_MESH: (Gear, Gear) = (Gear::Inch, Gear::Third);

/// `(-1)^meshes`: every external mesh reverses the sense of rotation.
pub fn mesh_sign(meshes: u32) -> f64 {
    if meshes % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Position of a gear relative to the layout mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutLink {
    /// Ratio from the layout driver to this gear.
    pub ratio: f64,
    /// External meshes traversed after the layout mesh.
    pub meshes: u32,
}

/// Resolved motion of a single gear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearKinematics {
    pub gear: Gear,
    pub teeth: u32,
    /// External meshes between the spindle and this gear.
    pub meshes: u32,
    /// Unsigned speed ratio from the spindle to this gear.
    pub ratio: f64,
    pub half_tooth: bool,
    /// Set for gears at or downstream of the layout mesh.
    pub layout: Option<LayoutLink>,
}

impl GearKinematics {
    /// Angular pitch of one tooth (degrees).
    pub fn tooth_pitch(&self) -> f64 {
        360.0 / self.teeth as f64
    }

    /// Half-tooth offset that centers a gap on the mesh point.
    pub fn mesh_offset(&self) -> f64 {
        if self.half_tooth && self.teeth % 2 == 0 {
            self.tooth_pitch() / 2.0
        } else {
            0.0
        }
    }

    /// Layout angle carried through the chain to this gear.
    pub fn layout_phase(&self, layout_angle: f64) -> f64 {
        match self.layout {
            Some(link) => layout_angle * link.ratio * mesh_sign(link.meshes),
            None => 0.0,
        }
    }

    /// Rotation caused by the spindle turning through `drive_angle`.
    pub fn drive_contribution(&self, drive_angle: f64) -> f64 {
        drive_angle * self.ratio * mesh_sign(self.meshes)
    }
}

/// The train with ratios and mesh counts worked out for one tooth set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedChain {
    gears: [GearKinematics; 7],
}

impl ResolvedChain {
    pub fn get(&self, gear: Gear) -> &GearKinematics {
        &self.gears[gear.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GearKinematics> {
        self.gears.iter()
    }
}

/// Walk the train table and resolve every gear against `teeth`.
///
/// No validation is done: a zero tooth count produces non-finite ratios.
pub fn resolve_chain(teeth: &TrainTeeth) -> ResolvedChain {
    let mut done: Vec<GearKinematics> = Vec::with_capacity(TRAIN.len());
    let gears = std::array::from_fn(|i| {
        let resolved = resolve_stage(&TRAIN[i], teeth, &done);
        done.push(resolved);
        resolved
    });
    ResolvedChain { gears }
}

fn resolve_stage(stage: &Stage, teeth: &TrainTeeth, done: &[GearKinematics]) -> GearKinematics {
    let count = teeth.get(stage.gear);
    let (meshes, ratio, layout) = match stage.coupling {
        Coupling::Driver => (0, 1.0, None),
        Coupling::Meshed { driver } => {
            let d = &done[driver.index()];
            let step = d.teeth as f64 / count as f64;
            let layout = if (driver, stage.gear) == LAYOUT_MESH {
                Some(LayoutLink {
                    ratio: step,
                    meshes: 0,
                })
            } else {
                d.layout.map(|link| LayoutLink {
                    ratio: link.ratio * step,
                    meshes: link.meshes + 1,
                })
            };
            (d.meshes + 1, d.ratio * step, layout)
        }
        Coupling::Keyed { to } => {
            let k = &done[to.index()];
            (k.meshes, k.ratio, k.layout)
        }
    };
    GearKinematics {
        gear: stage.gear,
        teeth: count,
        meshes,
        ratio,
        half_tooth: stage.half_tooth,
        layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TrainTeeth {
        TrainTeeth::derive(56, 140, 127, 40, 35).unwrap()
    }

    #[test]
    fn test_table_in_chain_order() {
        for (stage, gear) in TRAIN.iter().zip(Gear::ALL) {
            assert_eq!(stage.gear, gear);
        }
    }

    #[test]
    fn test_mesh_sign_alternates() {
        assert_eq!(mesh_sign(0), 1.0);
        assert_eq!(mesh_sign(1), -1.0);
        assert_eq!(mesh_sign(2), 1.0);
        assert_eq!(mesh_sign(7), -1.0);
    }

    #[test]
    fn test_mesh_counts() {
        let chain = resolve_chain(&reference());
        let counts: Vec<u32> = chain.iter().map(|k| k.meshes).collect();
        assert_eq!(counts, vec![0, 1, 1, 2, 2, 3, 4]);
    }

    #[test]
    fn test_keyed_gears_share_motion() {
        let chain = resolve_chain(&reference());
        assert_eq!(chain.get(Gear::Input).ratio, chain.get(Gear::Inch).ratio);
        assert_eq!(chain.get(Gear::Third).ratio, chain.get(Gear::Fourth).ratio);
        assert_eq!(chain.get(Gear::Third).layout, chain.get(Gear::Fourth).layout);
    }

    #[test]
    fn test_layout_branch_starts_at_offset_shaft() {
        let chain = resolve_chain(&reference());
        assert!(chain.get(Gear::Spindle).layout.is_none());
        assert!(chain.get(Gear::Input).layout.is_none());
        assert!(chain.get(Gear::Inch).layout.is_none());
        let third = chain.get(Gear::Third).layout.unwrap();
        assert_eq!(third.meshes, 0);
        assert!((third.ratio - 127.0 / 40.0).abs() < 1e-12);
        assert_eq!(chain.get(Gear::Output).layout.unwrap().meshes, 2);
    }

    #[test]
    fn test_mesh_offset_only_for_even_flagged_gears() {
        let chain = resolve_chain(&reference());
        assert!((chain.get(Gear::Input).mesh_offset() - 180.0 / 140.0).abs() < 1e-12);
        assert!((chain.get(Gear::Idler).mesh_offset() - 180.0 / 132.0).abs() < 1e-12);
        // even, but not flagged
        assert_eq!(chain.get(Gear::Spindle).mesh_offset(), 0.0);
        assert_eq!(chain.get(Gear::Output).mesh_offset(), 0.0);

        let odd = TrainTeeth::derive(56, 141, 127, 40, 35).unwrap();
        assert_eq!(resolve_chain(&odd).get(Gear::Input).mesh_offset(), 0.0);
    }

    #[test]
    fn test_output_ratio() {
        let chain = resolve_chain(&reference());
        // S/P * I/M * N/O; the idler cancels
        let expected = 56.0 / 140.0 * 127.0 / 40.0 * 35.0 / 64.0;
        assert!((chain.get(Gear::Output).ratio - expected).abs() < 1e-12);
    }
}
