//! Thread pitch produced on the lathe by a driver gear and the change-gear
//! banjo.
//!
//! The driver is either the plain spindle gear or the TPI box, whose
//! [effective teeth](crate::effective::effective_teeth) take the spindle
//! gear's place.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::BanjoLimits;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchUnit {
    /// Millimetres per revolution.
    Mm,
    /// Threads per inch.
    Tpi,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leadscrew {
    pub pitch: f64,
    pub unit: PitchUnit,
}

impl Default for Leadscrew {
    fn default() -> Self {
        Self {
            pitch: 2.0,
            unit: PitchUnit::Mm,
        }
    }
}

/// How the change gears are populated on the banjo.
///
/// Letters follow the banjo positions: A/B on the top post, C/D on the
/// bottom post, E/F on the leadscrew. Positions left empty are omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeGears {
    /// Three gears, A–C–E in a single meshing line.
    Line { a: u32, c: u32, e: u32 },
    /// Four gears, A–B compound on the top post, D idling, F on the leadscrew.
    Dogleg { a: u32, b: u32, d: u32, f: u32 },
    /// Four gears, A idling, C–D compound on the bottom post.
    Flash { a: u32, c: u32, d: u32, f: u32 },
    /// Five gears, both posts compound.
    Questionmark { a: u32, b: u32, c: u32, d: u32, e: u32 },
}

impl ChangeGears {
    /// Speed ratio from the driver gear to the leadscrew, with the driver's
    /// tooth count factored out.
    pub fn ratio_per_driver_tooth(&self) -> f64 {
        match *self {
            ChangeGears::Line { e, .. } => 1.0 / e as f64,
            ChangeGears::Dogleg { a, b, f, .. } => 1.0 / a as f64 * b as f64 / f as f64,
            ChangeGears::Flash { c, d, f, .. } => 1.0 / c as f64 * d as f64 / f as f64,
            ChangeGears::Questionmark { a, b, c, d, e } => {
                1.0 / a as f64 * b as f64 / d as f64 * c as f64 / e as f64
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanjoIssueCode {
    /// Leadscrew to bottom post to top post is longer than the banjo allows.
    CentersTooLong,
    /// A does not reach the spindle gear.
    ShortOfSpindle,
    /// B runs into the spindle.
    FoulsSpindle,
    /// The gear on the bottom post runs into the leadscrew.
    FoulsLeadscrew,
    /// A and C touch with both posts compound.
    GearsInterfere,
}

/// A change-gear population that turns correctly but does not fit the banjo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanjoIssue {
    pub code: BanjoIssueCode,
    /// Banjo position of the offending gear.
    pub position: char,
    pub detail: String,
}

impl BanjoIssue {
    fn new(code: BanjoIssueCode, position: char, detail: &str) -> Self {
        Self {
            code,
            position,
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for BanjoIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.position, self.detail)
    }
}

struct FitCheck<'a> {
    spindle_teeth: u64,
    limits: &'a BanjoLimits,
    issues: Vec<BanjoIssue>,
}

impl FitCheck<'_> {
    fn centers(&mut self, gears: [u32; 4]) {
        if total(&gears) > 2 * self.limits.max_centers as u64 {
            self.issues.push(BanjoIssue::new(
                BanjoIssueCode::CentersTooLong,
                'A',
                "Total center distance too large",
            ));
        }
    }

    fn reach(&mut self, gears: [u32; 5]) {
        if total(&gears) < 2 * self.limits.reach_dimension as u64 {
            self.issues.push(BanjoIssue::new(
                BanjoIssueCode::ShortOfSpindle,
                'A',
                "'A' gear doesn't reach Spindle.",
            ));
        }
    }

    /// `b` must clear the spindle that `a` meshes with.
    fn spindle(&mut self, a: u64, b: u32) {
        if b as u64 + self.limits.spindle_diameter as u64 >= self.spindle_teeth + a {
            self.issues.push(BanjoIssue::new(
                BanjoIssueCode::FoulsSpindle,
                'B',
                "B gear fouls spindle",
            ));
        }
    }

    /// `a` on the bottom post must clear the leadscrew that `b` and `c` reach.
    fn leadscrew(&mut self, position: char, a: u32, b: u32, c: u32) {
        if a as u64 + self.limits.leadscrew_diameter as u64 >= b as u64 + c as u64 {
            let detail = format!("{position} gear fouls leadscrew");
            self.issues
                .push(BanjoIssue::new(BanjoIssueCode::FoulsLeadscrew, position, &detail));
        }
    }

    fn between(&mut self, a: u32, b: u32, c: u32, d: u32) {
        if a as u64 + c as u64 + self.limits.gear_clearance as u64 >= b as u64 + d as u64 {
            self.issues.push(BanjoIssue::new(
                BanjoIssueCode::GearsInterfere,
                'C',
                "A and C gears interfere",
            ));
        }
    }
}

fn total(gears: &[u32]) -> u64 {
    gears.iter().map(|&g| g as u64).sum()
}

impl ChangeGears {
    /// Check that the population fits on the banjo. `spindle_teeth` is the
    /// gear that A meshes with. An empty list means the gears fit.
    pub fn check_fit(&self, spindle_teeth: u32, limits: &BanjoLimits) -> Vec<BanjoIssue> {
        let mut check = FitCheck {
            spindle_teeth: spindle_teeth as u64,
            limits,
            issues: Vec::new(),
        };
        match *self {
            ChangeGears::Line { a, c, e } => {
                check.centers([a, c, c, e]);
                check.reach([a, a, c, c, e]);
            }
            ChangeGears::Dogleg { a, b, d, f } => {
                check.centers([b, d, d, f]);
                check.reach([a, b, d, d, f]);
                check.spindle(a as u64, b);
            }
            ChangeGears::Flash { a, c, d, f } => {
                check.centers([a, c, d, f]);
                check.reach([a, a, c, d, f]);
                check.spindle(2 * a as u64 + c as u64, d);
                check.leadscrew('C', c, d, f);
            }
            ChangeGears::Questionmark { a, b, c, d, e } => {
                check.centers([b, d, c, e]);
                check.reach([a, b, d, c, e]);
                check.leadscrew('D', d, c, e);
                check.between(a, b, c, d);
            }
        }
        debug!(gears = ?self, issues = check.issues.len(), "checked banjo fit");
        check.issues
    }
}

/// Pitch cut with `driver_teeth` on the spindle side, in `unit`.
pub fn feed_pitch(
    driver_teeth: f64,
    gears: &ChangeGears,
    leadscrew: &Leadscrew,
    unit: PitchUnit,
) -> f64 {
    let pitch = driver_teeth * leadscrew.pitch * gears.ratio_per_driver_tooth();
    convert(pitch, leadscrew.unit, unit)
}

/// Convert between mm pitch and TPI. The conversion is its own inverse.
pub fn convert(value: f64, from: PitchUnit, to: PitchUnit) -> f64 {
    if from == to {
        value
    } else {
        MM_PER_INCH / value
    }
}
