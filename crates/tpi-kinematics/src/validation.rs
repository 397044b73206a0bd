//! Checks on a tooth set before it is animated.
//!
//! Errors make the train kinematically wrong (it would visibly mismesh).
//! Warnings are physical fit problems on the lathe: the train still turns
//! correctly but the box would not fit behind the spindle.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use tpi_types::{Gear, TrainTeeth};

use crate::config::FitLimits;

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The train cannot mesh.
    Error,
    /// The train meshes but does not fit the lathe.
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCode {
    // --- Kinematic ---
    /// A gear has no teeth.
    ZeroTeeth,
    /// `Q != I + M - N`.
    IdlerClosure,
    /// `O != P + S - Q`.
    OutputClosure,

    // --- Physical fit ---
    /// Output gear would not clear the spindle gear.
    OutputTooSmall,
    /// Output gear would foul the lathe's B gear.
    OutputTooLarge,
    /// Input gear too small for the inch gear and output gear to clear.
    InputTooSmall,
    InputTooLarge,
    /// Idler would snag on the inch gear.
    IdlerTooSmall,
    FourthTooSmall,
    ThirdTooLarge,
}

impl IssueCode {
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::ZeroTeeth | IssueCode::IdlerClosure | IssueCode::OutputClosure => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

/// A single finding with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitIssue {
    pub code: IssueCode,
    pub gear: Gear,
    pub detail: String,
}

impl FitIssue {
    fn new(code: IssueCode, gear: Gear, detail: String) -> Self {
        Self { code, gear, detail }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for FitIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.gear, self.detail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FitIssue>,
    pub warnings: Vec<FitIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Valid and no fit warnings.
    pub fn fits(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|i| i.code == code)
    }

    fn push(&mut self, issue: FitIssue) {
        match issue.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

/// Run all checks on `teeth`.
#[instrument(skip(limits))]
pub fn validate_train(teeth: &TrainTeeth, limits: &FitLimits) -> ValidationReport {
    let mut report = ValidationReport::default();

    for gear in Gear::ALL {
        if teeth.get(gear) == 0 {
            report.push(FitIssue::new(
                IssueCode::ZeroTeeth,
                gear,
                "tooth count is zero".to_string(),
            ));
        }
    }

    let idler = teeth.expected_idler();
    if idler != teeth.idler as i64 {
        report.push(FitIssue::new(
            IssueCode::IdlerClosure,
            Gear::Idler,
            format!("I + M - N = {}, got {}", idler, teeth.idler),
        ));
    }
    let output = teeth.expected_output();
    if output != teeth.output as i64 {
        report.push(FitIssue::new(
            IssueCode::OutputClosure,
            Gear::Output,
            format!("P + S - Q = {}, got {}", output, teeth.output),
        ));
    }

    check_fit(teeth, limits, &mut report);

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated tooth set"
    );
    report
}

fn check_fit(teeth: &TrainTeeth, limits: &FitLimits, report: &mut ValidationReport) {
    let snag = limits.no_snag as i64;
    let (s, p, i, m, n, q, o) = (
        teeth.spindle as i64,
        teeth.input as i64,
        teeth.inch as i64,
        teeth.third as i64,
        teeth.fourth as i64,
        teeth.idler as i64,
        teeth.output as i64,
    );

    if o < s + snag {
        report.push(FitIssue::new(
            IssueCode::OutputTooSmall,
            Gear::Output,
            format!("{} teeth, needs at least {}", o, s + snag),
        ));
    }
    if o >= limits.max_output as i64 {
        report.push(FitIssue::new(
            IssueCode::OutputTooLarge,
            Gear::Output,
            format!("{} teeth, must stay below {}", o, limits.max_output),
        ));
    }
    if p < i + o + snag - s {
        report.push(FitIssue::new(
            IssueCode::InputTooSmall,
            Gear::Input,
            format!("{} teeth, needs at least {}", p, i + o + snag - s),
        ));
    }
    if p >= limits.max_input as i64 {
        report.push(FitIssue::new(
            IssueCode::InputTooLarge,
            Gear::Input,
            format!("{} teeth, must stay below {}", p, limits.max_input),
        ));
    }
    if q < i + snag {
        report.push(FitIssue::new(
            IssueCode::IdlerTooSmall,
            Gear::Idler,
            format!("{} teeth, needs at least {}", q, i + snag),
        ));
    }
    if n < limits.min_fourth as i64 {
        report.push(FitIssue::new(
            IssueCode::FourthTooSmall,
            Gear::Fourth,
            format!("{} teeth, needs at least {}", n, limits.min_fourth),
        ));
    }
    if m >= limits.max_third as i64 {
        report.push(FitIssue::new(
            IssueCode::ThirdTooLarge,
            Gear::Third,
            format!("{} teeth, must stay below {}", m, limits.max_third),
        ));
    }
}
