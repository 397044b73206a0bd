use thiserror::Error;
use tpi_types::{Gear, TeethError};

use crate::validation::FitIssue;

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error(transparent)]
    Teeth(#[from] TeethError),
    #[error("Gear train does not mesh: {}", format_issues(.issues))]
    InvalidTrain { issues: Vec<FitIssue> },
    #[error("Malformed solver record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
    #[error("Solver record has {found} values, expected 7")]
    RecordLength { found: usize },
    #[error("Solver record gives gear {gear} {value} teeth")]
    NonPositiveRecordValue { gear: Gear, value: f64 },
    #[error("Solver record gives gear {gear} {value} teeth, more than a tooth count can hold")]
    InvalidRecordValue { gear: Gear, value: f64 },
}

fn format_issues(issues: &[FitIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
