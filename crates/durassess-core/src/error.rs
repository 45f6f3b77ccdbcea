use std::fmt;

use thiserror::Error;

use crate::measurement::Role;
use crate::sequencer::Stage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("invalid {role} measurement: {reason}")]
    InvalidMeasurement { role: Role, reason: RejectReason },

    #[error("{operation} is not allowed while {stage}")]
    InvalidTransition {
        operation: &'static str,
        stage: Stage,
    },
}

impl AssessmentError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMeasurement { .. } => "invalid_measurement",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// The measurement role a rejection is about, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::InvalidMeasurement { role, .. } => Some(*role),
            Self::InvalidTransition { .. } => None,
        }
    }
}

/// Why a raw measurement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotANumber,
    NonFinite,
    NotPositive,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotANumber => "not a number",
            Self::NonFinite => "value must be finite",
            Self::NotPositive => "value must be greater than zero",
        };
        f.write_str(text)
    }
}
