use std::fmt;

use serde::Serialize;

use crate::error::{AssessmentError, RejectReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Thickness,
    Weight,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thickness => "thickness",
            Self::Weight => "weight",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Thickness => "cm",
            Self::Weight => "grams",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, strictly positive reading for one role.
///
/// Fields are private so an accepted value cannot be altered; the session
/// replaces it only through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    role: Role,
    value: f64,
}

impl Measurement {
    pub fn new(role: Role, value: f64) -> Result<Self, AssessmentError> {
        let reason = if value.is_nan() {
            Some(RejectReason::NotANumber)
        } else if !value.is_finite() {
            Some(RejectReason::NonFinite)
        } else if value <= 0.0 {
            Some(RejectReason::NotPositive)
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AssessmentError::InvalidMeasurement { role, reason }),
            None => Ok(Self { role, value }),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Admit raw user input for `role`. Surrounding whitespace is ignored.
pub fn validate(role: Role, raw: &str) -> Result<Measurement, AssessmentError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AssessmentError::InvalidMeasurement {
            role,
            reason: RejectReason::NotANumber,
        })?;
    Measurement::new(role, value)
}
