use serde::Serialize;

use crate::measurement::Role;
use crate::score::{THICKNESS_LOW_BELOW_CM, WEIGHT_LOW_AT_MOST_G};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticFinding {
    pub role: Role,
    pub is_problem: bool,
    pub advisory: &'static str,
}

impl DiagnosticFinding {
    fn new(role: Role, is_problem: bool) -> Self {
        let advisory = match (role, is_problem) {
            (Role::Thickness, true) => "increase thickness",
            (Role::Thickness, false) => "thickness OK",
            (Role::Weight, true) => "increase weight",
            (Role::Weight, false) => "weight OK",
        };
        Self {
            role,
            is_problem,
            advisory,
        }
    }

    /// Line shown right after the factor has been analysed.
    pub fn headline(&self) -> &'static str {
        match (self.role, self.is_problem) {
            (Role::Thickness, true) => "Problem Found At Thickness -- Low Thickness - Increase Thickness",
            (Role::Thickness, false) => "Thickness OK -- No Problem Found At Thickness",
            (Role::Weight, true) => "Problem Found At Weight -- Low Weight - Increase Weight",
            (Role::Weight, false) => "Weight OK -- No Problem Found At Weight",
        }
    }

    /// Line for the closing summary.
    pub fn summary(&self) -> &'static str {
        match (self.role, self.is_problem) {
            (Role::Thickness, true) => "LOW THICKNESS - Increase thickness",
            (Role::Thickness, false) => "THICKNESS OK",
            (Role::Weight, true) => "LOW WEIGHT - Increase weight",
            (Role::Weight, false) => "WEIGHT OK",
        }
    }
}

/// Thickness finding first, weight second.
pub type DiagnosticReport = [DiagnosticFinding; 2];

pub fn diagnose(thickness: f64, weight: f64) -> DiagnosticReport {
    [
        DiagnosticFinding::new(Role::Thickness, thickness < THICKNESS_LOW_BELOW_CM),
        DiagnosticFinding::new(Role::Weight, weight <= WEIGHT_LOW_AT_MOST_G),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::score;

    #[test]
    fn both_factors_flagged_when_low() {
        let [thickness, weight] = diagnose(1.5, 5.0);
        assert_eq!(thickness.role, Role::Thickness);
        assert!(thickness.is_problem);
        assert_eq!(thickness.advisory, "increase thickness");
        assert_eq!(weight.role, Role::Weight);
        assert!(weight.is_problem);
        assert_eq!(weight.advisory, "increase weight");
    }

    #[test]
    fn boundaries_match_scoring_bands() {
        let [thickness, weight] = diagnose(2.0, 10.001);
        assert!(!thickness.is_problem);
        assert_eq!(thickness.advisory, "thickness OK");
        assert!(!weight.is_problem);
        assert_eq!(weight.advisory, "weight OK");

        let [_, weight] = diagnose(2.0, 10.0);
        assert!(weight.is_problem);
    }

    #[test]
    fn independent_of_scoring_order() {
        let before = diagnose(1.2, 40.0);
        let _ = score(1.2, 40.0);
        let after = diagnose(1.2, 40.0);
        assert_eq!(before, after);
        let [first, second] = before;
        assert_eq!(first.summary(), "LOW THICKNESS - Increase thickness");
        assert_eq!(second.summary(), "WEIGHT OK");
    }
}
