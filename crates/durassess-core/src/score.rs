use std::fmt;

use serde::Serialize;

pub const THICKNESS_LOW_BELOW_CM: f64 = 2.0;
pub const THICKNESS_HIGH_ABOVE_CM: f64 = 3.0;
pub const WEIGHT_LOW_AT_MOST_G: f64 = 10.0;
pub const WEIGHT_HIGH_ABOVE_G: f64 = 80.0;

/// Totals strictly below this offer the problem-analysis pass.
pub const DIAGNOSIS_BELOW_TOTAL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn from_total(total: u8) -> Self {
        if total >= 6 {
            Self::High
        } else if total >= 3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::High => "The bottle is highly durable! (Max Score)",
            Self::Medium => "Durability is medium. Needs improvement.",
            Self::Low => "Low durability. Improve material thickness and/or weight.",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub thickness_score: u8,
    pub weight_score: u8,
    pub total: u8,
    pub tier: Tier,
}

impl ScoreResult {
    pub fn diagnosis_offered(&self) -> bool {
        self.total < DIAGNOSIS_BELOW_TOTAL
    }
}

pub fn thickness_score(thickness: f64) -> u8 {
    if thickness < THICKNESS_LOW_BELOW_CM {
        1
    } else if thickness <= THICKNESS_HIGH_ABOVE_CM {
        2
    } else {
        3
    }
}

// Weight bands close the (10, 11) gap: anything above 10 g is already band two.
pub fn weight_score(weight: f64) -> u8 {
    if weight <= WEIGHT_LOW_AT_MOST_G {
        1
    } else if weight <= WEIGHT_HIGH_ABOVE_G {
        2
    } else {
        3
    }
}

pub fn score(thickness: f64, weight: f64) -> ScoreResult {
    let thickness_score = thickness_score(thickness);
    let weight_score = weight_score(weight);
    let total = thickness_score + weight_score;

    ScoreResult {
        thickness_score,
        weight_score,
        total,
        tier: Tier::from_total(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thickness_boundaries() {
        assert_eq!(score(1.999, 50.0).thickness_score, 1);
        assert_eq!(score(2.0, 50.0).thickness_score, 2);
        assert_eq!(score(3.0, 50.0).thickness_score, 2);
        assert_eq!(score(3.001, 50.0).thickness_score, 3);
    }

    #[test]
    fn weight_boundaries() {
        assert_eq!(score(2.5, 10.0).weight_score, 1);
        assert_eq!(score(2.5, 10.001).weight_score, 2);
        assert_eq!(score(2.5, 10.5).weight_score, 2);
        assert_eq!(score(2.5, 80.0).weight_score, 2);
        assert_eq!(score(2.5, 80.001).weight_score, 3);
    }

    #[test]
    fn tier_follows_total() {
        let thicknesses = [0.5, 2.5, 7.0];
        let weights = [1.0, 40.0, 200.0];
        for t in thicknesses {
            for w in weights {
                let out = score(t, w);
                assert!((2..=6).contains(&out.total));
                assert_eq!(out.total, out.thickness_score + out.weight_score);
                let expected = match out.total {
                    6 => Tier::High,
                    2 => Tier::Low,
                    _ => Tier::Medium,
                };
                assert_eq!(out.tier, expected, "t={t} w={w}");
                assert_eq!(out.diagnosis_offered(), out.total == 2);
            }
        }
    }

    #[test]
    fn scenario_scores() {
        let low = score(1.5, 5.0);
        assert_eq!((low.thickness_score, low.weight_score, low.total), (1, 1, 2));
        assert_eq!(low.tier, Tier::Low);

        let medium = score(2.5, 50.0);
        assert_eq!(
            (medium.thickness_score, medium.weight_score, medium.total),
            (2, 2, 4)
        );
        assert_eq!(medium.tier, Tier::Medium);
        assert!(!medium.diagnosis_offered());

        let high = score(4.0, 90.0);
        assert_eq!((high.thickness_score, high.weight_score, high.total), (3, 3, 6));
        assert_eq!(high.tier, Tier::High);
    }
}
