use serde::Serialize;
use std::fmt;

use super::domain::{AnalysisResult, RiskLabel, Severity};

/// Roll-up of all per-drug assessments in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallRisk {
    Low,
    Moderate,
    High,
}

impl OverallRisk {
    pub const fn as_str(self) -> &'static str {
        match self {
            OverallRisk::Low => "LOW",
            OverallRisk::Moderate => "MODERATE",
            OverallRisk::High => "HIGH",
        }
    }
}

impl fmt::Display for OverallRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any critical result is `HIGH` outright. Otherwise Toxic and Ineffective add two points,
/// Adjust Dosage adds one, and the total is bucketed.
pub fn overall_risk(results: &[AnalysisResult]) -> OverallRisk {
    let mut score = 0usize;
    for assessment in results.iter().map(|result| &result.risk_assessment) {
        if assessment.severity == Severity::Critical {
            return OverallRisk::High;
        }
        score += match assessment.risk_label {
            RiskLabel::Toxic | RiskLabel::Ineffective => 2,
            RiskLabel::AdjustDosage => 1,
            RiskLabel::Safe | RiskLabel::Unknown => 0,
        };
    }

    match score {
        0 => OverallRisk::Low,
        1..=2 => OverallRisk::Moderate,
        _ => OverallRisk::High,
    }
}
